//! Error type shared by the transport, change detector and sync orchestrator.
//!
//! Only network and protocol failures surface here. Malformed iCalendar or XML
//! content inside a successful response is recovered locally by the parser and
//! never becomes a [`DavError`].

use hyper::StatusCode;

/// Convenience alias used throughout the crate.
pub type Result<T, E = DavError> = std::result::Result<T, E>;

/// Which write operation produced a [`DavError::Write`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOperation {
    Create,
    Update,
    Delete,
}

impl WriteOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            WriteOperation::Create => "create",
            WriteOperation::Update => "update",
            WriteOperation::Delete => "delete",
        }
    }
}

impl std::fmt::Display for WriteOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DavError {
    /// A read request came back with a non-2xx status.
    #[error("{context} failed with {status}")]
    Status {
        context: &'static str,
        status: StatusCode,
        body: String,
    },

    /// The ctag/etag queries of the change detector were rejected.
    #[error("{context} failed with {status}")]
    Protocol {
        context: &'static str,
        status: StatusCode,
        body: String,
    },

    /// A calendar-query or calendar-multiget REPORT was rejected.
    #[error("calendar sync failed with {status}")]
    Sync { status: StatusCode, body: String },

    /// A PUT or DELETE returned an unexpected status.
    #[error("failed to {operation} event: {status}")]
    Write {
        operation: WriteOperation,
        status: StatusCode,
        body: String,
    },

    /// A conditional write was refused with `412 Precondition Failed`.
    #[error("resource {url} was modified on the server (etag mismatch)")]
    Conflict { url: String },

    /// An update target that does not name an `.ics` resource.
    #[error("not an event resource: {0}")]
    InvalidResource(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] hyper_util::client::legacy::Error),

    #[error("request timed out")]
    Timeout,

    #[error("invalid URI: {0}")]
    InvalidUri(#[from] hyper::http::uri::InvalidUri),

    #[error("invalid URI parts: {0}")]
    InvalidUriParts(#[from] hyper::http::uri::InvalidUriParts),

    #[error("invalid method: {0}")]
    InvalidMethod(#[from] hyper::http::method::InvalidMethod),

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] hyper::header::InvalidHeaderValue),

    #[error("invalid request: {0}")]
    Request(#[from] hyper::http::Error),

    #[error("I/O error while reading response body: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl DavError {
    /// HTTP status carried by the error, when the server produced one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            DavError::Status { status, .. }
            | DavError::Protocol { status, .. }
            | DavError::Sync { status, .. }
            | DavError::Write { status, .. } => Some(*status),
            DavError::Conflict { .. } => Some(StatusCode::PRECONDITION_FAILED),
            _ => None,
        }
    }

    /// Response body captured for diagnostics, if any.
    pub fn body(&self) -> Option<&str> {
        match self {
            DavError::Status { body, .. }
            | DavError::Protocol { body, .. }
            | DavError::Sync { body, .. }
            | DavError::Write { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }
}
