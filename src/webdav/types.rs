use bytes::Bytes;
use hyper::{HeaderMap, StatusCode, header};

pub const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";
pub const ICS_CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

/// WebDAV Depth
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Depth {
    Zero,
    One,
}

impl Depth {
    pub fn as_str(self) -> &'static str {
        match self {
            Depth::Zero => "0",
            Depth::One => "1",
        }
    }
}

/// HTTP verbs used against a CalDAV collection.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DavMethod {
    Put,
    Delete,
    Propfind,
    Report,
}

impl DavMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            DavMethod::Put => "PUT",
            DavMethod::Delete => "DELETE",
            DavMethod::Propfind => "PROPFIND",
            DavMethod::Report => "REPORT",
        }
    }
}

/// A single request handed to a [`crate::webdav::Transport`].
///
/// `content_type` is only sent together with a body and `depth` only when set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DavRequest {
    pub method: DavMethod,
    /// Absolute URL or a path resolved against the transport's base.
    pub url: String,
    pub body: Option<String>,
    pub content_type: Option<&'static str>,
    pub depth: Option<Depth>,
    pub if_match: Option<String>,
}

impl DavRequest {
    pub fn new(method: DavMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            content_type: None,
            depth: None,
            if_match: None,
        }
    }

    pub fn propfind(url: impl Into<String>, depth: Depth, xml_body: impl Into<String>) -> Self {
        Self::new(DavMethod::Propfind, url)
            .with_body(xml_body, XML_CONTENT_TYPE)
            .with_depth(depth)
    }

    pub fn report(url: impl Into<String>, depth: Depth, xml_body: impl Into<String>) -> Self {
        Self::new(DavMethod::Report, url)
            .with_body(xml_body, XML_CONTENT_TYPE)
            .with_depth(depth)
    }

    pub fn put_calendar(url: impl Into<String>, ics: impl Into<String>) -> Self {
        Self::new(DavMethod::Put, url).with_body(ics, ICS_CONTENT_TYPE)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(DavMethod::Delete, url)
    }

    pub fn with_body(mut self, body: impl Into<String>, content_type: &'static str) -> Self {
        self.body = Some(body.into());
        self.content_type = Some(content_type);
        self
    }

    pub fn with_depth(mut self, depth: Depth) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Guard the request with `If-Match: {etag}`.
    pub fn if_match(mut self, etag: impl Into<String>) -> Self {
        self.if_match = Some(etag.into());
        self
    }
}

/// Fully aggregated (and decompressed) response.
#[derive(Debug, Clone)]
pub struct DavResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl DavResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// `true` for any 2xx status, including `207 Multi-Status`.
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    /// Body as text. Invalid UTF-8 is replaced rather than rejected.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// `ETag` response header, if present.
    pub fn etag(&self) -> Option<String> {
        self.headers
            .get(header::ETAG)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
    }
}
