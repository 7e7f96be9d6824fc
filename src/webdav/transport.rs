use std::future::Future;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use bytes::Bytes;
use http_body_util::Full;
use hyper::{HeaderMap, Method, Request, Uri, header};
use tokio::time::{Duration, timeout};

use crate::common::compression::{add_accept_encoding, decompress_body, detect_encodings};
use crate::common::http::{HyperClient, build_hyper_client};
use crate::config::CalDavConfig;
use crate::error::{DavError, Result};
use crate::webdav::types::{DavRequest, DavResponse};

/// The HTTP fetch capability the sync engine runs on.
///
/// Implementations send exactly one request per call: no retries, no
/// redirects followed on the caller's behalf. Status codes are returned as-is;
/// only failures to obtain a response at all are errors.
pub trait Transport: Send + Sync {
    fn send(&self, request: DavRequest) -> impl Future<Output = Result<DavResponse>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn send(&self, request: DavRequest) -> impl Future<Output = Result<DavResponse>> + Send {
        (**self).send(request)
    }
}

/// [`Transport`] on **hyper 1.x** + **rustls** with Basic auth.
///
/// Cloning is cheap and reuses the same connection pool.
#[derive(Clone)]
pub struct HyperTransport {
    base: Uri,
    client: HyperClient,
    auth_header: header::HeaderValue,
    timeout: Option<Duration>,
}

impl HyperTransport {
    /// Create a transport rooted at `base_url` authenticating as `username:token`.
    ///
    /// The base may be `https://` **or** `http://`.
    pub fn new(base_url: &str, username: &str, token: &str) -> Result<Self> {
        let base: Uri = base_url.parse()?;
        let val = format!("Basic {}", B64.encode(format!("{username}:{token}")));
        let mut auth_header = header::HeaderValue::from_str(&val)?;
        auth_header.set_sensitive(true);

        Ok(Self {
            base,
            client: build_hyper_client(),
            auth_header,
            timeout: None,
        })
    }

    pub fn from_config(config: &CalDavConfig) -> Result<Self> {
        let transport = Self::new(&config.calendar_home_url(), &config.username, &config.token)?;
        Ok(transport.with_timeout(config.timeout_secs.map(Duration::from_secs)))
    }

    /// Abort requests that take longer than `limit`. `None` disables the limit.
    pub fn with_timeout(mut self, limit: Option<Duration>) -> Self {
        self.timeout = limit;
        self
    }

    /// Resolve `path` against the base URI. Absolute URLs are returned unchanged.
    pub fn build_uri(&self, path: &str) -> Result<Uri> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(path.parse()?);
        }

        let mut parts = self.base.clone().into_parts();
        let existing_path = parts
            .path_and_query
            .as_ref()
            .map(|pq| pq.path())
            .unwrap_or("/");

        let (path_only, query) = match path.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (path, None),
        };

        let combined = if path_only.is_empty() {
            existing_path.to_string()
        } else if path_only.starts_with('/') {
            path_only.to_string()
        } else {
            format!("{}/{}", existing_path.trim_end_matches('/'), path_only)
        };

        let path_and_query = match query {
            Some(q) => format!("{combined}?{q}").parse()?,
            None => combined.parse()?,
        };

        parts.path_and_query = Some(path_and_query);
        Ok(Uri::from_parts(parts)?)
    }

    fn build_request(&self, request: DavRequest) -> Result<Request<Full<Bytes>>> {
        let uri = self.build_uri(&request.url)?;
        let method = Method::from_bytes(request.method.as_str().as_bytes())?;

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, self.auth_header.clone());
        add_accept_encoding(&mut headers);
        if let Some(depth) = request.depth {
            headers.insert("Depth", header::HeaderValue::from_static(depth.as_str()));
        }
        if let Some(etag) = &request.if_match {
            headers.insert(header::IF_MATCH, header::HeaderValue::from_str(etag)?);
        }

        let body = match request.body {
            Some(body) => {
                if let Some(content_type) = request.content_type {
                    headers.insert(
                        header::CONTENT_TYPE,
                        header::HeaderValue::from_static(content_type),
                    );
                }
                Bytes::from(body)
            }
            None => Bytes::new(),
        };

        let mut builder = Request::builder().method(method).uri(uri);
        for (k, v) in headers.iter() {
            builder = builder.header(k, v);
        }
        Ok(builder.body(Full::new(body))?)
    }
}

impl Transport for HyperTransport {
    async fn send(&self, request: DavRequest) -> Result<DavResponse> {
        let method = request.method;
        let depth = request.depth.map(|d| d.as_str());
        let req = self.build_request(request)?;
        let uri = req.uri().clone();

        let fut = self.client.request(req);
        let resp = match self.timeout {
            Some(limit) => timeout(limit, fut).await.map_err(|_| DavError::Timeout)??,
            None => fut.await?,
        };

        let encodings = detect_encodings(resp.headers());
        let (parts, body) = resp.into_parts();
        let body = decompress_body(body, &encodings).await?;

        tracing::debug!(
            method = method.as_str(),
            %uri,
            depth,
            status = parts.status.as_u16(),
            bytes = body.len(),
            "webdav request"
        );

        let mut headers = parts.headers;
        if !encodings.is_empty() {
            headers.remove(header::CONTENT_ENCODING);
            headers.remove(header::CONTENT_LENGTH);
        }

        Ok(DavResponse {
            status: parts.status,
            headers,
            body,
        })
    }
}
