use bytes::Bytes;
use http_body_util::Full;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::TokioExecutor;

/// Hyper client used by [`crate::webdav::HyperTransport`].
pub type HyperClient = Client<hyper_rustls::HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Build a pooled Hyper client speaking HTTP/1.1 and HTTP/2 over rustls.
///
/// Native roots are preferred; the bundled WebPKI store is used when the
/// platform store cannot be loaded. Plain `http://` is accepted so the client
/// can talk to local test servers.
pub fn build_hyper_client() -> HyperClient {
    let https_builder = HttpsConnectorBuilder::new()
        .with_native_roots()
        .unwrap_or_else(|err| {
            tracing::debug!(%err, "native roots unavailable, falling back to webpki roots");
            HttpsConnectorBuilder::new().with_webpki_roots()
        });

    let https = https_builder
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .build();

    Client::builder(TokioExecutor::new())
        .pool_max_idle_per_host(8)
        .build::<_, Full<Bytes>>(https)
}
