use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use fast_dav_sync::{DavError, DavRequest, Depth, HyperTransport, Transport};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport(server: &MockServer) -> HyperTransport {
    HyperTransport::new(&format!("{}/dav/", server.uri()), "me@example.com", "secret")
        .expect("valid base url")
}

#[tokio::test]
async fn sends_basic_auth_depth_and_content_type() {
    let server = MockServer::start().await;
    let expected_auth = format!("Basic {}", B64.encode("me@example.com:secret"));

    Mock::given(method("PROPFIND"))
        .and(path("/dav/cal/"))
        .and(header("authorization", expected_auth.as_str()))
        .and(header("depth", "1"))
        .and(header("content-type", "application/xml; charset=utf-8"))
        .respond_with(ResponseTemplate::new(207).set_body_string("<d:multistatus xmlns:d=\"DAV:\"/>"))
        .expect(1)
        .mount(&server)
        .await;

    let resp = transport(&server)
        .send(DavRequest::propfind("cal/", Depth::One, "<d:propfind/>"))
        .await
        .expect("response");

    assert_eq!(resp.status.as_u16(), 207);
    assert!(resp.ok());
    assert!(resp.text().contains("multistatus"));
}

#[tokio::test]
async fn bodiless_requests_carry_no_depth_or_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/dav/cal/a.ics"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let resp = transport(&server)
        .send(DavRequest::delete("/dav/cal/a.ics"))
        .await
        .expect("response");
    assert_eq!(resp.status.as_u16(), 204);

    let received = server.received_requests().await.expect("recording enabled");
    assert_eq!(received.len(), 1);
    assert!(!received[0].headers.contains_key("depth"));
    assert!(!received[0].headers.contains_key("content-type"));
    assert!(received[0].headers.contains_key("accept-encoding"));
}

#[tokio::test]
async fn non_success_status_is_returned_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let resp = transport(&server)
        .send(DavRequest::put_calendar("cal/x.ics", "BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n"))
        .await
        .expect("a response, even a failing one");
    assert_eq!(resp.status.as_u16(), 500);
    assert!(!resp.ok());
    assert_eq!(resp.text(), "boom");
}

#[tokio::test]
async fn etag_header_is_exposed_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(201).insert_header("etag", "\"v1\""))
        .mount(&server)
        .await;

    let resp = transport(&server)
        .send(DavRequest::put_calendar("cal/x.ics", "x"))
        .await
        .expect("response");
    assert_eq!(resp.etag().as_deref(), Some("\"v1\""));
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("PROPFIND"))
        .respond_with(ResponseTemplate::new(207).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let err = transport(&server)
        .with_timeout(Some(Duration::from_millis(50)))
        .send(DavRequest::propfind("cal/", Depth::Zero, "<d:propfind/>"))
        .await
        .expect_err("times out");
    assert!(matches!(err, DavError::Timeout));
}
