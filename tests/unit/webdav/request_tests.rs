use bytes::Bytes;
use fast_dav_sync::webdav::xml::{
    build_calendar_list_propfind_body, build_ctag_propfind_body, build_etag_propfind_body,
};
use fast_dav_sync::webdav::{
    DavMethod, DavRequest, DavResponse, Depth, HyperTransport, ICS_CONTENT_TYPE, XML_CONTENT_TYPE,
    escape_xml,
};
use hyper::{StatusCode, header};

#[test]
fn propfind_carries_xml_body_and_depth() {
    let req = DavRequest::propfind("https://dav.example.com/cal/", Depth::Zero, "<x/>");
    assert_eq!(req.method, DavMethod::Propfind);
    assert_eq!(req.depth, Some(Depth::Zero));
    assert_eq!(req.content_type, Some(XML_CONTENT_TYPE));
    assert_eq!(req.body.as_deref(), Some("<x/>"));
    assert_eq!(req.if_match, None);
}

#[test]
fn put_and_delete_have_no_depth() {
    let put = DavRequest::put_calendar("/cal/a.ics", "BEGIN:VCALENDAR");
    assert_eq!(put.method.as_str(), "PUT");
    assert_eq!(put.content_type, Some(ICS_CONTENT_TYPE));
    assert_eq!(put.depth, None);

    let delete = DavRequest::delete("/cal/a.ics").if_match("\"e1\"");
    assert_eq!(delete.method.as_str(), "DELETE");
    assert_eq!(delete.body, None);
    assert_eq!(delete.content_type, None);
    assert_eq!(delete.if_match.as_deref(), Some("\"e1\""));
}

#[test]
fn depth_and_method_tokens() {
    assert_eq!(Depth::Zero.as_str(), "0");
    assert_eq!(Depth::One.as_str(), "1");
    assert_eq!(DavMethod::Report.as_str(), "REPORT");
    assert_eq!(DavMethod::Propfind.as_str(), "PROPFIND");
}

#[test]
fn response_helpers() {
    let mut resp = DavResponse::new(StatusCode::MULTI_STATUS, Bytes::from_static(b"<ok/>"));
    assert!(resp.ok());
    assert_eq!(resp.text(), "<ok/>");
    assert_eq!(resp.etag(), None);

    resp.headers
        .insert(header::ETAG, header::HeaderValue::from_static("\"v2\""));
    assert_eq!(resp.etag().as_deref(), Some("\"v2\""));

    assert!(!DavResponse::new(StatusCode::NOT_FOUND, "").ok());
}

#[test]
fn build_uri_resolves_against_base() {
    let transport =
        HyperTransport::new("https://dav.example.com/dav/calendars/user/me/", "me", "secret")
            .expect("transport builds");

    assert_eq!(
        transport.build_uri("Default/").expect("uri").to_string(),
        "https://dav.example.com/dav/calendars/user/me/Default/"
    );
    assert_eq!(
        transport.build_uri("/other/path").expect("uri").to_string(),
        "https://dav.example.com/other/path"
    );
    assert_eq!(
        transport.build_uri("").expect("uri").to_string(),
        "https://dav.example.com/dav/calendars/user/me/"
    );
    assert_eq!(
        transport
            .build_uri("https://elsewhere.example.org/x.ics")
            .expect("uri")
            .to_string(),
        "https://elsewhere.example.org/x.ics"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    assert!(HyperTransport::new("not a url", "me", "secret").is_err());
}

#[test]
fn propfind_bodies_request_the_needed_properties() {
    let ctag = build_ctag_propfind_body();
    assert!(ctag.contains("<D:displayname/>"));
    assert!(ctag.contains("<CS:getctag/>"));
    assert!(ctag.contains("http://calendarserver.org/ns/"));

    let etag = build_etag_propfind_body();
    assert!(etag.contains("<D:getetag/>"));
    assert!(etag.contains("<D:getlastmodified/>"));

    let list = build_calendar_list_propfind_body();
    for prop in [
        "<D:displayname/>",
        "<D:resourcetype/>",
        "<C:calendar-description/>",
        "<CS:getctag/>",
    ] {
        assert!(list.contains(prop), "missing {prop}");
    }
}

#[test]
fn escape_xml_covers_markup_characters() {
    assert_eq!(escape_xml("a&b<c>\"d'"), "a&amp;b&lt;c&gt;&quot;d&apos;");
    assert_eq!(escape_xml("plain"), "plain");
}
