use fast_dav_sync::common::compression::{ContentEncoding, add_accept_encoding, detect_encodings};
use hyper::{HeaderMap, header};

#[test]
fn content_encoding_tokens() {
    assert_eq!(ContentEncoding::Identity.as_str(), "identity");
    assert_eq!(ContentEncoding::Br.as_str(), "br");
    assert_eq!(ContentEncoding::Gzip.as_str(), "gzip");
    assert_eq!(ContentEncoding::Zstd.as_str(), "zstd");
}

#[test]
fn no_header_means_identity() {
    assert!(detect_encodings(&HeaderMap::new()).is_empty());
}

#[test]
fn detects_single_and_aliased_encodings() {
    for (raw, expected) in [
        ("gzip", ContentEncoding::Gzip),
        ("x-gzip", ContentEncoding::Gzip),
        ("br", ContentEncoding::Br),
        ("zstd", ContentEncoding::Zstd),
        ("zst", ContentEncoding::Zstd),
        ("GZIP", ContentEncoding::Gzip),
    ] {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_ENCODING, raw.parse().unwrap());
        assert_eq!(detect_encodings(&headers), vec![expected], "{raw}");
    }
}

#[test]
fn detects_encoding_chain_in_order() {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_ENCODING, "gzip, br".parse().unwrap());
    assert_eq!(
        detect_encodings(&headers),
        vec![ContentEncoding::Gzip, ContentEncoding::Br]
    );
}

#[test]
fn unknown_encodings_are_dropped() {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_ENCODING, "compress, identity".parse().unwrap());
    assert!(detect_encodings(&headers).is_empty());
}

#[test]
fn accept_encoding_is_added_once() {
    let mut headers = HeaderMap::new();
    add_accept_encoding(&mut headers);
    assert_eq!(
        headers.get(header::ACCEPT_ENCODING).unwrap(),
        "br, zstd, gzip"
    );

    let mut custom = HeaderMap::new();
    custom.insert(header::ACCEPT_ENCODING, "gzip".parse().unwrap());
    add_accept_encoding(&mut custom);
    assert_eq!(custom.get(header::ACCEPT_ENCODING).unwrap(), "gzip");
}
