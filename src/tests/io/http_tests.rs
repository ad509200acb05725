//! Tests for the HTTP(S) provider.

use std::collections::HashMap;
use std::io::Read;

use reqwest::StatusCode;
use reqwest::header::USER_AGENT;

use crate::tests::support::TestServer;
use crate::{HttpConfig, HttpInput, InputProvider, ReaderError, SourceKind, reader};

#[test]
fn request_carries_every_header() {
    let input = HttpInput::new("https://example.com/live.ts")
        .with_headers([("X-Session", "abc"), ("Authorization", "Bearer t")]);
    let client = input.client().unwrap();
    let request = input.request(&client).unwrap();

    assert_eq!(request.method(), reqwest::Method::GET);
    assert_eq!(request.url().as_str(), "https://example.com/live.ts");
    assert_eq!(request.headers()["x-session"], "abc");
    assert_eq!(request.headers()["authorization"], "Bearer t");
}

#[test]
fn later_header_values_replace_earlier_ones() {
    let input = HttpInput::new("http://example.com/")
        .with_headers([("X-A", "1")])
        .with_headers([("X-A", "2")]);
    assert_eq!(input.headers().get("X-A").unwrap(), "2");
}

#[test]
fn open_streams_body_and_sends_headers() {
    let server = TestServer::respond("200 OK", b"\x47\x00\x00\x10payload");
    let mut headers = HashMap::new();
    headers.insert("X-Custom".to_string(), "yes".to_string());
    headers.insert("Accept".to_string(), "video/mp2t".to_string());

    let mut stream = reader(Some(server.url.as_str()), &headers).unwrap();
    assert_eq!(stream.kind(), SourceKind::Http);
    let mut body = Vec::new();
    stream.read_to_end(&mut body).unwrap();
    assert_eq!(body, b"\x47\x00\x00\x10payload");

    let request = server.request();
    assert!(request.starts_with("get /stream.ts http/1.1"), "{request}");
    assert!(request.contains("x-custom: yes"), "{request}");
    assert!(request.contains("accept: video/mp2t"), "{request}");
}

#[test]
fn default_user_agent_is_sent() {
    let server = TestServer::respond("200 OK", b"");
    let input = HttpInput::new(server.url.clone());
    let mut stream = input.open().unwrap();
    let mut body = Vec::new();
    stream.read_to_end(&mut body).unwrap();

    let expected = format!("user-agent: new-reader/{}", env!("CARGO_PKG_VERSION"));
    assert!(server.request().contains(&expected));
}

#[test]
fn caller_user_agent_replaces_default() {
    let server = TestServer::respond("200 OK", b"ok");
    let input = HttpInput::new(server.url.clone())
        .with_headers([(USER_AGENT.as_str(), "probe/2.0")])
        .with_config(HttpConfig {
            user_agent: "configured/1.0".into(),
            timeout_secs: Some(5),
        });
    input.open().unwrap();

    let request = server.request();
    assert!(request.contains("user-agent: probe/2.0"), "{request}");
    assert!(!request.contains("configured/1.0"), "{request}");
}

#[test]
fn error_status_fails_open() {
    let server = TestServer::respond("404 Not Found", b"missing");
    let err = HttpInput::new(server.url.clone()).open().unwrap_err();
    match err {
        ReaderError::Http(e) => assert_eq!(e.status(), Some(StatusCode::NOT_FOUND)),
        other => panic!("expected http error, got {other:?}"),
    }
}

#[test]
fn unparsable_url_surfaces_client_error() {
    let err = HttpInput::new("httpish").open().unwrap_err();
    assert!(matches!(err, ReaderError::Http(_)), "{err:?}");
}
