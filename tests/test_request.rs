use bastion::http::request::{HeaderName, Method, Request, RequestHeaders, Version};

fn request(version: Version, connection: Option<&str>) -> Request {
    let mut req = Request {
        version,
        ..Request::default()
    };
    if let Some(value) = connection {
        req.headers.retain("Connection", value);
    }
    req
}

#[test]
fn test_recognized_headers_are_retained_case_insensitively() {
    let mut headers = RequestHeaders::default();

    assert!(headers.retain("cookie", "auth_token=abc"));
    assert!(headers.retain("CONTENT-TYPE", "application/json"));
    assert!(headers.retain("Accept", "*/*"));
    assert!(!headers.retain("User-Agent", "test-client"));

    assert_eq!(headers.get(HeaderName::Cookie), Some("auth_token=abc"));
    assert_eq!(headers.get(HeaderName::ContentType), Some("application/json"));
    assert_eq!(headers.get(HeaderName::Accept), Some("*/*"));
    assert_eq!(headers.get(HeaderName::Connection), None);
}

#[test]
fn test_later_header_replaces_earlier() {
    let mut headers = RequestHeaders::default();
    headers.retain("Cookie", "a=1");
    headers.retain("Cookie", "b=2");

    assert_eq!(headers.get(HeaderName::Cookie), Some("b=2"));
}

#[test]
fn test_http11_keeps_alive_by_default() {
    assert!(request(Version::Http11, None).keep_alive());
    assert!(request(Version::Http11, Some("keep-alive")).keep_alive());
}

#[test]
fn test_http11_close_is_honoured() {
    assert!(!request(Version::Http11, Some("close")).keep_alive());
    assert!(!request(Version::Http11, Some("Close")).keep_alive());
}

#[test]
fn test_http10_always_closes() {
    assert!(!request(Version::Http10, None).keep_alive());
    assert!(!request(Version::Http10, Some("keep-alive")).keep_alive());
}

#[test]
fn test_method_tokens() {
    assert_eq!(Method::from_token("GET"), Method::GET);
    assert_eq!(Method::from_token("POST"), Method::POST);
    assert_eq!(Method::from_token("PATCH"), Method::Unknown);
    assert_eq!(Version::from_token("HTTP/0.9"), None);
}
