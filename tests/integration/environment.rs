//! Environment synthesis: URI components, defaults precedence, query normalization.

use crate::helpers::*;
use bytes::Bytes;
use server_request::{Environment, ServerRequestFactory, SimulatedServerRequestFactory};

/// Test HTTPS URI with explicit port and query
#[test]
fn test_https_uri_with_port() {
    let req = convert(get("https://example.com:8443/path?x=1&y=2"));

    assert_server_str(&req, "SERVER_NAME", "example.com");
    assert_server_str(&req, "HTTPS", "on");
    assert_server_int(&req, "SERVER_PORT", 8443);
    assert_server_str(&req, "HTTP_HOST", "example.com:8443");
    assert_server_str(&req, "REQUEST_URI", "/path?x=1&y=2");
    assert_server_str(&req, "QUERY_STRING", "x=1&y=2");
}

/// Test HTTPS URI without port falls back to 443
#[test]
fn test_https_default_port() {
    let req = convert(get("https://secure.test/"));

    assert_server_int(&req, "SERVER_PORT", 443);
    assert_server_str(&req, "HTTP_HOST", "secure.test");
    assert_server_str(&req, "REQUEST_URI", "/");
}

/// Test plain HTTP URI
#[test]
fn test_http_uri() {
    let req = convert(get("http://plain.test:8080/a"));

    assert_server_int(&req, "SERVER_PORT", 8080);
    assert_server_str(&req, "HTTP_HOST", "plain.test:8080");
    assert_server_absent(&req, &["HTTPS"]);
}

/// Test baseline keys are always present
#[test]
fn test_baseline_present() {
    let req = convert(get("/"));

    for key in [
        "SERVER_NAME",
        "SERVER_PORT",
        "HTTP_HOST",
        "HTTP_USER_AGENT",
        "HTTP_ACCEPT",
        "HTTP_ACCEPT_LANGUAGE",
        "HTTP_ACCEPT_CHARSET",
        "REMOTE_ADDR",
        "SCRIPT_NAME",
        "SCRIPT_FILENAME",
        "SERVER_PROTOCOL",
        "REQUEST_TIME",
        "PATH_INFO",
        "REQUEST_METHOD",
        "REQUEST_URI",
        "QUERY_STRING",
    ] {
        assert!(req.server_param(key).is_some(), "missing {}", key);
    }

    assert_server_str(&req, "REMOTE_ADDR", "127.0.0.1");
    assert_server_str(&req, "SERVER_PROTOCOL", "HTTP/1.1");
    assert_server_str(&req, "SCRIPT_NAME", "");
}

/// Test no auth keys without Authorization header
#[test]
fn test_no_auth_keys_without_header() {
    let req = convert(request("POST", "https://example.com/", &[], "x"));

    assert_server_absent(
        &req,
        &["PHP_AUTH_USER", "PHP_AUTH_PW", "AUTH_TYPE", "HTTP_AUTHORIZATION"],
    );
}

/// Test caller defaults override the baseline but not URI data
#[test]
fn test_defaults_precedence() {
    let defaults: Environment = [
        ("SERVER_NAME", "defaults.test"),
        ("REMOTE_ADDR", "192.0.2.10"),
        ("PATH_INFO", "/ignored"),
        ("DOCUMENT_ROOT", "/srv/www"),
    ]
    .into_iter()
    .collect();
    let factory = SimulatedServerRequestFactory::with_defaults(defaults);

    let req = factory.convert(get("/relative")).unwrap();
    assert_server_str(&req, "SERVER_NAME", "defaults.test");
    assert_server_str(&req, "REMOTE_ADDR", "192.0.2.10");
    assert_server_str(&req, "PATH_INFO", "");
    assert_server_str(&req, "DOCUMENT_ROOT", "/srv/www");

    let req = factory.convert(get("http://uri.test/")).unwrap();
    assert_server_str(&req, "SERVER_NAME", "uri.test");
}

/// Test method is upper-cased
#[test]
fn test_method_upper_cased() {
    let req = convert(request("patch", "/", &[], Bytes::new()));
    assert_server_str(&req, "REQUEST_METHOD", "PATCH");
    assert_server_absent(&req, &["CONTENT_TYPE"]);
}

/// Test POST/PUT/DELETE default content type
#[test]
fn test_content_type_default() {
    for method in ["POST", "PUT", "DELETE"] {
        let req = convert(request(method, "/", &[], Bytes::new()));
        assert_server_str(&req, "CONTENT_TYPE", "application/x-www-form-urlencoded");
    }
}

/// Test query with entities and percent-encoding is normalized
#[test]
fn test_query_round_trip() {
    let req = convert(get("/list?name=J%C3%B6rg&amp;sort=desc&empty&sp=a%20b"));

    assert_server_str(&req, "QUERY_STRING", "name=J%C3%B6rg&sort=desc&empty=&sp=a+b");
    assert_server_str(
        &req,
        "REQUEST_URI",
        "/list?name=J%C3%B6rg&sort=desc&empty=&sp=a+b",
    );

    // Query params come from the raw query string
    assert_eq!(req.query_param("name"), Some("Jörg"));
    assert_eq!(req.query_param("sp"), Some("a b"));
}

/// Test named HTML entities in the query decode before normalization
#[test]
fn test_query_named_entities() {
    let req = convert(get("/s?q=caf&eacute;&copy=1"));

    assert_server_str(&req, "QUERY_STRING", "q=caf%C3%A9&copy=1");
    assert_server_str(&req, "REQUEST_URI", "/s?q=caf%C3%A9&copy=1");
}

/// Test conversion is idempotent apart from REQUEST_TIME
#[test]
fn test_idempotent() {
    let factory = SimulatedServerRequestFactory::with_defaults(
        [("SERVER_ADMIN", "ops@example.com")].into_iter().collect(),
    );
    let first = factory
        .convert_to_server_request(get("https://example.com/a?b=c").into())
        .unwrap();
    let second = factory
        .convert_to_server_request(get("https://example.com/a?b=c").into())
        .unwrap();

    assert_eq!(
        without_request_time(first.environment()),
        without_request_time(second.environment())
    );
}

/// Test environment key order follows the baseline
#[test]
fn test_environment_order() {
    let req = convert(get("/"));
    let keys: Vec<&str> = req.environment().keys().collect();

    assert_eq!(keys.first(), Some(&"SERVER_NAME"));
    assert_eq!(&keys[keys.len() - 2..], ["REQUEST_URI", "QUERY_STRING"]);
}
