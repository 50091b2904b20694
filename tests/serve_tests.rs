#![allow(clippy::unwrap_used, clippy::expect_used)]

use http::{header, Method, StatusCode};
use serde_json::Value;
use swaggerize::{describe, Generator, PathItemInfo, Reflect};

#[derive(Reflect)]
pub struct Status {
    pub healthy: bool,
}

fn registered() -> Generator {
    let generator = Generator::new();
    generator
        .set_path_item(
            &PathItemInfo::new("/status", Method::GET),
            None,
            None,
            Some(&describe::<Status>()),
        )
        .unwrap();
    generator
}

#[test]
fn test_response_carries_document() {
    let generator = registered();
    let response = generator.http_response("localhost:8080");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(
        response.headers()[header::CONTENT_LENGTH],
        response.body().len().to_string().as_str()
    );
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());

    let doc: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(doc["host"], "localhost:8080");
    assert!(doc["definitions"]["Status"].is_object());
}

#[test]
fn test_cors_headers() {
    let mut generator = registered();
    generator.enable_cors(true, ["X-Request-Id"]);
    let response = generator.http_response("localhost");

    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_METHODS],
        "GET, POST, DELETE, PUT, PATCH, OPTIONS"
    );
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
        "Content-Type, api_key, Authorization, X-Request-Id"
    );
}

#[test]
fn test_configured_host_wins_over_request() {
    let mut generator = registered();
    generator.set_host("docs.example.com");
    let response = generator.http_response("internal:9000");
    let doc: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(doc["host"], "docs.example.com");
}
