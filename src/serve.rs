//! HTTP exposure of the generated document.
//!
//! No server loop lives here: [`Generator::http_response`] builds an `http::Response` that any
//! server can write out.

use crate::generator::Generator;
use http::{header, HeaderValue, Response, StatusCode};
use tracing::error;

const CORS_ALLOW_METHODS: &str = "GET, POST, DELETE, PUT, PATCH, OPTIONS";

impl Generator {
    /// Response serving the document as `application/json`.
    ///
    /// The configured host takes precedence over `request_host`. When CORS is enabled the
    /// response allows any origin. A failure to produce the document yields a `500` response
    /// carrying the error text.
    pub fn http_response(&self, request_host: &str) -> Response<Vec<u8>> {
        let host = if self.host().is_empty() {
            request_host
        } else {
            self.host()
        };

        let (status, body) = match self
            .document_for_host(host)
            .and_then(|doc| self.encode(&doc))
        {
            Ok(bytes) => (StatusCode::OK, bytes),
            Err(err) => {
                error!(error = %err, "failed to generate swagger document");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string().into_bytes())
            }
        };

        let content_length = body.len();
        let mut response = Response::new(body);
        *response.status_mut() = status;

        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(content_length));

        if let Some(allow_headers) = self.cors() {
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            );
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(CORS_ALLOW_METHODS),
            );
            match HeaderValue::from_str(&allow_headers.join(", ")) {
                Ok(value) => {
                    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, value);
                }
                Err(err) => error!(error = %err, "invalid CORS allow-headers value"),
            }
        }

        response
    }
}
