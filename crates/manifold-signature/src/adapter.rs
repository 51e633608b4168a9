//! Glue between [`http`] request types and the [`Verifier`].
//!
//! Servers built on `hyper`, `axum` or anything else that exposes
//! [`http::request::Parts`] can verify a buffered request with
//! [`verify_request`] and reject it with [`unauthorized_response`]. The
//! response is deliberately generic; it never carries the reason for the
//! rejection.

use std::collections::BTreeMap;

use http::header::CONTENT_TYPE;
use http::{HeaderValue, Response, StatusCode};

use crate::verifier::Verifier;

/// Verify a buffered request against `verifier`.
///
/// The path and raw query come from the request URI. Query values are kept
/// percent-encoded, exactly as they were signed.
#[must_use]
pub fn verify_request(verifier: &Verifier, parts: &http::request::Parts, body: &[u8]) -> bool {
    let query = parts.uri.query().and_then(parse_query);
    verifier.verify(
        parts.method.as_str(),
        parts.uri.path(),
        query.as_ref(),
        &parts.headers,
        Some(body),
    )
}

/// Split a raw query string into its parameters without decoding them.
///
/// Each pair is split on its first `=`; a pair without one maps to an empty
/// value. A repeated key keeps its last value. Returns `None` for an empty
/// query string.
///
/// # Examples
///
/// ```
/// use manifold_signature::adapter::parse_query;
///
/// let query = parse_query("b=x%20y&a=1").unwrap();
/// assert_eq!(query["a"], "1");
/// assert_eq!(query["b"], "x%20y");
/// assert!(parse_query("").is_none());
/// ```
#[must_use]
pub fn parse_query(raw: &str) -> Option<BTreeMap<String, String>> {
    if raw.is_empty() {
        return None;
    }

    Some(
        raw.split('&')
            .filter(|s| !s.is_empty())
            .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect(),
    )
}

/// The response to send when a request fails verification.
///
/// Always `401 Unauthorized` with the body `{"message":"Bad signature"}`.
#[must_use]
pub fn unauthorized_response() -> Response<String> {
    let body = serde_json::json!({ "message": "Bad signature" }).to_string();
    let mut response = Response::new(body);
    *response.status_mut() = StatusCode::UNAUTHORIZED;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
