//! Cross-origin response headers for the subscribe endpoint.
//!
//! Browsers enforce the policy: when `Access-Control-Allow-Origin` is absent
//! the calling page cannot read the response. Nothing is rejected server-side.

use axum::http::{header, HeaderMap, HeaderValue};

pub const ALLOW_METHODS: &str = "POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type";

/// Headers every `/subscribe` response carries, given the request's `Origin`.
///
/// `Access-Control-Allow-Origin` echoes `origin` only when it exactly matches
/// an allow-list entry.
pub fn origin_headers(origin: Option<&str>, allow_list: &[String]) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    if let Some(origin) = origin.filter(|o| is_allowed_origin(o, allow_list)) {
        if let Ok(value) = HeaderValue::from_str(origin) {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        }
    }

    headers
}

pub fn is_allowed_origin(origin: &str, allow_list: &[String]) -> bool {
    allow_list.iter().any(|allowed| allowed == origin)
}
