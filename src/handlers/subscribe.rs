use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::debug;

use crate::{
    error::SubscribeError,
    libraries::{origin_headers, parse_email_field},
    models::{Lead, SubscribeRequest},
    state::AppState,
};

/// Lead capture endpoint, mounted for every method on `/subscribe`.
///
/// - `OPTIONS`: CORS preflight, 204 with no body. Never touches the store.
/// - `POST`: validate and normalize `email`, then return the existing lead
///   (200) or record a new one (201).
/// - anything else: 405.
///
/// Every response carries the origin policy headers, including the ones for
/// bodies that could not be read. Only `POST` looks at the body.
pub async fn subscribe(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let origin = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok());
    let cors = origin_headers(origin, &state.config.allowed_origins);

    let mut response = match method {
        Method::OPTIONS => StatusCode::NO_CONTENT.into_response(),
        Method::POST => match capture(&state, body).await {
            Ok((lead, true)) => (StatusCode::CREATED, Json(lead)).into_response(),
            Ok((lead, false)) => (StatusCode::OK, Json(lead)).into_response(),
            Err(e) => e.into_response(),
        },
        other => {
            debug!("Rejecting {} on /subscribe", other);
            SubscribeError::MethodNotAllowed.into_response()
        }
    };

    response.headers_mut().extend(cors);
    response
}

async fn capture(
    state: &AppState,
    body: Result<Bytes, BytesRejection>,
) -> Result<(Lead, bool), SubscribeError> {
    let value: Value = serde_json::from_slice(&body?)?;
    let request = SubscribeRequest::from_value(value);
    let email = parse_email_field(request.email.as_ref())?;

    debug!("Capturing lead for {}", email);
    state.leads.capture(email).await
}
