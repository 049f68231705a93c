use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::libraries::EmailValidationError;
use crate::services::StoreError;

/// Failures of a `/subscribe` request.
///
/// Bodies are short JSON strings. Store and internal failures are logged here
/// and rendered as a generic message so driver details never reach the caller.
#[derive(Debug, thiserror::Error)]
pub enum SubscribeError {
    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("malformed body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    /// Body over the size limit or cut off mid-stream
    #[error("unreadable body: {0}")]
    UnreadableBody(#[from] BytesRejection),

    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailValidationError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl SubscribeError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::MalformedBody(_) | Self::UnreadableBody(_) | Self::InvalidEmail(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Store(_) | Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Caller-facing message
    pub fn message(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed => "Method not allowed",
            Self::MalformedBody(_) | Self::UnreadableBody(_) => "Invalid JSON",
            Self::InvalidEmail(_) => "Invalid email address",
            Self::Store(_) | Self::Unexpected(_) => "Server error",
        }
    }
}

impl IntoResponse for SubscribeError {
    fn into_response(self) -> Response {
        match &self {
            Self::Store(err) => tracing::error!(error = %err, "lead store failure"),
            Self::Unexpected(err) => tracing::error!(error = %err, "unexpected subscribe failure"),
            Self::MalformedBody(err) => tracing::debug!(error = %err, "rejected malformed body"),
            Self::UnreadableBody(err) => tracing::debug!(error = %err, "rejected unreadable body"),
            Self::InvalidEmail(err) => tracing::debug!(error = %err, "rejected email"),
            Self::MethodNotAllowed => {}
        }

        (self.status(), Json(self.message())).into_response()
    }
}
