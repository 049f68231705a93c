mod subscribe;

use axum::{response::IntoResponse, Json};

pub use subscribe::subscribe;

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "lead-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
