//! Lead capture service.
//!
//! A single `/subscribe` endpoint accepts an email address, validates and
//! normalizes it, and records it exactly once. Repeat submissions get the
//! original record back with its first-seen timestamp.
//!
//! - **config**: environment configuration (port, database, origin allow-list)
//! - **handlers**: `/subscribe` and health endpoints
//! - **libraries**: pure email and origin-policy checks
//! - **services**: lead stores and the get-or-create service

pub mod config;
pub mod error;
pub mod handlers;
pub mod libraries;
pub mod models;
pub mod services;
pub mod state;

use axum::{
    routing::{any, get},
    Router,
};
use std::sync::Arc;

use crate::config::Config;
use crate::services::{LeadStore, MemoryLeadStore, SqliteLeadStore, StoreError};

pub use crate::error::SubscribeError;
pub use crate::state::AppState;

/// Build the service router.
///
/// - `/subscribe`: every method, dispatched inside the handler
/// - `GET /health`, `GET /api/health`: liveness
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/health", get(handlers::health))
        .route("/subscribe", any(handlers::subscribe))
        .with_state(state)
}

/// Open the lead store the configuration asks for.
pub fn open_store(config: &Config) -> Result<Arc<dyn LeadStore>, StoreError> {
    if config.uses_memory_store() {
        tracing::warn!("Using in-memory lead store; leads will not survive a restart");
        return Ok(Arc::new(MemoryLeadStore::new()));
    }

    let path = config.database_file();
    tracing::info!("Opening lead database at {}", path.display());
    Ok(Arc::new(SqliteLeadStore::open(&path)?))
}
