use std::sync::Arc;

use crate::config::Config;
use crate::services::{LeadService, LeadStore};

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub leads: LeadService,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn LeadStore>) -> Self {
        Self {
            config: Arc::new(config),
            leads: LeadService::new(store),
        }
    }
}
