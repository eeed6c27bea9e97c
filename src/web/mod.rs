//! HTTP API for address detection and reputation scoring.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod server;

use std::sync::Arc;

use crate::analysis::ReputationService;
use crate::config::Config;

/// Shared application state for all API handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ReputationService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(service: Arc<ReputationService>, config: Arc<Config>) -> Self {
        Self { service, config }
    }
}
