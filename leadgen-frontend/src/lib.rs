pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

use crate::config::AuthSettings;
use services::registry::ClientRegistry;
use std::sync::Arc;

/// Shared application state: the per-browser client instances and the
/// switches that shape the views.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ClientRegistry>,
    pub auth: AuthSettings,
}

impl AppState {
    pub fn new(registry: Arc<ClientRegistry>, auth: AuthSettings) -> Self {
        Self { registry, auth }
    }
}
