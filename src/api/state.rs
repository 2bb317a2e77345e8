//! Shared handler state

use crate::config::ApplicationConfig;
use crate::core::DocumentStore;
use std::sync::Arc;

/// State handed to every route, including externally mounted routers
#[derive(Clone)]
pub struct AppState {
    /// Provisioned document store
    pub store: Arc<DocumentStore>,

    /// Service name, version and debug flag
    pub application: Arc<ApplicationConfig>,
}

impl AppState {
    /// Bundle a store and application settings
    pub fn new(store: Arc<DocumentStore>, application: ApplicationConfig) -> Self {
        Self {
            store,
            application: Arc::new(application),
        }
    }
}
