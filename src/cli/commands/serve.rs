//! Serve command implementation
//!
//! Loads configuration, provisions storage once, then runs the HTTP server
//! until a shutdown signal arrives.

use super::{EXIT_CONFIG, EXIT_CONNECTION, EXIT_FATAL};
use crate::api::{self, AppState};
use crate::config::{load_config_or_default, ApiConfig};
use crate::core::DocumentStore;
use axum::Router;
use clap::Args;
use std::sync::Arc;
use tokio::sync::watch;

/// Arguments for the serve command
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Override `server.host`
    #[arg(long)]
    pub host: Option<String>,

    /// Override `server.port`
    #[arg(long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    /// Apply command-line overrides to a loaded configuration
    pub fn apply(&self, config: &mut ApiConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }

    /// Execute the serve command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let mut config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, config_path = %config_path, "Failed to load configuration");
                eprintln!("❌ Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG);
            }
        };
        self.apply(&mut config);

        if let Err(e) = config.validate() {
            eprintln!("❌ Invalid server options: {e}");
            return Ok(EXIT_CONFIG);
        }

        let mut store = match DocumentStore::connect(&config) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("❌ Failed to create storage client: {e}");
                return Ok(EXIT_CONNECTION);
            }
        };

        if let Err(e) = store.initialize_containers().await {
            eprintln!("❌ Failed to provision storage: {e}");
            return Ok(EXIT_CONNECTION);
        }

        tracing::info!(
            name = %config.application.name,
            version = %config.application.version,
            storage = %store.status(),
            "Starting HTTP server"
        );

        let state = AppState::new(Arc::new(store), config.application.clone());
        let app = api::app(state, Router::new());

        match api::serve(&config.server, app, shutdown).await {
            Ok(()) => Ok(0),
            Err(e) => {
                tracing::error!(error = %e, "Server terminated with an error");
                eprintln!("❌ {e}");
                Ok(EXIT_FATAL)
            }
        }
    }
}
