//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Holly API configuration file.

use super::EXIT_CONFIG;
use crate::config::load_config;
use crate::config::schema::DatabaseTarget;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// Unlike `serve`, a missing file is an error here.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as its last step
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Application: {}", config.application.name);
        println!("  Version: {}", config.application.version);
        println!("  Log Level: {}", config.application.effective_log_level());
        println!("  Listen Address: {}", config.server.bind_address());

        match config.database.target {
            DatabaseTarget::CosmosDB => {
                println!("  Database Target: CosmosDB");
                println!("  Cosmos DB Database: {}", config.cosmosdb.database_name);
                if config.cosmosdb.is_configured() {
                    println!("  Connection String: configured");
                } else {
                    println!("  Connection String: not set (storage will run degraded)");
                }
            }
            DatabaseTarget::Memory => {
                println!("  Database Target: in-memory (data is lost on exit)");
            }
        }

        if config.logging.local_enabled {
            println!(
                "  File Logging: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        }
        println!();
        Ok(0)
    }
}
