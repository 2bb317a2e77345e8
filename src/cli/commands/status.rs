//! Status command implementation
//!
//! Connects to the configured storage, provisions the containers, and prints
//! one line per container.

use super::{EXIT_CONFIG, EXIT_CONNECTION};
use crate::config::load_config_or_default;
use crate::core::{DocumentStore, StoreStatus};
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug, Clone)]
pub struct StatusArgs {}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking storage status");

        println!("📊 Storage Status");
        println!();

        let config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let mut store = match DocumentStore::connect(&config) {
            Ok(s) => s,
            Err(e) => {
                println!("❌ Failed to create storage client");
                println!("   Error: {e}");
                return Ok(EXIT_CONNECTION);
            }
        };

        if let Err(e) = store.initialize_containers().await {
            println!("❌ Failed to provision containers");
            println!("   Error: {e}");
            return Ok(EXIT_CONNECTION);
        }

        match (store.backend_kind(), store.database_name()) {
            (Some(kind), Some(database)) => {
                println!("Backend: {kind}");
                println!("Database: {database}");
            }
            _ => println!("Backend: none (connection string not configured)"),
        }
        println!();

        println!("{:<16} {:<20} {:<10}", "Container", "Partition Key", "Status");
        println!("{}", "-".repeat(48));
        for container in store.registry().containers() {
            let status = if store.container(container.name).is_some() {
                "✅ Ready"
            } else {
                "⏸️  Skipped"
            };
            println!(
                "{:<16} {:<20} {:<10}",
                container.name.as_str(),
                container.partition_key_path,
                status
            );
        }
        println!();

        match store.status() {
            StoreStatus::Ready => println!("✅ Storage is ready"),
            StoreStatus::Degraded => {
                println!("⚠️  Storage is degraded: documents will not be persisted")
            }
        }

        Ok(0)
    }
}
