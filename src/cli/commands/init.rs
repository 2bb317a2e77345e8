//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::{EXIT_CONFIG, EXIT_FATAL};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "holly.toml")]
    pub output: String,

    /// Include comments explaining each setting
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Holly API configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Put your Cosmos DB connection string in .env:");
                println!("     HOLLY_COSMOS_CONNECTION_STRING=\"AccountEndpoint=...;AccountKey=...;\"");
                println!("  3. Validate configuration: holly-api validate-config");
                println!("  4. Check storage: holly-api status");
                println!("  5. Start the server: holly-api serve");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Holly API Configuration File

[application]
name = "Holly and Morty API"
log_level = "info"
debug = false

[server]
host = "0.0.0.0"
port = 8000

[database]
target = "cosmosdb"  # cosmosdb | memory

[cosmosdb]
# Set HOLLY_COSMOS_CONNECTION_STRING in the environment or uncomment:
# connection_string = "${HOLLY_COSMOS_CONNECTION_STRING}"
database_name = "holly"

[logging]
local_enabled = false
local_path = "/var/log/holly"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Holly API Configuration File
#
# Every setting has a default; delete anything you do not need to change.
# Values may reference environment variables with ${VAR_NAME} or
# ${VAR_NAME:-default}, and any setting can be overridden with
# HOLLY_<SECTION>_<KEY>, for example HOLLY_SERVER_PORT=9000.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Title shown in the API reference at /docs
name = "Holly and Morty API"

# Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
log_level = "info"

# Debug mode lowers the default log level to debug
debug = false

# ============================================================================
# HTTP Server
# ============================================================================
[server]
host = "0.0.0.0"
port = 8000

# ============================================================================
# Storage
# ============================================================================
[database]
# cosmosdb: Azure Cosmos DB (requires a connection string, see below)
# memory:   in-process store for local development; data is lost on exit
target = "cosmosdb"

[cosmosdb]
# Connection string from the Azure portal (Keys blade).
# Without it the server still starts: writes are skipped, reads return
# nothing, and /health reports "storage": "degraded".
# connection_string = "${HOLLY_COSMOS_CONNECTION_STRING}"

# Database to create and use; containers conversations, profiles and
# insights are created inside it on startup
database_name = "holly"

# ============================================================================
# Logging
# ============================================================================
[logging]
# Also write JSON logs to rolling files
local_enabled = false
local_path = "/var/log/holly"

# daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}
