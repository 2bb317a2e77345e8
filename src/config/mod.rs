//! Configuration management for the Holly API.
//!
//! TOML-based configuration with environment variable substitution
//! (`${VAR_NAME}`, `${VAR_NAME:-default}`), `HOLLY_*` overrides, defaults for every setting, and
//! per-section validation.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use holly_api::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("holly.toml")?;
//!
//! println!("Listening on {}", config.server.bind_address());
//! println!("Cosmos DB: {}", config.cosmosdb.database_name);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Service name, version, debug flag, log level
//! - [`ServerConfig`] - HTTP bind address
//! - [`DatabaseConfig`] - Storage backend selection
//! - [`CosmosDbConfig`] - Cosmos DB connection string and database name
//! - [`LoggingConfig`] - Rolling file logs
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! name = "Holly and Morty API"
//! log_level = "info"
//!
//! [server]
//! host = "0.0.0.0"
//! port = 8000
//!
//! [database]
//! target = "cosmosdb"
//!
//! [cosmosdb]
//! connection_string = "${HOLLY_COSMOS_CONNECTION_STRING}"
//! database_name = "holly"
//! ```
//!
//! When `connection_string` is absent, or its placeholder variable is unset,
//! the service still starts; writes are skipped and `/health` reports
//! degraded storage.

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default};
pub use schema::{
    ApiConfig, ApplicationConfig, CosmosDbConfig, DatabaseConfig, DatabaseTarget, LoggingConfig,
    ServerConfig,
};
pub use secret::{secret_string, SecretString};
