//! Configuration schema types
//!
//! This module defines the configuration structure for the Holly API. Every
//! section has defaults, so an empty file (or no file at all) is a valid
//! configuration that starts the service in degraded storage mode.

use crate::adapters::cosmosdb::ConnectionString;
use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseTarget {
    /// Azure Cosmos DB
    #[default]
    CosmosDB,
    /// In-process store for development and tests
    Memory,
}

/// Main Holly API configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// HTTP listener
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend selection
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Azure Cosmos DB configuration
    #[serde(default)]
    pub cosmosdb: CosmosDbConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ApiConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.server.validate()?;

        // The Cosmos section is validated even for the memory target so a
        // broken connection string is caught before switching targets
        self.cosmosdb.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Service title shown in the API reference
    #[serde(default = "default_name")]
    pub name: String,

    /// Service version
    #[serde(default = "default_version")]
    pub version: String,

    /// Debug mode; lowers the default log level to debug
    #[serde(default)]
    pub debug: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }

        if self.name.trim().is_empty() {
            return Err("application.name cannot be empty".to_string());
        }

        Ok(())
    }

    /// Log level to use when none is given on the command line
    pub fn effective_log_level(&self) -> &str {
        if self.debug && self.log_level == default_log_level() {
            "debug"
        } else {
            &self.log_level
        }
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            version: default_version(),
            debug: false,
            log_level: default_log_level(),
        }
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("server.host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("server.port must be between 1 and 65535".to_string());
        }

        Ok(())
    }

    /// `host:port` string for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Storage backend configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Backend to use (cosmosdb or memory)
    #[serde(default)]
    pub target: DatabaseTarget,
}

/// Azure Cosmos DB configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CosmosDbConfig {
    /// Connection string (`AccountEndpoint=...;AccountKey=...;`)
    ///
    /// Optional: without it the store runs degraded and writes are skipped.
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub connection_string: Option<SecretString>,

    /// Database name
    #[serde(default = "default_database_name")]
    pub database_name: String,
}

impl CosmosDbConfig {
    fn validate(&self) -> Result<(), String> {
        if self.database_name.trim().is_empty() {
            return Err("cosmosdb.database_name cannot be empty".to_string());
        }

        if let Some(raw) = self.connection_string_value() {
            ConnectionString::parse(&raw)
                .map_err(|e| format!("cosmosdb.connection_string is invalid: {e}"))?;
        }

        Ok(())
    }

    /// The configured connection string, treating an empty value as unset
    pub fn connection_string_value(&self) -> Option<String> {
        use secrecy::ExposeSecret;

        self.connection_string
            .as_ref()
            .map(|s| s.expose_secret().to_string())
            .filter(|s| !s.trim().is_empty())
    }

    /// Whether a connection string is configured
    pub fn is_configured(&self) -> bool {
        self.connection_string_value().is_some()
    }
}

impl Default for CosmosDbConfig {
    fn default() -> Self {
        Self {
            connection_string: None,
            database_name: default_database_name(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write JSON logs to rolling files in addition to the console
    #[serde(default)]
    pub local_enabled: bool,

    /// Log file directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_name() -> String {
    "Holly and Morty API".to_string()
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_database_name() -> String {
    "holly".to_string()
}

fn default_local_path() -> String {
    "/var/log/holly".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    #[test]
    fn test_defaults_are_valid() {
        let config = ApiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.database.target, DatabaseTarget::CosmosDB);
        assert!(!config.cosmosdb.is_configured());
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());

        config.log_level = "warn".to_string();
        config.name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_effective_log_level() {
        let mut config = ApplicationConfig::default();
        assert_eq!(config.effective_log_level(), "info");

        config.debug = true;
        assert_eq!(config.effective_log_level(), "debug");

        // An explicit level wins over the debug flag
        config.log_level = "warn".to_string();
        assert_eq!(config.effective_log_level(), "warn");
    }

    #[test]
    fn test_server_config_validation() {
        let mut config = ServerConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:8000");

        config.port = 0;
        assert!(config.validate().is_err());

        config.port = 8080;
        config.host = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cosmosdb_config_validation() {
        let mut config = CosmosDbConfig {
            connection_string: Some(secret_string(
                "AccountEndpoint=https://holly.documents.azure.com:443/;AccountKey=a2V5;"
                    .to_string(),
            )),
            database_name: "holly".to_string(),
        };
        assert!(config.validate().is_ok());
        assert!(config.is_configured());

        config.connection_string = Some(secret_string("garbage".to_string()));
        assert!(config.validate().is_err());

        // Empty means unset, not invalid
        config.connection_string = Some(secret_string(String::new()));
        assert!(config.validate().is_ok());
        assert!(!config.is_configured());

        config.database_name = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert!(!config.local_enabled);
        assert_eq!(config.local_path, "/var/log/holly");
        assert_eq!(config.local_rotation, "daily");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_logging_rotation_validation() {
        let mut config = LoggingConfig::default();
        for rotation in ["daily", "hourly", "never"] {
            config.local_rotation = rotation.to_string();
            assert!(config.validate().is_ok());
        }

        config.local_rotation = "size".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_database_target_parsing() {
        #[derive(Deserialize)]
        struct Wrapper {
            target: DatabaseTarget,
        }

        let memory: Wrapper = toml::from_str(r#"target = "memory""#).unwrap();
        assert_eq!(memory.target, DatabaseTarget::Memory);

        let cosmos: Wrapper = toml::from_str(r#"target = "cosmosdb""#).unwrap();
        assert_eq!(cosmos.target, DatabaseTarget::CosmosDB);

        assert!(toml::from_str::<Wrapper>(r#"target = "postgresql""#).is_err());
    }
}
