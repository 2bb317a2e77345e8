//! Configuration loader with TOML parsing and environment variable overrides
//!
//! Loading order:
//! 1. Read the TOML file (or start from defaults when there is none)
//! 2. Substitute `${VAR}` placeholders from the environment
//! 3. Parse into [`ApiConfig`]
//! 4. Apply `HOLLY_*` environment overrides
//! 5. Validate

use super::schema::{ApiConfig, DatabaseTarget};
use super::secret::secret_string;
use crate::domain::errors::ApiError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Errors
///
/// Returns an error if:
/// - File does not exist or cannot be read
/// - A referenced environment variable is not set
/// - TOML parsing fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use holly_api::config::loader::load_config;
///
/// let config = load_config("holly.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ApiConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ApiError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ApiError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_from_str(&contents)
}

/// Loads configuration from a file if it exists, otherwise from defaults
///
/// Environment overrides and validation apply in both cases, so a deployment
/// can run from environment variables alone.
///
/// # Errors
///
/// Same as [`load_config`], except that a missing file is not an error.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<ApiConfig> {
    let path = path.as_ref();

    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(
        path = %path.display(),
        "Configuration file not found, using defaults and environment"
    );

    let mut config = ApiConfig::default();
    apply_env_overrides(&mut config)?;
    validate(&config)?;
    Ok(config)
}

/// Parses configuration from TOML text
///
/// # Errors
///
/// Returns an error if substitution, parsing or validation fails
pub fn load_config_from_str(contents: &str) -> Result<ApiConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: ApiConfig = toml::from_str(&contents)
        .map_err(|e| ApiError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;
    validate(&config)?;

    Ok(config)
}

fn validate(config: &ApiConfig) -> Result<()> {
    config
        .validate()
        .map_err(|e| ApiError::Configuration(format!("Configuration validation failed: {}", e)))
}

/// Keys whose placeholder may be left unset; they substitute as empty
const OPTIONAL_KEYS: &[&str] = &["connection_string"];

/// Substitutes environment variables in the format `${VAR_NAME}` or
/// `${VAR_NAME:-default}`
///
/// Comment lines are left untouched. An unset variable on an optional key
/// (see [`OPTIONAL_KEYS`]) becomes an empty string, which the schema treats
/// as "not configured".
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set and has
/// neither a default nor an optional key
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .map_err(|e| ApiError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let optional = line
            .split_once('=')
            .is_some_and(|(key, _)| OPTIONAL_KEYS.contains(&key.trim()));

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            let value = match (std::env::var(var_name), cap.get(2)) {
                (Ok(value), _) => value,
                (Err(_), Some(default)) => default.as_str().to_string(),
                (Err(_), None) if optional => String::new(),
                (Err(_), None) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                    continue;
                }
            };
            processed_line = processed_line.replace(&cap[0], &value);
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ApiError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ApiError::Configuration(format!(
            "{name} must be a boolean, got '{other}'"
        ))),
    }
}

/// Applies environment variable overrides using the HOLLY_* prefix
///
/// Variables follow the pattern `HOLLY_<SECTION>_<KEY>`, for example
/// `HOLLY_SERVER_PORT`. The deployment names `HOLLY_COSMOS_CONNECTION_STRING`
/// and `HOLLY_COSMOS_DATABASE_NAME` are accepted as well; the sectioned names
/// win when both are set.
///
/// # Errors
///
/// Returns an error if a value cannot be parsed into its field type
pub fn apply_env_overrides(config: &mut ApiConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("HOLLY_APPLICATION_NAME") {
        config.application.name = val;
    }
    if let Ok(val) = std::env::var("HOLLY_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val.to_lowercase();
    }
    if let Ok(val) = std::env::var("HOLLY_APPLICATION_DEBUG") {
        config.application.debug = parse_bool("HOLLY_APPLICATION_DEBUG", &val)?;
    }

    // Server overrides
    if let Ok(val) = std::env::var("HOLLY_SERVER_HOST") {
        config.server.host = val;
    }
    if let Ok(val) = std::env::var("HOLLY_SERVER_PORT") {
        config.server.port = val.trim().parse().map_err(|_| {
            ApiError::Configuration(format!("HOLLY_SERVER_PORT must be a port number, got '{val}'"))
        })?;
    }

    // Database overrides
    if let Ok(val) = std::env::var("HOLLY_DATABASE_TARGET") {
        config.database.target = match val.trim().to_ascii_lowercase().as_str() {
            "cosmosdb" => DatabaseTarget::CosmosDB,
            "memory" => DatabaseTarget::Memory,
            other => {
                return Err(ApiError::Configuration(format!(
                    "HOLLY_DATABASE_TARGET must be 'cosmosdb' or 'memory', got '{other}'"
                )))
            }
        };
    }

    // Cosmos DB overrides
    for name in ["HOLLY_COSMOS_CONNECTION_STRING", "HOLLY_COSMOSDB_CONNECTION_STRING"] {
        if let Ok(val) = std::env::var(name) {
            config.cosmosdb.connection_string = Some(secret_string(val));
        }
    }
    for name in ["HOLLY_COSMOS_DATABASE_NAME", "HOLLY_COSMOSDB_DATABASE_NAME"] {
        if let Ok(val) = std::env::var(name) {
            config.cosmosdb.database_name = val;
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("HOLLY_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_bool("HOLLY_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("HOLLY_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("HOLLY_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("HOLLY_LOADER_TEST_VAR", "test_value");
        let input = "password = \"${HOLLY_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "password = \"test_value\"\n");
        std::env::remove_var("HOLLY_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("HOLLY_LOADER_MISSING_VAR");
        let input = "password = \"${HOLLY_LOADER_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("HOLLY_LOADER_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        let input = "# connection_string = \"${HOLLY_LOADER_COMMENTED_VAR}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_substitute_env_vars_default() {
        std::env::remove_var("HOLLY_LOADER_DEFAULTED_VAR");
        let input = "database_name = \"${HOLLY_LOADER_DEFAULTED_VAR:-holly_dev}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "database_name = \"holly_dev\"\n");

        std::env::set_var("HOLLY_LOADER_DEFAULTED_VAR", "holly_prod");
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "database_name = \"holly_prod\"\n");
        std::env::remove_var("HOLLY_LOADER_DEFAULTED_VAR");
    }

    #[test]
    fn test_unset_optional_key_substitutes_empty() {
        std::env::remove_var("HOLLY_LOADER_UNSET_CONNECTION");
        let input = "connection_string = \"${HOLLY_LOADER_UNSET_CONNECTION}\"   # optional";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "connection_string = \"\"   # optional\n");

        // Other keys stay required
        let input = "database_name = \"${HOLLY_LOADER_UNSET_CONNECTION}\"";
        assert!(substitute_env_vars(input).is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("X", "true").unwrap());
        assert!(parse_bool("X", "1").unwrap());
        assert!(!parse_bool("X", "off").unwrap());
        assert!(parse_bool("X", "maybe").is_err());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-holly.toml");
        assert!(matches!(result, Err(ApiError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
name = "Holly test"
log_level = "debug"

[server]
port = 9001

[database]
target = "memory"

[cosmosdb]
database_name = "holly_test"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.name, "Holly test");
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.target, DatabaseTarget::Memory);
        assert_eq!(config.cosmosdb.database_name, "holly_test");
    }

    #[test]
    fn test_load_config_invalid_values() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[logging]\nlocal_rotation = \"weekly\"\n")
            .unwrap();
        temp_file.flush().unwrap();

        let err = load_config(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("local_rotation"));
    }

    #[test]
    fn test_load_config_rejects_bad_toml() {
        let result = load_config_from_str("[server\nport = ");
        assert!(matches!(result, Err(ApiError::Configuration(_))));
    }
}
