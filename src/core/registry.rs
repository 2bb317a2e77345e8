//! Container registry
//!
//! The fixed set of Cosmos DB containers the API writes to, and the partition
//! key each one is created with.

use crate::domain::{ApiError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logical container names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerName {
    /// Conversation transcripts and analysis, one document per conversation
    Conversations,
    /// Caller profiles, one document per user
    Profiles,
    /// Insights extracted from conversations, partitioned by user
    Insights,
}

impl ContainerName {
    /// Every registered container, in provisioning order
    pub const ALL: [ContainerName; 3] = [
        ContainerName::Conversations,
        ContainerName::Profiles,
        ContainerName::Insights,
    ];

    /// Container id in Cosmos DB
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerName::Conversations => "conversations",
            ContainerName::Profiles => "profiles",
            ContainerName::Insights => "insights",
        }
    }

    /// Registered configuration for this container
    pub fn config(&self) -> ContainerConfig {
        match self {
            ContainerName::Conversations => ContainerConfig::new(*self, "/conversation_id"),
            ContainerName::Profiles => ContainerConfig::new(*self, "/user_id"),
            ContainerName::Insights => ContainerConfig::new(*self, "/user_id"),
        }
    }
}

impl fmt::Display for ContainerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContainerName {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        ContainerName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| {
                ApiError::Validation(format!(
                    "Unknown container '{s}'. Must be one of: conversations, profiles, insights"
                ))
            })
    }
}

/// Configuration for a single container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerConfig {
    /// Logical name, also used as the container id
    pub name: ContainerName,

    /// Partition key path, e.g. `/user_id`
    pub partition_key_path: &'static str,
}

impl ContainerConfig {
    const fn new(name: ContainerName, partition_key_path: &'static str) -> Self {
        Self {
            name,
            partition_key_path,
        }
    }

    /// Partition key field name (`/user_id` -> `user_id`)
    pub fn partition_key_field(&self) -> &'static str {
        self.partition_key_path.trim_start_matches('/')
    }

    fn validate(&self) -> std::result::Result<(), String> {
        let field = self.partition_key_field();
        if !self.partition_key_path.starts_with('/') {
            return Err(format!(
                "Partition key path for '{}' must start with '/', got '{}'",
                self.name, self.partition_key_path
            ));
        }
        if field.is_empty() || field.contains('/') {
            return Err(format!(
                "Partition key path for '{}' must name a single top-level field, got '{}'",
                self.name, self.partition_key_path
            ));
        }
        Ok(())
    }
}

/// Validated lookup table of every container the API uses
#[derive(Debug, Clone)]
pub struct ContainerRegistry {
    containers: Vec<ContainerConfig>,
}

impl ContainerRegistry {
    /// Build the registry from [`ContainerName::ALL`]
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any partition key path is malformed.
    pub fn new() -> Result<Self> {
        let containers: Vec<ContainerConfig> =
            ContainerName::ALL.iter().map(ContainerName::config).collect();

        for container in &containers {
            container.validate().map_err(ApiError::Configuration)?;
        }

        Ok(Self { containers })
    }

    /// Registered containers in provisioning order
    pub fn containers(&self) -> &[ContainerConfig] {
        &self.containers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(ContainerName::Conversations, "/conversation_id", "conversation_id")]
    #[test_case(ContainerName::Profiles, "/user_id", "user_id")]
    #[test_case(ContainerName::Insights, "/user_id", "user_id")]
    fn test_partition_keys(name: ContainerName, path: &str, field: &str) {
        let config = name.config();
        assert_eq!(config.partition_key_path, path);
        assert_eq!(config.partition_key_field(), field);
    }

    #[test]
    fn test_container_name_round_trip_from_str() {
        for name in ContainerName::ALL {
            assert_eq!(name.as_str().parse::<ContainerName>().unwrap(), name);
        }
        assert!("calls".parse::<ContainerName>().is_err());
    }

    #[test]
    fn test_registry_contains_all_containers() {
        let registry = ContainerRegistry::new().unwrap();
        let names: Vec<_> = registry.containers().iter().map(|c| c.name).collect();
        assert_eq!(names, ContainerName::ALL.to_vec());
    }

    #[test]
    fn test_nested_partition_key_rejected() {
        let config = ContainerConfig::new(ContainerName::Profiles, "/user/id");
        assert!(config.validate().is_err());

        let config = ContainerConfig::new(ContainerName::Profiles, "user_id");
        assert!(config.validate().is_err());

        let config = ContainerConfig::new(ContainerName::Profiles, "/");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_container_name_serde() {
        let json = serde_json::to_string(&ContainerName::Conversations).unwrap();
        assert_eq!(json, "\"conversations\"");
    }
}
