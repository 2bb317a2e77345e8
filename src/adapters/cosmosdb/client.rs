//! Cosmos DB client implementation
//!
//! This module provides the client for interacting with Azure Cosmos DB:
//! building the SDK client from a connection string and provisioning the
//! database and containers.

use super::adapter::{remote_status, CosmosContainer};
use super::connection::ConnectionString;
use crate::adapters::database::traits::{ContainerHandle, DocumentBackend};
use crate::core::registry::ContainerConfig;
use crate::domain::{ApiError, CosmosDbError, RemoteStatus, Result};
use async_trait::async_trait;
use azure_core::credentials::Secret;
use azure_data_cosmos::clients::DatabaseClient;
use azure_data_cosmos::models::{ContainerProperties, IndexingPolicy, PartitionKeyDefinition};
use azure_data_cosmos::{CosmosClient, CosmosClientOptions};
use std::borrow::Cow;
use std::sync::Arc;

/// Next provisioning step for a database or container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Provision {
    /// The resource exists
    Ready,
    /// The resource is missing and must be created
    Create,
    /// Abort provisioning
    Fail,
}

/// Step after a failed read: only a 404 leads to creation
fn after_failed_read(status: RemoteStatus) -> Provision {
    match status {
        RemoteStatus::NotFound => Provision::Create,
        _ => Provision::Fail,
    }
}

/// Step after a failed create: a 409 means another instance created it first
fn after_failed_create(status: RemoteStatus) -> Provision {
    match status {
        RemoteStatus::Conflict => Provision::Ready,
        _ => Provision::Fail,
    }
}

/// Cosmos DB client for the Holly API
///
/// Holds the SDK client and the database client for the configured database.
pub struct CosmosDbClient {
    /// Cosmos DB client
    client: CosmosClient,

    /// Database client
    database: DatabaseClient,

    /// Database name
    database_name: String,

    /// Account endpoint, kept for status output
    endpoint: String,
}

impl CosmosDbClient {
    /// Create a new Cosmos DB client
    ///
    /// No request is sent; the account is first contacted during provisioning.
    ///
    /// # Arguments
    ///
    /// * `connection` - Parsed connection string
    /// * `database_name` - Target database
    ///
    /// # Errors
    ///
    /// Returns an error if the SDK rejects the endpoint or key.
    pub fn new(connection: &ConnectionString, database_name: &str) -> Result<Self> {
        use secrecy::ExposeSecret;

        // Convert our SecretString to Azure's Secret type
        let key_str: String = connection.key().expose_secret().clone().into();
        let key = Secret::new(key_str);
        let options = Some(CosmosClientOptions::default());

        let client = CosmosClient::with_key(connection.endpoint(), key, options).map_err(|e| {
            ApiError::CosmosDb(CosmosDbError::ConnectionFailed(format!(
                "Failed to create Cosmos client: {e}"
            )))
        })?;

        let database = client.database_client(database_name);

        Ok(Self {
            client,
            database,
            database_name: database_name.to_string(),
            endpoint: connection.endpoint().to_string(),
        })
    }

    /// Get the endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl DocumentBackend for CosmosDbClient {
    async fn ensure_database_exists(&self) -> Result<()> {
        match self.database.read(None).await {
            Ok(_) => {
                tracing::info!(database = %self.database_name, "Database already exists");
                return Ok(());
            }
            Err(e) if after_failed_read(remote_status(&e)) == Provision::Fail => {
                return Err(ApiError::CosmosDb(CosmosDbError::ConnectionFailed(format!(
                    "Failed to read database {}: {e}",
                    self.database_name
                ))));
            }
            Err(_) => {}
        }

        tracing::info!(database = %self.database_name, "Creating database");
        if let Err(e) = self.client.create_database(&self.database_name, None).await {
            if after_failed_create(remote_status(&e)) == Provision::Fail {
                return Err(ApiError::CosmosDb(CosmosDbError::DatabaseCreationFailed(
                    format!("Failed to create database {}: {e}", self.database_name),
                )));
            }
            tracing::info!(database = %self.database_name, "Database created concurrently");
        }

        tracing::info!(database = %self.database_name, "Database ready");
        Ok(())
    }

    async fn ensure_container_exists(
        &self,
        container: &ContainerConfig,
    ) -> Result<Arc<dyn ContainerHandle>> {
        let container_name = container.name.as_str();
        let client = self.database.container_client(container_name);

        let step = match client.read(None).await {
            Ok(_) => Provision::Ready,
            Err(e) => match after_failed_read(remote_status(&e)) {
                Provision::Fail => {
                    return Err(ApiError::CosmosDb(CosmosDbError::ContainerCreationFailed(
                        format!("Failed to read container {container_name}: {e}"),
                    )));
                }
                step => step,
            },
        };

        if step == Provision::Create {
            tracing::info!(
                container = %container_name,
                partition_key = %container.partition_key_path,
                "Creating container"
            );

            let partition_key_def = PartitionKeyDefinition {
                paths: vec![container.partition_key_path.to_string()],
                kind: azure_data_cosmos::models::PartitionKeyKind::Hash,
                version: None,
            };

            let properties = ContainerProperties {
                id: Cow::Owned(container_name.to_string()),
                partition_key: partition_key_def,
                indexing_policy: Some(IndexingPolicy::default()),
                ..Default::default()
            };

            if let Err(e) = self.database.create_container(properties, None).await {
                if after_failed_create(remote_status(&e)) == Provision::Fail {
                    return Err(ApiError::CosmosDb(CosmosDbError::ContainerCreationFailed(
                        format!("Failed to create container {container_name}: {e}"),
                    )));
                }
                tracing::info!(container = %container_name, "Container created concurrently");
            }
        } else {
            tracing::info!(container = %container_name, "Container already exists");
        }

        tracing::info!(
            container = %container_name,
            partition_key = %container.partition_key_path,
            "Container ready"
        );

        Ok(Arc::new(CosmosContainer::new(client, container_name)))
    }

    fn database_name(&self) -> &str {
        &self.database_name
    }

    fn kind(&self) -> &'static str {
        "cosmosdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(RemoteStatus::NotFound, Provision::Create; "missing is created")]
    #[test_case(RemoteStatus::Conflict, Provision::Fail; "conflict on read")]
    #[test_case(RemoteStatus::Other, Provision::Fail; "other read failure")]
    fn test_after_failed_read(status: RemoteStatus, expected: Provision) {
        assert_eq!(after_failed_read(status), expected);
    }

    #[test_case(RemoteStatus::Conflict, Provision::Ready; "created concurrently")]
    #[test_case(RemoteStatus::NotFound, Provision::Fail; "not found on create")]
    #[test_case(RemoteStatus::Other, Provision::Fail; "other create failure")]
    fn test_after_failed_create(status: RemoteStatus, expected: Provision) {
        assert_eq!(after_failed_create(status), expected);
    }

    #[test_case(Some(404), Provision::Create; "http 404")]
    #[test_case(Some(403), Provision::Fail; "http 403")]
    #[test_case(Some(503), Provision::Fail; "http 503")]
    #[test_case(None, Provision::Fail; "no response")]
    fn test_read_status_codes(code: Option<u16>, expected: Provision) {
        assert_eq!(after_failed_read(RemoteStatus::from_code(code)), expected);
    }

    #[test]
    fn test_client_from_connection_string() {
        let connection = ConnectionString::parse(
            "AccountEndpoint=https://test.documents.azure.com:443/;AccountKey=dGVzdC1rZXk=;",
        )
        .unwrap();

        let client = CosmosDbClient::new(&connection, "holly").unwrap();
        assert_eq!(client.database_name(), "holly");
        assert_eq!(client.endpoint(), "https://test.documents.azure.com/");
        assert_eq!(client.kind(), "cosmosdb");
    }
}
