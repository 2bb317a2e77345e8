//! Storage backend factory
//!
//! Builds the [`DocumentBackend`] selected by `database.target`.

use crate::adapters::cosmosdb::{ConnectionString, CosmosDbClient};
use crate::adapters::database::traits::DocumentBackend;
use crate::adapters::memory::MemoryBackend;
use crate::config::schema::{ApiConfig, DatabaseTarget};
use crate::domain::{ApiError, Result};
use std::sync::Arc;

/// Create a storage backend based on the configuration
///
/// Returns `Ok(None)` for the Cosmos DB target when no connection string is
/// configured; the store then runs degraded.
///
/// # Errors
///
/// Returns an error if the connection string cannot be parsed or the client
/// cannot be built.
pub fn create_backend(config: &ApiConfig) -> Result<Option<Arc<dyn DocumentBackend>>> {
    match config.database.target {
        DatabaseTarget::CosmosDB => {
            let Some(raw) = config.cosmosdb.connection_string_value() else {
                tracing::warn!(
                    "Cosmos DB connection string not configured; storage operations will be skipped"
                );
                return Ok(None);
            };

            let connection = ConnectionString::parse(&raw).map_err(ApiError::CosmosDb)?;

            tracing::info!(
                endpoint = %connection.endpoint(),
                database = %config.cosmosdb.database_name,
                "Creating Cosmos DB client"
            );
            let client = CosmosDbClient::new(&connection, &config.cosmosdb.database_name)?;

            Ok(Some(Arc::new(client)))
        }
        DatabaseTarget::Memory => {
            tracing::info!(
                database = %config.cosmosdb.database_name,
                "Creating in-memory storage backend"
            );
            Ok(Some(Arc::new(MemoryBackend::new(
                config.cosmosdb.database_name.clone(),
            ))))
        }
    }
}
