//! Storage integrations for the Holly API.
//!
//! - [`database`] - Backend traits and the factory selecting a backend
//! - [`cosmosdb`] - Azure Cosmos DB implementation
//! - [`memory`] - In-process implementation for development and tests
//!
//! # Design Pattern
//!
//! Adapters isolate the storage SDK behind [`database::DocumentBackend`] and
//! [`database::ContainerHandle`], so the document store and its tests never
//! depend on a live account.
//!
//! ```rust,no_run
//! use holly_api::adapters::cosmosdb::{ConnectionString, CosmosDbClient};
//! use holly_api::adapters::database::DocumentBackend;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let connection = ConnectionString::parse(
//!     "AccountEndpoint=https://account.documents.azure.com:443/;AccountKey=a2V5;",
//! )?;
//! let client = CosmosDbClient::new(&connection, "holly")?;
//! client.ensure_database_exists().await?;
//! # Ok(())
//! # }
//! ```

pub mod cosmosdb;
pub mod database;
pub mod memory;
