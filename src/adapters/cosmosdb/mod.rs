//! Azure Cosmos DB integration
//!
//! This module provides the Cosmos DB storage backend: connection-string
//! parsing, database and container provisioning, and the per-container
//! document handle.

pub mod adapter;
pub mod client;
pub mod connection;

pub use adapter::CosmosContainer;
pub use client::CosmosDbClient;
pub use connection::ConnectionString;
