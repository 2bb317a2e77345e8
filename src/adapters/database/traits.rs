//! Database abstraction traits
//!
//! This module defines the traits that storage backends implement to serve
//! the document store. A [`DocumentBackend`] provisions the database and its
//! containers and hands out one [`ContainerHandle`] per container; the handle
//! performs the document operations.

use crate::core::registry::ContainerConfig;
use crate::domain::{Document, DocumentQuery, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Database-level operations
///
/// Implementations must be cheap to share; the store holds one behind an `Arc`.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Ensure the target database exists, creating it if necessary
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be read or created.
    async fn ensure_database_exists(&self) -> Result<()>;

    /// Ensure a container exists with the registered partition key path
    ///
    /// "Already exists" is success. Returns the handle used for all document
    /// operations on that container.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be read or created.
    async fn ensure_container_exists(
        &self,
        container: &ContainerConfig,
    ) -> Result<Arc<dyn ContainerHandle>>;

    /// Get the database name
    fn database_name(&self) -> &str;

    /// Short backend name for logs and status output
    fn kind(&self) -> &'static str;
}

/// Document operations against one container
///
/// Errors are single-attempt pass-throughs. Implementations report duplicate
/// keys as `CosmosDbError::Conflict` and missing documents as
/// `CosmosDbError::DocumentNotFound`; the store relies on both.
#[async_trait]
pub trait ContainerHandle: Send + Sync {
    /// Container id
    fn name(&self) -> &str;

    /// Insert a new document
    ///
    /// # Errors
    ///
    /// `Conflict` if a document with the same id exists in the partition.
    async fn create_item(&self, document: &Document) -> Result<Value>;

    /// Insert or fully replace a document
    async fn upsert_item(&self, document: &Document) -> Result<Value>;

    /// Point read by id within a partition
    ///
    /// # Errors
    ///
    /// `DocumentNotFound` if no such document exists.
    async fn read_item(&self, id: &str, partition_key: &str) -> Result<Value>;

    /// Run a query, scoped to one partition when `partition_key` is set and
    /// fanned out across all partitions otherwise
    ///
    /// Returns every matching document; results are not paged.
    async fn query_items(
        &self,
        query: &DocumentQuery,
        partition_key: Option<&str>,
    ) -> Result<Vec<Value>>;
}
