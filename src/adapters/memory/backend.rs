//! In-process document backend
//!
//! Keeps every container in memory, keyed by partition-key value and then by
//! document id, which gives the same `(partition key, id)` uniqueness as the
//! Cosmos DB service. Writes stamp the `_ts` and `_etag` system properties the
//! service would add.

use super::query::CompiledQuery;
use crate::adapters::database::traits::{ContainerHandle, DocumentBackend};
use crate::core::registry::ContainerConfig;
use crate::domain::{ApiError, CosmosDbError, Document, DocumentQuery, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

type Partition = BTreeMap<String, Value>;

/// Memory backend holding one [`MemoryContainer`] per provisioned container
pub struct MemoryBackend {
    database_name: String,
    containers: RwLock<HashMap<String, Arc<MemoryContainer>>>,
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new(database_name: impl Into<String>) -> Self {
        Self {
            database_name: database_name.into(),
            containers: RwLock::new(HashMap::new()),
        }
    }

    /// Names of the containers provisioned so far
    pub fn container_names(&self) -> Vec<String> {
        let containers = self.containers.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = containers.keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl DocumentBackend for MemoryBackend {
    async fn ensure_database_exists(&self) -> Result<()> {
        tracing::debug!(database = %self.database_name, "Using in-memory database");
        Ok(())
    }

    async fn ensure_container_exists(
        &self,
        container: &ContainerConfig,
    ) -> Result<Arc<dyn ContainerHandle>> {
        let mut containers = self.containers.write().unwrap_or_else(PoisonError::into_inner);
        let handle = containers
            .entry(container.name.as_str().to_string())
            .or_insert_with(|| {
                tracing::info!(
                    container = %container.name,
                    partition_key = %container.partition_key_path,
                    "Creating in-memory container"
                );
                Arc::new(MemoryContainer::new(container.name.as_str()))
            })
            .clone();

        Ok(handle)
    }

    fn database_name(&self) -> &str {
        &self.database_name
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}

/// One in-memory container
pub struct MemoryContainer {
    name: String,
    partitions: RwLock<BTreeMap<String, Partition>>,
}

impl MemoryContainer {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            partitions: RwLock::new(BTreeMap::new()),
        }
    }

    fn stamp(document: &Document) -> Value {
        let mut body = document.body().clone();
        body.insert(
            "_ts".to_string(),
            Value::from(chrono::Utc::now().timestamp()),
        );
        body.insert(
            "_etag".to_string(),
            Value::String(format!("\"{}\"", uuid::Uuid::new_v4())),
        );
        Value::Object(body)
    }
}

#[async_trait]
impl ContainerHandle for MemoryContainer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn create_item(&self, document: &Document) -> Result<Value> {
        let mut partitions = self.partitions.write().unwrap_or_else(PoisonError::into_inner);
        let partition = partitions
            .entry(document.partition_key().as_str().to_string())
            .or_default();

        if partition.contains_key(document.id().as_str()) {
            return Err(ApiError::CosmosDb(CosmosDbError::Conflict(format!(
                "Document {} already exists in {} (partition {})",
                document.id(),
                self.name,
                document.partition_key()
            ))));
        }

        let stored = Self::stamp(document);
        partition.insert(document.id().as_str().to_string(), stored.clone());
        Ok(stored)
    }

    async fn upsert_item(&self, document: &Document) -> Result<Value> {
        let mut partitions = self.partitions.write().unwrap_or_else(PoisonError::into_inner);
        let stored = Self::stamp(document);
        partitions
            .entry(document.partition_key().as_str().to_string())
            .or_default()
            .insert(document.id().as_str().to_string(), stored.clone());
        Ok(stored)
    }

    async fn read_item(&self, id: &str, partition_key: &str) -> Result<Value> {
        let partitions = self.partitions.read().unwrap_or_else(PoisonError::into_inner);
        partitions
            .get(partition_key)
            .and_then(|partition| partition.get(id))
            .cloned()
            .ok_or_else(|| {
                ApiError::CosmosDb(CosmosDbError::DocumentNotFound(format!(
                    "{id} in {} (partition {partition_key})",
                    self.name
                )))
            })
    }

    async fn query_items(
        &self,
        query: &DocumentQuery,
        partition_key: Option<&str>,
    ) -> Result<Vec<Value>> {
        let compiled = CompiledQuery::compile(query)?;
        let partitions = self.partitions.read().unwrap_or_else(PoisonError::into_inner);

        let matched: Vec<Value> = match partition_key {
            Some(pk) => partitions
                .get(pk)
                .into_iter()
                .flat_map(|partition| partition.values())
                .filter(|doc| compiled.matches(doc))
                .cloned()
                .collect(),
            None => partitions
                .values()
                .flat_map(|partition| partition.values())
                .filter(|doc| compiled.matches(doc))
                .cloned()
                .collect(),
        };

        Ok(compiled.finish(matched))
    }
}
