//! Document store
//!
//! [`DocumentStore`] is the single access point for the `conversations`,
//! `profiles` and `insights` containers. It is built once at startup,
//! provisions its containers, and is then shared read-only behind an `Arc`.
//!
//! When no backend is configured, or provisioning has not run, the store is
//! degraded: writes return their input with `stored = false`, reads return
//! `None`, queries return an empty list, and nothing fails.
//!
//! # Example
//!
//! ```rust,no_run
//! use holly_api::config::ApiConfig;
//! use holly_api::core::{ContainerName, DocumentStore};
//! use serde_json::json;
//!
//! # async fn example() -> holly_api::domain::Result<()> {
//! let mut store = DocumentStore::connect(&ApiConfig::default())?;
//! store.initialize_containers().await?;
//!
//! let outcome = store
//!     .create_item(ContainerName::Profiles, json!({"name": "Alice"}), "user-42")
//!     .await?;
//! assert_eq!(outcome.document["user_id"], "user-42");
//! # Ok(())
//! # }
//! ```

use crate::adapters::database::{create_backend, ContainerHandle, DocumentBackend};
use crate::config::ApiConfig;
use crate::core::registry::{ContainerName, ContainerRegistry};
use crate::domain::{Document, DocumentBuilder, DocumentQuery, Result, WriteOutcome};
use crate::{log_document_operation, log_error_with_context, log_storage_skipped};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Whether the store can persist documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreStatus {
    /// Containers are provisioned
    Ready,
    /// No backend, or containers not provisioned; operations are no-ops
    Degraded,
}

impl StoreStatus {
    /// Lowercase name used in health output
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreStatus::Ready => "ready",
            StoreStatus::Degraded => "degraded",
        }
    }
}

impl fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access layer over the registered containers
pub struct DocumentStore {
    backend: Option<Arc<dyn DocumentBackend>>,
    registry: ContainerRegistry,
    containers: HashMap<ContainerName, Arc<dyn ContainerHandle>>,
}

impl DocumentStore {
    /// Build a store from configuration
    ///
    /// Creates the backend but sends no request; call
    /// [`initialize_containers`](Self::initialize_containers) before serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string is invalid or the client
    /// cannot be created. A missing connection string is not an error.
    pub fn connect(config: &ApiConfig) -> Result<Self> {
        let backend = create_backend(config).map_err(|e| {
            log_error_with_context!(&e, "Failed to create storage backend");
            e
        })?;
        Self::new(backend)
    }

    /// Build a store over an existing backend, or a degraded store for `None`
    ///
    /// # Errors
    ///
    /// Returns an error if the container registry is invalid.
    pub fn new(backend: Option<Arc<dyn DocumentBackend>>) -> Result<Self> {
        Ok(Self {
            backend,
            registry: ContainerRegistry::new()?,
            containers: HashMap::new(),
        })
    }

    /// A store with no backend
    ///
    /// # Errors
    ///
    /// Returns an error if the container registry is invalid.
    pub fn disconnected() -> Result<Self> {
        Self::new(None)
    }

    /// Ensure the database and every registered container exist
    ///
    /// Caches one handle per container. Without a backend this logs a warning
    /// and returns `Ok`.
    ///
    /// # Errors
    ///
    /// Returns the first provisioning error; containers provisioned before
    /// the failure stay cached.
    pub async fn initialize_containers(&mut self) -> Result<()> {
        let Some(backend) = self.backend.clone() else {
            tracing::warn!("Storage backend not configured, skipping container initialization");
            return Ok(());
        };

        backend.ensure_database_exists().await.map_err(|e| {
            log_error_with_context!(&e, "Failed to ensure database exists");
            e
        })?;

        for config in self.registry.containers() {
            let handle = backend.ensure_container_exists(config).await.map_err(|e| {
                tracing::error!(
                    container = %config.name,
                    error = %e,
                    "Failed to initialize container"
                );
                e
            })?;
            self.containers.insert(config.name, handle);
        }

        tracing::info!(
            backend = backend.kind(),
            database = %backend.database_name(),
            containers = self.containers.len(),
            "Storage initialized"
        );
        Ok(())
    }

    /// Cached handle for a container, or `None` before provisioning
    pub fn container(&self, name: ContainerName) -> Option<&Arc<dyn ContainerHandle>> {
        let handle = self.containers.get(&name);
        if handle.is_none() {
            tracing::warn!(container = %name, "Container not initialized");
        }
        handle
    }

    fn build_document(name: ContainerName, payload: Value, partition_key: &str) -> Result<Document> {
        DocumentBuilder::new(name.config().partition_key_field(), partition_key)
            .payload(payload)
            .build()
    }

    /// Create a document, replacing it if the id already exists
    ///
    /// `id` defaults to `partition_key`, and the container's partition-key
    /// field is set to `partition_key`. A duplicate id is retried once as an
    /// upsert.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed payload and passes through
    /// storage errors other than conflicts.
    pub async fn create_item(
        &self,
        name: ContainerName,
        payload: Value,
        partition_key: &str,
    ) -> Result<WriteOutcome> {
        let Some(handle) = self.containers.get(&name) else {
            log_storage_skipped!("create", name);
            return Ok(WriteOutcome::skipped(payload));
        };

        let document = Self::build_document(name, payload, partition_key)?;

        match handle.create_item(&document).await {
            Ok(stored) => {
                log_document_operation!("create", name, document.id());
                Ok(WriteOutcome::stored(stored))
            }
            Err(e) if e.is_conflict() => {
                tracing::info!(
                    container = %name,
                    id = %document.id(),
                    "Document already exists, upserting"
                );
                self.upsert_document(handle, name, &document).await
            }
            Err(e) => {
                tracing::error!(
                    container = %name,
                    id = %document.id(),
                    error = %e,
                    "Failed to create document"
                );
                Err(e)
            }
        }
    }

    /// Insert or fully replace a document
    ///
    /// Same key handling as [`create_item`](Self::create_item).
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed payload and passes through
    /// storage errors.
    pub async fn upsert_item(
        &self,
        name: ContainerName,
        payload: Value,
        partition_key: &str,
    ) -> Result<WriteOutcome> {
        let Some(handle) = self.containers.get(&name) else {
            log_storage_skipped!("upsert", name);
            return Ok(WriteOutcome::skipped(payload));
        };

        let document = Self::build_document(name, payload, partition_key)?;
        self.upsert_document(handle, name, &document).await
    }

    async fn upsert_document(
        &self,
        handle: &Arc<dyn ContainerHandle>,
        name: ContainerName,
        document: &Document,
    ) -> Result<WriteOutcome> {
        match handle.upsert_item(document).await {
            Ok(stored) => {
                log_document_operation!("upsert", name, document.id());
                Ok(WriteOutcome::stored(stored))
            }
            Err(e) => {
                tracing::error!(
                    container = %name,
                    id = %document.id(),
                    error = %e,
                    "Failed to upsert document"
                );
                Err(e)
            }
        }
    }

    /// Point read by id and partition key
    ///
    /// Returns `None` when the document does not exist or the store is
    /// degraded.
    ///
    /// # Errors
    ///
    /// Passes through storage errors other than not-found.
    pub async fn read_item(
        &self,
        name: ContainerName,
        id: &str,
        partition_key: &str,
    ) -> Result<Option<Value>> {
        let Some(handle) = self.containers.get(&name) else {
            log_storage_skipped!("read", name);
            return Ok(None);
        };

        match handle.read_item(id, partition_key).await {
            Ok(document) => {
                tracing::debug!(container = %name, id = %id, "Document read");
                Ok(Some(document))
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!(
                    container = %name,
                    id = %id,
                    partition_key = %partition_key,
                    "Document not found"
                );
                Ok(None)
            }
            Err(e) => {
                tracing::error!(
                    container = %name,
                    id = %id,
                    error = %e,
                    "Failed to read document"
                );
                Err(e)
            }
        }
    }

    /// Run a query with named parameters
    ///
    /// Scoped to one partition when `partition_key` is given, cross-partition
    /// otherwise. Query text is passed through as-is; bind caller input
    /// through parameters only.
    ///
    /// # Errors
    ///
    /// Passes through storage errors.
    pub async fn query_items(
        &self,
        name: ContainerName,
        query: &DocumentQuery,
        partition_key: Option<&str>,
    ) -> Result<Vec<Value>> {
        let Some(handle) = self.containers.get(&name) else {
            log_storage_skipped!("query", name);
            return Ok(Vec::new());
        };

        match handle.query_items(query, partition_key).await {
            Ok(documents) => {
                tracing::debug!(
                    container = %name,
                    partition_key = partition_key.unwrap_or("*"),
                    count = documents.len(),
                    "Query completed"
                );
                Ok(documents)
            }
            Err(e) => {
                tracing::error!(
                    container = %name,
                    query = %query.text(),
                    error = %e,
                    "Failed to query documents"
                );
                Err(e)
            }
        }
    }

    /// True once at least one container handle is cached
    pub fn is_initialized(&self) -> bool {
        !self.containers.is_empty()
    }

    /// Current storage status
    pub fn status(&self) -> StoreStatus {
        if self.is_initialized() {
            StoreStatus::Ready
        } else {
            StoreStatus::Degraded
        }
    }

    /// The container registry
    pub fn registry(&self) -> &ContainerRegistry {
        &self.registry
    }

    /// Backend name, or `None` when no backend is configured
    pub fn backend_kind(&self) -> Option<&'static str> {
        self.backend.as_ref().map(|b| b.kind())
    }

    /// Database name, or `None` when no backend is configured
    pub fn database_name(&self) -> Option<&str> {
        self.backend.as_ref().map(|b| b.database_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryBackend;
    use crate::domain::ApiError;
    use serde_json::json;

    async fn memory_store() -> DocumentStore {
        let backend: Arc<dyn DocumentBackend> = Arc::new(MemoryBackend::new("holly"));
        let mut store = DocumentStore::new(Some(backend)).unwrap();
        store.initialize_containers().await.unwrap();
        store
    }

    /// Collects formatted log output for the current thread
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn install(&self, level: tracing::Level) -> tracing::subscriber::DefaultGuard {
            let subscriber = tracing_subscriber::fmt()
                .with_writer(self.clone())
                .with_ansi(false)
                .with_max_level(level)
                .finish();
            tracing::subscriber::set_default(subscriber)
        }

        fn contents(&self) -> String {
            let bytes = self.0.lock().unwrap_or_else(|e| e.into_inner());
            String::from_utf8_lossy(&bytes).into_owned()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap_or_else(|e| e.into_inner()).extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn user_fields(document: &Value) -> Value {
        let mut map = document.as_object().cloned().unwrap_or_default();
        map.retain(|key, _| !key.starts_with('_'));
        Value::Object(map)
    }

    #[tokio::test]
    async fn test_initialize_caches_every_container() {
        let store = memory_store().await;
        assert!(store.is_initialized());
        assert_eq!(store.status(), StoreStatus::Ready);
        for name in ContainerName::ALL {
            assert!(store.container(name).is_some());
        }
        assert_eq!(store.backend_kind(), Some("memory"));
    }

    #[tokio::test]
    async fn test_create_injects_keys() {
        let store = memory_store().await;

        let outcome = store
            .create_item(ContainerName::Profiles, json!({"name": "Alice"}), "user-42")
            .await
            .unwrap();

        assert!(outcome.stored);
        assert_eq!(
            user_fields(&outcome.document),
            json!({"id": "user-42", "user_id": "user-42", "name": "Alice"})
        );
    }

    #[tokio::test]
    async fn test_partition_key_field_is_forced() {
        let store = memory_store().await;

        let outcome = store
            .upsert_item(
                ContainerName::Conversations,
                json!({"id": "turn-1", "conversation_id": "someone-else"}),
                "conv-1",
            )
            .await
            .unwrap();

        assert_eq!(outcome.document["conversation_id"], "conv-1");
        let read = store
            .read_item(ContainerName::Conversations, "turn-1", "conv-1")
            .await
            .unwrap();
        assert!(read.is_some());
    }

    #[tokio::test]
    async fn test_create_twice_falls_back_to_upsert() {
        let store = memory_store().await;

        store
            .create_item(ContainerName::Profiles, json!({"name": "Alice", "age": 30}), "u1")
            .await
            .unwrap();
        let second = store
            .create_item(ContainerName::Profiles, json!({"name": "Alicia"}), "u1")
            .await
            .unwrap();
        assert!(second.stored);

        let stored = store
            .read_item(ContainerName::Profiles, "u1", "u1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            user_fields(&stored),
            json!({"id": "u1", "user_id": "u1", "name": "Alicia"})
        );

        let all = store
            .query_items(ContainerName::Profiles, &DocumentQuery::new("SELECT * FROM c"), None)
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_read_missing_returns_none() {
        let store = memory_store().await;
        let result = store
            .read_item(ContainerName::Insights, "missing", "u1")
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_invalid_payload_is_rejected() {
        let store = memory_store().await;
        let err = store
            .create_item(ContainerName::Profiles, json!([1, 2, 3]), "u1")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_disconnected_store_degrades() {
        let store = DocumentStore::disconnected().unwrap();
        assert!(!store.is_initialized());
        assert_eq!(store.status(), StoreStatus::Degraded);
        assert!(store.backend_kind().is_none());

        let input = json!({"name": "Alice"});
        let created = store
            .create_item(ContainerName::Profiles, input.clone(), "u1")
            .await
            .unwrap();
        assert_eq!(created, WriteOutcome::skipped(input.clone()));

        let upserted = store
            .upsert_item(ContainerName::Profiles, input.clone(), "u1")
            .await
            .unwrap();
        assert!(!upserted.stored);
        assert_eq!(upserted.document, input);

        assert!(store
            .read_item(ContainerName::Profiles, "u1", "u1")
            .await
            .unwrap()
            .is_none());
        assert!(store
            .query_items(ContainerName::Profiles, &DocumentQuery::new("SELECT * FROM c"), None)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_initialize_without_backend_is_ok() {
        let mut store = DocumentStore::disconnected().unwrap();
        store.initialize_containers().await.unwrap();
        assert!(!store.is_initialized());
    }

    #[tokio::test]
    async fn test_uninitialized_backend_degrades() {
        let backend: Arc<dyn DocumentBackend> = Arc::new(MemoryBackend::new("holly"));
        let store = DocumentStore::new(Some(backend)).unwrap();

        assert_eq!(store.status(), StoreStatus::Degraded);
        let outcome = store
            .create_item(ContainerName::Insights, json!({"kind": "note"}), "u1")
            .await
            .unwrap();
        assert!(!outcome.stored);
    }

    #[test]
    fn test_store_status_serialization() {
        assert_eq!(serde_json::to_value(StoreStatus::Ready).unwrap(), json!("ready"));
        assert_eq!(StoreStatus::Degraded.to_string(), "degraded");
    }
    #[tokio::test]
    async fn test_degraded_operations_warn_once() {
        let store = DocumentStore::disconnected().unwrap();
        let logs = CapturedLogs::default();
        let _guard = logs.install(tracing::Level::WARN);

        store
            .create_item(ContainerName::Profiles, json!({"name": "Alice"}), "u1")
            .await
            .unwrap();
        store
            .upsert_item(ContainerName::Profiles, json!({"name": "Alice"}), "u1")
            .await
            .unwrap();
        store.read_item(ContainerName::Profiles, "u1", "u1").await.unwrap();
        store
            .query_items(ContainerName::Insights, &DocumentQuery::new("SELECT * FROM c"), None)
            .await
            .unwrap();

        let output = logs.contents();
        assert_eq!(output.lines().count(), 4, "{output}");
        assert_eq!(output.matches("Storage not initialized").count(), 4);
        assert!(!output.contains("Container not initialized"));
    }

    #[tokio::test]
    async fn test_writes_logged_at_info() {
        let store = memory_store().await;
        let logs = CapturedLogs::default();
        let _guard = logs.install(tracing::Level::INFO);

        store
            .create_item(ContainerName::Profiles, json!({"name": "Alice"}), "user-42")
            .await
            .unwrap();
        store
            .upsert_item(ContainerName::Insights, json!({"id": "i1"}), "user-42")
            .await
            .unwrap();
        store
            .read_item(ContainerName::Profiles, "user-42", "user-42")
            .await
            .unwrap();

        let output = logs.contents();
        let writes: Vec<_> = output
            .lines()
            .filter(|line| line.contains("Document written"))
            .collect();
        assert_eq!(writes.len(), 2, "{output}");
        assert!(writes[0].contains("INFO"));
        assert!(writes[0].contains("container=profiles"));
        assert!(writes[0].contains("id=user-42"));
        assert!(writes[1].contains("container=insights"));
        assert!(writes[1].contains("id=i1"));
        assert!(!output.contains("Document read"));
    }
}
