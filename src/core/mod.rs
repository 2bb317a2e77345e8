//! Core document-access logic for the Holly API.
//!
//! # Modules
//!
//! - [`registry`] - The fixed set of containers and their partition keys
//! - [`store`] - The document store shared by every router
//!
//! # Lifecycle
//!
//! 1. **Connect**: build the backend from configuration (no network traffic)
//! 2. **Provision**: ensure the database and each registered container exist
//! 3. **Share**: wrap the store in an `Arc` and hand it to the HTTP layer
//!
//! After step 3 the store is read-only; request handlers need no locks.

pub mod registry;
pub mod store;

pub use registry::{ContainerConfig, ContainerName, ContainerRegistry};
pub use store::{DocumentStore, StoreStatus};
