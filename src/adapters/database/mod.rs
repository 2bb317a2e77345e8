//! Database abstraction layer
//!
//! Trait-based abstraction over document storage, letting the store run on
//! Azure Cosmos DB or the in-memory backend.

pub mod factory;
pub mod traits;

pub use factory::create_backend;
pub use traits::{ContainerHandle, DocumentBackend};
