//! In-memory storage backend
//!
//! Used for local development (`database.target = "memory"`) and by the test
//! suites. Behaves like the Cosmos DB backend for the operations the store
//! uses, including conflict and not-found reporting and a subset of the SQL
//! query language.

pub mod backend;
pub mod query;

pub use backend::MemoryBackend;
