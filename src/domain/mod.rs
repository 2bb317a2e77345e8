//! Domain models and types for the Holly API.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed keys** ([`PartitionKeyValue`], [`DocumentId`])
//! - **Document records** ([`Document`], [`DocumentBuilder`], [`WriteOutcome`])
//! - **Queries** ([`DocumentQuery`], [`QueryParameter`])
//! - **Error types** ([`ApiError`], [`CosmosDbError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, ApiError>`]:
//!
//! ```rust
//! use holly_api::domain::{ApiError, Result};
//!
//! fn example() -> Result<()> {
//!     Err(ApiError::Validation("missing field".to_string()))
//! }
//! ```

pub mod document;
pub mod errors;
pub mod ids;
pub mod query;
pub mod result;

// Re-export commonly used types for convenience
pub use document::{Document, DocumentBuilder, WriteOutcome};
pub use errors::{ApiError, CosmosDbError, RemoteStatus};
pub use ids::{DocumentId, PartitionKeyValue};
pub use query::{DocumentQuery, QueryParameter};
pub use result::Result;
