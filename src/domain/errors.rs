//! Domain error types
//!
//! This module defines the error hierarchy for the Holly API. Errors raised by
//! the document store never expose Azure SDK types; they are flattened into
//! [`CosmosDbError`] variants carrying the SDK message.

use thiserror::Error;

/// Main API error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Cosmos DB-related errors
    #[error("Cosmos DB error: {0}")]
    CosmosDb(#[from] CosmosDbError),

    /// Validation errors (malformed documents, bad partition keys, bad query parameters)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// HTTP server errors (bind, serve)
    #[error("Server error: {0}")]
    Server(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl ApiError {
    /// Returns `true` when the remote store reported a duplicate key (HTTP 409)
    pub fn is_conflict(&self) -> bool {
        matches!(self, ApiError::CosmosDb(CosmosDbError::Conflict(_)))
    }

    /// Returns `true` when the remote store reported a missing document (HTTP 404)
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::CosmosDb(CosmosDbError::DocumentNotFound(_)))
    }
}

/// Cosmos DB-specific errors
///
/// Errors that occur when interacting with Azure Cosmos DB or the in-memory
/// stand-in. `Conflict` and `DocumentNotFound` are the only variants the
/// document store handles itself; everything else propagates to the caller.
#[derive(Debug, Error)]
pub enum CosmosDbError {
    /// Failed to build the client or reach the account
    #[error("Failed to connect to Cosmos DB: {0}")]
    ConnectionFailed(String),

    /// Connection string is missing a segment or is malformed
    #[error("Invalid connection string: {0}")]
    InvalidConnectionString(String),

    /// Failed to create database
    #[error("Failed to create database: {0}")]
    DatabaseCreationFailed(String),

    /// Failed to create container
    #[error("Failed to create container: {0}")]
    ContainerCreationFailed(String),

    /// Document not found (404)
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// Conflict error (409), the document id already exists in the partition
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Failed to insert document
    #[error("Failed to insert document: {0}")]
    InsertFailed(String),

    /// Failed to upsert document
    #[error("Failed to update document: {0}")]
    UpdateFailed(String),

    /// Failed to read document
    #[error("Failed to read document: {0}")]
    ReadFailed(String),

    /// Failed to query documents
    #[error("Failed to query documents: {0}")]
    QueryFailed(String),

    /// Failed to deserialize response
    #[error("Failed to deserialize response: {0}")]
    DeserializationFailed(String),
}

/// HTTP status classes the document store acts on
///
/// Built from the status code of a remote response, never from error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteStatus {
    /// 404: the document, container or database does not exist
    NotFound,
    /// 409: the id is already taken
    Conflict,
    /// Any other status, or no HTTP response at all
    Other,
}

impl RemoteStatus {
    /// Classify an HTTP status code; `None` means no response was received
    pub fn from_code(code: Option<u16>) -> Self {
        match code {
            Some(404) => RemoteStatus::NotFound,
            Some(409) => RemoteStatus::Conflict,
            _ => RemoteStatus::Other,
        }
    }
}

impl CosmosDbError {
    /// Classify a failed write by its response status
    pub fn from_write_error(status: RemoteStatus, message: String, upsert: bool) -> Self {
        match status {
            RemoteStatus::Conflict => CosmosDbError::Conflict(message),
            _ if upsert => CosmosDbError::UpdateFailed(message),
            _ => CosmosDbError::InsertFailed(message),
        }
    }

    /// Classify a failed point read by its response status
    pub fn from_read_error(status: RemoteStatus, message: String) -> Self {
        match status {
            RemoteStatus::NotFound => CosmosDbError::DocumentNotFound(message),
            _ => CosmosDbError::ReadFailed(message),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ApiError {
    fn from(err: toml::de::Error) -> Self {
        ApiError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_cosmosdb_error_conversion() {
        let cosmos_err = CosmosDbError::QueryFailed("syntax".to_string());
        let api_err: ApiError = cosmos_err.into();
        assert!(matches!(api_err, ApiError::CosmosDb(_)));
    }

    #[test]
    fn test_conflict_and_not_found_predicates() {
        let conflict: ApiError = CosmosDbError::Conflict("id taken".to_string()).into();
        assert!(conflict.is_conflict());
        assert!(!conflict.is_not_found());

        let missing: ApiError = CosmosDbError::DocumentNotFound("user-1".to_string()).into();
        assert!(missing.is_not_found());
        assert!(!missing.is_conflict());

        let other = ApiError::Validation("bad".to_string());
        assert!(!other.is_conflict());
        assert!(!other.is_not_found());
    }

    #[test_case(Some(404), RemoteStatus::NotFound; "not found")]
    #[test_case(Some(409), RemoteStatus::Conflict; "conflict")]
    #[test_case(Some(429), RemoteStatus::Other; "throttled")]
    #[test_case(Some(503), RemoteStatus::Other; "unavailable")]
    #[test_case(None, RemoteStatus::Other; "no response")]
    fn test_remote_status_from_code(code: Option<u16>, expected: RemoteStatus) {
        assert_eq!(RemoteStatus::from_code(code), expected);
    }

    #[test]
    fn test_write_error_classification() {
        let err = CosmosDbError::from_write_error(RemoteStatus::Conflict, "id taken".to_string(), false);
        assert!(matches!(err, CosmosDbError::Conflict(_)));

        let err = CosmosDbError::from_write_error(RemoteStatus::Other, "throttled".to_string(), false);
        assert!(matches!(err, CosmosDbError::InsertFailed(_)));

        let err = CosmosDbError::from_write_error(RemoteStatus::Other, "server error".to_string(), true);
        assert!(matches!(err, CosmosDbError::UpdateFailed(_)));
    }

    #[test]
    fn test_error_text_does_not_drive_classification() {
        // Ids that look like status codes must not change the outcome
        let err = CosmosDbError::from_read_error(
            RemoteStatus::Other,
            "read order-404 from profiles: HttpResponse(ServiceUnavailable)".to_string(),
        );
        assert!(matches!(err, CosmosDbError::ReadFailed(_)));

        let err = CosmosDbError::from_write_error(
            RemoteStatus::Other,
            "create call-4091 in conversations: HttpResponse(TooManyRequests)".to_string(),
            false,
        );
        assert!(matches!(err, CosmosDbError::InsertFailed(_)));
    }

    #[test]
    fn test_read_error_classification() {
        let err = CosmosDbError::from_read_error(RemoteStatus::NotFound, "user-1".to_string());
        assert!(matches!(err, CosmosDbError::DocumentNotFound(_)));

        let err = CosmosDbError::from_read_error(RemoteStatus::Other, "unavailable".to_string());
        assert!(matches!(err, CosmosDbError::ReadFailed(_)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let api_err: ApiError = io_err.into();
        assert!(matches!(api_err, ApiError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let api_err: ApiError = json_err.into();
        assert!(matches!(api_err, ApiError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let api_err: ApiError = toml_err.into();
        assert!(matches!(api_err, ApiError::Configuration(_)));
        assert!(api_err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_api_error_implements_std_error() {
        let err = ApiError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
