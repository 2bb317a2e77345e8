//! Logging and observability
//!
//! Structured logging through `tracing`, with console output and optional
//! JSON files with rotation.
//!
//! # Example
//!
//! ```no_run
//! use holly_api::logging::init_logging;
//! use holly_api::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log a completed document write at info level
///
/// # Example
///
/// ```no_run
/// use holly_api::log_document_operation;
///
/// log_document_operation!("upsert", "profiles", "user-42");
/// ```
#[macro_export]
macro_rules! log_document_operation {
    ($operation:expr, $container:expr, $id:expr) => {
        tracing::info!(
            operation = $operation,
            container = %$container,
            id = %$id,
            "Document written"
        );
    };
}

/// Log a document operation skipped because storage is not initialized
#[macro_export]
macro_rules! log_storage_skipped {
    ($operation:expr, $container:expr) => {
        tracing::warn!(
            operation = $operation,
            container = %$container,
            "Storage not initialized, skipping operation"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use holly_api::log_error_with_context;
/// use holly_api::domain::ApiError;
///
/// let error = ApiError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
