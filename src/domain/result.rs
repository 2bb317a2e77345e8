//! Result type alias for the Holly API
//!
//! This module provides a convenient Result type alias that uses [`ApiError`]
//! as the error type.

use super::errors::ApiError;

/// Result type alias for API operations
///
/// # Examples
///
/// ```
/// use holly_api::domain::result::Result;
/// use holly_api::domain::errors::ApiError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ApiError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ApiError>;
