//! HTTP mapping for [`ApiError`]
//!
//! Every error body has the shape `{"detail": "..."}`. Validation failures
//! map to 422, missing documents to 404, and everything else to 500 with a
//! generic message; the full error is logged instead of returned.

use crate::domain::{ApiError, CosmosDbError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

impl ApiError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::CosmosDb(CosmosDbError::DocumentNotFound(_)) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let detail = match &self {
            ApiError::Validation(message) => message.clone(),
            ApiError::CosmosDb(CosmosDbError::DocumentNotFound(_)) => "Not Found".to_string(),
            _ => {
                tracing::error!(error = %self, "Request failed");
                "Internal Server Error".to_string()
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
