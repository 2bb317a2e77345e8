//! Typed document records
//!
//! Every document written through the store carries an `id` and a value for
//! its container's partition-key field. [`DocumentBuilder`] is the single place
//! where those two keys are injected into a caller payload:
//!
//! - `id` defaults to the partition-key value when the payload has none
//! - the partition-key field is always overwritten with the partition-key value
//!
//! # Example
//!
//! ```
//! use holly_api::domain::DocumentBuilder;
//! use serde_json::json;
//!
//! let document = DocumentBuilder::new("user_id", "user-42")
//!     .payload(json!({"name": "Alice"}))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     document.to_value(),
//!     json!({"id": "user-42", "user_id": "user-42", "name": "Alice"})
//! );
//! ```

use super::errors::ApiError;
use super::ids::{DocumentId, PartitionKeyValue};
use super::result::Result;
use serde_json::{Map, Value};

/// A document ready to be written to a container
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    id: DocumentId,
    partition_key_field: String,
    partition_key: PartitionKeyValue,
    body: Map<String, Value>,
}

impl Document {
    /// Document id
    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    /// Name of the partition-key field (path without the leading `/`)
    pub fn partition_key_field(&self) -> &str {
        &self.partition_key_field
    }

    /// Partition-key value
    pub fn partition_key(&self) -> &PartitionKeyValue {
        &self.partition_key
    }

    /// Full document body, including `id` and the partition-key field
    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    /// Clone the body into a JSON value
    pub fn to_value(&self) -> Value {
        Value::Object(self.body.clone())
    }

    /// Consume the document and return its JSON body
    pub fn into_value(self) -> Value {
        Value::Object(self.body)
    }
}

/// Builder merging a caller payload with the document keys
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    partition_key_field: String,
    partition_key: String,
    payload: Value,
}

impl DocumentBuilder {
    /// Start a document for the given partition-key field and value
    pub fn new(partition_key_field: impl Into<String>, partition_key: impl Into<String>) -> Self {
        Self {
            partition_key_field: partition_key_field.into(),
            partition_key: partition_key.into(),
            payload: Value::Object(Map::new()),
        }
    }

    /// Set the caller payload
    pub fn payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    /// Validate and merge the payload into a [`Document`]
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] if the payload is not a JSON object,
    /// the partition-key value is empty, or a supplied `id` is not a
    /// non-empty string.
    pub fn build(self) -> Result<Document> {
        let partition_key =
            PartitionKeyValue::new(self.partition_key).map_err(ApiError::Validation)?;

        let mut body = match self.payload {
            Value::Object(map) => map,
            other => {
                return Err(ApiError::Validation(format!(
                    "Document payload must be a JSON object, got {}",
                    json_type_name(&other)
                )))
            }
        };

        let id = match body.get("id") {
            None | Some(Value::Null) => DocumentId::from(partition_key.clone()),
            Some(Value::String(id)) => DocumentId::new(id.as_str()).map_err(ApiError::Validation)?,
            Some(other) => {
                return Err(ApiError::Validation(format!(
                    "Document id must be a string, got {}",
                    json_type_name(other)
                )))
            }
        };

        body.insert("id".to_string(), Value::String(id.as_str().to_string()));
        body.insert(
            self.partition_key_field.clone(),
            Value::String(partition_key.as_str().to_string()),
        );

        Ok(Document {
            id,
            partition_key_field: self.partition_key_field,
            partition_key,
            body,
        })
    }
}

/// Result of a create or upsert through the store
///
/// `stored` is `false` when the store is running degraded (no connection
/// configured or containers not provisioned); `document` is then the caller
/// input, unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOutcome {
    /// The written document, or the untouched input when nothing was stored
    pub document: Value,

    /// Whether the document reached the backend
    pub stored: bool,
}

impl WriteOutcome {
    /// Outcome for a document the backend accepted
    pub fn stored(document: Value) -> Self {
        Self {
            document,
            stored: true,
        }
    }

    /// Outcome for a write skipped in degraded mode
    pub fn skipped(input: Value) -> Self {
        Self {
            document: input,
            stored: false,
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
