//! Domain identifier types with validation
//!
//! Newtype wrappers for the two keys every stored document carries: its `id`
//! and its partition-key value. Both must be non-empty strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Partition-key value newtype wrapper
///
/// The value a document is partitioned by, e.g. the `user_id` of a profile
/// or the `conversation_id` of a conversation.
///
/// # Examples
///
/// ```
/// use holly_api::domain::ids::PartitionKeyValue;
/// use std::str::FromStr;
///
/// let pk = PartitionKeyValue::from_str("user-42").unwrap();
/// assert_eq!(pk.as_str(), "user-42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartitionKeyValue(String);

impl PartitionKeyValue {
    /// Creates a new PartitionKeyValue from a string
    ///
    /// # Returns
    ///
    /// Returns `Err` if the value is empty or only whitespace
    pub fn new(value: impl Into<String>) -> Result<Self, String> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err("Partition key value cannot be empty".to_string());
        }
        Ok(Self(value))
    }

    /// Returns the partition-key value as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PartitionKeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PartitionKeyValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for PartitionKeyValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Document identifier newtype wrapper
///
/// Cosmos DB requires `id` to be a string that is unique within its partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
    /// Creates a new DocumentId from a string
    ///
    /// # Returns
    ///
    /// Returns `Err` if the id is empty or only whitespace
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Document id cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the document id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocumentId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<PartitionKeyValue> for DocumentId {
    fn from(value: PartitionKeyValue) -> Self {
        Self(value.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_key_value_valid() {
        let pk = PartitionKeyValue::new("conv-123").unwrap();
        assert_eq!(pk.as_str(), "conv-123");
        assert_eq!(pk.to_string(), "conv-123");
    }

    #[test]
    fn test_partition_key_value_empty() {
        assert!(PartitionKeyValue::new("").is_err());
        assert!(PartitionKeyValue::new("   ").is_err());
    }

    #[test]
    fn test_document_id_empty() {
        assert!(DocumentId::new("").is_err());
        assert!(DocumentId::from_str("\t").is_err());
    }

    #[test]
    fn test_document_id_from_partition_key() {
        let pk = PartitionKeyValue::new("user-42").unwrap();
        let id = DocumentId::from(pk);
        assert_eq!(id.as_str(), "user-42");
    }

    #[test]
    fn test_serde_is_transparent_string() {
        let pk = PartitionKeyValue::new("user-1").unwrap();
        let json = serde_json::to_string(&pk).unwrap();
        assert_eq!(json, "\"user-1\"");
    }
}
