//! Parameterized Cosmos SQL queries
//!
//! The store passes query text through untouched. Callers must put every
//! user-controlled value into a named parameter (`@name`), never into the
//! query text itself.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single named query parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryParameter {
    /// Parameter name including the leading `@`
    pub name: String,

    /// Parameter value
    pub value: Value,
}

/// A query in the Cosmos SQL dialect plus its parameters
///
/// # Example
///
/// ```
/// use holly_api::domain::DocumentQuery;
///
/// let query = DocumentQuery::new("SELECT * FROM c WHERE c.user_id = @user_id")
///     .with_parameter("@user_id", "user-42");
///
/// assert_eq!(query.parameters().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentQuery {
    query: String,

    #[serde(default)]
    parameters: Vec<QueryParameter>,
}

impl DocumentQuery {
    /// Create a query without parameters
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            parameters: Vec::new(),
        }
    }

    /// Add a named parameter
    ///
    /// A missing leading `@` is added.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let name = if name.starts_with('@') {
            name
        } else {
            format!("@{name}")
        };
        self.parameters.push(QueryParameter {
            name,
            value: value.into(),
        });
        self
    }

    /// Query text
    pub fn text(&self) -> &str {
        &self.query
    }

    /// Query parameters in insertion order
    pub fn parameters(&self) -> &[QueryParameter] {
        &self.parameters
    }

    /// Look up a parameter value by name
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }
}

impl From<&str> for DocumentQuery {
    fn from(query: &str) -> Self {
        Self::new(query)
    }
}

impl From<String> for DocumentQuery {
    fn from(query: String) -> Self {
        Self::new(query)
    }
}
