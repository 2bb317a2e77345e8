//! Cosmos DB connection strings
//!
//! Parses the `AccountEndpoint=...;AccountKey=...;` strings shown in the Azure
//! portal into an endpoint and a secret key for key authentication.

use crate::config::{secret_string, SecretString};
use crate::domain::CosmosDbError;
use url::Url;

/// A parsed Cosmos DB connection string
#[derive(Debug, Clone)]
pub struct ConnectionString {
    endpoint: Url,
    key: SecretString,
}

impl ConnectionString {
    /// Parse a connection string
    ///
    /// Segment names are matched case-insensitively and unknown segments are
    /// ignored. The key is split at the first `=` only, so base64 padding is
    /// preserved.
    ///
    /// # Errors
    ///
    /// Returns [`CosmosDbError::InvalidConnectionString`] if either segment is
    /// missing or the endpoint is not an `https://` URL.
    ///
    /// # Example
    ///
    /// ```
    /// use holly_api::adapters::cosmosdb::ConnectionString;
    ///
    /// let conn = ConnectionString::parse(
    ///     "AccountEndpoint=https://holly.documents.azure.com:443/;AccountKey=a2V5==;",
    /// )
    /// .unwrap();
    /// assert_eq!(conn.endpoint(), "https://holly.documents.azure.com/");
    /// ```
    pub fn parse(raw: &str) -> Result<Self, CosmosDbError> {
        let mut endpoint = None;
        let mut key = None;

        for segment in raw.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let Some((name, value)) = segment.split_once('=') else {
                return Err(CosmosDbError::InvalidConnectionString(format!(
                    "segment without '=' near '{}'",
                    segment.chars().take(16).collect::<String>()
                )));
            };

            match name.trim().to_ascii_lowercase().as_str() {
                "accountendpoint" => endpoint = Some(value.trim().to_string()),
                "accountkey" => key = Some(value.trim().to_string()),
                _ => {}
            }
        }

        let endpoint = endpoint.filter(|e| !e.is_empty()).ok_or_else(|| {
            CosmosDbError::InvalidConnectionString("missing AccountEndpoint".to_string())
        })?;
        let key = key.filter(|k| !k.is_empty()).ok_or_else(|| {
            CosmosDbError::InvalidConnectionString("missing AccountKey".to_string())
        })?;

        let endpoint = Url::parse(&endpoint).map_err(|e| {
            CosmosDbError::InvalidConnectionString(format!("invalid AccountEndpoint: {e}"))
        })?;
        if endpoint.scheme() != "https" {
            return Err(CosmosDbError::InvalidConnectionString(
                "AccountEndpoint must start with https://".to_string(),
            ));
        }

        Ok(Self {
            endpoint,
            key: secret_string(key),
        })
    }

    /// Account endpoint URL
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Account key
    pub fn key(&self) -> &SecretString {
        &self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    const VALID: &str = "AccountEndpoint=https://holly.documents.azure.com:443/;AccountKey=c2VjcmV0LWtleQ==;";

    #[test]
    fn test_parse_valid() {
        let conn = ConnectionString::parse(VALID).unwrap();
        assert_eq!(conn.endpoint(), "https://holly.documents.azure.com/");
        assert_eq!(conn.key().expose_secret(), "c2VjcmV0LWtleQ==");
    }

    #[test]
    fn test_parse_case_insensitive_and_extra_segments() {
        let conn = ConnectionString::parse(
            "accountkey=abc;ACCOUNTENDPOINT=https://localhost:8081/;Database=holly",
        )
        .unwrap();
        assert_eq!(conn.endpoint(), "https://localhost:8081/");
        assert_eq!(conn.key().expose_secret(), "abc");
    }

    #[test]
    fn test_parse_missing_key() {
        let err = ConnectionString::parse("AccountEndpoint=https://x.documents.azure.com/").unwrap_err();
        assert!(err.to_string().contains("AccountKey"));
    }

    #[test]
    fn test_parse_missing_endpoint() {
        let err = ConnectionString::parse("AccountKey=abc").unwrap_err();
        assert!(err.to_string().contains("AccountEndpoint"));
    }

    #[test]
    fn test_parse_rejects_plain_http() {
        assert!(ConnectionString::parse("AccountEndpoint=http://x.com/;AccountKey=abc").is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(ConnectionString::parse("not a connection string").is_err());
        assert!(ConnectionString::parse("").is_err());
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let conn = ConnectionString::parse(VALID).unwrap();
        assert!(!format!("{conn:?}").contains("c2VjcmV0LWtleQ=="));
    }
}
