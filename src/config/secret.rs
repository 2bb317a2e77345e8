//! Secret configuration values
//!
//! The Cosmos DB connection string embeds the account key, so it is held in a
//! [`secrecy::Secret`]: redacted in `Debug` output, zeroed on drop, and only
//! readable through `expose_secret()`.
//!
//! # Example
//!
//! ```rust
//! use holly_api::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let conn = secret_string("AccountEndpoint=https://x/;AccountKey=k;".to_string());
//! assert!(conn.expose_secret().as_ref().starts_with("AccountEndpoint"));
//! assert!(!format!("{conn:?}").contains("AccountKey"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// String newtype that can live inside a [`Secret`]
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl From<SecretValue> for String {
    fn from(mut s: SecretValue) -> Self {
        std::mem::take(&mut s.0)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl std::fmt::Display for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// A secret string: zeroed on drop, redacted in `Debug`
pub type SecretString = Secret<SecretValue>;

/// Wrap a String as a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_secret_string_creation() {
        let secret = secret_string("AccountKey=abc".to_string());
        assert_eq!(secret.expose_secret(), "AccountKey=abc");
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = secret_string("sensitive-key".to_string());
        let debug_output = format!("{secret:?}");

        assert!(!debug_output.contains("sensitive-key"));
        assert!(debug_output.contains("REDACTED"));
    }

    #[test]
    fn test_secret_in_toml() {
        #[derive(Deserialize)]
        struct Section {
            connection_string: Option<SecretString>,
        }

        let section: Section =
            toml::from_str(r#"connection_string = "AccountEndpoint=https://x/""#).unwrap();
        let value = section.connection_string.unwrap();
        assert_eq!(value.expose_secret(), "AccountEndpoint=https://x/");
    }
}
