//! Redacting wrapper for the SMTP/IMAP password.
//!
//! [`SecretString`] keeps the mail account password out of `Debug` output,
//! log lines and any JSON written back to disk.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A string that prints as `[REDACTED]` and serializes as `""`.
///
/// Deserialization accepts the plain value so `config.json` can carry the
/// password directly. Use [`expose()`](SecretString::expose) at the point of
/// authentication only.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw secret. Only transport code should call this.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("\"\"")
        } else {
            f.write_str("\"[REDACTED]\"")
        }
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.0.is_empty() {
            f.write_str("[REDACTED]")?;
        }
        Ok(())
    }
}

impl Serialize for SecretString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("")
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(SecretString)
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        SecretString(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        SecretString(s.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_and_display_redact() {
        let s = SecretString::new("app-password-1234");
        assert_eq!(format!("{s:?}"), "\"[REDACTED]\"");
        assert_eq!(s.to_string(), "[REDACTED]");
    }

    #[test]
    fn empty_secret_prints_empty() {
        let s = SecretString::default();
        assert_eq!(format!("{s:?}"), "\"\"");
        assert_eq!(s.to_string(), "");
        assert!(s.is_empty());
    }

    #[test]
    fn serialize_never_writes_value() {
        let json = serde_json::to_string(&SecretString::new("hunter2")).unwrap();
        assert_eq!(json, "\"\"");
    }

    #[test]
    fn deserialize_plain_string() {
        let s: SecretString = serde_json::from_str("\"hunter2\"").unwrap();
        assert_eq!(s.expose(), "hunter2");
    }
}
