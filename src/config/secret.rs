//! Secure credential handling using the secrecy crate
//!
//! The language service subscription key is held in a [`SecretString`]: the
//! memory is zeroed when it is dropped, `Debug` output is redacted, and the
//! value is only reachable through `expose_secret()`.
//!
//! # Example
//!
//! ```rust
//! use scrubber::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let key = secret_string("subscription-key".to_string());
//! assert_eq!(key.expose_secret().as_ref(), "subscription-key");
//! assert!(!format!("{key:?}").contains("subscription-key"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// String newtype that satisfies the `Secret` bounds
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

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
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

/// Zeroizing, debug-redacted string
pub type SecretString = Secret<SecretValue>;

/// Wrap a `String` in a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}
