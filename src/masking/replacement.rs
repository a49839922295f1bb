//! Replacement generation per masking policy

use super::models::NormalizedEntity;
use super::policy::MaskingPolicy;
use sha2::{Digest, Sha256};

/// Marker used by [`MaskingPolicy::Redact`], independent of entity length
pub const REDACTION_MARKER: &str = "***";

/// Number of hex characters kept from the snippet digest
pub const HASH_PREFIX_LEN: usize = 10;

impl MaskingPolicy {
    /// Replacement string for `entity`, whose original text is `snippet`
    pub fn replacement(&self, entity: &NormalizedEntity, snippet: &str) -> String {
        match self {
            Self::Redact => REDACTION_MARKER.to_string(),
            Self::Pseudo => pseudonym(&entity.category),
            Self::Hash => digest_prefix(snippet),
        }
    }
}

/// Bracketed category label, e.g. `[PhoneNumber]`
pub fn pseudonym(category: &str) -> String {
    format!("[{category}]")
}

/// First [`HASH_PREFIX_LEN`] hex characters of the SHA-256 digest of `snippet`
pub fn digest_prefix(snippet: &str) -> String {
    let mut hex = sha256_hex(snippet);
    hex.truncate(HASH_PREFIX_LEN);
    hex
}

/// Full lowercase hex SHA-256 digest
pub(crate) fn sha256_hex(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let result = hasher.finalize();
    format!("{result:x}")
}
