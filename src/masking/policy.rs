//! Masking policy

use crate::domain::{Result, ScrubError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strategy applied to every kept entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskingPolicy {
    /// Replace with a fixed marker
    #[default]
    Redact,
    /// Replace with the bracketed category label
    Pseudo,
    /// Replace with a truncated SHA-256 digest of the snippet
    Hash,
}

impl MaskingPolicy {
    /// All supported policies
    pub const ALL: [MaskingPolicy; 3] = [Self::Redact, Self::Pseudo, Self::Hash];

    /// Wire name of the policy
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Redact => "redact",
            Self::Pseudo => "pseudo",
            Self::Hash => "hash",
        }
    }
}

impl fmt::Display for MaskingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaskingPolicy {
    type Err = ScrubError;

    /// Parse a policy name; unknown names are rejected, never defaulted
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "redact" => Ok(Self::Redact),
            "pseudo" => Ok(Self::Pseudo),
            "hash" => Ok(Self::Hash),
            _ => Err(ScrubError::InvalidPolicy(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("redact", MaskingPolicy::Redact)]
    #[test_case("pseudo", MaskingPolicy::Pseudo)]
    #[test_case("hash", MaskingPolicy::Hash)]
    #[test_case(" HASH ", MaskingPolicy::Hash ; "trimmed and case insensitive")]
    fn test_parse_policy(input: &str, expected: MaskingPolicy) {
        assert_eq!(input.parse::<MaskingPolicy>().unwrap(), expected);
    }

    #[test_case("" ; "empty")]
    #[test_case("mask" ; "unknown name")]
    #[test_case("redacted" ; "near miss")]
    fn test_parse_policy_rejects(input: &str) {
        let err = input.parse::<MaskingPolicy>().unwrap_err();
        assert!(matches!(err, ScrubError::InvalidPolicy(_)));
    }

    #[test]
    fn test_display_round_trips() {
        for policy in MaskingPolicy::ALL {
            assert_eq!(policy.to_string().parse::<MaskingPolicy>().unwrap(), policy);
        }
    }

    #[test]
    fn test_default_is_redact() {
        assert_eq!(MaskingPolicy::default(), MaskingPolicy::Redact);
    }
}
