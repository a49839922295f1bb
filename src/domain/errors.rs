//! Domain error types
//!
//! This module defines the error hierarchy for Scrubber.
//! All errors are domain-specific and don't expose third-party types.
//!
//! A malformed entity reported by the detector is not an error
//! here: the normalizer drops it and logs the reason (see
//! [`crate::masking::normalizer::Rejection`]).

use serde_json::Value;
use thiserror::Error;

/// Main Scrubber error type
///
/// Validation errors and upstream failures abort the whole request.
/// None of the messages carry snippets of the submitted text.
#[derive(Debug, Error)]
pub enum ScrubError {
    /// Empty, blank or oversized text
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unrecognized masking policy
    #[error("Invalid policy '{0}'. Must be one of: redact, pseudo, hash")]
    InvalidPolicy(String),

    /// The entity source failed or returned an error
    #[error("Upstream detection failure: {message}")]
    UpstreamDetection {
        /// HTTP status returned by the detection service, if any
        status: Option<u16>,
        /// Short description of the failure
        message: String,
        /// Diagnostic body forwarded from the detection service
        details: Option<Value>,
    },

    /// Request exceeded its time budget
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network/connection errors
    #[error("Connection error: {0}")]
    Connection(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl ScrubError {
    /// Build an upstream failure without a status or body
    pub fn upstream(message: impl Into<String>) -> Self {
        ScrubError::UpstreamDetection {
            status: None,
            message: message.into(),
            details: None,
        }
    }

    /// Whether the error was caused by the caller's request
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ScrubError::InvalidInput(_) | ScrubError::InvalidPolicy(_)
        )
    }

    /// Process exit code used by the CLI for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ScrubError::InvalidInput(_) | ScrubError::InvalidPolicy(_) => 1,
            ScrubError::Configuration(_) => 2,
            ScrubError::UpstreamDetection { .. }
            | ScrubError::Timeout(_)
            | ScrubError::Connection(_) => 3,
            _ => 5,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for ScrubError {
    fn from(err: std::io::Error) -> Self {
        ScrubError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ScrubError {
    fn from(err: serde_json::Error) -> Self {
        ScrubError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ScrubError {
    fn from(err: toml::de::Error) -> Self {
        ScrubError::Configuration(format!("TOML parse error: {err}"))
    }
}
