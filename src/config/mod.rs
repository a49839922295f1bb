//! Configuration management for Scrubber.
//!
//! # Overview
//!
//! Scrubber uses a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `SCRUBBER_*` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`ServerConfig`] - HTTP bind address and request budget
//! - [`LanguageConfig`] - Language service endpoint, key, offsets and retries
//! - [`MaskingConfig`](crate::masking::MaskingConfig) - Default policy, text limit, audit log
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 3000
//!
//! [language]
//! endpoint = "https://my-resource.cognitiveservices.azure.com"
//! key = "${LANGUAGE_KEY}"
//!
//! [masking]
//! default_policy = "redact"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_env};
pub use schema::{
    ApplicationConfig, LanguageConfig, LoggingConfig, RetryConfig, ScrubberConfig, ServerConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
