//! Configuration schema types
//!
//! Every section has serde defaults, so an empty file (or no file at all)
//! yields a usable configuration apart from the detector credentials.

use crate::config::SecretString;
use crate::masking::{MaskingConfig, OffsetUnit};
use serde::{Deserialize, Serialize};
use url::Url;

/// Main Scrubber configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrubberConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// HTTP service settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Language service (entity detector) settings
    #[serde(default)]
    pub language: LanguageConfig,

    /// Masking settings
    #[serde(default)]
    pub masking: MaskingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ScrubberConfig {
    /// Validates the configuration
    ///
    /// Detector credentials are not required here: offline masking works
    /// without them. Call [`ScrubberConfig::require_detector`] before
    /// building a client.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.server.validate()?;
        self.language.validate()?;
        self.masking.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Checks that the language service endpoint and key are set
    pub fn require_detector(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.language.endpoint.trim().is_empty() {
            return Err(
                "language.endpoint is not set (use LANGUAGE_ENDPOINT or SCRUBBER_LANGUAGE_ENDPOINT)"
                    .to_string(),
            );
        }

        let key_missing = self
            .language
            .key
            .as_ref()
            .map(|k| k.expose_secret().is_empty())
            .unwrap_or(true);
        if key_missing {
            return Err(
                "language.key is not set (use LANGUAGE_KEY or SCRUBBER_LANGUAGE_KEY)".to_string(),
            );
        }

        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// HTTP service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Budget for one sanitize request, detection included
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout_seconds(),
        }
    }
}

impl ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("server.host cannot be empty".to_string());
        }
        if self.port == 0 {
            return Err("server.port must be > 0".to_string());
        }
        if self.request_timeout_seconds == 0 {
            return Err("server.request_timeout_seconds must be > 0".to_string());
        }
        Ok(())
    }

    /// `host:port` string for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_retries > 10 {
            return Err("language.retry.max_retries must be <= 10".to_string());
        }
        if self.backoff_multiplier < 1.0 {
            return Err("language.retry.backoff_multiplier must be >= 1.0".to_string());
        }
        if self.initial_delay_ms > self.max_delay_ms {
            return Err(
                "language.retry.initial_delay_ms cannot exceed language.retry.max_delay_ms"
                    .to_string(),
            );
        }
        Ok(())
    }

    /// Delay before retry number `attempt` (1-based), capped at `max_delay_ms`
    pub fn delay_ms(&self, attempt: usize) -> u64 {
        let exponent = attempt.saturating_sub(1) as i32;
        let delay = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(exponent);
        (delay as u64).min(self.max_delay_ms)
    }
}

/// Language service (PII entity recognition) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageConfig {
    /// Resource endpoint, e.g. `https://my-resource.cognitiveservices.azure.com`
    #[serde(default)]
    pub endpoint: String,

    /// Subscription key
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub key: Option<SecretString>,

    /// REST API version segment
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Unit the service reports offsets in; spans are emitted in the same unit
    #[serde(default)]
    pub string_index_type: OffsetUnit,

    /// HTTP timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            key: None,
            api_version: default_api_version(),
            string_index_type: OffsetUnit::default(),
            timeout_seconds: default_timeout_seconds(),
            retry: RetryConfig::default(),
        }
    }
}

impl LanguageConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.endpoint.trim().is_empty() {
            let url = Url::parse(&self.endpoint)
                .map_err(|e| format!("language.endpoint is not a valid URL: {e}"))?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err("language.endpoint must start with http:// or https://".to_string());
            }
        }

        if self.api_version.trim().is_empty() {
            return Err("language.api_version cannot be empty".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("language.timeout_seconds must be > 0".to_string());
        }

        self.retry.validate()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    /// Console-only logging
    pub fn console() -> Self {
        Self {
            local_enabled: false,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout_seconds() -> u64 {
    30
}

fn default_api_version() -> String {
    "v3.1".to_string()
}

fn default_timeout_seconds() -> u64 {
    15
}

fn default_max_retries() -> usize {
    2
}

fn default_initial_delay_ms() -> u64 {
    250
}

fn default_max_delay_ms() -> u64 {
    4000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
