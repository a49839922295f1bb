//! Masking configuration

use super::policy::MaskingPolicy;
use crate::domain::{Result, ScrubError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Masking settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskingConfig {
    /// Policy used when a request does not name one
    #[serde(default)]
    pub default_policy: MaskingPolicy,

    /// Language hint used when a request does not send one
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Maximum accepted text length, in offset units
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,

    /// Audit logging configuration
    #[serde(default)]
    pub audit: AuditConfig,
}

impl Default for MaskingConfig {
    fn default() -> Self {
        Self {
            default_policy: MaskingPolicy::default(),
            default_language: default_language(),
            max_text_length: default_max_text_length(),
            audit: AuditConfig::default(),
        }
    }
}

impl MaskingConfig {
    /// Validate the configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_text_length == 0 {
            return Err("masking.max_text_length must be > 0".to_string());
        }
        if self.default_language.trim().is_empty() {
            return Err("masking.default_language cannot be empty".to_string());
        }
        self.audit.validate()
    }

    /// Apply `SCRUBBER_MASKING_*` overrides, reading variables with `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("SCRUBBER_MASKING_DEFAULT_POLICY") {
            self.default_policy = val.parse().map_err(|_| {
                ScrubError::Configuration(format!(
                    "Invalid SCRUBBER_MASKING_DEFAULT_POLICY: {val}"
                ))
            })?;
        }

        if let Some(val) = lookup("SCRUBBER_MASKING_DEFAULT_LANGUAGE") {
            self.default_language = val;
        }

        if let Some(val) = lookup("SCRUBBER_MASKING_MAX_TEXT_LENGTH") {
            self.max_text_length = val.trim().parse().map_err(|_| {
                ScrubError::Configuration(format!(
                    "Invalid SCRUBBER_MASKING_MAX_TEXT_LENGTH: {val}"
                ))
            })?;
        }

        self.audit.apply_overrides(lookup)
    }
}

/// Audit logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Use JSON format for audit logs
    #[serde(default = "default_audit_json_format")]
    pub json_format: bool,
}

fn default_language() -> String {
    "auto".to_string()
}

fn default_max_text_length() -> usize {
    // Per-document limit of the language service's synchronous PII endpoint
    5120
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/masking.log")
}

fn default_audit_json_format() -> bool {
    true
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: default_audit_json_format(),
        }
    }
}

impl AuditConfig {
    /// Validate audit configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            return Err("masking.audit.log_path cannot be empty when audit is enabled".to_string());
        }
        Ok(())
    }

    /// Apply `SCRUBBER_MASKING_AUDIT_*` overrides, reading variables with `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("SCRUBBER_MASKING_AUDIT_ENABLED") {
            self.enabled = val.trim().parse().map_err(|_| {
                ScrubError::Configuration(format!("Invalid SCRUBBER_MASKING_AUDIT_ENABLED: {val}"))
            })?;
        }

        if let Some(val) = lookup("SCRUBBER_MASKING_AUDIT_LOG_PATH") {
            self.log_path = PathBuf::from(val);
        }

        if let Some(val) = lookup("SCRUBBER_MASKING_AUDIT_JSON_FORMAT") {
            self.json_format = val.trim().parse().map_err(|_| {
                ScrubError::Configuration(format!(
                    "Invalid SCRUBBER_MASKING_AUDIT_JSON_FORMAT: {val}"
                ))
            })?;
        }

        Ok(())
    }
}
