//! Validate config command implementation
//!
//! Loads and validates the configuration file, then prints a summary. The
//! subscription key is reported as set or not set, never printed.

use crate::config::{load_config, ScrubberConfig};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        for line in summary(&config) {
            println!("{line}");
        }

        if let Err(e) = config.require_detector() {
            println!();
            println!("⚠️  {e}");
            println!("   The service cannot start until the language service is configured.");
        }

        Ok(0)
    }
}

fn summary(config: &ScrubberConfig) -> Vec<String> {
    let endpoint = if config.language.endpoint.is_empty() {
        "(not set)"
    } else {
        config.language.endpoint.as_str()
    };
    let key = if config.language.key.is_some() {
        "set"
    } else {
        "not set"
    };

    let mut lines = vec![
        "Configuration Summary:".to_string(),
        format!("  Log Level: {}", config.application.log_level),
        format!("  Listen Address: {}", config.server.bind_address()),
        format!(
            "  Request Timeout: {}s",
            config.server.request_timeout_seconds
        ),
        format!("  Language Endpoint: {endpoint}"),
        format!("  Language Key: {key}"),
        format!("  API Version: {}", config.language.api_version),
        format!("  String Index Type: {}", config.language.string_index_type),
        format!("  Max Retries: {}", config.language.retry.max_retries),
        format!("  Default Policy: {}", config.masking.default_policy),
        format!("  Default Language: {}", config.masking.default_language),
        format!("  Max Text Length: {}", config.masking.max_text_length),
    ];

    if config.masking.audit.enabled {
        lines.push(format!(
            "  Audit Log: {}",
            config.masking.audit.log_path.display()
        ));
    } else {
        lines.push("  Audit Log: disabled".to_string());
    }

    if config.logging.local_enabled {
        lines.push(format!(
            "  File Logging: {} ({})",
            config.logging.local_path, config.logging.local_rotation
        ));
    } else {
        lines.push("  File Logging: disabled".to_string());
    }

    lines
}
