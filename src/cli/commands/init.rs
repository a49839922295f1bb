//! Init command implementation
//!
//! Writes a sample configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "scrubber.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, sample_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Set LANGUAGE_ENDPOINT and LANGUAGE_KEY (or put them in .env)");
                println!("  2. Validate configuration: scrubber validate-config");
                println!("  3. Start the service: scrubber serve");
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }
}

/// Sample configuration with every section and its defaults
pub fn sample_config() -> &'static str {
    r#"# Scrubber Configuration File
# PII masking service backed by Azure AI Language

[application]
log_level = "info"  # trace | debug | info | warn | error

[server]
host = "127.0.0.1"
port = 3000
request_timeout_seconds = 30

[language]
endpoint = "${LANGUAGE_ENDPOINT}"
key = "${LANGUAGE_KEY}"
api_version = "v3.1"
# Offsets reported by the service, and used for output spans
string_index_type = "Utf16CodeUnit"  # Utf16CodeUnit | UnicodeCodePoint
timeout_seconds = 15

[language.retry]
max_retries = 2
initial_delay_ms = 250
max_delay_ms = 4000
backoff_multiplier = 2.0

[masking]
default_policy = "redact"  # redact | pseudo | hash
default_language = "auto"
max_text_length = 5120

[masking.audit]
enabled = false
log_path = "./audit/masking.log"
json_format = true

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"  # daily | hourly | never
"#
}
