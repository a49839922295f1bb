//! Serve command implementation

use crate::config::load_config_or_env;
use crate::core::ScrubService;
use crate::server::{self, AppState};
use clap::Args;
use std::sync::Arc;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Bind address (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (overrides server.port)
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let mut config = match load_config_or_env(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ Failed to load configuration: {e}");
                return Ok(e.exit_code());
            }
        };

        if let Some(ref host) = self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }

        let service = match ScrubService::from_config(&config) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("❌ Cannot start service: {e}");
                return Ok(e.exit_code());
            }
        };

        tracing::info!(
            version = env!("CARGO_PKG_VERSION"),
            default_policy = %config.masking.default_policy,
            string_index_type = %config.language.string_index_type,
            audit = config.masking.audit.enabled,
            "Starting Scrubber service"
        );

        let state = Arc::new(AppState::new(service));
        match server::serve(&config.server, state).await {
            Ok(()) => Ok(0),
            Err(e) => {
                eprintln!("❌ {e}");
                Ok(e.exit_code())
            }
        }
    }
}
