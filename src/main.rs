// Scrubber - PII masking service
// Copyright (c) 2025 Scrubber Contributors
// Licensed under the MIT License

use clap::Parser;
use scrubber::cli::{Cli, Commands};
use scrubber::config::{load_config_or_env, LoggingConfig};
use scrubber::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let (log_level, logging_config) = logging_setup(&cli);
    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    // Flush file logs before exiting
    drop(guard);
    process::exit(exit_code);
}

/// Log level and sinks for the command
///
/// Only `serve` writes log files; other commands log to the console.
fn logging_setup(cli: &Cli) -> (String, LoggingConfig) {
    let config = match cli.command {
        Commands::Serve(_) => load_config_or_env(&cli.config).ok(),
        _ => None,
    };

    let log_level = cli
        .log_level
        .clone()
        .or_else(|| config.as_ref().map(|c| c.application.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());

    let logging_config = config
        .map(|c| c.logging)
        .unwrap_or_else(LoggingConfig::console);

    (log_level, logging_config)
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Serve(args) => args.execute(&cli.config).await,
        Commands::Mask(args) => args.execute(&cli.config).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
