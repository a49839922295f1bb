//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Scrubber using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Scrubber - PII masking service
#[derive(Parser, Debug)]
#[command(name = "scrubber")]
#[command(version, about, long_about = None)]
#[command(author = "Scrubber Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "scrubber.toml", env = "SCRUBBER_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SCRUBBER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP masking service
    Serve(commands::serve::ServeArgs),

    /// Mask a text from a file or stdin and print the result as JSON
    Mask(commands::mask::MaskArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
