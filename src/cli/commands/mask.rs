//! Mask command implementation
//!
//! Masks one text and prints the response JSON on stdout. With `--entities`
//! the entity list is read from a file and no detection call is made.

use crate::adapters::language::StaticEntitySource;
use crate::config::{load_config_or_env, ScrubberConfig};
use crate::core::{SanitizeRequest, ScrubService};
use crate::domain::{Result, ScrubError};
use crate::masking::{Entity, MaskingEngine, OffsetUnit};
use clap::Args;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Arguments for the mask command
#[derive(Args, Debug)]
pub struct MaskArgs {
    /// File containing the text (stdin when omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// JSON file with the entities to mask (skips detection)
    #[arg(short, long)]
    pub entities: Option<PathBuf>,

    /// Masking policy (redact, pseudo, hash)
    #[arg(short, long)]
    pub policy: Option<String>,

    /// Language code, or "auto"
    #[arg(long)]
    pub language: Option<String>,

    /// Offset unit of the entities and spans (utf16, codepoint)
    #[arg(long)]
    pub index_type: Option<String>,
}

/// Accepted layouts of an entities file
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EntitiesFile {
    List(Vec<Entity>),
    Wrapped { entities: Vec<Entity> },
}

impl EntitiesFile {
    fn into_entities(self) -> Vec<Entity> {
        match self {
            EntitiesFile::List(entities) | EntitiesFile::Wrapped { entities } => entities,
        }
    }
}

impl MaskArgs {
    /// Execute the mask command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let mut config = match load_config_or_env(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ Failed to load configuration: {e}");
                return Ok(e.exit_code());
            }
        };

        let outcome = match self.run(&mut config).await {
            Ok(outcome) => outcome,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(e.exit_code());
            }
        };

        println!("{}", serde_json::to_string_pretty(&outcome)?);
        Ok(0)
    }

    async fn run(&self, config: &mut ScrubberConfig) -> Result<crate::masking::MaskingOutcome> {
        if let Some(ref index_type) = self.index_type {
            config.language.string_index_type = OffsetUnit::from_str(index_type)?;
        }

        let text = self.read_text()?;
        let service = self.build_service(config)?;

        let request = SanitizeRequest {
            text,
            policy: self.policy.clone(),
            language: self.language.clone(),
        };
        service.sanitize(&request).await
    }

    fn build_service(&self, config: &ScrubberConfig) -> Result<ScrubService> {
        let Some(ref path) = self.entities else {
            return ScrubService::from_config(config);
        };

        let entities = read_entities(path)?;
        let unit = config.language.string_index_type;
        tracing::debug!(count = entities.len(), unit = %unit, "Using entities from file");

        ScrubService::new(
            MaskingEngine::new(config.masking.clone(), unit)?,
            Arc::new(StaticEntitySource::new(entities, unit)),
            Duration::from_secs(config.server.request_timeout_seconds),
        )
    }

    fn read_text(&self) -> Result<String> {
        match self.input {
            Some(ref path) => std::fs::read_to_string(path).map_err(|e| {
                ScrubError::InvalidInput(format!("Cannot read input {}: {e}", path.display()))
            }),
            None => std::io::read_to_string(std::io::stdin())
                .map_err(|e| ScrubError::InvalidInput(format!("Cannot read stdin: {e}"))),
        }
    }
}

fn read_entities(path: &Path) -> Result<Vec<Entity>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        ScrubError::InvalidInput(format!("Cannot read entities {}: {e}", path.display()))
    })?;

    serde_json::from_str::<EntitiesFile>(&contents)
        .map(EntitiesFile::into_entities)
        .map_err(|e| {
            ScrubError::InvalidInput(format!("Invalid entities file {}: {e}", path.display()))
        })
}
