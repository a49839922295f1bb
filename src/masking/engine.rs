//! Main masking engine
//!
//! This module provides the [`MaskingEngine`] that runs the masking pipeline
//! for one text and its detector entities:
//!
//! - **Normalizer**: validates, sorts and de-overlaps the entities
//! - **Replacement generator**: computes the policy replacement per entity
//! - **Reconstructor**: splices the output text and remaps spans
//!
//! and optionally records each request in the audit log.
//!
//! # Examples
//!
//! ```
//! use scrubber::masking::{mask_text, Entity, MaskingPolicy, OffsetUnit};
//!
//! let entities = vec![Entity::new("PhoneNumber", 5, 10)];
//! let outcome = mask_text(
//!     "Call 0601020304 now",
//!     &entities,
//!     MaskingPolicy::Pseudo,
//!     OffsetUnit::Utf16CodeUnit,
//! );
//!
//! assert_eq!(outcome.anonymized, "Call [PhoneNumber] now");
//! assert_eq!((outcome.spans[0].start, outcome.spans[0].end), (5, 18));
//! ```

use crate::domain::{Result, ScrubError};
use crate::masking::{
    audit::{AuditEntity, AuditLogger, MaskingAuditEvent},
    config::MaskingConfig,
    models::{Detection, Entity, EntityEcho, MaskingOutcome},
    normalizer::{normalize, Normalized},
    offsets::{OffsetUnit, TextIndex},
    policy::MaskingPolicy,
    reconstructor::{reconstruct, Reconstruction},
};
use std::time::Instant;
use uuid::Uuid;

/// Mask `text` without validation or auditing
///
/// Pure function of its inputs: no I/O, no shared state.
pub fn mask_text(
    text: &str,
    entities: &[Entity],
    policy: MaskingPolicy,
    unit: OffsetUnit,
) -> MaskingOutcome {
    if text.is_empty() {
        return MaskingOutcome::unchanged(text);
    }
    let index = TextIndex::new(text, unit);
    let (normalized, reconstruction) = run_pipeline(&index, entities, policy);
    into_outcome(normalized, reconstruction)
}

fn run_pipeline(
    index: &TextIndex<'_>,
    entities: &[Entity],
    policy: MaskingPolicy,
) -> (Normalized, Reconstruction) {
    let normalized = normalize(index, entities);
    let reconstruction = reconstruct(index, &normalized.entities, policy);
    (normalized, reconstruction)
}

fn into_outcome(normalized: Normalized, reconstruction: Reconstruction) -> MaskingOutcome {
    MaskingOutcome {
        anonymized: reconstruction.anonymized,
        spans: reconstruction.spans,
        entities: normalized.entities.iter().map(EntityEcho::from).collect(),
        stats: normalized.stats,
    }
}

/// Masking engine
///
/// Holds no per-request state and can be shared across tasks using `Arc`.
pub struct MaskingEngine {
    config: MaskingConfig,
    unit: OffsetUnit,
    audit_logger: Option<AuditLogger>,
}

impl MaskingEngine {
    /// Create a new masking engine
    ///
    /// `unit` must be the indexing unit the entity source reports offsets in.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the audit log
    /// directory cannot be created.
    pub fn new(config: MaskingConfig, unit: OffsetUnit) -> Result<Self> {
        config.validate().map_err(|e| {
            ScrubError::Configuration(format!("Invalid masking configuration: {e}"))
        })?;

        let audit_logger = if config.audit.enabled {
            Some(AuditLogger::new(
                config.audit.log_path.clone(),
                config.audit.json_format,
                true,
            )?)
        } else {
            None
        };

        Ok(Self {
            config,
            unit,
            audit_logger,
        })
    }

    /// Masking configuration
    pub fn config(&self) -> &MaskingConfig {
        &self.config
    }

    /// Offset unit used for entities and spans
    pub fn offset_unit(&self) -> OffsetUnit {
        self.unit
    }

    /// Reject blank or oversized text before any detection happens
    pub fn validate_text(&self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(ScrubError::InvalidInput(
                "Missing or empty 'text'.".to_string(),
            ));
        }

        let length = self.unit.measure(text);
        if length > self.config.max_text_length {
            return Err(ScrubError::InvalidInput(format!(
                "'text' is {length} units long; the maximum is {}",
                self.config.max_text_length
            )));
        }

        Ok(())
    }

    /// Mask `text` using `entities`, under a fresh request id
    pub fn mask(
        &self,
        text: &str,
        entities: &[Entity],
        policy: MaskingPolicy,
    ) -> Result<MaskingOutcome> {
        self.mask_with_id(&Uuid::new_v4().to_string(), text, entities, policy)
    }

    /// Mask `text` using `entities`
    ///
    /// An empty text is returned unchanged without running the pipeline.
    ///
    /// # Errors
    ///
    /// Only fails if the audit log cannot be written.
    pub fn mask_with_id(
        &self,
        request_id: &str,
        text: &str,
        entities: &[Entity],
        policy: MaskingPolicy,
    ) -> Result<MaskingOutcome> {
        self.mask_entities(request_id, text, entities, 0, policy)
    }

    /// Mask `text` using the result of a detection call
    ///
    /// Unreadable detector entries count as received and malformed.
    pub fn mask_detection(
        &self,
        request_id: &str,
        text: &str,
        detection: &Detection,
        policy: MaskingPolicy,
    ) -> Result<MaskingOutcome> {
        self.mask_entities(
            request_id,
            text,
            &detection.entities,
            detection.unreadable,
            policy,
        )
    }

    fn mask_entities(
        &self,
        request_id: &str,
        text: &str,
        entities: &[Entity],
        unreadable: usize,
        policy: MaskingPolicy,
    ) -> Result<MaskingOutcome> {
        if text.is_empty() {
            return Ok(MaskingOutcome::unchanged(text));
        }

        let start = Instant::now();
        let index = TextIndex::new(text, self.unit);
        let (mut normalized, reconstruction) = run_pipeline(&index, entities, policy);
        normalized.stats.received += unreadable;
        normalized.stats.malformed += unreadable;
        let processing_time_us = start.elapsed().as_micros() as u64;

        tracing::info!(
            request_id = %request_id,
            policy = %policy,
            received = normalized.stats.received,
            masked = normalized.stats.kept,
            malformed = normalized.stats.malformed,
            overlapping = normalized.stats.overlapping,
            processing_time_us,
            "Masked text"
        );

        if let Some(ref logger) = self.audit_logger {
            let audit_entities = normalized
                .entities
                .iter()
                .map(|e| AuditEntity::new(e, index.slice(e.offset, e.end()).unwrap_or_default()))
                .collect();

            logger.log_masking(&MaskingAuditEvent {
                request_id: request_id.to_string(),
                policy,
                unit: self.unit,
                stats: normalized.stats,
                processing_time_us,
                entities: audit_entities,
            })?;
        }

        Ok(into_outcome(normalized, reconstruction))
    }
}
