//! Masking module for Scrubber
//!
//! This module turns a text and the sensitive entities an external detector
//! found in it into an anonymized text plus the location of every replacement.
//!
//! # Architecture
//!
//! The masking pipeline consists of:
//! - **Offsets**: mapping detector units (UTF-16 code units or code points) to bytes
//! - **Normalization**: dropping malformed entities and resolving overlaps
//! - **Replacement**: redact, pseudo and hash policies
//! - **Reconstruction**: single-pass splicing with span remapping
//! - **Audit**: structured logging with hashed snippets
//!
//! # Usage
//!
//! ```rust,ignore
//! use scrubber::masking::{MaskingConfig, MaskingEngine, MaskingPolicy, OffsetUnit};
//!
//! let engine = MaskingEngine::new(MaskingConfig::default(), OffsetUnit::Utf16CodeUnit)?;
//! let outcome = engine.mask(text, &entities, MaskingPolicy::Pseudo)?;
//! ```

pub mod audit;
pub mod config;
pub mod engine;
pub mod models;
pub mod normalizer;
pub mod offsets;
pub mod policy;
pub mod reconstructor;
pub mod replacement;

// Re-export main types
pub use config::{AuditConfig, MaskingConfig};
pub use engine::{mask_text, MaskingEngine};
pub use models::{
    Detection, Entity, EntityEcho, MaskingOutcome, NormalizationStats, NormalizedEntity, Span,
};
pub use offsets::{OffsetUnit, TextIndex};
pub use policy::MaskingPolicy;
