//! Data models for the masking pipeline

pub mod entity;

pub use entity::{
    Detection, Entity, EntityEcho, MaskingOutcome, NormalizationStats, NormalizedEntity, Span,
};
