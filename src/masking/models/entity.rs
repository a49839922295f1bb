//! Entity, span and response data models

use serde::{Deserialize, Serialize};

/// Sensitive entity as reported by the external detector
///
/// Offsets are signed so that a misbehaving detector's negative values can be
/// represented and dropped by the normalizer instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Category label (e.g. "PhoneNumber", "Person")
    pub category: String,
    /// Start position in the original text, in detector units
    pub offset: i64,
    /// Number of units covered
    pub length: i64,
    /// Snippet the detector believed it matched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Detector subcategory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    /// Confidence score (0.0 - 1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
}

impl Entity {
    /// Create a new entity without snippet or score
    pub fn new(category: impl Into<String>, offset: i64, length: i64) -> Self {
        Self {
            category: category.into(),
            offset,
            length,
            text: None,
            subcategory: None,
            confidence_score: None,
        }
    }

    /// Attach the snippet the detector matched
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Attach a confidence score
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence_score = Some(confidence.clamp(0.0, 1.0));
        self
    }
}

/// Entity confirmed valid and placed in a conflict-free ordered sequence
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedEntity {
    pub category: String,
    pub offset: usize,
    pub length: usize,
    pub subcategory: Option<String>,
    pub confidence_score: Option<f64>,
}

impl NormalizedEntity {
    /// Exclusive end position in the original text
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

impl From<&NormalizedEntity> for Entity {
    fn from(entity: &NormalizedEntity) -> Self {
        Self {
            category: entity.category.clone(),
            offset: entity.offset as i64,
            length: entity.length as i64,
            text: None,
            subcategory: entity.subcategory.clone(),
            confidence_score: entity.confidence_score,
        }
    }
}

/// Half-open `[start, end)` range in the anonymized text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Normalized entity echoed back to the caller
///
/// Carries original offsets and metadata only, never the snippet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityEcho {
    pub category: String,
    pub offset: usize,
    pub length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
}

impl From<&NormalizedEntity> for EntityEcho {
    fn from(entity: &NormalizedEntity) -> Self {
        Self {
            category: entity.category.clone(),
            offset: entity.offset,
            length: entity.length,
            subcategory: entity.subcategory.clone(),
            confidence_score: entity.confidence_score,
        }
    }
}

/// Counters collected while normalizing one entity list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizationStats {
    /// Entities supplied by the detector
    pub received: usize,
    /// Entities that survived normalization
    pub kept: usize,
    /// Entities dropped as malformed
    pub malformed: usize,
    /// Entities dropped because they overlapped a kept entity
    pub overlapping: usize,
}

/// Result of one detection call
///
/// `unreadable` counts detector entries that could not be decoded as an
/// [`Entity`] at all. They are reported as malformed alongside the entities
/// the normalizer drops.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detection {
    pub entities: Vec<Entity>,
    pub unreadable: usize,
}

impl Detection {
    pub fn new(entities: Vec<Entity>, unreadable: usize) -> Self {
        Self {
            entities,
            unreadable,
        }
    }
}

impl From<Vec<Entity>> for Detection {
    fn from(entities: Vec<Entity>) -> Self {
        Self::new(entities, 0)
    }
}

/// Response body of a masking request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskingOutcome {
    /// Text with every kept entity replaced
    pub anonymized: String,
    /// Location of each replacement in `anonymized`
    pub spans: Vec<Span>,
    /// The kept entities, in the same order as `spans`
    pub entities: Vec<EntityEcho>,
    #[serde(skip)]
    pub stats: NormalizationStats,
}

impl MaskingOutcome {
    /// Outcome for a text that needs no masking
    pub fn unchanged(text: &str) -> Self {
        Self {
            anonymized: text.to_string(),
            spans: Vec::new(),
            entities: Vec::new(),
            stats: NormalizationStats::default(),
        }
    }

    /// Check if anything was masked
    pub fn has_replacements(&self) -> bool {
        !self.spans.is_empty()
    }
}
