//! Entity detection adapters
//!
//! The masking core never talks to the network. It is handed entities by an
//! [`EntitySource`]: the language service client in production, or a fixed
//! list for offline masking and tests.

pub mod client;
pub mod models;

pub use client::LanguageClient;

use crate::domain::Result;
use crate::masking::{Detection, Entity, OffsetUnit};
use async_trait::async_trait;

/// Source of sensitive entities for a text
///
/// Implementations may return zero entities, and may return entities the
/// normalizer will drop. Entries that cannot be decoded at all are counted in
/// [`Detection::unreadable`]. A failed detection is an error, never an empty
/// list.
#[async_trait]
pub trait EntitySource: Send + Sync {
    /// Detect entities in `text`
    ///
    /// `language` is an ISO language code, or `None` to let the source
    /// detect the language.
    async fn detect(&self, text: &str, language: Option<&str>) -> Result<Detection>;

    /// Unit the returned offsets are expressed in
    fn offset_unit(&self) -> OffsetUnit;
}

/// Entity source returning a fixed list regardless of the text
#[derive(Debug, Clone)]
pub struct StaticEntitySource {
    entities: Vec<Entity>,
    unit: OffsetUnit,
}

impl StaticEntitySource {
    pub fn new(entities: Vec<Entity>, unit: OffsetUnit) -> Self {
        Self { entities, unit }
    }
}

#[async_trait]
impl EntitySource for StaticEntitySource {
    async fn detect(&self, _text: &str, _language: Option<&str>) -> Result<Detection> {
        Ok(Detection::from(self.entities.clone()))
    }

    fn offset_unit(&self) -> OffsetUnit {
        self.unit
    }
}
