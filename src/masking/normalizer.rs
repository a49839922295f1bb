//! Entity normalization
//!
//! Turns an arbitrary detector result (unsorted, overlapping, possibly
//! malformed) into a strictly increasing, non-overlapping sequence.
//!
//! 1. Malformed entities are dropped and logged; one bad detector result never
//!    fails the request.
//! 2. Survivors are sorted by offset, longer entity first on ties.
//! 3. A greedy sweep keeps an entity only if it starts at or after the end of
//!    the last kept one.

use super::models::{Entity, NormalizationStats, NormalizedEntity};
use super::offsets::TextIndex;
use std::fmt;

/// Reason an entity was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// `offset < 0`
    NegativeOffset,
    /// `length <= 0`
    NonPositiveLength,
    /// `offset + length` exceeds the text length
    OutOfBounds,
    /// A boundary falls inside a character (half of a surrogate pair)
    SplitsCharacter,
    /// Intersects an entity that was already kept
    Overlap,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NegativeOffset => "negative_offset",
            Self::NonPositiveLength => "non_positive_length",
            Self::OutOfBounds => "out_of_bounds",
            Self::SplitsCharacter => "splits_character",
            Self::Overlap => "overlap",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of normalizing one entity list
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub entities: Vec<NormalizedEntity>,
    pub stats: NormalizationStats,
}

/// Normalize `entities` against `index`
///
/// Pure apart from logging. Running it on its own output yields the same
/// sequence.
pub fn normalize(index: &TextIndex<'_>, entities: &[Entity]) -> Normalized {
    let mut stats = NormalizationStats {
        received: entities.len(),
        ..Default::default()
    };

    let mut candidates = Vec::with_capacity(entities.len());
    for entity in entities {
        match validate(index, entity) {
            Ok(valid) => candidates.push(valid),
            Err(reason) => {
                stats.malformed += 1;
                tracing::warn!(
                    category = %entity.category,
                    offset = entity.offset,
                    length = entity.length,
                    text_length = index.len(),
                    reason = %reason,
                    "Dropping malformed entity"
                );
            }
        }
    }

    // Stable: equal (offset, length) keep detector order
    candidates.sort_by(|a: &NormalizedEntity, b: &NormalizedEntity| {
        a.offset.cmp(&b.offset).then(b.length.cmp(&a.length))
    });

    let mut kept: Vec<NormalizedEntity> = Vec::with_capacity(candidates.len());
    let mut frontier = 0;
    for candidate in candidates {
        if candidate.offset < frontier {
            stats.overlapping += 1;
            tracing::debug!(
                category = %candidate.category,
                offset = candidate.offset,
                length = candidate.length,
                reason = %Rejection::Overlap,
                "Dropping overlapping entity"
            );
            continue;
        }
        frontier = candidate.end();
        kept.push(candidate);
    }

    stats.kept = kept.len();
    Normalized {
        entities: kept,
        stats,
    }
}

/// Check a single entity against the text
pub fn validate(
    index: &TextIndex<'_>,
    entity: &Entity,
) -> std::result::Result<NormalizedEntity, Rejection> {
    if entity.offset < 0 {
        return Err(Rejection::NegativeOffset);
    }
    if entity.length <= 0 {
        return Err(Rejection::NonPositiveLength);
    }

    let offset = usize::try_from(entity.offset).map_err(|_| Rejection::OutOfBounds)?;
    let length = usize::try_from(entity.length).map_err(|_| Rejection::OutOfBounds)?;
    let end = offset.checked_add(length).ok_or(Rejection::OutOfBounds)?;
    if end > index.len() {
        return Err(Rejection::OutOfBounds);
    }

    let snippet = index
        .slice(offset, end)
        .ok_or(Rejection::SplitsCharacter)?;

    if let Some(ref reported) = entity.text {
        if reported != snippet {
            // Usually means the detector counted in a different unit
            tracing::warn!(
                category = %entity.category,
                offset,
                length,
                unit = %index.unit(),
                "Entity text does not match the text at its offsets"
            );
        }
    }

    Ok(NormalizedEntity {
        category: entity.category.clone(),
        offset,
        length,
        subcategory: entity.subcategory.clone(),
        confidence_score: entity.confidence_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::masking::offsets::OffsetUnit;

    fn index(text: &str) -> TextIndex<'_> {
        TextIndex::new(text, OffsetUnit::Utf16CodeUnit)
    }

    fn ranges(normalized: &Normalized) -> Vec<(usize, usize)> {
        normalized
            .entities
            .iter()
            .map(|e| (e.offset, e.length))
            .collect()
    }

    #[test]
    fn test_sorts_by_offset() {
        let text = "Alice met Bob in Paris";
        let entities = vec![
            Entity::new("Location", 17, 5),
            Entity::new("Person", 0, 5),
            Entity::new("Person", 10, 3),
        ];

        let normalized = normalize(&index(text), &entities);
        assert_eq!(ranges(&normalized), vec![(0, 5), (10, 3), (17, 5)]);
        assert_eq!(normalized.stats.kept, 3);
    }

    #[test]
    fn test_same_offset_longer_wins() {
        let text = "Call 0601020304 now";
        let entities = vec![
            Entity::new("Quantity", 5, 4),
            Entity::new("PhoneNumber", 5, 10),
        ];

        let normalized = normalize(&index(text), &entities);
        assert_eq!(normalized.entities.len(), 1);
        assert_eq!(normalized.entities[0].category, "PhoneNumber");
        assert_eq!(normalized.stats.overlapping, 1);
    }

    #[test]
    fn test_partial_overlap_keeps_first() {
        let text = "John Smith Jones";
        let entities = vec![Entity::new("Person", 5, 11), Entity::new("Person", 0, 10)];

        let normalized = normalize(&index(text), &entities);
        assert_eq!(ranges(&normalized), vec![(0, 10)]);
    }

    #[test]
    fn test_adjacent_entities_both_kept() {
        let text = "JohnSmith";
        let entities = vec![Entity::new("Person", 0, 4), Entity::new("Person", 4, 5)];

        let normalized = normalize(&index(text), &entities);
        assert_eq!(ranges(&normalized), vec![(0, 4), (4, 5)]);
    }

    #[test]
    fn test_nested_entity_dropped() {
        let text = "Contact 10 Downing Street today";
        let entities = vec![
            Entity::new("Address", 8, 17),
            Entity::new("Quantity", 8, 2),
            Entity::new("Location", 11, 7),
        ];

        let normalized = normalize(&index(text), &entities);
        assert_eq!(ranges(&normalized), vec![(8, 17)]);
        assert_eq!(normalized.stats.overlapping, 2);
    }

    #[test]
    fn test_malformed_entities_dropped() {
        let text = "short";
        let entities = vec![
            Entity::new("Person", -1, 3),
            Entity::new("Person", 0, 0),
            Entity::new("Person", 0, -2),
            Entity::new("Person", 3, 3),
            Entity::new("Person", i64::MAX, i64::MAX),
            Entity::new("Person", 0, 5),
        ];

        let normalized = normalize(&index(text), &entities);
        assert_eq!(ranges(&normalized), vec![(0, 5)]);
        assert_eq!(normalized.stats.received, 6);
        assert_eq!(normalized.stats.malformed, 5);
        assert_eq!(normalized.stats.kept, 1);
    }

    #[test]
    fn test_rejection_reasons() {
        let idx = index("abc");
        assert_eq!(
            validate(&idx, &Entity::new("X", -1, 1)),
            Err(Rejection::NegativeOffset)
        );
        assert_eq!(
            validate(&idx, &Entity::new("X", 0, 0)),
            Err(Rejection::NonPositiveLength)
        );
        assert_eq!(
            validate(&idx, &Entity::new("X", 2, 2)),
            Err(Rejection::OutOfBounds)
        );
        assert!(validate(&idx, &Entity::new("X", 2, 1)).is_ok());
    }

    #[test]
    fn test_entity_ending_at_text_end_is_valid() {
        let text = "Call 0601020304";
        let normalized = normalize(&index(text), &[Entity::new("PhoneNumber", 5, 10)]);
        assert_eq!(ranges(&normalized), vec![(5, 10)]);
    }

    #[test]
    fn test_entity_splitting_surrogate_pair_dropped() {
        // "😀" occupies UTF-16 units 3 and 4
        let text = "Hi 😀 Bob";
        let idx = index(text);
        assert_eq!(
            validate(&idx, &Entity::new("Emoji", 4, 2)),
            Err(Rejection::SplitsCharacter)
        );
        assert!(validate(&idx, &Entity::new("Person", 6, 3)).is_ok());
    }

    #[test]
    fn test_snippet_mismatch_is_kept() {
        let text = "Call 0601020304 now";
        let entity = Entity::new("PhoneNumber", 5, 10).with_text("something else");
        let normalized = normalize(&index(text), &[entity]);
        assert_eq!(normalized.entities.len(), 1);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let text = "Alice and Bob live at 221B Baker Street";
        let entities = vec![
            Entity::new("Address", 22, 17),
            Entity::new("Person", 10, 3),
            Entity::new("Person", 0, 5),
            Entity::new("Quantity", 22, 4),
            Entity::new("Person", 0, 3),
        ];
        let idx = index(text);

        let first = normalize(&idx, &entities);
        let round_trip: Vec<Entity> = first.entities.iter().map(Entity::from).collect();
        let second = normalize(&idx, &round_trip);

        assert_eq!(first.entities, second.entities);
        assert_eq!(second.stats.overlapping, 0);
        assert_eq!(second.stats.malformed, 0);
    }

    #[test]
    fn test_empty_input() {
        let normalized = normalize(&index("anything"), &[]);
        assert!(normalized.entities.is_empty());
        assert_eq!(normalized.stats, NormalizationStats::default());
    }
}
