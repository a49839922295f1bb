//! Text reconstruction and span remapping
//!
//! Walks the original text once, copying unchanged chunks and splicing in a
//! replacement for every normalized entity. Output spans are measured in the
//! same unit as the input offsets.

use super::models::{NormalizedEntity, Span};
use super::offsets::TextIndex;
use super::policy::MaskingPolicy;

/// Anonymized text and the location of every replacement in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconstruction {
    pub anonymized: String,
    pub spans: Vec<Span>,
}

/// Rebuild the text of `index` with each entity replaced according to `policy`
///
/// `entities` must come from [`normalize`](super::normalizer::normalize) on
/// the same index. An entity that is out of order or does not land on
/// character boundaries is skipped.
pub fn reconstruct(
    index: &TextIndex<'_>,
    entities: &[NormalizedEntity],
    policy: MaskingPolicy,
) -> Reconstruction {
    let text = index.text();
    let unit = index.unit();

    let mut anonymized = String::with_capacity(text.len());
    let mut spans = Vec::with_capacity(entities.len());
    let mut output_len = 0;
    let mut cursor = 0;
    let mut cursor_byte = 0;

    for entity in entities {
        let bytes = index
            .byte_offset(entity.offset)
            .zip(index.byte_offset(entity.end()));
        let (start_byte, end_byte) = match bytes {
            Some(range) if entity.offset >= cursor => range,
            _ => {
                tracing::error!(
                    category = %entity.category,
                    offset = entity.offset,
                    length = entity.length,
                    cursor,
                    "Skipping entity that is not normalized against this text"
                );
                continue;
            }
        };

        anonymized.push_str(&text[cursor_byte..start_byte]);
        output_len += entity.offset - cursor;

        let replacement = policy.replacement(entity, &text[start_byte..end_byte]);
        let start = output_len;
        anonymized.push_str(&replacement);
        output_len += unit.measure(&replacement);
        spans.push(Span::new(start, output_len));

        cursor = entity.end();
        cursor_byte = end_byte;
    }

    anonymized.push_str(&text[cursor_byte..]);

    Reconstruction { anonymized, spans }
}
