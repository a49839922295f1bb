//! Language service API models
//!
//! Request and response bodies of the PII entity recognition endpoint. These
//! are kept apart from the masking models; only [`Entity`] is shared because
//! the service reports entities in exactly that shape.
//!
//! Entities are decoded one by one so that a single unreadable entry does
//! not fail the whole response.

use crate::masking::{Detection, Entity};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Id given to the single document sent per request
pub const DOCUMENT_ID: &str = "1";

/// Request body
#[derive(Debug, Clone, Serialize)]
pub struct PiiRequest {
    pub documents: Vec<Document>,
}

impl PiiRequest {
    /// Request for one text, with an optional language code
    ///
    /// When `language` is `None` the field is omitted and the service
    /// detects the language itself.
    pub fn single(text: &str, language: Option<&str>) -> Self {
        Self {
            documents: vec![Document {
                id: DOCUMENT_ID.to_string(),
                text: text.to_string(),
                language: language.map(str::to_string),
            }],
        }
    }
}

/// One input document
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Response body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PiiResponse {
    #[serde(default)]
    pub documents: Vec<DocumentResult>,
    #[serde(default)]
    pub errors: Vec<DocumentError>,
    #[serde(default)]
    pub model_version: Option<String>,
}

/// Per-document result
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResult {
    pub id: String,
    #[serde(default)]
    pub entities: Vec<Value>,
    #[serde(default)]
    pub warnings: Vec<Value>,
}

impl DocumentResult {
    /// Decode the reported entities, skipping entries that are not entities
    pub fn into_detection(self) -> Detection {
        let mut entities = Vec::with_capacity(self.entities.len());
        let mut unreadable = 0;

        for (index, value) in self.entities.into_iter().enumerate() {
            match decode_entity(value) {
                Ok(entity) => entities.push(entity),
                Err(reason) => {
                    unreadable += 1;
                    tracing::warn!(index, reason, "Dropping unreadable entity");
                }
            }
        }

        Detection::new(entities, unreadable)
    }
}

/// Decode one entity
///
/// The error is a fixed reason string; it never includes field values, which
/// may hold snippets of the submitted text.
fn decode_entity(value: Value) -> std::result::Result<Entity, &'static str> {
    let Some(fields) = value.as_object() else {
        return Err("not an object");
    };
    if !fields.get("category").is_some_and(Value::is_string) {
        return Err("missing or invalid 'category'");
    }
    if !fields.get("offset").is_some_and(Value::is_i64) {
        return Err("missing or invalid 'offset'");
    }
    if !fields.get("length").is_some_and(Value::is_i64) {
        return Err("missing or invalid 'length'");
    }

    serde_json::from_value(value).map_err(|_| "invalid optional field")
}

/// Per-document failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentError {
    pub id: String,
    pub error: ErrorDetail,
}

/// Error payload used both per document and for whole-request failures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}
