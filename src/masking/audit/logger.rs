//! Audit logger for masking operations

use crate::domain::{Result, ScrubError};
use crate::masking::models::{NormalizationStats, NormalizedEntity};
use crate::masking::offsets::OffsetUnit;
use crate::masking::policy::MaskingPolicy;
use crate::masking::replacement::sha256_hex;
use chrono::Utc;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// One masked request, as handed to the audit logger
#[derive(Debug, Clone)]
pub struct MaskingAuditEvent {
    pub request_id: String,
    pub policy: MaskingPolicy,
    pub unit: OffsetUnit,
    pub stats: NormalizationStats,
    pub processing_time_us: u64,
    pub entities: Vec<AuditEntity>,
}

/// Audit entry for one masked entity (with hashed snippet)
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntity {
    pub category: String,
    pub offset: usize,
    pub length: usize,
    /// SHA-256 hash of the original snippet (never log plaintext PII)
    pub value_hash: String,
}

impl AuditEntity {
    pub fn new(entity: &NormalizedEntity, snippet: &str) -> Self {
        Self {
            category: entity.category.clone(),
            offset: entity.offset,
            length: entity.length,
            value_hash: sha256_hex(snippet),
        }
    }
}

/// Audit log entry
#[derive(Debug, Serialize)]
struct AuditLogEntry<'a> {
    timestamp: String,
    request_id: &'a str,
    policy: MaskingPolicy,
    offset_unit: OffsetUnit,
    entities_received: usize,
    entities_masked: usize,
    entities_malformed: usize,
    entities_overlapping: usize,
    processing_time_us: u64,
    entities: &'a [AuditEntity],
}

/// Append-only audit logger for masking operations
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
    enabled: bool,
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new(log_path: PathBuf, json_format: bool, enabled: bool) -> Result<Self> {
        if enabled {
            if let Some(parent) = log_path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ScrubError::Configuration(format!(
                        "Failed to create audit log directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        Ok(Self {
            log_path,
            json_format,
            enabled,
        })
    }

    /// Record a masked request
    pub fn log_masking(&self, event: &MaskingAuditEvent) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let entry = AuditLogEntry {
            timestamp: Utc::now().to_rfc3339(),
            request_id: &event.request_id,
            policy: event.policy,
            offset_unit: event.unit,
            entities_received: event.stats.received,
            entities_masked: event.stats.kept,
            entities_malformed: event.stats.malformed,
            entities_overlapping: event.stats.overlapping,
            processing_time_us: event.processing_time_us,
            entities: &event.entities,
        };

        self.write_entry(&entry)
    }

    /// Write an audit entry to the log file as a single line
    fn write_entry(&self, entry: &AuditLogEntry<'_>) -> Result<()> {
        let mut line = if self.json_format {
            serde_json::to_string(entry)?
        } else {
            format!(
                "[{}] Request: {} | Policy: {} | Masked: {}/{} | Time: {}us",
                entry.timestamp,
                entry.request_id,
                entry.policy,
                entry.entities_masked,
                entry.entities_received,
                entry.processing_time_us
            )
        };
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| {
                ScrubError::Io(format!(
                    "Failed to open audit log {}: {e}",
                    self.log_path.display()
                ))
            })?;

        file.write_all(line.as_bytes())
            .map_err(|e| ScrubError::Io(format!("Failed to write audit entry: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn event(snippet: &str) -> MaskingAuditEvent {
        let entity = NormalizedEntity {
            category: "Email".to_string(),
            offset: 9,
            length: snippet.len(),
            subcategory: None,
            confidence_score: Some(0.8),
        };
        MaskingAuditEvent {
            request_id: "req-123".to_string(),
            policy: MaskingPolicy::Pseudo,
            unit: OffsetUnit::Utf16CodeUnit,
            stats: NormalizationStats {
                received: 2,
                kept: 1,
                malformed: 1,
                overlapping: 0,
            },
            processing_time_us: 42,
            entities: vec![AuditEntity::new(&entity, snippet)],
        }
    }

    #[test]
    fn test_audit_logger_creates_directory() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("nested").join("audit.log");

        let logger = AuditLogger::new(log_path.clone(), true, true).unwrap();
        assert!(logger.enabled);
        assert!(log_path.parent().unwrap().exists());
    }

    #[test]
    fn test_log_masking_json() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("audit.log");
        let logger = AuditLogger::new(log_path.clone(), true, true).unwrap();

        logger.log_masking(&event("test@example.com")).unwrap();
        logger.log_masking(&event("other@example.com")).unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let entry: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(entry["request_id"], "req-123");
        assert_eq!(entry["policy"], "pseudo");
        assert_eq!(entry["offset_unit"], "Utf16CodeUnit");
        assert_eq!(entry["entities_masked"], 1);
        assert_eq!(entry["entities"][0]["value_hash"].as_str().unwrap().len(), 64);

        // Should NOT contain plaintext PII
        assert!(!content.contains("test@example.com"));
    }

    #[test]
    fn test_log_masking_plain_text() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("audit.log");
        let logger = AuditLogger::new(log_path.clone(), false, true).unwrap();

        logger.log_masking(&event("test@example.com")).unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("Request: req-123"));
        assert!(content.contains("Masked: 1/2"));
        assert!(!content.contains("test@example.com"));
    }

    #[test]
    fn test_disabled_logger_writes_nothing() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("audit.log");
        let logger = AuditLogger::new(log_path.clone(), true, false).unwrap();

        logger.log_masking(&event("test@example.com")).unwrap();
        assert!(!log_path.exists());
    }
}
