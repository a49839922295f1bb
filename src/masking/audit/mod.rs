//! Audit logging module
//!
//! Provides structured audit logging for masking operations.

pub mod logger;

pub use logger::{AuditEntity, AuditLogger, MaskingAuditEvent};
