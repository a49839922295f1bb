//! External system integrations for Scrubber.
//!
//! - [`language`] - Entity detection (Azure AI Language PII recognition)
//!
//! Adapters isolate external dependencies behind traits so the masking
//! pipeline can be driven by fixed entity lists in tests and offline use.

pub mod language;
