// Scrubber - PII masking service
// Copyright (c) 2025 Scrubber Contributors
// Licensed under the MIT License

//! # Scrubber - PII masking for free text
//!
//! Scrubber takes a text, asks an external detector (Azure AI Language PII
//! recognition) where the sensitive entities are, and returns the text with
//! every entity replaced plus the location of each replacement in the new
//! text.
//!
//! ## Architecture
//!
//! - [`masking`] - Pure masking core: offsets, normalization, replacement, reconstruction
//! - [`core`] - Request orchestration
//! - [`adapters`] - Entity sources (language service client)
//! - [`server`] - HTTP service
//! - [`cli`] - Command-line interface
//! - [`domain`] - Error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust
//! use scrubber::masking::{mask_text, Entity, MaskingPolicy, OffsetUnit};
//!
//! let entities = vec![Entity::new("PhoneNumber", 5, 10)];
//! let outcome = mask_text(
//!     "Call 0601020304 now",
//!     &entities,
//!     MaskingPolicy::Redact,
//!     OffsetUnit::Utf16CodeUnit,
//! );
//!
//! assert_eq!(outcome.anonymized, "Call *** now");
//! assert_eq!((outcome.spans[0].start, outcome.spans[0].end), (5, 8));
//! ```
//!
//! ## Offsets
//!
//! Entity offsets and output spans share one unit, UTF-16 code units by
//! default (what the language service reports and what JavaScript string
//! indices use), or Unicode code points. They are never UTF-8 byte offsets.
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::Result`]. Malformed or
//! overlapping entities are not errors: they are dropped and logged.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod masking;
pub mod server;
