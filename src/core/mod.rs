//! Core business logic for Scrubber.
//!
//! - [`sanitize`] - Request orchestration: validation, detection, masking
//!
//! # Example
//!
//! ```rust,no_run
//! use scrubber::config::load_config_or_env;
//! use scrubber::core::sanitize::{SanitizeRequest, ScrubService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config_or_env("scrubber.toml")?;
//! let service = ScrubService::from_config(&config)?;
//!
//! let request = SanitizeRequest::new("Call 0601020304 now").with_policy("pseudo");
//! let outcome = service.sanitize(&request).await?;
//! println!("{}", outcome.anonymized);
//! # Ok(())
//! # }
//! ```

pub mod sanitize;

pub use sanitize::{SanitizeRequest, ScrubService};
