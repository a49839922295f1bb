//! Domain types shared by every layer of Scrubber.
//!
//! # Error Handling
//!
//! All fallible library operations return [`Result<T, ScrubError>`]:
//!
//! ```rust
//! use scrubber::domain::{Result, ScrubError};
//!
//! fn check(text: &str) -> Result<()> {
//!     if text.trim().is_empty() {
//!         return Err(ScrubError::InvalidInput("text is empty".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod result;

pub use errors::ScrubError;
pub use result::Result;
