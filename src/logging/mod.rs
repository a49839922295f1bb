//! Logging and observability
//!
//! Structured logging with:
//! - Configurable log levels
//! - Console output on stderr
//! - Local JSON file logging with rotation
//!
//! Log lines carry categories, offsets, counts and request ids. They never
//! carry snippets of the submitted text.

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use scrubber::log_retry_attempt;
///
/// log_retry_attempt!(1, 3, 250, "503 Service Unavailable");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_retries:expr, $delay_ms:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_retries = $max_retries,
            delay_ms = $delay_ms,
            reason = %$reason,
            "Retrying language service request"
        );
    };
}

/// Log a request that was rejected or failed
///
/// Client errors are logged at `info`, everything else at `error`.
///
/// # Example
///
/// ```no_run
/// use scrubber::log_request_failed;
/// use scrubber::domain::ScrubError;
///
/// let error = ScrubError::InvalidPolicy("scramble".to_string());
/// log_request_failed!("req-1", &error);
/// ```
#[macro_export]
macro_rules! log_request_failed {
    ($request_id:expr, $error:expr) => {
        if $error.is_client_error() {
            tracing::info!(request_id = %$request_id, error = %$error, "Request rejected");
        } else {
            tracing::error!(request_id = %$request_id, error = %$error, "Request failed");
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::ScrubError;

    #[test]
    fn test_macros_expand() {
        let error = ScrubError::upstream("unavailable");
        crate::log_retry_attempt!(1, 2, 100u64, &error);
        crate::log_request_failed!("req-1", &error);
        crate::log_request_failed!("req-2", &ScrubError::InvalidInput("empty".to_string()));
    }
}
