//! Result type alias for Scrubber

use super::errors::ScrubError;

/// Result type alias for Scrubber operations
///
/// # Examples
///
/// ```
/// use scrubber::domain::result::Result;
/// use scrubber::domain::errors::ScrubError;
///
/// fn failing_function() -> Result<()> {
///     Err(ScrubError::InvalidInput("text is empty".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ScrubError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ScrubError;

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(ScrubError::InvalidInput("test error".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
