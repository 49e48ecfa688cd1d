//! Result type alias for the eraser

use super::errors::EraserError;

/// Result type alias for eraser operations
///
/// # Examples
///
/// ```
/// use gdpr_eraser::domain::result::Result;
/// use gdpr_eraser::domain::errors::EraserError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(EraserError::Configuration("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, EraserError>;

#[cfg(test)]
mod tests {
    use super::*;

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
