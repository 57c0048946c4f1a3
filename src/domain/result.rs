//! Result type alias for Rowpack

use super::errors::RowpackError;

/// Result type alias for Rowpack operations
///
/// # Examples
///
/// ```
/// use rowpack::domain::result::Result;
/// use rowpack::domain::errors::RowpackError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(RowpackError::Configuration("missing entity".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, RowpackError>;

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
