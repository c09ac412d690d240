//! Error types for matrix reduction expressions
//!
//! Provides a unified error type for all matreduce crates. Only checked
//! element access and fallible construction surface errors; size mismatches
//! between an expression and its assignment target are programmer errors and
//! are caught by debug assertions instead.

use thiserror::Error;

/// Core error type for matrix reduction operations
#[derive(Error, Debug)]
pub enum Error {
    /// Checked access past the end of a vector or matrix
    #[error("Index out of range: index {index} is not below size {size}")]
    OutOfRange { index: usize, size: usize },

    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimensions of two operands do not agree
    #[error("Size mismatch in {context}: expected {expected}, got {actual}")]
    SizeMismatch {
        expected: usize,
        actual: usize,
        context: String,
    },

    /// Configuration could not be parsed or is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    /// Parallel execution could not be set up
    #[error("Execution error: {0}")]
    Execution(String),

    /// Feature not available
    #[error("Feature not available: {0}")]
    FeatureNotAvailable(String),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for an out-of-range checked access
    pub fn out_of_range(index: usize, size: usize) -> Self {
        Self::OutOfRange { index, size }
    }

    /// Create an error for size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::SizeMismatch {
            expected,
            actual,
            context: context.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::out_of_range(3, 3);
        assert_eq!(
            err.to_string(),
            "Index out of range: index 3 is not below size 3"
        );

        let err = Error::InvalidParameter("threshold must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid parameter: threshold must be positive");

        let err = Error::size_mismatch(6, 5, "matrix storage");
        assert_eq!(
            err.to_string(),
            "Size mismatch in matrix storage: expected 6, got 5"
        );

        let err = Error::Config("unknown simd mode".to_string());
        assert_eq!(err.to_string(), "Configuration error: unknown simd mode");

        let err = Error::FeatureNotAvailable("AVX2 required".to_string());
        assert_eq!(err.to_string(), "Feature not available: AVX2 required");
    }

    #[test]
    fn test_out_of_range_fields() {
        match Error::out_of_range(7, 2) {
            Error::OutOfRange { index, size } => {
                assert_eq!(index, 7);
                assert_eq!(size, 2);
            }
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_error_from_anyhow() {
        let anyhow_err = anyhow::anyhow!("custom error message");
        let err: Error = anyhow_err.into();

        match err {
            Error::Other(_) => {
                assert!(err.to_string().contains("custom error message"));
            }
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_error_chaining() {
        fn inner() -> Result<()> {
            Err(Error::out_of_range(4, 2))
        }

        fn outer() -> Result<()> {
            inner().map_err(|e| Error::InvalidParameter(format!("outer: {e}")))
        }

        let err = outer().unwrap_err();
        assert!(err.to_string().contains("outer"));
        assert!(err.to_string().contains("index 4"));
    }
}
