//! Domain error types
//!
//! This module defines the error hierarchy for Rowpack.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Rowpack error type
///
/// This is the primary error type used throughout the application.
/// Every variant is fatal for the export run; field-level problems that are
/// recoverable never surface as a `RowpackError`.
#[derive(Debug, Error)]
pub enum RowpackError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Record store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Field conversion contract violations
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// CSV writing errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Archive writing errors
    #[error("Archive error: {0}")]
    Archive(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl RowpackError {
    /// Whether the error comes from the configuration rather than the environment
    ///
    /// Used by the CLI to pick the exit code.
    pub fn is_configuration(&self) -> bool {
        match self {
            RowpackError::Configuration(_) => true,
            RowpackError::Conversion(_) => true,
            RowpackError::Store(StoreError::UnknownEntity(_)) => true,
            _ => false,
        }
    }
}

/// Record store errors
///
/// These errors don't expose the underlying driver types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to connect to the backing store
    #[error("Failed to connect to store: {0}")]
    ConnectionFailed(String),

    /// Entity is not known to the store
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    /// Attribute is not declared on the entity
    #[error("Unknown attribute '{attribute}' on entity '{entity}'")]
    UnknownAttribute { entity: String, attribute: String },

    /// Query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Column type cannot be represented as a record value
    #[error("Unsupported column type '{column_type}' for column '{column}'")]
    UnsupportedColumnType { column: String, column_type: String },

    /// Failed to load a data file
    #[error("Failed to load data: {0}")]
    LoadFailed(String),

    /// Failed to append a log entry
    #[error("Failed to append log entry: {0}")]
    AppendFailed(String),
}

/// Fatal field conversion errors
///
/// Raised only for contract violations the configuration cannot describe:
/// a missing accessor on a non-lookup field, or a value whose runtime type
/// is incompatible with a `String` or `Integer` column.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// No attribute matches the configured field name
    #[error("No accessor '{field}' on entity '{entity}'")]
    AccessorNotFound { entity: String, field: String },

    /// Runtime value type does not fit the declared data type
    #[error("Column '{column}' is declared {declared} but holds a {actual} value")]
    UnexpectedValue {
        column: String,
        declared: &'static str,
        actual: &'static str,
    },
}

// Conversion from std::io::Error
impl From<std::io::Error> for RowpackError {
    fn from(err: std::io::Error) -> Self {
        RowpackError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for RowpackError {
    fn from(err: serde_json::Error) -> Self {
        RowpackError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for RowpackError {
    fn from(err: toml::de::Error) -> Self {
        RowpackError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<csv::Error> for RowpackError {
    fn from(err: csv::Error) -> Self {
        RowpackError::Csv(err.to_string())
    }
}

impl From<zip::result::ZipError> for RowpackError {
    fn from(err: zip::result::ZipError) -> Self {
        RowpackError::Archive(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rowpack_error_display() {
        let err = RowpackError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_store_error_conversion() {
        let store_err = StoreError::QueryFailed("syntax error".to_string());
        let err: RowpackError = store_err.into();
        assert!(matches!(err, RowpackError::Store(_)));
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_unknown_entity_is_configuration() {
        let err: RowpackError = StoreError::UnknownEntity("Ghost".to_string()).into();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_conversion_error_display() {
        let err = ConversionError::UnexpectedValue {
            column: "score".to_string(),
            declared: "Integer",
            actual: "Float",
        };
        assert_eq!(
            err.to_string(),
            "Column 'score' is declared Integer but holds a Float value"
        );
        let err: RowpackError = err.into();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: RowpackError = io_err.into();
        assert!(matches!(err, RowpackError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: RowpackError = toml_err.into();
        assert!(matches!(err, RowpackError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_rowpack_error_implements_std_error() {
        let err = RowpackError::Archive("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
