//! Error context extension trait
//!
//! Mirrors `anyhow::Context` for `Result<T, RowpackError>`, so library code can
//! say which file or entity an error belongs to without leaving the domain
//! error type.
//!
//! ```rust
//! use rowpack::domain::Result;
//! use rowpack::domain::context::ResultExt;
//!
//! fn read_data(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))
//! }
//! ```

use crate::domain::errors::RowpackError;
use crate::domain::result::Result;

/// Adds context to any error convertible into [`RowpackError`]
pub trait ResultExt<T> {
    /// Prefixes the error message with `context`
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display;

    /// Like [`context`](Self::context), but only builds the message on error
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<RowpackError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display,
    {
        self.map_err(|e| wrap(e.into(), context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| wrap(e.into(), f()))
    }
}

// Configuration errors keep their variant so exit codes stay right.
fn wrap(error: RowpackError, context: impl std::fmt::Display) -> RowpackError {
    match error {
        RowpackError::Configuration(msg) => {
            RowpackError::Configuration(format!("{context}: {msg}"))
        }
        other => RowpackError::Other(format!("{context}: {other}")),
    }
}
