//! Field conversion
//!
//! - [`engine`] - renders one record attribute as one CSV cell
//! - [`date_pattern`] - `yyyy-MM-dd` style date patterns

pub mod date_pattern;
pub mod engine;

pub use date_pattern::{DatePattern, DatePatternError};
pub use engine::{Converted, FieldConverter};
