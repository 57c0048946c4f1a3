//! Domain models and types for Rowpack.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Identifiers** ([`EntityName`])
//! - **Dynamic records** ([`Record`], [`Value`]) and query-by-example [`Filter`]s
//! - **Entity registry** ([`EntityRegistry`], [`EntityDescriptor`], [`Accessor`])
//! - **Error types** ([`RowpackError`], [`StoreError`], [`ConversionError`])
//! - **Result type alias** ([`Result`])
//!
//! # Accessors
//!
//! Records have no compile-time shape. Field names from the configuration are
//! resolved against the registry once, case-insensitively:
//!
//! ```rust
//! use rowpack::domain::{Attribute, EntityDescriptor, EntityName, Record};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let user = EntityDescriptor::new(
//!     EntityName::new("User")?,
//!     vec![Attribute::new("id"), Attribute::new("fullName")],
//! );
//!
//! let accessor = user.accessor("FULLNAME")?;
//! let record = Record::new(user.name().clone()).with("fullName", "Alice");
//! assert_eq!(accessor.read(&record).map(|v| v.to_string()), Some("Alice".to_string()));
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod entity;
pub mod errors;
pub mod ids;
pub mod record;
pub mod result;
pub mod value;

// Re-export commonly used types for convenience
pub use entity::{Accessor, Attribute, EntityDescriptor, EntityRegistry};
pub use errors::{ConversionError, RowpackError, StoreError};
pub use ids::EntityName;
pub use record::{Filter, LogEntry, Record};
pub use result::Result;
pub use value::Value;
