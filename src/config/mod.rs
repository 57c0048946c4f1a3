//! Configuration management for Rowpack.
//!
//! # Overview
//!
//! One TOML file describes one export job:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `ROWPACK_*` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level
//! - [`ExportConfig`] - entity, file name, row cap, encoding, ordered [`FieldConfig`]s
//! - [`StoreConfig`] - record store backend and its settings
//! - [`EntityConfig`] - entity types and their attributes
//! - [`LoggingConfig`] - JSON log files
//!
//! # Example Configuration
//!
//! ```toml
//! [export]
//! entity = "Customer"
//! file_name = "customers"
//! max = 10000
//! encoding = "windows-1252"
//!
//! [[export.fields]]
//! field_name = "id"
//! data_type = "Integer"
//!
//! [[export.fields]]
//! field_name = "signupDate"
//! column_name = "Signed up"
//! data_type = "Date"
//! format = "yyyy-MM-dd"
//!
//! [[export.fields]]
//! field_name = "managerId"
//! data_type = "Lookup"
//! lookup_entity = "User"
//! target_field = "id"
//! lookup_field = "fullName"
//!
//! [store]
//! backend = "postgresql"
//! connection_string = "${ROWPACK_PG_URL}"
//!
//! [[entities]]
//! name = "Customer"
//! attributes = [{ name = "id" }, { name = "signupDate", column = "signup_date" }, { name = "managerId", column = "manager_id" }]
//!
//! [[entities]]
//! name = "User"
//! table = "crm_user"
//! attributes = [{ name = "id" }, { name = "fullName", column = "full_name" }]
//! ```

pub mod field;
pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use field::{FieldConfig, FieldKind, LookupSpec};
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, AttributeConfig, EntityConfig, ExportConfig, LoggingConfig, RowpackConfig,
    StoreBackend, StoreConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
