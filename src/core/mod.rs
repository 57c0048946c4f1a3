//! Core business logic for Rowpack.
//!
//! # Modules
//!
//! - [`convert`] - per-field conversion of record attributes to CSV cells
//! - [`export`] - export orchestration, CSV writing and archiving
//!
//! # Export Workflow
//!
//! 1. **Resolve**: look up the configured entity in the registry
//! 2. **Query**: fetch up to `max` records from the record store
//! 3. **Convert**: render every configured field of every record
//! 4. **Encode**: write CSV text in the configured encoding
//! 5. **Archive**: zip the CSV into `<file_name>.zip`
//!
//! # Example
//!
//! ```rust,no_run
//! use rowpack::adapters::store::create_record_store;
//! use rowpack::config::load_config;
//! use rowpack::core::export::export;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("rowpack.toml")?;
//! let registry = config.registry()?;
//! let store = create_record_store(&config.store, &registry)?;
//!
//! let summary = export(&config.export, &registry, &store)?;
//! println!("Rows: {}", summary.rows_written);
//! # Ok(())
//! # }
//! ```

pub mod convert;
pub mod export;
