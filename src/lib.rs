// Rowpack - Entity rows to zipped CSV exporter
// Copyright (c) 2025 Rowpack Contributors
// Licensed under the MIT License

//! # Rowpack - entity rows to zipped CSV
//!
//! Rowpack reads the records of one entity type from a record store, renders
//! the configured fields of each record as CSV cells and writes the table,
//! in the configured text encoding, into a maximally compressed zip archive.
//!
//! ## Overview
//!
//! - **Fields** are declared in order, each with a data type: `String`,
//!   `Integer`, `Date` (with a `yyyy-MM-dd` style pattern) or `Lookup`
//!   (a foreign key resolved against another entity)
//! - **Records** are dynamically typed; attributes are resolved by name,
//!   ignoring case, through an entity registry declared in configuration
//! - **Failures** on individual cells (a lookup miss, an unformattable date)
//!   leave the cell empty and are logged; contract violations abort the run
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Field conversion and export orchestration
//! - [`adapters`] - Record stores (in-memory, JSON file, PostgreSQL)
//! - [`domain`] - Records, values, entity registry and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust
//! use rowpack::adapters::memory::InMemoryStore;
//! use rowpack::config::{ExportConfig, FieldConfig};
//! use rowpack::core::export::export;
//! use rowpack::domain::{Attribute, EntityDescriptor, EntityName, EntityRegistry, Record};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let customer = EntityName::new("Customer")?;
//! let registry = EntityRegistry::new().with(EntityDescriptor::new(
//!     customer.clone(),
//!     vec![Attribute::new("id"), Attribute::new("signupDate")],
//! ));
//! let store = InMemoryStore::new(registry.clone())
//!     .with_records([Record::new(customer).with("id", 1).with("signupDate", 0)])?;
//!
//! let out = std::env::temp_dir().join("rowpack-doc");
//! let config = ExportConfig {
//!     entity: "Customer".to_string(),
//!     file_name: "customers".to_string(),
//!     max: 100,
//!     encoding: None,
//!     output_dir: out.display().to_string(),
//!     fields: vec![
//!         FieldConfig::integer("id"),
//!         FieldConfig::date("signupDate", "yyyy-MM-dd"),
//!     ],
//! };
//!
//! let summary = export(&config, &registry, &store)?;
//! assert_eq!(summary.rows_written, 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`domain::Result`], carrying a
//! [`domain::RowpackError`]. Its
//! [`is_configuration`](domain::RowpackError::is_configuration) method tells
//! configuration mistakes apart from environmental failures; the CLI maps them
//! to exit codes 2 and 5.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
