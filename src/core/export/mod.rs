//! Export orchestration
//!
//! - [`coordinator`] - runs one export end to end
//! - [`writer`] - CSV text and target encoding
//! - [`archive`] - zip output
//! - [`summary`] - what the run produced

pub mod archive;
pub mod coordinator;
pub mod summary;
pub mod writer;

pub use archive::write_archive;
pub use coordinator::{export, ExportCoordinator};
pub use summary::{DegradedField, ExportSummary};
pub use writer::{resolve_encoding, CsvTable};
