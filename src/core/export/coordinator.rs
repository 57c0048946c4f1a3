//! Export coordinator - main orchestrator for the export process
//!
//! Reads the configured entity from the record store, converts every record
//! into a CSV row and packs the table into a zip archive.

use crate::adapters::store::traits::RecordStore;
use crate::config::ExportConfig;
use crate::core::convert::{Converted, FieldConverter};
use crate::core::export::archive::write_archive;
use crate::core::export::summary::ExportSummary;
use crate::core::export::writer::{resolve_encoding, CsvTable};
use crate::domain::{EntityRegistry, Filter, Result};
use std::path::Path;
use std::time::Instant;

/// Export coordinator
pub struct ExportCoordinator<'a, S: RecordStore + ?Sized> {
    config: &'a ExportConfig,
    registry: &'a EntityRegistry,
    store: &'a S,
}

impl<'a, S: RecordStore + ?Sized> ExportCoordinator<'a, S> {
    pub fn new(config: &'a ExportConfig, registry: &'a EntityRegistry, store: &'a S) -> Self {
        Self {
            config,
            registry,
            store,
        }
    }

    /// Execute the export
    ///
    /// An empty result set writes nothing and still succeeds. Files already
    /// written are left in place if a later step fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is unknown, the store query fails, a
    /// field violates its declared type, or the archive cannot be written.
    pub fn execute_export(&self) -> Result<ExportSummary> {
        let start = Instant::now();
        let config = self.config;

        let descriptor = self.registry.get(&config.entity)?;
        let mut summary = ExportSummary::new(descriptor.name().as_str());

        tracing::info!(
            entity = %descriptor.name(),
            store = self.store.name(),
            max = config.max,
            fields = config.fields.len(),
            "Starting export"
        );

        let records = self
            .store
            .find(&Filter::all(descriptor.name().clone()), config.max)?;
        summary.records_found = records.len();

        if records.is_empty() {
            tracing::info!(entity = %descriptor.name(), "No records found, nothing to write");
            return Ok(summary.with_duration(start.elapsed()));
        }

        let encoding = resolve_encoding(config.encoding.as_deref());
        summary.encoding = encoding.name().to_string();

        let converter = FieldConverter::new(self.registry, self.store);
        let mut table = CsvTable::new(config.fields.iter().map(|f| f.column_name.as_str()))?;

        for (index, record) in records.iter().enumerate() {
            let row = index + 1;
            let cells = converter
                .convert_row(record, &config.fields)
                .map_err(|e| {
                    tracing::error!(row, error = %e, "Field conversion failed");
                    e
                })?;

            for (field, cell) in config.fields.iter().zip(&cells) {
                if let Converted::Degraded { reason } = cell {
                    summary.add_degraded(row, field.column_name.as_str(), reason.as_str());
                }
            }
            table.push_row(cells.iter().map(Converted::as_cell))?;
        }

        summary.rows_written = table.rows();
        let bytes = table.finish(encoding)?;
        let path = write_archive(Path::new(&config.output_dir), &config.file_name, &bytes)?;

        tracing::info!(path = %path.display(), rows = summary.rows_written, "Archive written");
        summary.archive = Some(path);
        Ok(summary.with_duration(start.elapsed()))
    }
}

/// Runs one export with the given store
///
/// # Errors
///
/// See [`ExportCoordinator::execute_export`].
pub fn export<S: RecordStore + ?Sized>(
    config: &ExportConfig,
    registry: &EntityRegistry,
    store: &S,
) -> Result<ExportSummary> {
    ExportCoordinator::new(config, registry, store).execute_export()
}
