//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use std::path::PathBuf;
use std::time::Duration;

/// A cell written empty because its field could not be rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegradedField {
    /// 1-based data row number (header excluded)
    pub row: usize,

    /// Header label of the column
    pub column: String,

    pub reason: String,
}

/// Summary of an export run
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Exported entity
    pub entity: String,

    /// Records returned by the store
    pub records_found: usize,

    /// Data rows written (header excluded)
    pub rows_written: usize,

    /// Cells written empty after a recoverable failure
    pub degraded: Vec<DegradedField>,

    /// Archive written, `None` when there was nothing to export
    pub archive: Option<PathBuf>,

    /// Encoding actually used for the CSV text
    pub encoding: String,

    /// Duration of the export
    pub duration: Duration,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            records_found: 0,
            rows_written: 0,
            degraded: Vec::new(),
            archive: None,
            encoding: "UTF-8".to_string(),
            duration: Duration::from_secs(0),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn add_degraded(&mut self, row: usize, column: impl Into<String>, reason: impl Into<String>) {
        self.degraded.push(DegradedField {
            row,
            column: column.into(),
            reason: reason.into(),
        });
    }

    /// Whether every cell rendered
    pub fn is_clean(&self) -> bool {
        self.degraded.is_empty()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            entity = %self.entity,
            records_found = self.records_found,
            rows_written = self.rows_written,
            degraded_fields = self.degraded.len(),
            encoding = %self.encoding,
            archive = ?self.archive,
            duration_ms = self.duration.as_millis() as u64,
            "Export completed"
        );

        if !self.degraded.is_empty() {
            tracing::warn!(
                degraded_fields = self.degraded.len(),
                "Export completed with empty cells"
            );
        }
    }
}
