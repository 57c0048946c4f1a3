//! Record store abstraction
//!
//! This module defines the trait that record store backends must implement
//! to serve an export.

use crate::domain::{Filter, LogEntry, Record, Result};

/// Query-by-example record store
///
/// All calls block until the backend answers. Implementations own their
/// connection lifecycle; the export never opens or closes anything itself.
pub trait RecordStore {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Finds up to `max` records matching `filter`, in store order
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownEntity`](crate::domain::StoreError::UnknownEntity)
    /// if the filter names an entity the store cannot serve, or a backend error.
    fn find(&self, filter: &Filter, max: usize) -> Result<Vec<Record>>;

    /// Finds the single record matching `filter`
    ///
    /// When several records match, the first in store order wins.
    ///
    /// # Errors
    ///
    /// Same as [`find`](Self::find).
    fn find_one(&self, filter: &Filter) -> Result<Option<Record>> {
        Ok(self.find(filter, 1)?.into_iter().next())
    }

    /// Appends a diagnostic entry to the store's log sink
    ///
    /// # Errors
    ///
    /// Returns a backend error; callers treat the sink as fire-and-forget.
    fn append_log(&self, entry: &LogEntry) -> Result<()>;
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn find(&self, filter: &Filter, max: usize) -> Result<Vec<Record>> {
        (**self).find(filter, max)
    }

    fn find_one(&self, filter: &Filter) -> Result<Option<Record>> {
        (**self).find_one(filter)
    }

    fn append_log(&self, entry: &LogEntry) -> Result<()> {
        (**self).append_log(entry)
    }
}
