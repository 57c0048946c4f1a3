//! In-memory record store
//!
//! Holds every record in insertion order and evaluates filters by scanning.
//! Backs the JSON file store and the test suites.

use crate::adapters::store::traits::RecordStore;
use crate::domain::{EntityRegistry, Filter, LogEntry, Record, Result, StoreError};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Record store kept entirely in memory
#[derive(Debug)]
pub struct InMemoryStore {
    registry: EntityRegistry,
    records: BTreeMap<String, Vec<Record>>,
    log: Mutex<Vec<LogEntry>>,
}

impl InMemoryStore {
    /// Creates an empty store serving the entities in `registry`
    pub fn new(registry: EntityRegistry) -> Self {
        Self {
            registry,
            records: BTreeMap::new(),
            log: Mutex::new(Vec::new()),
        }
    }

    /// Adds a record
    ///
    /// Attribute names are normalized to their declared casing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownEntity`] or [`StoreError::UnknownAttribute`]
    /// if the record does not fit the registry.
    pub fn insert(&mut self, record: Record) -> Result<()> {
        let descriptor = self.registry.get(record.entity().as_str())?;

        let mut normalized = Record::new(descriptor.name().clone());
        for (name, value) in record.attributes() {
            let attribute =
                descriptor
                    .attribute(name)
                    .ok_or_else(|| StoreError::UnknownAttribute {
                        entity: descriptor.name().to_string(),
                        attribute: name.to_string(),
                    })?;
            normalized.set(attribute.name.as_str(), value.clone());
        }

        self.records
            .entry(descriptor.name().to_string())
            .or_default()
            .push(normalized);
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert) for several records
    ///
    /// # Errors
    ///
    /// Stops at the first record that does not fit the registry.
    pub fn with_records(mut self, records: impl IntoIterator<Item = Record>) -> Result<Self> {
        for record in records {
            self.insert(record)?;
        }
        Ok(self)
    }

    /// Number of records stored for `entity`
    pub fn count(&self, entity: &str) -> usize {
        self.records.get(entity).map_or(0, Vec::len)
    }

    /// Entries appended through [`RecordStore::append_log`]
    pub fn log_entries(&self) -> Vec<LogEntry> {
        match self.log.lock() {
            Ok(log) => log.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }
}

impl RecordStore for InMemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn find(&self, filter: &Filter, max: usize) -> Result<Vec<Record>> {
        let descriptor = self.registry.get(filter.entity().as_str())?;
        let matches = self
            .records
            .get(descriptor.name().as_str())
            .map(|records| {
                records
                    .iter()
                    .filter(|r| filter.matches(r))
                    .take(max)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(matches)
    }

    fn append_log(&self, entry: &LogEntry) -> Result<()> {
        self.log
            .lock()
            .map_err(|e| StoreError::AppendFailed(e.to_string()))?
            .push(entry.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Attribute, EntityDescriptor, EntityName, RowpackError};

    fn user() -> EntityName {
        EntityName::new("User").unwrap()
    }

    fn store() -> InMemoryStore {
        let registry = EntityRegistry::new().with(EntityDescriptor::new(
            user(),
            vec![Attribute::new("id"), Attribute::new("fullName")],
        ));
        InMemoryStore::new(registry)
            .with_records([
                Record::new(user()).with("id", 1).with("FULLNAME", "Alice"),
                Record::new(user()).with("id", 2).with("fullName", "Bob"),
                Record::new(user()).with("id", 3),
            ])
            .unwrap()
    }

    #[test]
    fn test_find_respects_max_and_order() {
        let store = store();
        let records = store.find(&Filter::all(user()), 2).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("id"), Some(&1.into()));
        assert_eq!(records[1].get("id"), Some(&2.into()));
    }

    #[test]
    fn test_insert_normalizes_attribute_names() {
        let store = store();
        let alice = store
            .find_one(&Filter::all(user()).with("id", 1))
            .unwrap()
            .unwrap();
        assert_eq!(alice.get("fullName"), Some(&"Alice".into()));
    }

    #[test]
    fn test_find_one_miss() {
        let store = store();
        assert!(store
            .find_one(&Filter::all(user()).with("id", 99))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_unknown_entity() {
        let store = store();
        let filter = Filter::all(EntityName::new("Order").unwrap());
        assert!(matches!(
            store.find(&filter, 10),
            Err(RowpackError::Store(StoreError::UnknownEntity(_)))
        ));
    }

    #[test]
    fn test_insert_unknown_attribute() {
        let mut store = store();
        let result = store.insert(Record::new(user()).with("email", "a@b.c"));
        assert!(matches!(
            result,
            Err(RowpackError::Store(StoreError::UnknownAttribute { .. }))
        ));
        assert_eq!(store.count("User"), 3);
    }

    #[test]
    fn test_append_log_collects_entries() {
        let store = store();
        store
            .append_log(&LogEntry::new("FieldConverter", "lookup", "miss"))
            .unwrap();
        assert_eq!(store.log_entries().len(), 1);
    }
}
