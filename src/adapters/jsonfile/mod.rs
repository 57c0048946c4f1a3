//! JSON file record store
//!
//! Loads a JSON document of the form
//!
//! ```json
//! {
//!   "Customer": [
//!     { "id": 1, "signupDate": 0, "managerId": 2 },
//!     { "id": 2, "signupDate": { "$date": "2024-05-01T09:30:00Z" }, "fullName": "Alice" }
//!   ]
//! }
//! ```
//!
//! into an [`InMemoryStore`]. Integers become [`Value::Integer`], other numbers
//! [`Value::Float`], `null` leaves the attribute unset and `{"$date": ...}`
//! (RFC 3339 string or epoch milliseconds) becomes [`Value::Timestamp`].
//! Diagnostic entries can be appended to a JSON-lines file.

use crate::adapters::memory::InMemoryStore;
use crate::adapters::store::traits::RecordStore;
use crate::domain::{
    EntityName, EntityRegistry, Filter, LogEntry, Record, Result, StoreError, Value,
};
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Record store backed by a JSON document
#[derive(Debug)]
pub struct JsonFileStore {
    inner: InMemoryStore,
    log_path: Option<PathBuf>,
}

impl JsonFileStore {
    /// Reads and parses the data file
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LoadFailed`] if the file cannot be read or does not
    /// have the expected shape, and an entity/attribute error if a record does
    /// not fit the registry.
    pub fn open(path: impl AsRef<Path>, registry: EntityRegistry) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            StoreError::LoadFailed(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let store = Self::from_json_str(&contents, registry)?;
        tracing::info!(
            path = %path.display(),
            entities = store.inner.registry().len(),
            "Loaded JSON record store"
        );
        Ok(store)
    }

    /// Parses a JSON document already in memory
    ///
    /// # Errors
    ///
    /// See [`open`](Self::open).
    pub fn from_json_str(contents: &str, registry: EntityRegistry) -> Result<Self> {
        let document: JsonValue = serde_json::from_str(contents)
            .map_err(|e| StoreError::LoadFailed(format!("Invalid JSON: {e}")))?;
        let JsonValue::Object(entities) = document else {
            return Err(StoreError::LoadFailed(
                "Top-level JSON value must be an object keyed by entity name".to_string(),
            )
            .into());
        };

        let mut inner = InMemoryStore::new(registry);
        for (entity, rows) in entities {
            let JsonValue::Array(rows) = rows else {
                return Err(StoreError::LoadFailed(format!(
                    "Entity '{entity}' must map to an array of objects"
                ))
                .into());
            };
            let name = EntityName::new(entity.as_str()).map_err(StoreError::LoadFailed)?;
            for (index, row) in rows.into_iter().enumerate() {
                let record = record_from_json(&name, row).map_err(|e| {
                    StoreError::LoadFailed(format!("{entity}[{index}]: {e}"))
                })?;
                inner.insert(record)?;
            }
            tracing::debug!(entity = %entity, records = inner.count(&entity), "Loaded entity");
        }

        Ok(Self {
            inner,
            log_path: None,
        })
    }

    /// Appends diagnostic entries as JSON lines to `path`
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Entries appended during this run
    pub fn log_entries(&self) -> Vec<LogEntry> {
        self.inner.log_entries()
    }
}

impl RecordStore for JsonFileStore {
    fn name(&self) -> &'static str {
        "json"
    }

    fn find(&self, filter: &Filter, max: usize) -> Result<Vec<Record>> {
        self.inner.find(filter, max)
    }

    fn append_log(&self, entry: &LogEntry) -> Result<()> {
        self.inner.append_log(entry)?;

        if let Some(path) = &self.log_path {
            let line = serde_json::to_string(entry)?;
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| StoreError::AppendFailed(format!("{}: {}", path.display(), e)))?;
            writeln!(file, "{line}")
                .map_err(|e| StoreError::AppendFailed(format!("{}: {}", path.display(), e)))?;
        }
        Ok(())
    }
}

fn record_from_json(entity: &EntityName, row: JsonValue) -> std::result::Result<Record, String> {
    let JsonValue::Object(attributes) = row else {
        return Err("record must be a JSON object".to_string());
    };

    let mut record = Record::new(entity.clone());
    for (name, value) in attributes {
        if let Some(value) = value_from_json(&name, value)? {
            record.set(name, value);
        }
    }
    Ok(record)
}

fn value_from_json(name: &str, value: JsonValue) -> std::result::Result<Option<Value>, String> {
    let value = match value {
        JsonValue::Null => return Ok(None),
        JsonValue::Bool(b) => Value::Boolean(b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Float(
                n.as_f64()
                    .ok_or_else(|| format!("attribute '{name}': number out of range"))?,
            ),
        },
        JsonValue::String(s) => Value::Text(s),
        JsonValue::Object(map) => match map.get("$date") {
            Some(date) if map.len() == 1 => Value::Timestamp(parse_date(name, date)?),
            _ => return Err(format!("attribute '{name}': nested objects are not supported")),
        },
        JsonValue::Array(_) => {
            return Err(format!("attribute '{name}': arrays are not supported"))
        }
    };
    Ok(Some(value))
}

fn parse_date(name: &str, date: &JsonValue) -> std::result::Result<DateTime<Utc>, String> {
    match date {
        JsonValue::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|d| d.with_timezone(&Utc))
            .map_err(|e| format!("attribute '{name}': invalid $date '{s}': {e}")),
        JsonValue::Number(n) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .ok_or_else(|| format!("attribute '{name}': $date millis out of range")),
        _ => Err(format!(
            "attribute '{name}': $date must be an RFC 3339 string or epoch milliseconds"
        )),
    }
}
