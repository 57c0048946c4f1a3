//! Field conversion engine
//!
//! Turns one attribute of one record into one CSV cell according to the
//! field's declared [`FieldKind`]. The declared kind and the runtime [`Value`]
//! type are independent: a `Date` field accepts epoch milliseconds, native
//! timestamps and preformatted text alike.
//!
//! Outcomes fall into three classes:
//! - a rendered cell ([`Converted::Value`]),
//! - a degraded cell rendered as `""` ([`Converted::Degraded`]) for date
//!   formatting problems and any lookup failure,
//! - a fatal [`ConversionError`] for configuration contract violations.

use crate::adapters::store::traits::RecordStore;
use crate::config::{FieldConfig, FieldKind, LookupSpec};
use crate::core::convert::date_pattern::DatePattern;
use crate::domain::{
    ConversionError, EntityRegistry, Filter, LogEntry, Record, Value,
};
use chrono::{DateTime, Utc};

const OBJECT_NAME: &str = "FieldConverter";

/// Result of converting one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Converted {
    /// Cell text
    Value(String),
    /// Field could not be rendered; the cell is empty
    Degraded { reason: String },
}

impl Converted {
    /// Text written to the CSV cell
    pub fn as_cell(&self) -> &str {
        match self {
            Converted::Value(text) => text,
            Converted::Degraded { .. } => "",
        }
    }

    pub fn into_cell(self) -> String {
        match self {
            Converted::Value(text) => text,
            Converted::Degraded { .. } => String::new(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Converted::Degraded { .. })
    }
}

/// Converts record attributes to cells
///
/// Lookups go through `store`, which also receives a [`LogEntry`] for every
/// failed lookup.
pub struct FieldConverter<'a, S: RecordStore + ?Sized> {
    registry: &'a EntityRegistry,
    store: &'a S,
}

impl<'a, S: RecordStore + ?Sized> FieldConverter<'a, S> {
    pub fn new(registry: &'a EntityRegistry, store: &'a S) -> Self {
        Self { registry, store }
    }

    /// Converts one field of `record`
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::AccessorNotFound`] when a non-lookup field
    /// names no attribute of the record's entity, and
    /// [`ConversionError::UnexpectedValue`] when a `String` or `Integer` field
    /// holds a value of an incompatible type.
    pub fn convert(
        &self,
        record: &Record,
        field: &FieldConfig,
    ) -> Result<Converted, ConversionError> {
        let accessor = self
            .registry
            .get(record.entity().as_str())
            .map_err(|_| ConversionError::AccessorNotFound {
                entity: record.entity().to_string(),
                field: field.field_name.clone(),
            })
            .and_then(|descriptor| descriptor.accessor(&field.field_name));

        let accessor = match (accessor, &field.kind) {
            (Ok(accessor), _) => accessor,
            (Err(e), FieldKind::Lookup(spec)) => {
                return Ok(self.lookup_failed(field, spec, e.to_string(), None));
            }
            (Err(e), _) => return Err(e),
        };

        let Some(value) = accessor.read(record) else {
            return Ok(Converted::Value(String::new()));
        };

        match &field.kind {
            FieldKind::String => match value {
                Value::Text(text) => Ok(Converted::Value(text.clone())),
                other => Err(unexpected(field, other)),
            },
            FieldKind::Integer => match value {
                Value::Integer(i) => Ok(Converted::Value(i.to_string())),
                Value::Text(text) => Ok(Converted::Value(text.clone())),
                other => Err(unexpected(field, other)),
            },
            FieldKind::Date { format } => Ok(convert_date(field, format, value)),
            FieldKind::Lookup(spec) => Ok(self.lookup(field, spec, value)),
        }
    }

    /// Converts every field of `record`, in order
    ///
    /// # Errors
    ///
    /// Stops at the first fatal error; see [`convert`](Self::convert).
    pub fn convert_row(
        &self,
        record: &Record,
        fields: &[FieldConfig],
    ) -> Result<Vec<Converted>, ConversionError> {
        fields
            .iter()
            .map(|field| self.convert(record, field))
            .collect()
    }

    fn lookup(&self, field: &FieldConfig, spec: &LookupSpec, value: &Value) -> Converted {
        let Some(key) = value.as_integer() else {
            return self.lookup_failed(
                field,
                spec,
                format!("foreign key is a {} value, expected Integer", value.type_name()),
                None,
            );
        };

        let descriptor = match self.registry.get(&spec.entity) {
            Ok(descriptor) => descriptor,
            Err(e) => return self.lookup_failed(field, spec, e.to_string(), None),
        };
        let Some(target) = descriptor.attribute(&spec.target_field) else {
            return self.lookup_failed(
                field,
                spec,
                format!(
                    "entity '{}' has no attribute '{}'",
                    spec.entity, spec.target_field
                ),
                None,
            );
        };
        let accessor = match descriptor.accessor(&spec.lookup_field) {
            Ok(accessor) => accessor,
            Err(e) => return self.lookup_failed(field, spec, e.to_string(), None),
        };

        let filter = Filter::all(descriptor.name().clone()).with(target.name.as_str(), key);
        match self.store.find_one(&filter) {
            Ok(Some(found)) => {
                Converted::Value(accessor.read(&found).map(Value::to_string).unwrap_or_default())
            }
            Ok(None) => self.lookup_failed(
                field,
                spec,
                format!("no {} with {} = {}", spec.entity, spec.target_field, key),
                None,
            ),
            Err(e) => {
                let trace = error_chain(&e);
                self.lookup_failed(field, spec, e.to_string(), Some(trace))
            }
        }
    }

    fn lookup_failed(
        &self,
        field: &FieldConfig,
        spec: &LookupSpec,
        reason: String,
        stack_trace: Option<String>,
    ) -> Converted {
        tracing::warn!(
            column = %field.column_name,
            lookup_entity = %spec.entity,
            target_field = %spec.target_field,
            lookup_field = %spec.lookup_field,
            reason = %reason,
            "Lookup failed, writing empty cell"
        );

        let message = format!(
            "Lookup failed for column '{}' (target_field={}, lookup_entity={}, lookup_field={}): {}",
            field.column_name, spec.target_field, spec.entity, spec.lookup_field, reason
        );
        let mut entry = LogEntry::new(OBJECT_NAME, "lookup", message);
        if let Some(trace) = stack_trace {
            entry = entry.with_stack_trace(trace);
        }
        if let Err(e) = self.store.append_log(&entry) {
            tracing::warn!(error = %e, store = self.store.name(), "Failed to append log entry");
        }

        Converted::Degraded { reason }
    }
}

fn convert_date(field: &FieldConfig, format: &str, value: &Value) -> Converted {
    let timestamp: DateTime<Utc> = match value {
        Value::Text(text) => return Converted::Value(text.clone()),
        Value::Timestamp(ts) => *ts,
        Value::Integer(millis) => match DateTime::<Utc>::from_timestamp_millis(*millis) {
            Some(ts) => ts,
            None => {
                return degraded_date(field, format!("epoch millis {millis} out of range"));
            }
        },
        other => {
            return degraded_date(
                field,
                format!("cannot format a {} value as a date", other.type_name()),
            );
        }
    };

    match DatePattern::parse(format).and_then(|pattern| pattern.format(&timestamp)) {
        Ok(text) => Converted::Value(text),
        Err(e) => degraded_date(field, format!("pattern '{format}': {e}")),
    }
}

fn degraded_date(field: &FieldConfig, reason: String) -> Converted {
    tracing::debug!(column = %field.column_name, reason = %reason, "Date not rendered");
    Converted::Degraded { reason }
}

fn unexpected(field: &FieldConfig, value: &Value) -> ConversionError {
    ConversionError::UnexpectedValue {
        column: field.column_name.clone(),
        declared: field.kind.tag(),
        actual: value.type_name(),
    }
}

fn error_chain(error: &dyn std::error::Error) -> String {
    let mut chain = vec![error.to_string()];
    let mut source = error.source();
    while let Some(cause) = source {
        chain.push(cause.to_string());
        source = cause.source();
    }
    chain.join("\n")
}
