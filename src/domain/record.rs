//! Dynamically typed records and query-by-example filters

use super::ids::EntityName;
use super::value::Value;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// One entity instance
///
/// Attributes are keyed by their canonical name; an absent key is null.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    entity: EntityName,
    values: BTreeMap<String, Value>,
}

impl Record {
    /// Creates a record with every attribute null
    pub fn new(entity: EntityName) -> Self {
        Self {
            entity,
            values: BTreeMap::new(),
        }
    }

    /// Sets an attribute, builder style
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(attribute, value);
        self
    }

    pub fn set(&mut self, attribute: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(attribute.into(), value.into());
    }

    pub fn entity(&self) -> &EntityName {
        &self.entity
    }

    /// Reads an attribute by canonical name
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.values.get(attribute)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Query-by-example filter
///
/// Names the entity to search and the attribute values a record must carry.
/// A filter without criteria matches every record of the entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    entity: EntityName,
    criteria: BTreeMap<String, Value>,
}

impl Filter {
    /// Matches every record of `entity`
    pub fn all(entity: EntityName) -> Self {
        Self {
            entity,
            criteria: BTreeMap::new(),
        }
    }

    /// Adds an equality criterion
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.criteria.insert(attribute.into(), value.into());
        self
    }

    pub fn entity(&self) -> &EntityName {
        &self.entity
    }

    pub fn criteria(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.criteria.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether `record` satisfies every criterion
    ///
    /// Attribute names compare case-insensitively, values via [`Value::matches`].
    pub fn matches(&self, record: &Record) -> bool {
        record.entity() == &self.entity
            && self.criteria.iter().all(|(name, expected)| {
                record
                    .attributes()
                    .find(|(attr, _)| attr.eq_ignore_ascii_case(name))
                    .is_some_and(|(_, actual)| actual.matches(expected))
            })
    }
}

/// Diagnostic entry appended to the store when a field degrades
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    /// Component that raised the entry
    pub object_name: String,

    /// Operation inside the component
    pub method_name: String,

    /// Error chain, outermost first
    pub stack_trace: Option<String>,

    /// Human-readable description with the offending configuration
    pub message: String,

    pub created: DateTime<Utc>,
}

impl LogEntry {
    pub fn new(
        object_name: impl Into<String>,
        method_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            object_name: object_name.into(),
            method_name: method_name.into(),
            stack_trace: None,
            message: message.into(),
            created: Utc::now(),
        }
    }

    pub fn with_stack_trace(mut self, stack_trace: impl Into<String>) -> Self {
        self.stack_trace = Some(stack_trace.into());
        self
    }
}
