//! Entity registry and attribute accessors
//!
//! Records carry no static shape. Each entity type instead registers its
//! attribute names once at startup, and configured field names are resolved
//! against that registry into [`Accessor`] handles. Resolution ignores case,
//! so a field configured as `FULLNAME` reads the `fullName` attribute.

use super::errors::{ConversionError, StoreError};
use super::ids::EntityName;
use super::record::Record;
use super::value::Value;
use std::collections::BTreeMap;

/// One readable attribute of an entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name as declared (canonical casing)
    pub name: String,

    /// Storage column backing the attribute
    pub column: String,
}

impl Attribute {
    /// Attribute stored in a column of the same name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            column: name.clone(),
            name,
        }
    }

    /// Attribute stored in a differently named column
    pub fn with_column(name: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column: column.into(),
        }
    }
}

/// Shape of one entity type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
    name: EntityName,
    table: String,
    attributes: Vec<Attribute>,
}

impl EntityDescriptor {
    /// Creates a descriptor; the table defaults to the lowercased entity name
    pub fn new(name: EntityName, attributes: Vec<Attribute>) -> Self {
        let table = name.as_str().to_lowercase();
        Self {
            name,
            table,
            attributes,
        }
    }

    /// Overrides the backing table name
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn name(&self) -> &EntityName {
        &self.name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Finds an attribute by case-insensitive name
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// Resolves a zero-argument accessor for `field`
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::AccessorNotFound`] when no attribute matches.
    pub fn accessor(&self, field: &str) -> Result<Accessor, ConversionError> {
        self.attribute(field)
            .map(|a| Accessor {
                entity: self.name.clone(),
                attribute: a.name.clone(),
            })
            .ok_or_else(|| ConversionError::AccessorNotFound {
                entity: self.name.to_string(),
                field: field.to_string(),
            })
    }
}

/// Resolved handle to one attribute of one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    entity: EntityName,
    attribute: String,
}

impl Accessor {
    /// Canonical attribute name
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn entity(&self) -> &EntityName {
        &self.entity
    }

    /// Reads the attribute; `None` means null
    pub fn read<'r>(&self, record: &'r Record) -> Option<&'r Value> {
        record.get(&self.attribute)
    }
}

/// All entity types known to one export run
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: BTreeMap<EntityName, EntityDescriptor>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a descriptor, replacing any previous one with the same name
    pub fn register(&mut self, descriptor: EntityDescriptor) {
        self.entities.insert(descriptor.name.clone(), descriptor);
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, descriptor: EntityDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    /// Looks up an entity by exact name
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownEntity`] if the entity was never registered.
    pub fn get(&self, name: &str) -> Result<&EntityDescriptor, StoreError> {
        self.entities
            .iter()
            .find(|(key, _)| key.as_str() == name)
            .map(|(_, d)| d)
            .ok_or_else(|| StoreError::UnknownEntity(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityDescriptor> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> EntityDescriptor {
        EntityDescriptor::new(
            EntityName::new("User").unwrap(),
            vec![
                Attribute::new("id"),
                Attribute::with_column("fullName", "full_name"),
            ],
        )
    }

    #[test]
    fn test_accessor_case_insensitive() {
        let descriptor = user();
        let accessor = descriptor.accessor("FULLNAME").unwrap();
        assert_eq!(accessor.attribute(), "fullName");
        assert_eq!(accessor.entity().as_str(), "User");
    }

    #[test]
    fn test_accessor_not_found() {
        let err = user().accessor("email").unwrap_err();
        assert!(matches!(err, ConversionError::AccessorNotFound { .. }));
        assert_eq!(err.to_string(), "No accessor 'email' on entity 'User'");
    }

    #[test]
    fn test_accessor_reads_record() {
        let descriptor = user();
        let record = Record::new(descriptor.name().clone()).with("fullName", "Alice");
        assert_eq!(
            descriptor.accessor("fullname").unwrap().read(&record),
            Some(&Value::from("Alice"))
        );
        assert_eq!(descriptor.accessor("id").unwrap().read(&record), None);
    }

    #[test]
    fn test_default_table_name() {
        assert_eq!(user().table(), "user");
        assert_eq!(user().with_table("app_users").table(), "app_users");
    }

    #[test]
    fn test_registry_lookup_is_exact() {
        let registry = EntityRegistry::new().with(user());
        assert!(registry.get("User").is_ok());
        assert!(matches!(
            registry.get("user"),
            Err(StoreError::UnknownEntity(_))
        ));
        assert_eq!(registry.len(), 1);
    }
}
