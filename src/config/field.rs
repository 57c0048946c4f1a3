//! Field configuration
//!
//! Each `[[export.fields]]` entry maps one record attribute to one output column.
//! The `data_type` tag is parsed into the closed [`FieldKind`] enum, with each
//! variant carrying only the settings it needs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Target of a `Lookup` field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupSpec {
    /// Entity holding the referenced records
    pub entity: String,

    /// Key attribute on the lookup entity that receives the foreign key
    pub target_field: String,

    /// Attribute read off the resolved lookup record
    pub lookup_field: String,
}

/// Declared display type of a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Text passed through unchanged
    String,
    /// Whole number rendered in decimal
    Integer,
    /// Timestamp rendered with a date pattern such as `yyyy-MM-dd`
    Date { format: String },
    /// Foreign key resolved to an attribute of another entity
    Lookup(LookupSpec),
}

impl FieldKind {
    /// Tag as written in configuration files
    pub fn tag(&self) -> &'static str {
        match self {
            FieldKind::String => "String",
            FieldKind::Integer => "Integer",
            FieldKind::Date { .. } => "Date",
            FieldKind::Lookup(_) => "Lookup",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Date { format } => write!(f, "Date({format})"),
            FieldKind::Lookup(spec) => write!(
                f,
                "Lookup({}.{} -> {})",
                spec.entity, spec.target_field, spec.lookup_field
            ),
            other => f.write_str(other.tag()),
        }
    }
}

/// One output column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFieldConfig", into = "RawFieldConfig")]
pub struct FieldConfig {
    /// Source attribute on the record
    pub field_name: String,

    /// Header label
    pub column_name: String,

    pub kind: FieldKind,
}

impl FieldConfig {
    pub fn new(field_name: impl Into<String>, kind: FieldKind) -> Self {
        let field_name = field_name.into();
        Self {
            column_name: field_name.clone(),
            field_name,
            kind,
        }
    }

    pub fn string(field_name: impl Into<String>) -> Self {
        Self::new(field_name, FieldKind::String)
    }

    pub fn integer(field_name: impl Into<String>) -> Self {
        Self::new(field_name, FieldKind::Integer)
    }

    pub fn date(field_name: impl Into<String>, format: impl Into<String>) -> Self {
        Self::new(
            field_name,
            FieldKind::Date {
                format: format.into(),
            },
        )
    }

    pub fn lookup(
        field_name: impl Into<String>,
        entity: impl Into<String>,
        target_field: impl Into<String>,
        lookup_field: impl Into<String>,
    ) -> Self {
        Self::new(
            field_name,
            FieldKind::Lookup(LookupSpec {
                entity: entity.into(),
                target_field: target_field.into(),
                lookup_field: lookup_field.into(),
            }),
        )
    }

    /// Overrides the header label
    pub fn with_column_name(mut self, column_name: impl Into<String>) -> Self {
        self.column_name = column_name.into();
        self
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.field_name.trim().is_empty() {
            return Err("export.fields: field_name cannot be empty".to_string());
        }
        if self.column_name.is_empty() {
            return Err(format!(
                "export.fields '{}': column_name cannot be empty",
                self.field_name
            ));
        }
        match &self.kind {
            FieldKind::Date { format } if format.is_empty() => Err(format!(
                "export.fields '{}': Date fields require a non-empty format",
                self.field_name
            )),
            FieldKind::Lookup(spec)
                if spec.entity.is_empty()
                    || spec.target_field.is_empty()
                    || spec.lookup_field.is_empty() =>
            {
                Err(format!(
                    "export.fields '{}': Lookup fields require lookup_entity, target_field and lookup_field",
                    self.field_name
                ))
            }
            _ => Ok(()),
        }
    }
}

/// Flat on-disk shape of a field entry
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawFieldConfig {
    field_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    column_name: Option<String>,

    data_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    lookup_entity: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    target_field: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    lookup_field: Option<String>,
}

impl TryFrom<RawFieldConfig> for FieldConfig {
    type Error = String;

    fn try_from(raw: RawFieldConfig) -> Result<Self, Self::Error> {
        let required = |value: Option<String>, key: &str| {
            value.ok_or_else(|| {
                format!(
                    "field '{}' of type {} requires '{key}'",
                    raw.field_name, raw.data_type
                )
            })
        };

        let kind = match raw.data_type.as_str() {
            "String" => FieldKind::String,
            "Integer" => FieldKind::Integer,
            "Date" => FieldKind::Date {
                format: required(raw.format.clone(), "format")?,
            },
            "Lookup" => FieldKind::Lookup(LookupSpec {
                entity: required(raw.lookup_entity.clone(), "lookup_entity")?,
                target_field: required(raw.target_field.clone(), "target_field")?,
                lookup_field: required(raw.lookup_field.clone(), "lookup_field")?,
            }),
            other => {
                return Err(format!(
                    "field '{}' has unknown data_type '{other}'. Must be one of: String, Integer, Date, Lookup",
                    raw.field_name
                ))
            }
        };

        Ok(Self {
            column_name: raw.column_name.unwrap_or_else(|| raw.field_name.clone()),
            field_name: raw.field_name,
            kind,
        })
    }
}

impl From<FieldConfig> for RawFieldConfig {
    fn from(field: FieldConfig) -> Self {
        let data_type = field.kind.tag().to_string();
        let mut raw = RawFieldConfig {
            field_name: field.field_name,
            column_name: Some(field.column_name),
            data_type,
            format: None,
            lookup_entity: None,
            target_field: None,
            lookup_field: None,
        };
        match field.kind {
            FieldKind::Date { format } => raw.format = Some(format),
            FieldKind::Lookup(spec) => {
                raw.lookup_entity = Some(spec.entity);
                raw.target_field = Some(spec.target_field);
                raw.lookup_field = Some(spec.lookup_field);
            }
            FieldKind::String | FieldKind::Integer => {}
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    struct Fields {
        fields: Vec<FieldConfig>,
    }

    #[test]
    fn test_parse_all_kinds() {
        let parsed: Fields = toml::from_str(
            r#"
[[fields]]
field_name = "id"
data_type = "Integer"

[[fields]]
field_name = "signupDate"
column_name = "Signed up"
data_type = "Date"
format = "yyyy-MM-dd"

[[fields]]
field_name = "managerId"
data_type = "Lookup"
lookup_entity = "User"
target_field = "id"
lookup_field = "fullName"
"#,
        )
        .unwrap();

        assert_eq!(parsed.fields[0], FieldConfig::integer("id"));
        assert_eq!(
            parsed.fields[1],
            FieldConfig::date("signupDate", "yyyy-MM-dd").with_column_name("Signed up")
        );
        assert_eq!(
            parsed.fields[2],
            FieldConfig::lookup("managerId", "User", "id", "fullName")
        );
    }

    #[test]
    fn test_unknown_data_type_rejected() {
        let result: Result<Fields, _> = toml::from_str(
            r#"
[[fields]]
field_name = "score"
data_type = "Decimal"
"#,
        );
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown data_type 'Decimal'"));
    }

    #[test]
    fn test_date_requires_format() {
        let result: Result<Fields, _> = toml::from_str(
            r#"
[[fields]]
field_name = "created"
data_type = "Date"
"#,
        );
        assert!(result.unwrap_err().to_string().contains("requires 'format'"));
    }

    #[test]
    fn test_lookup_requires_all_settings() {
        let result: Result<Fields, _> = toml::from_str(
            r#"
[[fields]]
field_name = "managerId"
data_type = "Lookup"
lookup_entity = "User"
target_field = "id"
"#,
        );
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("requires 'lookup_field'"));
    }

    #[test]
    fn test_serialize_keeps_tag_and_settings() {
        let fields = Fields {
            fields: vec![FieldConfig::date("created", "dd.MM.yyyy")],
        };
        let text = toml::to_string(&fields).unwrap();
        assert!(text.contains("data_type = \"Date\""));
        assert!(text.contains("format = \"dd.MM.yyyy\""));
        let back: Fields = toml::from_str(&text).unwrap();
        assert_eq!(back.fields, fields.fields);
    }

    #[test]
    fn test_validate_empty_format() {
        assert!(FieldConfig::date("created", "").validate().is_err());
        assert!(FieldConfig::lookup("m", "", "id", "name").validate().is_err());
        assert!(FieldConfig::string("name").validate().is_ok());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(FieldKind::Integer.to_string(), "Integer");
        assert_eq!(
            FieldConfig::lookup("m", "User", "id", "fullName")
                .kind
                .to_string(),
            "Lookup(User.id -> fullName)"
        );
    }
}
