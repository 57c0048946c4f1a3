//! SQL building and value mapping for the PostgreSQL store
//!
//! Filters become `WHERE col = $n` clauses over quoted identifiers. Parameter
//! values are converted to the exact Rust type the prepared statement expects,
//! and result columns are mapped back to [`Value`]s by their PostgreSQL type.

use crate::domain::{EntityDescriptor, Filter, LogEntry, Record, StoreError, Value};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tokio_postgres::types::{ToSql, Type};
use tokio_postgres::Row;

/// Boxed statement parameter
pub type SqlParam = Box<dyn ToSql + Sync + Send>;

/// Quotes an identifier, keeping `schema.table` qualification
pub fn quote_ident(ident: &str) -> String {
    ident
        .split('.')
        .map(|part| format!("\"{}\"", part.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(".")
}

/// Builds the SELECT for a filter
///
/// Columns are selected in attribute declaration order. Returns the SQL and
/// the criterion values in placeholder order.
///
/// # Errors
///
/// Returns [`StoreError::UnknownAttribute`] if a criterion names an attribute
/// the entity does not declare.
pub fn select(
    descriptor: &EntityDescriptor,
    filter: &Filter,
    max: usize,
) -> Result<(String, Vec<Value>), StoreError> {
    let columns = descriptor
        .attributes()
        .iter()
        .map(|a| quote_ident(&a.column))
        .collect::<Vec<_>>()
        .join(", ");

    let mut sql = format!("SELECT {columns} FROM {}", quote_ident(descriptor.table()));
    let mut values = Vec::new();

    for (index, (name, value)) in filter.criteria().enumerate() {
        let attribute =
            descriptor
                .attribute(name)
                .ok_or_else(|| StoreError::UnknownAttribute {
                    entity: descriptor.name().to_string(),
                    attribute: name.to_string(),
                })?;
        sql.push_str(if index == 0 { " WHERE " } else { " AND " });
        sql.push_str(&format!("{} = ${}", quote_ident(&attribute.column), index + 1));
        values.push(value.clone());
    }

    sql.push_str(&format!(" LIMIT {max}"));
    Ok((sql, values))
}

/// Builds the INSERT for a diagnostic entry
pub fn insert_log(table: &str) -> String {
    format!(
        "INSERT INTO {} (\"object_name\", \"method_name\", \"stack_trace\", \"message\", \"created\") \
         VALUES ($1, $2, $3, $4, $5)",
        quote_ident(table)
    )
}

/// Parameters for [`insert_log`], in placeholder order
pub fn log_params(entry: &LogEntry) -> Vec<SqlParam> {
    vec![
        Box::new(entry.object_name.clone()),
        Box::new(entry.method_name.clone()),
        Box::new(entry.stack_trace.clone()),
        Box::new(entry.message.clone()),
        Box::new(entry.created),
    ]
}

/// Converts a criterion value to the parameter type the statement expects
///
/// # Errors
///
/// Returns [`StoreError::QueryFailed`] when the value cannot be represented
/// in the column's type.
pub fn bind(column: &str, value: &Value, ty: &Type) -> Result<SqlParam, StoreError> {
    let mismatch = || {
        StoreError::QueryFailed(format!(
            "cannot compare column '{column}' of type {ty} with {} value '{value}'",
            value.type_name()
        ))
    };

    let param: SqlParam = match (value, ty) {
        (Value::Integer(i), t) if *t == Type::INT2 => {
            Box::new(i16::try_from(*i).map_err(|_| mismatch())?)
        }
        (Value::Integer(i), t) if *t == Type::INT4 => {
            Box::new(i32::try_from(*i).map_err(|_| mismatch())?)
        }
        (Value::Integer(i), t) if *t == Type::INT8 => Box::new(*i),
        (Value::Integer(i), t) if *t == Type::FLOAT8 => Box::new(*i as f64),
        (Value::Float(f), t) if *t == Type::FLOAT8 => Box::new(*f),
        (Value::Float(f), t) if *t == Type::FLOAT4 => Box::new(*f as f32),
        (Value::Boolean(b), t) if *t == Type::BOOL => Box::new(*b),
        (Value::Text(s), t) if is_text(t) => Box::new(s.clone()),
        (Value::Timestamp(ts), t) if *t == Type::TIMESTAMPTZ => Box::new(*ts),
        (Value::Timestamp(ts), t) if *t == Type::TIMESTAMP => Box::new(ts.naive_utc()),
        (Value::Timestamp(ts), t) if *t == Type::DATE => Box::new(ts.date_naive()),
        _ => return Err(mismatch()),
    };
    Ok(param)
}

fn is_text(ty: &Type) -> bool {
    [Type::TEXT, Type::VARCHAR, Type::BPCHAR, Type::NAME].contains(ty)
}

/// Maps a result row to a record
///
/// Row columns are expected in attribute declaration order, as produced by
/// [`select`]. SQL `NULL` leaves the attribute unset.
///
/// # Errors
///
/// Returns [`StoreError::UnsupportedColumnType`] for column types without a
/// [`Value`] counterpart, or [`StoreError::QueryFailed`] if decoding fails.
pub fn record_from_row(descriptor: &EntityDescriptor, row: &Row) -> Result<Record, StoreError> {
    let mut record = Record::new(descriptor.name().clone());
    for (index, (attribute, column)) in descriptor
        .attributes()
        .iter()
        .zip(row.columns())
        .enumerate()
    {
        let ty = column.type_();
        let decode_err = |e: tokio_postgres::Error| {
            StoreError::QueryFailed(format!("failed to decode column '{}': {e}", column.name()))
        };

        let value = if *ty == Type::INT2 {
            row.try_get::<_, Option<i16>>(index)
                .map_err(decode_err)?
                .map(|v| Value::Integer(i64::from(v)))
        } else if *ty == Type::INT4 {
            row.try_get::<_, Option<i32>>(index)
                .map_err(decode_err)?
                .map(|v| Value::Integer(i64::from(v)))
        } else if *ty == Type::INT8 {
            row.try_get::<_, Option<i64>>(index)
                .map_err(decode_err)?
                .map(Value::Integer)
        } else if *ty == Type::FLOAT4 {
            row.try_get::<_, Option<f32>>(index)
                .map_err(decode_err)?
                .map(|v| Value::Float(f64::from(v)))
        } else if *ty == Type::FLOAT8 {
            row.try_get::<_, Option<f64>>(index)
                .map_err(decode_err)?
                .map(Value::Float)
        } else if *ty == Type::BOOL {
            row.try_get::<_, Option<bool>>(index)
                .map_err(decode_err)?
                .map(Value::Boolean)
        } else if is_text(ty) {
            row.try_get::<_, Option<String>>(index)
                .map_err(decode_err)?
                .map(Value::Text)
        } else if *ty == Type::TIMESTAMPTZ {
            row.try_get::<_, Option<DateTime<Utc>>>(index)
                .map_err(decode_err)?
                .map(Value::Timestamp)
        } else if *ty == Type::TIMESTAMP {
            row.try_get::<_, Option<NaiveDateTime>>(index)
                .map_err(decode_err)?
                .map(|v| Value::Timestamp(v.and_utc()))
        } else if *ty == Type::DATE {
            row.try_get::<_, Option<NaiveDate>>(index)
                .map_err(decode_err)?
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|v| Value::Timestamp(v.and_utc()))
        } else {
            return Err(StoreError::UnsupportedColumnType {
                column: column.name().to_string(),
                column_type: ty.to_string(),
            });
        };

        if let Some(value) = value {
            record.set(attribute.name.as_str(), value);
        }
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Attribute, EntityName};
    use chrono::TimeZone;

    fn user() -> EntityDescriptor {
        EntityDescriptor::new(
            EntityName::new("User").unwrap(),
            vec![
                Attribute::new("id"),
                Attribute::with_column("fullName", "full_name"),
            ],
        )
        .with_table("crm.app_user")
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("users"), "\"users\"");
        assert_eq!(quote_ident("crm.users"), "\"crm\".\"users\"");
        assert_eq!(quote_ident("odd\"name"), "\"odd\"\"name\"");
    }

    #[test]
    fn test_select_match_all() {
        let filter = Filter::all(EntityName::new("User").unwrap());
        let (sql, values) = select(&user(), &filter, 500).unwrap();
        assert_eq!(
            sql,
            "SELECT \"id\", \"full_name\" FROM \"crm\".\"app_user\" LIMIT 500"
        );
        assert!(values.is_empty());
    }

    #[test]
    fn test_select_with_criteria_uses_columns() {
        let filter = Filter::all(EntityName::new("User").unwrap())
            .with("fullName", "Alice")
            .with("id", 2);
        let (sql, values) = select(&user(), &filter, 1).unwrap();
        assert_eq!(
            sql,
            "SELECT \"id\", \"full_name\" FROM \"crm\".\"app_user\" \
             WHERE \"full_name\" = $1 AND \"id\" = $2 LIMIT 1"
        );
        assert_eq!(values, vec![Value::from("Alice"), Value::Integer(2)]);
    }

    #[test]
    fn test_select_unknown_attribute() {
        let filter = Filter::all(EntityName::new("User").unwrap()).with("email", "x");
        assert!(matches!(
            select(&user(), &filter, 1),
            Err(StoreError::UnknownAttribute { .. })
        ));
    }

    #[test]
    fn test_bind_narrows_integers() {
        let param = bind("id", &Value::Integer(7), &Type::INT4).unwrap();
        assert_eq!(format!("{param:?}"), "7");

        let overflow = bind("id", &Value::Integer(i64::MAX), &Type::INT4);
        assert!(overflow.is_err());
    }

    #[test]
    fn test_bind_type_mismatch() {
        let err = bind("id", &Value::from("7"), &Type::INT8).unwrap_err();
        assert!(err.to_string().contains("cannot compare column 'id'"));
    }

    #[test]
    fn test_bind_timestamp_variants() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert!(bind("created", &Value::Timestamp(ts), &Type::TIMESTAMPTZ).is_ok());
        assert!(bind("created", &Value::Timestamp(ts), &Type::TIMESTAMP).is_ok());
        assert!(bind("created", &Value::Timestamp(ts), &Type::DATE).is_ok());
        assert!(bind("created", &Value::Timestamp(ts), &Type::TEXT).is_err());
    }

    #[test]
    fn test_insert_log_statement() {
        assert_eq!(
            insert_log("log_message"),
            "INSERT INTO \"log_message\" (\"object_name\", \"method_name\", \"stack_trace\", \
             \"message\", \"created\") VALUES ($1, $2, $3, $4, $5)"
        );
        let entry = LogEntry::new("FieldConverter", "lookup", "miss");
        assert_eq!(log_params(&entry).len(), 5);
    }
}
