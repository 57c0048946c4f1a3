//! PostgreSQL record store
//!
//! Serves query-by-example lookups from tables described by the entity
//! registry and appends diagnostic entries to a log table.

use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::postgresql::sql::{self, SqlParam};
use crate::adapters::store::traits::RecordStore;
use crate::domain::{EntityRegistry, Filter, LogEntry, Record, Result, StoreError};
use tokio_postgres::types::ToSql;

/// [`RecordStore`] backed by PostgreSQL tables
#[derive(Debug)]
pub struct PostgreSQLStore {
    client: PostgreSQLClient,
    registry: EntityRegistry,
    log_table: String,
}

impl PostgreSQLStore {
    pub fn new(client: PostgreSQLClient, registry: EntityRegistry, log_table: impl Into<String>) -> Self {
        Self {
            client,
            registry,
            log_table: log_table.into(),
        }
    }
}

fn as_refs(params: &[SqlParam]) -> Vec<&(dyn ToSql + Sync)> {
    params
        .iter()
        .map(|p| p.as_ref() as &(dyn ToSql + Sync))
        .collect()
}

impl RecordStore for PostgreSQLStore {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn find(&self, filter: &Filter, max: usize) -> Result<Vec<Record>> {
        let descriptor = self.registry.get(filter.entity().as_str())?;
        let (query, values) = sql::select(descriptor, filter, max)?;
        let statement = self.client.prepare(&query)?;

        let columns: Vec<&str> = filter.criteria().map(|(name, _)| name).collect();
        let params = values
            .iter()
            .zip(statement.params())
            .zip(columns)
            .map(|((value, ty), column)| sql::bind(column, value, ty))
            .collect::<std::result::Result<Vec<_>, StoreError>>()?;

        tracing::debug!(entity = %descriptor.name(), sql = %query, "Querying PostgreSQL");
        let rows = self.client.query(&statement, &as_refs(&params))?;

        let records = rows
            .iter()
            .map(|row| sql::record_from_row(descriptor, row))
            .collect::<std::result::Result<Vec<_>, StoreError>>()?;
        Ok(records)
    }

    fn append_log(&self, entry: &LogEntry) -> Result<()> {
        let statement = self
            .client
            .prepare(&sql::insert_log(&self.log_table))
            .map_err(|e| StoreError::AppendFailed(e.to_string()))?;
        let params = sql::log_params(entry);
        self.client
            .execute(&statement, &as_refs(&params))
            .map_err(|e| StoreError::AppendFailed(e.to_string()))?;
        Ok(())
    }
}
