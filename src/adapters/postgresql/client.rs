//! PostgreSQL client
//!
//! Wraps a single `tokio_postgres` connection behind a blocking interface.
//! The client owns a current-thread runtime; the connection task is spawned
//! onto it and makes progress whenever a query is driven with `block_on`.

use crate::domain::{Result, RowpackError, StoreError};
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};
use tokio_postgres::types::ToSql;
use tokio_postgres::{NoTls, Row, Statement};

/// Blocking PostgreSQL client for Rowpack
pub struct PostgreSQLClient {
    runtime: Runtime,
    client: tokio_postgres::Client,
}

impl PostgreSQLClient {
    /// Connects to PostgreSQL
    ///
    /// # Arguments
    ///
    /// * `connection_string` - libpq-style or URL connection string
    /// * `connect_timeout` - upper bound for establishing the connection
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the connection string does not parse,
    /// or [`StoreError::ConnectionFailed`] if the server cannot be reached.
    pub fn connect(connection_string: &str, connect_timeout: Duration) -> Result<Self> {
        let mut pg_config: tokio_postgres::Config = connection_string.parse().map_err(|e| {
            RowpackError::Configuration(format!("Invalid PostgreSQL connection string: {}", e))
        })?;
        pg_config.connect_timeout(connect_timeout);

        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| StoreError::ConnectionFailed(format!("Failed to start runtime: {}", e)))?;

        let (client, connection) = runtime
            .block_on(pg_config.connect(NoTls))
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        runtime.spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "PostgreSQL connection error");
            }
        });

        tracing::info!("PostgreSQL connection established");
        Ok(Self { runtime, client })
    }

    /// Runs `SELECT 1` to check the connection
    pub fn test_connection(&self) -> Result<()> {
        self.runtime
            .block_on(self.client.query_one("SELECT 1", &[]))
            .map_err(|e| StoreError::ConnectionFailed(format!("Connection test failed: {}", e)))?;
        tracing::debug!("PostgreSQL connection test successful");
        Ok(())
    }

    /// Prepares a statement so its parameter types are known
    pub fn prepare(&self, sql: &str) -> Result<Statement> {
        let statement = self
            .runtime
            .block_on(self.client.prepare(sql))
            .map_err(|e| StoreError::QueryFailed(format!("Failed to prepare '{}': {}", sql, e)))?;
        Ok(statement)
    }

    pub fn query(&self, statement: &Statement, params: &[&(dyn ToSql + Sync)]) -> Result<Vec<Row>> {
        let rows = self
            .runtime
            .block_on(self.client.query(statement, params))
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        Ok(rows)
    }

    pub fn execute(&self, statement: &Statement, params: &[&(dyn ToSql + Sync)]) -> Result<u64> {
        let affected = self
            .runtime
            .block_on(self.client.execute(statement, params))
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        Ok(affected)
    }
}

impl std::fmt::Debug for PostgreSQLClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgreSQLClient")
            .field("closed", &self.client.is_closed())
            .finish()
    }
}
