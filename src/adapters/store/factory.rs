//! Record store factory
//!
//! Creates the record store selected by `[store] backend`.

use crate::adapters::jsonfile::JsonFileStore;
use crate::adapters::postgresql::{PostgreSQLClient, PostgreSQLStore};
use crate::adapters::store::traits::RecordStore;
use crate::config::schema::{StoreBackend, StoreConfig};
use crate::domain::{EntityRegistry, Result, RowpackError};
use secrecy::ExposeSecret;
use std::time::Duration;

/// Create a record store based on the configuration
///
/// # Arguments
///
/// * `config` - The `[store]` section
/// * `registry` - Entity types the store must serve
///
/// # Errors
///
/// Returns an error if the data file cannot be loaded or the database
/// cannot be reached.
pub fn create_record_store(
    config: &StoreConfig,
    registry: &EntityRegistry,
) -> Result<Box<dyn RecordStore>> {
    match config.backend {
        StoreBackend::Json => {
            let path = config.path.as_deref().ok_or_else(|| {
                RowpackError::Configuration("store.path is required when backend = 'json'".into())
            })?;

            tracing::info!(path = %path, "Creating JSON record store");
            let mut store = JsonFileStore::open(path, registry.clone())?;
            if let Some(log_path) = &config.log_path {
                store = store.with_log_path(log_path);
            }
            Ok(Box::new(store))
        }
        StoreBackend::PostgreSQL => {
            let connection_string = config.connection_string.as_ref().ok_or_else(|| {
                RowpackError::Configuration(
                    "store.connection_string is required when backend = 'postgresql'".into(),
                )
            })?;
            let connection_string: &str = connection_string.expose_secret().as_ref();

            tracing::info!("Creating PostgreSQL record store");
            let client = PostgreSQLClient::connect(
                connection_string,
                Duration::from_secs(config.connect_timeout_seconds),
            )?;
            client.test_connection()?;
            Ok(Box::new(PostgreSQLStore::new(
                client,
                registry.clone(),
                config.log_table.clone(),
            )))
        }
    }
}
