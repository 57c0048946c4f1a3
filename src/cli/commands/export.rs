//! Export command implementation
//!
//! This module implements the `export` command: load the configuration,
//! open the record store and write the archive.

use crate::adapters::store::create_record_store;
use crate::cli::{exit_code_for, EXIT_CONFIGURATION, EXIT_SUCCESS};
use crate::config::{parse_config, RowpackConfig};
use crate::core::export::{export, ExportSummary};
use crate::log_error_with_context;
use clap::Args;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Override the maximum number of rows
    #[arg(long)]
    pub max: Option<usize>,

    /// Override the output directory
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Override the CSV text encoding
    #[arg(long)]
    pub encoding: Option<String>,
}

impl ExportArgs {
    /// Execute the export command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Starting export command");

        let mut config = match parse_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                log_error_with_context!(&e, "Failed to load configuration");
                eprintln!("❌ {e}");
                return Ok(exit_code_for(&e));
            }
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("❌ Configuration validation failed: {e}");
            return Ok(EXIT_CONFIGURATION);
        }

        let registry = match config.registry() {
            Ok(registry) => registry,
            Err(e) => {
                tracing::error!(error = %e, "Invalid entity declarations");
                eprintln!("❌ Invalid entity declarations: {e}");
                return Ok(EXIT_CONFIGURATION);
            }
        };

        for entity in config.undeclared_lookup_entities() {
            tracing::warn!(
                lookup_entity = %entity,
                "Lookup entity is not declared, its cells will be empty"
            );
        }

        let store = match create_record_store(&config.store, &registry) {
            Ok(store) => store,
            Err(e) => {
                log_error_with_context!(&e, "Failed to open record store");
                eprintln!("❌ Failed to open record store: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        println!("🚀 Exporting {}...", config.export.entity);
        match export(&config.export, &registry, &store) {
            Ok(summary) => {
                summary.log_summary();
                print_summary(&summary);
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                log_error_with_context!(&e, "Export failed");
                eprintln!("❌ Export failed: {e}");
                Ok(exit_code_for(&e))
            }
        }
    }

    fn apply_overrides(&self, config: &mut RowpackConfig) {
        if let Some(max) = self.max {
            tracing::info!(max, "Overriding max rows from CLI");
            config.export.max = max;
        }
        if let Some(output_dir) = &self.output_dir {
            tracing::info!(output_dir = %output_dir, "Overriding output directory from CLI");
            config.export.output_dir = output_dir.clone();
        }
        if let Some(encoding) = &self.encoding {
            tracing::info!(encoding = %encoding, "Overriding encoding from CLI");
            config.export.encoding = Some(encoding.clone());
        }
    }
}

fn print_summary(summary: &ExportSummary) {
    println!();
    match &summary.archive {
        Some(path) => println!("✅ Export completed: {}", path.display()),
        None => println!("✅ No {} records found, nothing written", summary.entity),
    }
    println!("  Records found: {}", summary.records_found);
    println!("  Rows written: {}", summary.rows_written);
    if summary.archive.is_some() {
        println!("  Encoding: {}", summary.encoding);
    }
    println!("  Empty cells after failures: {}", summary.degraded.len());
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    for degraded in summary.degraded.iter().take(10) {
        println!(
            "    row {} column '{}': {}",
            degraded.row, degraded.column, degraded.reason
        );
    }
    if summary.degraded.len() > 10 {
        println!("    ... and {} more", summary.degraded.len() - 10);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
[export]
entity = "Customer"
file_name = "customers"
max = 100

[[export.fields]]
field_name = "id"
data_type = "Integer"

[store]
backend = "json"
path = "data.json"

[[entities]]
name = "Customer"
attributes = [{ name = "id" }]
"#;

    fn write_config(dir: &TempDir, data_path: &str) -> String {
        let path = dir.path().join("rowpack.toml");
        let contents = CONFIG.replace("data.json", data_path);
        std::fs::write(&path, contents).unwrap();
        path.display().to_string()
    }

    #[test]
    fn test_apply_overrides() {
        let dir = TempDir::new().unwrap();
        let mut config = parse_config(write_config(&dir, "data.json")).unwrap();
        let args = ExportArgs {
            max: Some(5),
            output_dir: Some("out".to_string()),
            encoding: Some("latin1".to_string()),
        };
        args.apply_overrides(&mut config);
        assert_eq!(config.export.max, 5);
        assert_eq!(config.export.output_dir, "out");
        assert_eq!(config.export.encoding.as_deref(), Some("latin1"));
    }

    #[test]
    fn test_execute_writes_archive() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data.json");
        std::fs::write(&data, r#"{"Customer": [{"id": 1}]}"#).unwrap();
        let config_path = write_config(&dir, &data.display().to_string());
        let out = dir.path().join("out");

        let args = ExportArgs {
            max: None,
            output_dir: Some(out.display().to_string()),
            encoding: None,
        };
        assert_eq!(args.execute(&config_path).unwrap(), EXIT_SUCCESS);
        assert!(out.join("customers.zip").exists());
    }

    #[test]
    fn test_execute_invalid_override_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(&dir, "data.json");
        let args = ExportArgs {
            max: Some(0),
            output_dir: None,
            encoding: None,
        };
        assert_eq!(args.execute(&config_path).unwrap(), EXIT_CONFIGURATION);
    }

    #[test]
    fn test_execute_missing_data_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let config_path = write_config(&dir, "/nonexistent/rowpack-data.json");
        let args = ExportArgs {
            max: None,
            output_dir: None,
            encoding: None,
        };
        assert_eq!(args.execute(&config_path).unwrap(), crate::cli::EXIT_FATAL);
    }
}
