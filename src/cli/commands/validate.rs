//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Rowpack configuration file.

use crate::cli::{EXIT_CONFIGURATION, EXIT_SUCCESS};
use crate::config::{load_config, FieldKind, RowpackConfig, StoreBackend};
use crate::core::export::resolve_encoding;
use crate::domain::EntityRegistry;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIGURATION);
            }
        };

        let registry = match config.registry() {
            Ok(registry) => registry,
            Err(e) => {
                println!("❌ Invalid entity declarations");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIGURATION);
            }
        };

        let problems = check_fields(&config, &registry);
        if !problems.is_empty() {
            println!("❌ Export fields do not match the entity declarations");
            for problem in &problems {
                println!("   Error: {problem}");
            }
            return Ok(EXIT_CONFIGURATION);
        }

        println!("✅ Configuration is valid");
        println!();
        print_summary(&config);

        for entity in config.undeclared_lookup_entities() {
            println!("⚠️  Lookup entity '{entity}' is not declared; its cells will be empty");
        }
        println!();
        Ok(EXIT_SUCCESS)
    }
}

/// Fields whose source attribute cannot be read
///
/// Missing attributes on lookup fields only degrade cells, so they are not
/// reported here.
fn check_fields(config: &RowpackConfig, registry: &EntityRegistry) -> Vec<String> {
    let descriptor = match registry.get(&config.export.entity) {
        Ok(descriptor) => descriptor,
        Err(e) => return vec![e.to_string()],
    };

    config
        .export
        .fields
        .iter()
        .filter(|field| !matches!(field.kind, FieldKind::Lookup(_)))
        .filter_map(|field| descriptor.accessor(&field.field_name).err())
        .map(|e| e.to_string())
        .collect()
}

fn print_summary(config: &RowpackConfig) {
    let export = &config.export;
    println!("Configuration Summary:");
    println!("  Log Level: {}", config.application.log_level);
    println!("  Entity: {}", export.entity);
    println!("  Archive: {}/{}.zip", export.output_dir, export.file_name);
    println!("  Max Rows: {}", export.max);
    println!(
        "  Encoding: {}",
        resolve_encoding(export.encoding.as_deref()).name()
    );
    match config.store.backend {
        StoreBackend::Json => {
            println!("  Store: JSON file");
            println!(
                "  Data File: {}",
                config.store.path.as_deref().unwrap_or_default()
            );
        }
        StoreBackend::PostgreSQL => {
            println!("  Store: PostgreSQL");
            println!("  Log Table: {}", config.store.log_table);
        }
    }
    println!("  Entities: {}", config.entities.len());
    println!("  Fields:");
    for field in &export.fields {
        println!(
            "    {} <- {} ({})",
            field.column_name, field.field_name, field.kind
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
[export]
entity = "Customer"
file_name = "customers"
max = 100

[[export.fields]]
field_name = "id"
data_type = "Integer"

[[export.fields]]
field_name = "managerId"
data_type = "Lookup"
lookup_entity = "User"
target_field = "id"
lookup_field = "fullName"

[store]
backend = "json"
path = "data.json"

[[entities]]
name = "Customer"
attributes = [{ name = "id" }]
"#;

    fn write(dir: &TempDir, contents: &str) -> String {
        let path = dir.path().join("rowpack.toml");
        std::fs::write(&path, contents).unwrap();
        path.display().to_string()
    }

    #[test]
    fn test_valid_config() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, CONFIG);
        assert_eq!(ValidateArgs {}.execute(&path).unwrap(), EXIT_SUCCESS);
    }

    #[test]
    fn test_missing_file() {
        let code = ValidateArgs {}
            .execute("/nonexistent/rowpack.toml")
            .unwrap();
        assert_eq!(code, EXIT_CONFIGURATION);
    }

    #[test]
    fn test_unresolvable_field_rejected() {
        let dir = TempDir::new().unwrap();
        let contents = CONFIG.replace("field_name = \"id\"", "field_name = \"email\"");
        let path = write(&dir, &contents);
        assert_eq!(ValidateArgs {}.execute(&path).unwrap(), EXIT_CONFIGURATION);
    }

    #[test]
    fn test_check_fields_ignores_lookup_sources() {
        let dir = TempDir::new().unwrap();
        let config = parse_config(write(&dir, CONFIG)).unwrap();
        let registry = config.registry().unwrap();
        assert!(check_fields(&config, &registry).is_empty());
    }
}
