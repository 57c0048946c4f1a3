//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::{EXIT_CONFIGURATION, EXIT_FATAL, EXIT_SUCCESS};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "rowpack.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Rowpack configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIGURATION);
        }

        match fs::write(&self.output, sample_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Declare your entities and export fields in {}", self.output);
                println!("  2. Point [store] at a JSON data file or a PostgreSQL database");
                println!("  3. Validate configuration: rowpack validate-config");
                println!("  4. Run export: rowpack export");
                println!();
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(EXIT_FATAL)
            }
        }
    }
}

/// Sample configuration written by `rowpack init`
pub fn sample_config() -> &'static str {
    r#"# Rowpack Configuration File
# Exports one entity to <output_dir>/<file_name>.zip holding <file_name>.csv

[application]
log_level = "info"  # trace | debug | info | warn | error

[export]
entity = "Customer"
file_name = "customers"
max = 10000
encoding = "UTF-8"  # any WHATWG label, e.g. windows-1252, latin1, shift_jis
output_dir = "."

# One [[export.fields]] entry per CSV column, in column order.
# data_type: String | Integer | Date (needs format) | Lookup (needs lookup_* settings)

[[export.fields]]
field_name = "id"
data_type = "Integer"

[[export.fields]]
field_name = "fullName"
column_name = "Name"
data_type = "String"

[[export.fields]]
field_name = "signupDate"
data_type = "Date"
format = "yyyy-MM-dd"

[[export.fields]]
field_name = "managerId"
column_name = "Manager"
data_type = "Lookup"
lookup_entity = "User"
target_field = "id"
lookup_field = "fullName"

[store]
backend = "json"  # json | postgresql
path = "data.json"
# log_path = "rowpack-lookups.jsonl"

# PostgreSQL alternative:
# backend = "postgresql"
# connection_string = "${ROWPACK_PG_URL}"
# connect_timeout_seconds = 30
# log_table = "log_message"

[[entities]]
name = "Customer"
table = "customer"
attributes = [
    { name = "id" },
    { name = "fullName", column = "full_name" },
    { name = "signupDate", column = "signup_date" },
    { name = "managerId", column = "manager_id" },
]

[[entities]]
name = "User"
table = "crm_user"
attributes = [
    { name = "id" },
    { name = "fullName", column = "full_name" },
]

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"  # daily | hourly | never
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RowpackConfig;
    use tempfile::TempDir;

    #[test]
    fn test_sample_config_is_valid() {
        let config: RowpackConfig = toml::from_str(sample_config()).unwrap();
        config.validate().unwrap();
        assert_eq!(config.export.fields.len(), 4);
        assert!(config.undeclared_lookup_entities().is_empty());
    }

    #[test]
    fn test_init_writes_file() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("rowpack.toml");
        let args = InitArgs {
            output: output.display().to_string(),
            force: false,
        };
        assert_eq!(args.execute().unwrap(), EXIT_SUCCESS);
        assert_eq!(fs::read_to_string(&output).unwrap(), sample_config());
    }

    #[test]
    fn test_init_refuses_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("rowpack.toml");
        fs::write(&output, "keep me").unwrap();

        let args = InitArgs {
            output: output.display().to_string(),
            force: false,
        };
        assert_eq!(args.execute().unwrap(), EXIT_CONFIGURATION);
        assert_eq!(fs::read_to_string(&output).unwrap(), "keep me");

        let args = InitArgs {
            output: output.display().to_string(),
            force: true,
        };
        assert_eq!(args.execute().unwrap(), EXIT_SUCCESS);
    }
}
