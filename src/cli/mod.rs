//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Rowpack using clap.

pub mod commands;

use crate::domain::RowpackError;
use clap::{Parser, Subcommand};

/// Exit code for a successful run
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for configuration errors
pub const EXIT_CONFIGURATION: i32 = 2;

/// Exit code for any other fatal error
pub const EXIT_FATAL: i32 = 5;

/// Rowpack - entity rows to zipped CSV
#[derive(Parser, Debug)]
#[command(name = "rowpack")]
#[command(version, about, long_about = None)]
#[command(author = "Rowpack Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "rowpack.toml", env = "ROWPACK_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ROWPACK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export the configured entity to a zipped CSV file
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

/// Maps an error to the process exit code
pub fn exit_code_for(error: &RowpackError) -> i32 {
    if error.is_configuration() {
        EXIT_CONFIGURATION
    } else {
        EXIT_FATAL
    }
}
