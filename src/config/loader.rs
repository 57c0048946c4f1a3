//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::RowpackConfig;
use super::secret::secret_string;
use crate::domain::errors::RowpackError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into RowpackConfig
/// 4. Applies environment variable overrides (ROWPACK_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`RowpackError::Configuration`] if the file cannot be read, a
/// referenced environment variable is missing, parsing fails or validation fails.
///
/// # Examples
///
/// ```no_run
/// use rowpack::config::loader::load_config;
///
/// let config = load_config("rowpack.toml").expect("Failed to load config");
/// println!("Exporting {}", config.export.entity);
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<RowpackConfig> {
    let config = parse_config(path)?;

    config.validate().map_err(|e| {
        RowpackError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Loads configuration without validating it
///
/// Used by commands that apply CLI overrides before validation.
///
/// # Errors
///
/// Same as [`load_config`], minus validation failures.
pub fn parse_config(path: impl AsRef<Path>) -> Result<RowpackConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(RowpackError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        RowpackError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: RowpackConfig = toml::from_str(&contents)
        .map_err(|e| RowpackError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    tracing::debug!(
        path = %path.display(),
        entity = %config.export.entity,
        fields = config.export.fields.len(),
        "Configuration parsed"
    );

    Ok(config)
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("environment variable pattern is valid")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied verbatim.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_var_pattern();
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(RowpackError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using ROWPACK_* prefix
///
/// Environment variables follow the pattern: ROWPACK_<SECTION>_<KEY>
/// For example: ROWPACK_EXPORT_MAX, ROWPACK_STORE_PATH
fn apply_env_overrides(config: &mut RowpackConfig) {
    if let Ok(val) = std::env::var("ROWPACK_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Export overrides
    if let Ok(val) = std::env::var("ROWPACK_EXPORT_MAX") {
        match val.parse() {
            Ok(max) => config.export.max = max,
            Err(_) => tracing::warn!(value = %val, "Ignoring non-numeric ROWPACK_EXPORT_MAX"),
        }
    }
    if let Ok(val) = std::env::var("ROWPACK_EXPORT_ENCODING") {
        config.export.encoding = Some(val);
    }
    if let Ok(val) = std::env::var("ROWPACK_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }
    if let Ok(val) = std::env::var("ROWPACK_EXPORT_FILE_NAME") {
        config.export.file_name = val;
    }

    // Store overrides
    if let Ok(val) = std::env::var("ROWPACK_STORE_PATH") {
        config.store.path = Some(val);
    }
    if let Ok(val) = std::env::var("ROWPACK_STORE_CONNECTION_STRING") {
        config.store.connection_string = Some(secret_string(val));
    }

    // Logging overrides
    if let Ok(val) = std::env::var("ROWPACK_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("ROWPACK_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
