//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{EraserConfig, StoreKind};
use crate::domain::errors::EraserError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into EraserConfig
/// 4. Applies environment variable overrides (ERASER_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`EraserError::Configuration`] if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use gdpr_eraser::config::loader::load_config;
///
/// let config = load_config("gdpr-eraser.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<EraserConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(EraserError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        EraserError::Configuration(format!(
            "Failed to read configuration file {}: {e}",
            path.display()
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: EraserConfig = toml::from_str(&contents)
        .map_err(|e| EraserError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        EraserError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| EraserError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(EraserError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| EraserError::Configuration(format!("Invalid {name} value: '{value}'")))
}

/// Applies environment variable overrides using the ERASER_* prefix
///
/// Variables follow the pattern `ERASER_<SECTION>_<KEY>`, for example
/// `ERASER_STORE_PATH` or `ERASER_APPLICATION_DRY_RUN`.
fn apply_env_overrides(config: &mut EraserConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("ERASER_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("ERASER_APPLICATION_DRY_RUN") {
        config.application.dry_run = parse_env("ERASER_APPLICATION_DRY_RUN", &val)?;
    }

    // Store overrides
    if let Ok(val) = std::env::var("ERASER_STORE_KIND") {
        config.store.kind = match val.to_lowercase().as_str() {
            "json_file" => StoreKind::JsonFile,
            "memory" => StoreKind::Memory,
            _ => {
                return Err(EraserError::Configuration(format!(
                    "Invalid ERASER_STORE_KIND '{val}'. Must be one of: json_file, memory"
                )))
            }
        };
    }
    if let Ok(val) = std::env::var("ERASER_STORE_PATH") {
        config.store.path = PathBuf::from(val);
    }

    // Anonymization and audit overrides
    config
        .anonymization
        .apply_env_overrides()
        .map_err(|e| EraserError::Configuration(format!("{e:#}")))?;
    config
        .audit
        .apply_env_overrides()
        .map_err(|e| EraserError::Configuration(format!("{e:#}")))?;

    // Logging overrides
    if let Ok(val) = std::env::var("ERASER_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_env("ERASER_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("ERASER_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("ERASER_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("ERASER_LOADER_TEST_VAR", "test_value");
        let input = "path = \"${ERASER_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "path = \"test_value\"");
        std::env::remove_var("ERASER_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        let input = "path = \"${ERASER_LOADER_MISSING_VAR}\"";
        let result = substitute_env_vars(input);
        assert!(matches!(
            result,
            Err(EraserError::Configuration(ref m)) if m.contains("ERASER_LOADER_MISSING_VAR")
        ));
    }

    #[test]
    fn test_substitute_skips_comments() {
        let input = "# path = \"${ERASER_LOADER_COMMENTED_VAR}\"\nkind = \"memory\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, input);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[store]
kind = "memory"

[audit]
enabled = false

[registry.user]
properties = [
    { name = "mail", strategy = "hash" },
    { name = "name", strategy = "randomize" },
]
fields = [
    { name = "field_phone", strategy = "clear", scope = "multivalue" },
]
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.store.kind, StoreKind::Memory);
        assert_eq!(config.registry["user"].properties.len(), 2);
        assert_eq!(config.registry["user"].fields[0].field_name, "field_phone");
    }

    #[test]
    fn test_load_config_rejects_unknown_strategy() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(
                b"[registry.user]\nproperties = [{ name = \"mail\", strategy = \"scramble\" }]\n",
            )
            .unwrap();
        temp_file.flush().unwrap();

        assert!(matches!(
            load_config(temp_file.path()),
            Err(EraserError::Configuration(_))
        ));
    }
}
