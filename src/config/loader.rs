//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{ExporterConfig, LegacyFsResolverConfig, ResolverKind};
use super::secret::secret_string;
use crate::domain::errors::MigrationError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ExporterConfig
/// 4. Applies environment variable overrides (FEDORA_EXPORT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns a `Configuration` error if the file cannot be read or parsed, a
/// referenced environment variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use fedora_export::config::loader::load_config;
///
/// let config = load_config("fedora-export.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ExporterConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MigrationError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        MigrationError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: ExporterConfig = toml::from_str(&contents)
        .map_err(|e| MigrationError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        MigrationError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| MigrationError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        // Comment lines are copied untouched
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
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(MigrationError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using FEDORA_EXPORT_* prefix
///
/// Environment variables follow the pattern: FEDORA_EXPORT_<SECTION>_<KEY>
/// For example: FEDORA_EXPORT_SOURCE_HOST, FEDORA_EXPORT_RESOLVER_KIND
fn apply_env_overrides(config: &mut ExporterConfig) -> Result<()> {
    if let Ok(val) = std::env::var("FEDORA_EXPORT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Export overrides
    if let Ok(val) = std::env::var("FEDORA_EXPORT_EXPORT_MANIFEST_PATH") {
        config.export.manifest_path = PathBuf::from(val);
    }
    if let Ok(val) = std::env::var("FEDORA_EXPORT_EXPORT_TARGET_DIR") {
        config.export.target_dir = PathBuf::from(val);
    }
    if let Ok(val) = std::env::var("FEDORA_EXPORT_EXPORT_INDEX_FILE") {
        config.export.index_file = Some(PathBuf::from(val));
    }
    if let Ok(val) = std::env::var("FEDORA_EXPORT_EXPORT_FOXML_BASE_DIR") {
        config.export.foxml_base_dir = Some(PathBuf::from(val));
    }

    if let Ok(val) = std::env::var("FEDORA_EXPORT_SOURCE_HOST") {
        config.source.host = val;
    }

    // Resolver overrides
    if let Ok(val) = std::env::var("FEDORA_EXPORT_RESOLVER_KIND") {
        config.resolver.kind = match val.to_lowercase().as_str() {
            "http" => ResolverKind::Http,
            "legacy_fs" => ResolverKind::LegacyFs,
            other => {
                return Err(MigrationError::Configuration(format!(
                    "Invalid FEDORA_EXPORT_RESOLVER_KIND '{other}'. Must be one of: http, legacy_fs"
                )))
            }
        };
    }
    if let Ok(val) = std::env::var("FEDORA_EXPORT_RESOLVER_LEGACY_FS_ROOT") {
        config.resolver.legacy_fs = Some(LegacyFsResolverConfig {
            root: PathBuf::from(val),
        });
    }
    if let Ok(val) = std::env::var("FEDORA_EXPORT_RESOLVER_HTTP_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.resolver.http.timeout_seconds = timeout;
        }
    }
    if let Ok(val) = std::env::var("FEDORA_EXPORT_RESOLVER_HTTP_USERNAME") {
        config.resolver.http.username = Some(val);
    }
    if let Ok(val) = std::env::var("FEDORA_EXPORT_RESOLVER_HTTP_PASSWORD") {
        config.resolver.http.password = Some(secret_string(val));
    }

    // Logging overrides
    if let Ok(val) = std::env::var("FEDORA_EXPORT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("FEDORA_EXPORT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
