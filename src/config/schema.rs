//! Configuration schema types
//!
//! This module defines the configuration structure mapped from the TOML file.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Resolver variant used for internal datastream references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolverKind {
    /// Fetch content from a running repository over HTTP
    Http,
    /// Look content up in a legacy low-level storage directory
    LegacyFs,
}

impl ResolverKind {
    /// Name used in logs and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolverKind::Http => "http",
            ResolverKind::LegacyFs => "legacy_fs",
        }
    }
}

/// Main exporter configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Manifest, FOXML and output locations
    pub export: ExportConfig,

    /// Source repository settings
    pub source: SourceConfig,

    /// Internal ID resolver selection
    pub resolver: ResolverConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ExporterConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.export.validate()?;
        self.source.validate()?;
        self.resolver.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Export input and output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Newline-delimited JSON manifest of UMDM records
    pub manifest_path: PathBuf,

    /// Root of the exported directory tree
    pub target_dir: PathBuf,

    /// Export index file (defaults to `export.csv` inside `target_dir`)
    #[serde(default)]
    pub index_file: Option<PathBuf>,

    /// Base directory for relative FOXML paths in the manifest
    #[serde(default)]
    pub foxml_base_dir: Option<PathBuf>,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.manifest_path.as_os_str().is_empty() {
            return Err("export.manifest_path cannot be empty".to_string());
        }
        if self.target_dir.as_os_str().is_empty() {
            return Err("export.target_dir cannot be empty".to_string());
        }
        if let Some(index_file) = &self.index_file {
            if index_file.as_os_str().is_empty() {
                return Err("export.index_file cannot be empty when set".to_string());
            }
        }
        Ok(())
    }

    /// Effective path of the export index file
    pub fn index_path(&self) -> PathBuf {
        self.index_file
            .clone()
            .unwrap_or_else(|| self.target_dir.join(DEFAULT_INDEX_FILE))
    }

    /// Resolves a manifest FOXML reference against `foxml_base_dir`
    pub fn foxml_path(&self, foxml: &Path) -> PathBuf {
        match &self.foxml_base_dir {
            Some(base) if foxml.is_relative() => base.join(foxml),
            _ => foxml.to_path_buf(),
        }
    }
}

/// Default file name of the export index
pub const DEFAULT_INDEX_FILE: &str = "export.csv";

/// Source repository configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Repository host as `host:port`
    ///
    /// Used by the HTTP resolver and to rewrite `local.fedora.server` URLs.
    pub host: String,
}

impl SourceConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("source.host cannot be empty".to_string());
        }
        if self.host.contains("://") || self.host.contains('/') {
            return Err(format!(
                "source.host must be a host:port string without scheme or path, got '{}'",
                self.host
            ));
        }
        Ok(())
    }
}

/// Internal ID resolver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Which resolver to use for this run
    pub kind: ResolverKind,

    /// HTTP resolver settings
    #[serde(default)]
    pub http: HttpResolverConfig,

    /// Legacy filesystem resolver settings (required if kind = legacy_fs)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_fs: Option<LegacyFsResolverConfig>,
}

impl ResolverConfig {
    fn validate(&self) -> Result<(), String> {
        match self.kind {
            ResolverKind::Http => self.http.validate(),
            ResolverKind::LegacyFs => match &self.legacy_fs {
                Some(config) => config.validate(),
                None => Err(
                    "resolver.legacy_fs configuration is required when resolver.kind = 'legacy_fs'"
                        .to_string(),
                ),
            },
        }
    }
}

/// HTTP resolver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpResolverConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Username for basic authentication (optional)
    #[serde(default)]
    pub username: Option<String>,

    /// Password for basic authentication (optional)
    #[serde(default)]
    pub password: Option<SecretString>,
}

impl HttpResolverConfig {
    fn validate(&self) -> Result<(), String> {
        if self.timeout_seconds == 0 {
            return Err("resolver.http.timeout_seconds must be > 0".to_string());
        }
        if self.password.is_some() && self.username.is_none() {
            return Err("resolver.http.password requires resolver.http.username".to_string());
        }
        Ok(())
    }
}

impl Default for HttpResolverConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            username: None,
            password: None,
        }
    }
}

/// Legacy filesystem resolver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyFsResolverConfig {
    /// Root of the legacy datastream store
    pub root: PathBuf,
}

impl LegacyFsResolverConfig {
    fn validate(&self) -> Result<(), String> {
        if self.root.as_os_str().is_empty() {
            return Err("resolver.legacy_fs.root cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when file logging is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
