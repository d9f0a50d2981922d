//! Configuration management for the exporter.
//!
//! # Overview
//!
//! The exporter reads a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `FEDORA_EXPORT_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation of every section on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`ExportConfig`] - Manifest, FOXML base directory, output tree and index file
//! - [`SourceConfig`] - Repository host (`host:port`)
//! - [`ResolverConfig`] - Which internal ID resolver to use and its settings
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [export]
//! manifest_path = "filter.json"
//! target_dir = "export"
//! foxml_base_dir = "/data/fedora"
//!
//! [source]
//! host = "fedora.example.edu:8080"
//!
//! [resolver]
//! kind = "legacy_fs"
//!
//! [resolver.legacy_fs]
//! root = "/data/fedora/datastreams"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, ExportConfig, ExporterConfig, HttpResolverConfig, LegacyFsResolverConfig,
    LoggingConfig, ResolverConfig, ResolverKind, SourceConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
