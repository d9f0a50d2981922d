//! Domain error types
//!
//! This module defines the error hierarchy for the exporter.
//! All errors are domain-specific and don't expose third-party types.

use std::path::PathBuf;
use thiserror::Error;

/// Main exporter error type
///
/// Every failure of a run surfaces as one of these. Failures tied to a single
/// object are wrapped in [`MigrationError::Object`] so the offending pid and
/// FOXML path travel with the cause.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A manifest line could not be deserialized
    #[error("Manifest parse error at line {line}: {message}")]
    ManifestParse { line: usize, message: String },

    /// A referenced FOXML file does not exist
    #[error("FOXML source not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    /// A FOXML file could not be parsed
    #[error("Malformed FOXML in {}: {message}", path.display())]
    Foxml { path: PathBuf, message: String },

    /// An internal datastream reference could not be resolved
    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolveError),

    /// Directory creation or file write failed
    #[error("Output error at {}: {message}", path.display())]
    Output { path: PathBuf, message: String },

    /// Two objects in one run mapped to the same output directory
    #[error("Output directory '{location}' is already used by another object in this run")]
    DirectoryCollision { location: String },

    /// Failure while exporting one object, with its identifying context
    #[error("Failed to export {pid} ({}): {source}", source_path.display())]
    Object {
        pid: String,
        source_path: PathBuf,
        #[source]
        source: Box<MigrationError>,
    },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl MigrationError {
    /// Wraps this error with the pid and FOXML path of the object being exported
    pub fn for_object(self, pid: impl Into<String>, source_path: impl Into<PathBuf>) -> Self {
        MigrationError::Object {
            pid: pid.into(),
            source_path: source_path.into(),
            source: Box::new(self),
        }
    }

    /// Builds an output error for a path
    pub fn output(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        MigrationError::Output {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Returns the innermost error, skipping object context wrappers
    pub fn root_cause(&self) -> &MigrationError {
        match self {
            MigrationError::Object { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Internal ID resolution errors
///
/// Carries the internal id and the resolver variant that failed.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The referenced content does not exist
    #[error("{resolver} resolver could not find '{id}'")]
    NotFound { id: String, resolver: &'static str },

    /// The content could not be fetched (non-success response or connectivity)
    #[error("{resolver} resolver failed to fetch '{id}': {message}")]
    Fetch {
        id: String,
        resolver: &'static str,
        message: String,
    },
}

impl ResolveError {
    /// Returns the internal id that failed to resolve
    pub fn id(&self) -> &str {
        match self {
            ResolveError::NotFound { id, .. } | ResolveError::Fetch { id, .. } => id,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for MigrationError {
    fn from(err: std::io::Error) -> Self {
        MigrationError::Io(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for MigrationError {
    fn from(err: toml::de::Error) -> Self {
        MigrationError::Configuration(format!("TOML parse error: {err}"))
    }
}
