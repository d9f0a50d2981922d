//! Resolver factory
//!
//! Builds exactly one resolver per run from the `[resolver]` configuration.

use super::http::HttpResolver;
use super::legacy_fs::LegacyFsResolver;
use super::traits::IdResolver;
use crate::config::{ExporterConfig, ResolverKind};
use crate::domain::{MigrationError, Result};
use std::sync::Arc;

/// Create the configured internal ID resolver
///
/// # Errors
///
/// Returns a `Configuration` error if the selected variant's settings are
/// missing or invalid.
pub fn create_resolver(config: &ExporterConfig) -> Result<Arc<dyn IdResolver>> {
    match config.resolver.kind {
        ResolverKind::Http => {
            tracing::info!(host = %config.source.host, "Creating HTTP resolver");
            let resolver = HttpResolver::new(&config.source.host, &config.resolver.http)?;
            Ok(Arc::new(resolver) as Arc<dyn IdResolver>)
        }
        ResolverKind::LegacyFs => {
            let legacy_config = config.resolver.legacy_fs.as_ref().ok_or_else(|| {
                MigrationError::Configuration(
                    "resolver.legacy_fs configuration is required when resolver.kind = 'legacy_fs'"
                        .to_string(),
                )
            })?;

            tracing::info!(root = %legacy_config.root.display(), "Creating legacy filesystem resolver");
            Ok(Arc::new(LegacyFsResolver::new(&legacy_config.root)) as Arc<dyn IdResolver>)
        }
    }
}
