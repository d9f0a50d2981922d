//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the exporter configuration file.

use crate::config::{load_config, ResolverKind};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates every section before returning
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Manifest: {}", config.export.manifest_path.display());
        println!("  Target Directory: {}", config.export.target_dir.display());
        println!("  Index File: {}", config.export.index_path().display());
        if let Some(base) = &config.export.foxml_base_dir {
            println!("  FOXML Base Directory: {}", base.display());
        }
        println!("  Source Host: {}", config.source.host);
        println!("  Resolver: {}", config.resolver.kind.as_str());

        match config.resolver.kind {
            ResolverKind::Http => {
                println!("  HTTP Timeout: {}s", config.resolver.http.timeout_seconds);
                println!(
                    "  HTTP Authentication: {}",
                    if config.resolver.http.username.is_some() {
                        "basic"
                    } else {
                        "none"
                    }
                );
            }
            ResolverKind::LegacyFs => {
                if let Some(legacy) = &config.resolver.legacy_fs {
                    println!("  Legacy Store Root: {}", legacy.root.display());
                }
            }
        }
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_validate_valid_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[export]
manifest_path = "umdm.jsonl"
target_dir = "export"

[source]
host = "localhost:8080"

[resolver]
kind = "http"
"#
        )
        .unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_validate_missing_file() {
        let code = ValidateArgs {}
            .execute("/nonexistent/fedora-export.toml")
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
