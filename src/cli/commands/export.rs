//! Export command implementation
//!
//! This module implements the `export` command, which walks the manifest and
//! writes the export tree and index.

use crate::config::{load_config, ExporterConfig};
use crate::core::export::{ExportCoordinator, TracingObserver};
use crate::domain::MigrationError;
use crate::log_error_with_context;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the export command
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Override the manifest path
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Override the export target directory
    #[arg(long)]
    pub target_dir: Option<PathBuf>,

    /// Override the export index file
    #[arg(long)]
    pub index_file: Option<PathBuf>,

    /// Override the base directory for relative FOXML paths
    #[arg(long)]
    pub foxml_base_dir: Option<PathBuf>,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                log_error_with_context!(&e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        tracing::info!("Creating export coordinator");
        let coordinator =
            match ExportCoordinator::from_config(&config, Arc::new(TracingObserver)).await {
                Ok(c) => c,
                Err(e) => {
                    log_error_with_context!(&e, "Failed to initialize export");
                    eprintln!("Failed to initialize export: {e}");
                    return Ok(exit_code_for(&e));
                }
            };

        println!("🚀 Starting export...");
        println!("  Manifest: {}", config.export.manifest_path.display());
        println!("  Target: {}", config.export.target_dir.display());
        println!("  Resolver: {}", config.resolver.kind.as_str());
        println!();

        let summary = match coordinator.run().await {
            Ok(s) => s,
            Err(e) => {
                log_error_with_context!(&e, "Export failed");
                eprintln!("Export failed: {e}");
                if let MigrationError::Object { pid, source_path, .. } = &e {
                    eprintln!("  Object: {pid}");
                    eprintln!("  FOXML: {}", source_path.display());
                }
                return Ok(5); // Fatal error exit code
            }
        };

        println!("📊 Export Summary:");
        println!("  UMDM objects: {}", summary.umdm_count);
        println!("  UMAM objects: {}", summary.umam_count);
        println!("  Datastream files: {}", summary.datastream_files);
        println!("  Bytes written: {}", summary.bytes_written);
        println!("  Index rows: {}", summary.index_rows);
        println!("  Index: {}", config.export.index_path().display());
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        println!();
        println!("✅ Export completed successfully!");

        Ok(0)
    }

    fn apply_overrides(&self, config: &mut ExporterConfig) {
        if let Some(manifest) = &self.manifest {
            tracing::info!(manifest = %manifest.display(), "Overriding manifest from CLI");
            config.export.manifest_path = manifest.clone();
        }
        if let Some(target_dir) = &self.target_dir {
            tracing::info!(target_dir = %target_dir.display(), "Overriding target directory from CLI");
            config.export.target_dir = target_dir.clone();
        }
        if let Some(index_file) = &self.index_file {
            tracing::info!(index_file = %index_file.display(), "Overriding index file from CLI");
            config.export.index_file = Some(index_file.clone());
        }
        if let Some(base) = &self.foxml_base_dir {
            tracing::info!(foxml_base_dir = %base.display(), "Overriding FOXML base directory from CLI");
            config.export.foxml_base_dir = Some(base.clone());
        }
    }
}

/// Exit code for an error raised while setting up the run
fn exit_code_for(error: &MigrationError) -> i32 {
    match error {
        MigrationError::Configuration(_) => 2,
        _ => 5,
    }
}
