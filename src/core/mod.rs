//! Core business logic for the exporter.
//!
//! # Modules
//!
//! - [`export`] - Manifest traversal, directory layout, and the export index
//!
//! # Export Workflow
//!
//! 1. **Read manifest**: one UMDM record per line, lazily
//! 2. **Index**: append the UMDM row
//! 3. **Process**: stream the UMDM's FOXML into its directory
//! 4. **Children**: repeat 2-3 for each UMAM, nested under the parent
//! 5. **Close**: flush the index and report the summary
//!
//! # Example
//!
//! ```rust,no_run
//! use fedora_export::config::load_config;
//! use fedora_export::core::export::{ExportCoordinator, TracingObserver};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("fedora-export.toml")?;
//! let coordinator = ExportCoordinator::from_config(&config, Arc::new(TracingObserver)).await?;
//!
//! let summary = coordinator.run().await?;
//! println!("UMDM: {}", summary.umdm_count);
//! println!("UMAM: {}", summary.umam_count);
//! # Ok(())
//! # }
//! ```

pub mod export;
