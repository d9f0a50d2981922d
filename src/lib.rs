// fedora-export - Fedora UMDM/UMAM Export Tool
// Copyright (c) 2025 fedora-export Contributors
// Licensed under the MIT License

//! # fedora-export
//!
//! Exports a two-level collection of Fedora objects (UMDM parents with their
//! UMAM members) into a plain directory tree plus a CSV index.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Reading** a newline-delimited JSON manifest of UMDM records, lazily
//! - **Streaming** each object's FOXML into its own output directory
//! - **Resolving** internal datastream references against a live repository
//!   or a legacy low-level store on disk
//! - **Indexing** every exported object in `export.csv`
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Export orchestration, manifest, index
//! - [`adapters`] - Resolvers, FOXML processing, object handlers
//! - [`domain`] - Records, identifiers, layout, errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fedora_export::config::load_config;
//! use fedora_export::core::export::{ExportCoordinator, TracingObserver};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("fedora-export.toml")?;
//!
//!     let coordinator =
//!         ExportCoordinator::from_config(&config, Arc::new(TracingObserver)).await?;
//!     let summary = coordinator.run().await?;
//!
//!     println!("Exported {} objects", summary.total_objects());
//!     Ok(())
//! }
//! ```
//!
//! ## Output Layout
//!
//! ```text
//! export/
//! ├── export.csv
//! └── umd_1/
//!     ├── DC.0.xml
//!     └── umd_2/
//!         └── IMAGE.0.tif
//! ```
//!
//! A run stops at the first failure. Files and index rows written before it
//! stay on disk; nothing is rolled back.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
