//! Export orchestration
//!
//! This module provides the export run for the exporter, including:
//! - Manifest reading
//! - Export coordination and directory layout
//! - The CSV export index
//! - Progress reporting and the run summary

pub mod coordinator;
pub mod index;
pub mod manifest;
pub mod observer;
pub mod summary;

pub use coordinator::{ExportContext, ExportCoordinator};
pub use index::{CsvExportWriter, ExportWriter, INDEX_HEADER};
pub use manifest::ManifestReader;
pub use observer::{ExportObserver, ObjectKind, ObserverEvent, RecordingObserver, TracingObserver};
pub use summary::ExportSummary;
