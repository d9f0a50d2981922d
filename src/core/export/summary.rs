//! Export summary and reporting
//!
//! This module defines the counts reported at the end of a run.

use crate::adapters::handler::ObjectStats;
use std::time::Duration;

/// Summary of a completed export run
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    /// Number of UMDM records exported
    pub umdm_count: usize,

    /// Number of UMAM records exported
    pub umam_count: usize,

    /// Datastream files written across all objects
    pub datastream_files: usize,

    /// Bytes written across all objects
    pub bytes_written: u64,

    /// Index rows written (header excluded)
    pub index_rows: usize,

    /// Duration of the run
    pub duration: Duration,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new() -> Self {
        Self {
            umdm_count: 0,
            umam_count: 0,
            datastream_files: 0,
            bytes_written: 0,
            index_rows: 0,
            duration: Duration::from_secs(0),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Total number of objects exported
    pub fn total_objects(&self) -> usize {
        self.umdm_count + self.umam_count
    }

    /// Add one object's output to the totals
    pub fn add_object_stats(&mut self, stats: ObjectStats) {
        self.datastream_files += stats.files;
        self.bytes_written += stats.bytes;
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            umdm = self.umdm_count,
            umam = self.umam_count,
            datastream_files = self.datastream_files,
            bytes_written = self.bytes_written,
            index_rows = self.index_rows,
            duration_secs = self.duration.as_secs(),
            "Export completed"
        );
    }
}

impl Default for ExportSummary {
    fn default() -> Self {
        Self::new()
    }
}
