//! Run progress reporting
//!
//! The coordinator reports progress to an injected [`ExportObserver`]
//! instead of a process-wide logger, so runs can be observed (and tested)
//! in isolation.

use super::summary::ExportSummary;
use crate::adapters::handler::ObjectStats;
use crate::domain::ObjectLayout;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Which level of the hierarchy an object belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// Parent descriptive record
    Umdm,
    /// Child member record
    Umam,
}

impl ObjectKind {
    /// Lowercase name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Umdm => "umdm",
            ObjectKind::Umam => "umam",
        }
    }
}

/// Receives progress events from an export run
pub trait ExportObserver: Send + Sync {
    /// An object is about to be processed
    fn object_started(&self, kind: ObjectKind, pid: &str, foxml: &Path, layout: &ObjectLayout);

    /// An object was fully written
    fn object_completed(&self, kind: ObjectKind, pid: &str, stats: ObjectStats);

    /// The manifest was exhausted and the index closed
    fn run_completed(&self, summary: &ExportSummary);

    /// The FOXML declares a different PID than the manifest
    fn pid_mismatch(&self, _manifest_pid: &str, _foxml_pid: &str, _foxml: &Path) {}
}

/// Observer that emits `tracing` events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ExportObserver for TracingObserver {
    fn object_started(&self, kind: ObjectKind, pid: &str, foxml: &Path, layout: &ObjectLayout) {
        tracing::info!(
            kind = kind.as_str(),
            pid = %pid,
            foxml = %foxml.display(),
            location = %layout.location(),
            "Exporting object"
        );
    }

    fn object_completed(&self, kind: ObjectKind, pid: &str, stats: ObjectStats) {
        tracing::debug!(
            kind = kind.as_str(),
            pid = %pid,
            files = stats.files,
            bytes = stats.bytes,
            "Object exported"
        );
    }

    fn run_completed(&self, summary: &ExportSummary) {
        summary.log_summary();
    }

    fn pid_mismatch(&self, manifest_pid: &str, foxml_pid: &str, foxml: &Path) {
        tracing::warn!(
            manifest_pid = %manifest_pid,
            foxml_pid = %foxml_pid,
            foxml = %foxml.display(),
            "FOXML PID differs from manifest PID"
        );
    }
}

/// One event captured by [`RecordingObserver`]
#[derive(Debug, Clone, PartialEq)]
pub enum ObserverEvent {
    Started { kind: ObjectKind, pid: String, location: String },
    Completed { kind: ObjectKind, pid: String, stats: ObjectStats },
    PidMismatch { manifest_pid: String, foxml_pid: String },
    RunCompleted { objects: usize },
}

/// Observer that keeps every event in memory
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<ObserverEvent>>>,
}

impl RecordingObserver {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events seen so far
    pub fn events(&self) -> Vec<ObserverEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    fn push(&self, event: ObserverEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl ExportObserver for RecordingObserver {
    fn object_started(&self, kind: ObjectKind, pid: &str, _foxml: &Path, layout: &ObjectLayout) {
        self.push(ObserverEvent::Started {
            kind,
            pid: pid.to_string(),
            location: layout.location().to_string(),
        });
    }

    fn object_completed(&self, kind: ObjectKind, pid: &str, stats: ObjectStats) {
        self.push(ObserverEvent::Completed {
            kind,
            pid: pid.to_string(),
            stats,
        });
    }

    fn run_completed(&self, summary: &ExportSummary) {
        self.push(ObserverEvent::RunCompleted {
            objects: summary.total_objects(),
        });
    }

    fn pid_mismatch(&self, manifest_pid: &str, foxml_pid: &str, _foxml: &Path) {
        self.push(ObserverEvent::PidMismatch {
            manifest_pid: manifest_pid.to_string(),
            foxml_pid: foxml_pid.to_string(),
        });
    }
}
