//! Object handler abstraction
//!
//! The FOXML processor drives a handler with one object's events. The target
//! directory is passed with every call; handlers keep no notion of an
//! "active" directory between objects.

use crate::adapters::foxml::models::{DatastreamContent, DatastreamVersion, ObjectInfo};
use crate::domain::Result;
use async_trait::async_trait;
use std::path::Path;

/// Counts for one exported object
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectStats {
    /// Files written for the object
    pub files: usize,

    /// Bytes written for the object
    pub bytes: u64,
}

/// Sink for one object's datastream events
///
/// Every write must be complete when the call returns.
#[async_trait]
pub trait ObjectHandler: Send {
    /// Called once per object before any datastream
    async fn begin_object(&mut self, target: &Path, object: &ObjectInfo) -> Result<()>;

    /// Called once per datastream version in document order
    async fn datastream(
        &mut self,
        target: &Path,
        version: &DatastreamVersion,
        content: DatastreamContent,
    ) -> Result<()>;

    /// Called once after the last datastream of the object
    async fn end_object(&mut self, target: &Path) -> Result<ObjectStats>;
}
