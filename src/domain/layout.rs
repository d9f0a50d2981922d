//! Output directory layout
//!
//! Each UMDM is exported to `<target>/<umdm dir>` and each of its UMAM
//! members to `<target>/<umdm dir>/<umam dir>`. Index locations always use
//! `/` regardless of platform.

use super::errors::MigrationError;
use super::record::{UmamRecord, UmdmRecord};
use super::result::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Location of one exported object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLayout {
    location: String,
    directory: PathBuf,
}

impl ObjectLayout {
    /// Layout for a parent record
    pub fn for_umdm(target_root: &Path, umdm: &UmdmRecord) -> Self {
        let name = umdm.directory_name();
        Self {
            directory: target_root.join(&name),
            location: name,
        }
    }

    /// Layout for a member record, nested in its parent's directory
    pub fn for_umam(target_root: &Path, umdm: &UmdmRecord, umam: &UmamRecord) -> Self {
        let parent = umdm.directory_name();
        let child = umam.directory_name();
        Self {
            directory: target_root.join(&parent).join(&child),
            location: format!("{parent}/{child}"),
        }
    }

    /// Relative location as written to the export index
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Absolute output directory
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

/// Relative locations already handed out during one run
#[derive(Debug, Default)]
pub struct LayoutRegistry {
    claimed: HashSet<String>,
}

impl LayoutRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a layout for one object
    ///
    /// # Errors
    ///
    /// Returns `DirectoryCollision` if another object already uses the location.
    pub fn claim(&mut self, layout: &ObjectLayout) -> Result<()> {
        if !self.claimed.insert(layout.location.clone()) {
            return Err(MigrationError::DirectoryCollision {
                location: layout.location.clone(),
            });
        }
        Ok(())
    }

    /// Marks a top-level name as taken by something other than an object,
    /// such as the index file
    pub fn reserve(&mut self, location: impl Into<String>) {
        self.claimed.insert(location.into());
    }

    /// Number of claimed locations
    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    /// Whether nothing has been claimed yet
    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}
