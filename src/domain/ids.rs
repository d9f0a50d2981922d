//! Domain identifier types with validation
//!
//! This module provides newtype wrappers for repository identifiers.
//! Each type ensures type safety and validates its format on construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Persistent identifier of a repository object
///
/// Fedora pids are `namespace:local-id` strings such as `umd:12345`.
///
/// # Examples
///
/// ```
/// use fedora_export::domain::ids::Pid;
/// use std::str::FromStr;
///
/// let pid = Pid::from_str("umd:12345").unwrap();
/// assert_eq!(pid.as_str(), "umd:12345");
/// assert_eq!(pid.directory_name(), "umd_12345");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pid(String);

impl Pid {
    /// Creates a new Pid from a string
    ///
    /// # Arguments
    ///
    /// * `pid` - The persistent identifier string
    ///
    /// # Returns
    ///
    /// Returns `Ok(Pid)` if the pid is non-empty and its directory name is a
    /// single path segment, `Err` otherwise
    pub fn new(pid: impl Into<String>) -> Result<Self, String> {
        let pid = pid.into();
        if pid.trim().is_empty() {
            return Err("pid cannot be empty".to_string());
        }
        let directory = pid.replace(':', "_");
        if directory.contains('/') || !is_plain_segment(&directory) {
            return Err(format!(
                "pid '{pid}' does not map to a directory name inside the export root"
            ));
        }
        Ok(Self(pid))
    }

    /// Returns the pid as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Directory name for this object: every `:` becomes `_`
    pub fn directory_name(&self) -> String {
        self.0.replace(':', "_")
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Pid {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Pid {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Pid> for String {
    fn from(pid: Pid) -> Self {
        pid.0
    }
}

impl AsRef<str> for Pid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// True if `segment` can name an entry inside a directory
///
/// Rejects empty segments, `.`, `..` and anything with a backslash. `/` is
/// left to the caller, which either splits on it first or rejects it.
pub fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty() && segment != "." && segment != ".." && !segment.contains('\\')
}

/// Internal datastream reference found in a FOXML `contentLocation`
///
/// Fedora writes managed content references as `PID+DSID+VERSIONID`
/// (for example `umd:1+DS1+DS1.0`); legacy stores may instead carry a
/// relative storage path. Both forms are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InternalId(String);

impl InternalId {
    /// Creates a new InternalId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Internal ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the internal id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits a `PID+DSID+VERSIONID` reference into its three parts
    ///
    /// Only the final path segment is considered, so storage-path style ids
    /// such as `2006/0101/12/30/umd_1+DS1+DS1.0` also split.
    pub fn parts(&self) -> Option<(&str, &str, &str)> {
        let name = self.0.rsplit('/').next().unwrap_or(&self.0);
        let mut parts = name.splitn(3, '+');
        let pid = parts.next().filter(|s| !s.is_empty())?;
        let dsid = parts.next().filter(|s| !s.is_empty())?;
        let version = parts.next().filter(|s| !s.is_empty())?;
        Some((pid, dsid, version))
    }
}

impl fmt::Display for InternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InternalId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
