//! Manifest record models
//!
//! One manifest line deserializes into a [`UmdmRecord`] that owns its
//! [`UmamRecord`] children in `hasPart` order.

use super::ids::Pid;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// Parent descriptive record (UMDM) read from one manifest line
///
/// Fields the exporter does not use (`type`, `state`, `ds`, ...) are ignored.
///
/// # Examples
///
/// ```
/// use fedora_export::domain::UmdmRecord;
///
/// let line = r#"{"pid":"test:1","foxml":"objects/test_1.xml","title":"A title","handle":"hdl:1","hasPart":[]}"#;
/// let umdm: UmdmRecord = serde_json::from_str(line).unwrap();
/// assert_eq!(umdm.directory_name(), "test_1");
/// assert!(umdm.children().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UmdmRecord {
    /// Persistent identifier
    pub pid: Pid,

    /// Path to the FOXML serialization
    pub foxml: PathBuf,

    /// Descriptive title, may contain line breaks
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// External handle
    #[serde(default, deserialize_with = "null_as_default")]
    pub handle: String,

    /// Member records in export order
    #[serde(rename = "hasPart", default, deserialize_with = "null_as_default")]
    pub has_part: Vec<UmamRecord>,
}

impl UmdmRecord {
    /// Directory name derived from the pid
    pub fn directory_name(&self) -> String {
        self.pid.directory_name()
    }

    /// Child UMAM records in manifest order
    pub fn children(&self) -> &[UmamRecord] {
        &self.has_part
    }

    /// FOXML source path as given in the manifest
    pub fn foxml(&self) -> &Path {
        &self.foxml
    }
}

/// Member record (UMAM) contained in a UMDM's `hasPart` list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UmamRecord {
    /// Persistent identifier
    pub pid: Pid,

    /// Path to the FOXML serialization
    pub foxml: PathBuf,
}

impl UmamRecord {
    /// Directory name derived from the pid
    pub fn directory_name(&self) -> String {
        self.pid.directory_name()
    }

    /// FOXML source path as given in the manifest
    pub fn foxml(&self) -> &Path {
        &self.foxml
    }
}

/// Treats an explicit JSON `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_record() {
        let line = r#"{
            "pid": "umd:100",
            "foxml": "objects/2006/umd_100.xml",
            "title": "Line1\nLine2",
            "handle": "hdl:1903.1/100",
            "hasPart": [
                {"pid": "umd:101", "foxml": "objects/2006/umd_101.xml"},
                {"pid": "umd:102", "foxml": "objects/2006/umd_102.xml"}
            ]
        }"#;

        let umdm: UmdmRecord = serde_json::from_str(line).unwrap();
        assert_eq!(umdm.pid.as_str(), "umd:100");
        assert_eq!(umdm.title, "Line1\nLine2");
        assert_eq!(umdm.handle, "hdl:1903.1/100");
        assert_eq!(umdm.children().len(), 2);
        assert_eq!(umdm.children()[0].pid.as_str(), "umd:101");
        assert_eq!(umdm.children()[1].directory_name(), "umd_102");
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let line = r#"{"pid":"umd:1","foxml":"a.xml","title":"t","handle":"h",
            "type":"UMDM","state":"A","label":"x","contentModel":"UMD_VIDEO","ds":{"DC":1},
            "hasPart":[{"pid":"umd:2","foxml":"b.xml","title":"ignored","state":"A"}]}"#;

        let umdm: UmdmRecord = serde_json::from_str(line).unwrap();
        assert_eq!(umdm.children()[0].pid.as_str(), "umd:2");
    }

    #[test]
    fn test_missing_or_null_children() {
        let missing: UmdmRecord =
            serde_json::from_str(r#"{"pid":"umd:1","foxml":"a.xml","title":"t","handle":"h"}"#)
                .unwrap();
        assert!(missing.children().is_empty());

        let null: UmdmRecord = serde_json::from_str(
            r#"{"pid":"umd:1","foxml":"a.xml","title":null,"handle":null,"hasPart":null}"#,
        )
        .unwrap();
        assert!(null.children().is_empty());
        assert_eq!(null.title, "");
        assert_eq!(null.handle, "");
    }

    #[test]
    fn test_empty_pid_is_rejected() {
        let result = serde_json::from_str::<UmdmRecord>(r#"{"pid":"","foxml":"a.xml"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_foxml_is_rejected() {
        let result = serde_json::from_str::<UmdmRecord>(r#"{"pid":"umd:1"}"#);
        assert!(result.is_err());
    }
}
