//! Legacy filesystem resolver
//!
//! The legacy low-level store keeps each datastream in a file whose relative
//! path is the internal id, with the first `:` of the file name replaced by
//! `_` (`2006/0808/10/39/umd:1+DS1+DS1.0` is stored at
//! `2006/0808/10/39/umd_1+DS1+DS1.0`). For Fedora pids, which always contain a
//! `:` before any `_`, the mapping is reversible.

use super::traits::{ContentSource, IdResolver};
use crate::config::ResolverKind;
use crate::domain::ids::is_plain_segment;
use crate::domain::{InternalId, ResolveError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Resolver that maps internal ids onto files beneath a root directory
#[derive(Debug, Clone)]
pub struct LegacyFsResolver {
    root: PathBuf,
}

impl LegacyFsResolver {
    /// Create a resolver rooted at the legacy datastream store
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Storage path for an internal id, or `None` if the id cannot name a
    /// file beneath the root (absolute, empty segments, `.` or `..`)
    pub fn storage_path(&self, id: &InternalId) -> Option<PathBuf> {
        let segments: Vec<&str> = id.as_str().split('/').collect();
        let (file_name, dirs) = segments.split_last()?;

        let mut path = self.root.clone();
        for segment in dirs {
            if !is_plain_segment(segment) {
                return None;
            }
            path.push(segment);
        }

        let encoded = file_name.replacen(':', "_", 1);
        if !is_plain_segment(&encoded) {
            return None;
        }
        path.push(encoded);
        Some(path)
    }

}

#[async_trait]
impl IdResolver for LegacyFsResolver {
    fn kind(&self) -> ResolverKind {
        ResolverKind::LegacyFs
    }

    // Every version has its own file, so the date is not needed.
    async fn resolve(
        &self,
        id: &InternalId,
        _as_of: Option<DateTime<Utc>>,
    ) -> Result<ContentSource, ResolveError> {
        let not_found = || ResolveError::NotFound {
            id: id.to_string(),
            resolver: ResolverKind::LegacyFs.as_str(),
        };

        let path = self.storage_path(id).ok_or_else(not_found)?;
        match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => {
                tracing::debug!(internal_id = %id, path = %path.display(), "Resolved datastream file");
                Ok(ContentSource::Local(path))
            }
            _ => Err(not_found()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn id(s: &str) -> InternalId {
        InternalId::new(s).unwrap()
    }

    #[test]
    fn test_storage_path_encodes_file_name() {
        let resolver = LegacyFsResolver::new("/store");
        assert_eq!(
            resolver.storage_path(&id("2006/0808/10/39/umd:1+DS1+DS1.0")),
            Some(PathBuf::from("/store/2006/0808/10/39/umd_1+DS1+DS1.0"))
        );
        assert_eq!(
            resolver.storage_path(&id("umd:1+DS1+DS1.0")),
            Some(PathBuf::from("/store/umd_1+DS1+DS1.0"))
        );
    }

    #[test]
    fn test_storage_path_rejects_escapes() {
        let resolver = LegacyFsResolver::new("/store");
        assert_eq!(resolver.storage_path(&id("../etc/passwd")), None);
        assert_eq!(resolver.storage_path(&id("/etc/passwd")), None);
        assert_eq!(resolver.storage_path(&id("2006//umd:1+DS1+DS1.0")), None);
        assert_eq!(resolver.storage_path(&id("2006/")), None);
    }

    #[tokio::test]
    async fn test_resolve_existing_file() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("2006/01")).unwrap();
        std::fs::write(dir.path().join("2006/01/umd_5+IMG+IMG.0"), b"tiff").unwrap();

        let resolver = LegacyFsResolver::new(dir.path());
        let source = resolver.resolve(&id("2006/01/umd:5+IMG+IMG.0"), None).await.unwrap();
        assert!(matches!(source, ContentSource::Local(ref p) if p.ends_with("umd_5+IMG+IMG.0")));
    }

    #[tokio::test]
    async fn test_resolve_missing_file() {
        let dir = TempDir::new().unwrap();
        let resolver = LegacyFsResolver::new(dir.path());

        let err = resolver.resolve(&id("umd:404+DS1+DS1.0"), None).await.unwrap_err();
        assert!(matches!(
            err,
            ResolveError::NotFound { ref id, resolver: "legacy_fs" } if id == "umd:404+DS1+DS1.0"
        ));
    }

    #[tokio::test]
    async fn test_resolve_directory_is_not_found() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("umd_1+DS1+DS1.0")).unwrap();

        let resolver = LegacyFsResolver::new(dir.path());
        assert!(resolver.resolve(&id("umd:1+DS1+DS1.0"), None).await.is_err());
    }
}
