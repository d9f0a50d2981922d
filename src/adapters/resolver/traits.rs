//! Internal ID resolver abstraction
//!
//! Both resolver variants hand back a [`ContentSource`] that the object
//! handler copies into the export tree, so the rest of the exporter never
//! knows where the bytes came from.

use crate::config::ResolverKind;
use crate::domain::{InternalId, MigrationError, ResolveError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// Resolves internal datastream references to readable content
#[async_trait]
pub trait IdResolver: Send + Sync {
    /// Which resolver variant this is
    fn kind(&self) -> ResolverKind;

    /// Resolve an internal id to its content
    ///
    /// `as_of` is the `CREATED` date of the datastream version that holds the
    /// reference. Resolvers that cannot address a version by its id use it to
    /// select the right one.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::NotFound` when the reference does not exist and
    /// `ResolveError::Fetch` when it exists but could not be retrieved.
    async fn resolve(
        &self,
        id: &InternalId,
        as_of: Option<DateTime<Utc>>,
    ) -> std::result::Result<ContentSource, ResolveError>;
}

/// Resolved datastream content, not yet read
#[derive(Debug)]
pub enum ContentSource {
    /// A file on the local filesystem
    Local(PathBuf),

    /// A successful HTTP response whose body has not been consumed
    Remote {
        id: String,
        response: reqwest::Response,
    },
}

impl ContentSource {
    /// Streams the content into `dest`, returning the number of bytes written
    ///
    /// The file is flushed before this returns.
    ///
    /// # Errors
    ///
    /// Returns an `Output` error if `dest` cannot be written and a
    /// `Resolution` error if the remote body fails mid-transfer.
    pub async fn copy_to(self, dest: &Path) -> Result<u64> {
        match self {
            ContentSource::Local(source) => tokio::fs::copy(&source, dest)
                .await
                .map_err(|e| MigrationError::output(dest, format!("copy from {}: {e}", source.display()))),
            ContentSource::Remote { id, mut response } => {
                let mut file = File::create(dest)
                    .await
                    .map_err(|e| MigrationError::output(dest, e))?;
                let mut written = 0u64;

                while let Some(chunk) = response.chunk().await.map_err(|e| ResolveError::Fetch {
                    id: id.clone(),
                    resolver: ResolverKind::Http.as_str(),
                    message: e.to_string(),
                })? {
                    file.write_all(&chunk)
                        .await
                        .map_err(|e| MigrationError::output(dest, e))?;
                    written += chunk.len() as u64;
                }

                file.flush()
                    .await
                    .map_err(|e| MigrationError::output(dest, e))?;
                Ok(written)
            }
        }
    }
}
