//! Directory-writing object handler
//!
//! Writes every datastream version of an object as one file in the object's
//! target directory, named after the version ID with an extension derived
//! from the MIME type (`DC.0.xml`, `IMAGE.0.tif`). URL references become a
//! `.url` file holding the URL. Content is never transformed.

use super::traits::{ObjectHandler, ObjectStats};
use crate::adapters::foxml::models::{
    ControlGroup, DatastreamContent, DatastreamVersion, ObjectInfo,
};
use crate::domain::{MigrationError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Handler that materializes datastreams as files
#[derive(Debug, Default)]
pub struct DirectoryObjectHandler {
    stats: ObjectStats,
}

impl DirectoryObjectHandler {
    /// Create a new handler
    pub fn new() -> Self {
        Self::default()
    }

    /// File name for a datastream version
    pub fn file_name(version: &DatastreamVersion, content: &DatastreamContent) -> String {
        let stem = if version.version_id.is_empty() {
            &version.datastream_id
        } else {
            &version.version_id
        };
        let stem = sanitize(stem);

        let extension = match content {
            DatastreamContent::Url(_) => "url",
            _ => extension_for(version.mime_type.as_deref(), &version.control_group),
        };
        format!("{stem}.{extension}")
    }

    async fn write_file(&mut self, path: PathBuf, bytes: &[u8]) -> Result<()> {
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| MigrationError::output(&path, e))?;
        self.record(bytes.len() as u64);
        Ok(())
    }

    fn record(&mut self, bytes: u64) {
        self.stats.files += 1;
        self.stats.bytes += bytes;
    }
}

#[async_trait]
impl ObjectHandler for DirectoryObjectHandler {
    async fn begin_object(&mut self, target: &Path, object: &ObjectInfo) -> Result<()> {
        self.stats = ObjectStats::default();

        tokio::fs::create_dir_all(target)
            .await
            .map_err(|e| MigrationError::output(target, e))?;

        tracing::debug!(
            pid = object.pid.as_deref().unwrap_or("<none>"),
            state = object.state().unwrap_or("<none>"),
            label = object.label().unwrap_or(""),
            target = %target.display(),
            "Writing object"
        );
        Ok(())
    }

    async fn datastream(
        &mut self,
        target: &Path,
        version: &DatastreamVersion,
        content: DatastreamContent,
    ) -> Result<()> {
        let path = target.join(Self::file_name(version, &content));
        tracing::trace!(
            datastream_id = %version.datastream_id,
            version_id = %version.version_id,
            content = content.kind(),
            path = %path.display(),
            "Writing datastream"
        );

        match content {
            DatastreamContent::InlineXml(bytes) | DatastreamContent::Binary(bytes) => {
                self.write_file(path, &bytes).await
            }
            DatastreamContent::Url(url) => self.write_file(path, format!("{url}\n").as_bytes()).await,
            DatastreamContent::Resolved(source) => {
                let written = source.copy_to(&path).await?;
                self.record(written);
                Ok(())
            }
            DatastreamContent::Empty => {
                tracing::debug!(
                    version_id = %version.version_id,
                    "Datastream version has no content, skipping"
                );
                Ok(())
            }
        }
    }

    async fn end_object(&mut self, _target: &Path) -> Result<ObjectStats> {
        Ok(std::mem::take(&mut self.stats))
    }
}

/// Extension for a MIME type, falling back on the control group
fn extension_for(mime_type: Option<&str>, control_group: &ControlGroup) -> &'static str {
    let essence = mime_type
        .and_then(|m| m.split(';').next())
        .map(|m| m.trim().to_ascii_lowercase())
        .unwrap_or_default();

    match essence.as_str() {
        "text/xml" | "application/xml" | "application/rdf+xml" | "application/xhtml+xml" => "xml",
        "text/plain" => "txt",
        "text/html" => "html",
        "text/csv" => "csv",
        "application/json" => "json",
        "application/pdf" => "pdf",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/tiff" => "tif",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/jp2" => "jp2",
        "audio/mpeg" => "mp3",
        "audio/wav" | "audio/x-wav" => "wav",
        "video/mp4" => "mp4",
        "video/quicktime" => "mov",
        _ if *control_group == ControlGroup::InlineXml => "xml",
        _ => "bin",
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn version(version_id: &str, mime: Option<&str>, group: ControlGroup) -> DatastreamVersion {
        DatastreamVersion {
            datastream_id: version_id.split('.').next().unwrap_or_default().to_string(),
            control_group: group,
            version_id: version_id.to_string(),
            mime_type: mime.map(str::to_string),
            created: None,
        }
    }

    #[test]
    fn test_file_names() {
        let dc = version("DC.0", Some("text/xml"), ControlGroup::InlineXml);
        assert_eq!(
            DirectoryObjectHandler::file_name(&dc, &DatastreamContent::Empty),
            "DC.0.xml"
        );

        let image = version("IMAGE.1", Some("image/tiff; charset=binary"), ControlGroup::Managed);
        assert_eq!(
            DirectoryObjectHandler::file_name(&image, &DatastreamContent::Empty),
            "IMAGE.1.tif"
        );

        let unknown = version("DATA.0", Some("application/x-custom"), ControlGroup::Managed);
        assert_eq!(
            DirectoryObjectHandler::file_name(&unknown, &DatastreamContent::Empty),
            "DATA.0.bin"
        );

        let external = version("LINK.0", Some("text/html"), ControlGroup::External);
        assert_eq!(
            DirectoryObjectHandler::file_name(
                &external,
                &DatastreamContent::Url("http://example.com".to_string())
            ),
            "LINK.0.url"
        );
    }

    #[test]
    fn test_inline_without_mime_is_xml() {
        let v = version("RELS-EXT.0", None, ControlGroup::InlineXml);
        assert_eq!(
            DirectoryObjectHandler::file_name(&v, &DatastreamContent::Empty),
            "RELS-EXT.0.xml"
        );
    }

    #[tokio::test]
    async fn test_writes_files_and_counts() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("umd_1");
        let mut handler = DirectoryObjectHandler::new();

        handler
            .begin_object(&target, &ObjectInfo::default())
            .await
            .unwrap();
        handler
            .datastream(
                &target,
                &version("DC.0", Some("text/xml"), ControlGroup::InlineXml),
                DatastreamContent::InlineXml(b"<dc/>".to_vec()),
            )
            .await
            .unwrap();
        handler
            .datastream(
                &target,
                &version("LINK.0", None, ControlGroup::Redirect),
                DatastreamContent::Url("http://example.com/a".to_string()),
            )
            .await
            .unwrap();
        handler
            .datastream(
                &target,
                &version("EMPTY.0", None, ControlGroup::Managed),
                DatastreamContent::Empty,
            )
            .await
            .unwrap();

        let stats = handler.end_object(&target).await.unwrap();
        assert_eq!(stats.files, 2);
        assert_eq!(stats.bytes, 5 + 21);
        assert_eq!(std::fs::read(target.join("DC.0.xml")).unwrap(), b"<dc/>");
        assert_eq!(
            std::fs::read_to_string(target.join("LINK.0.url")).unwrap(),
            "http://example.com/a\n"
        );
        assert!(!target.join("EMPTY.0.bin").exists());
    }

    #[tokio::test]
    async fn test_stats_reset_between_objects() {
        let dir = TempDir::new().unwrap();
        let mut handler = DirectoryObjectHandler::new();

        let first = dir.path().join("a");
        handler.begin_object(&first, &ObjectInfo::default()).await.unwrap();
        handler
            .datastream(
                &first,
                &version("DC.0", Some("text/xml"), ControlGroup::InlineXml),
                DatastreamContent::InlineXml(b"<a/>".to_vec()),
            )
            .await
            .unwrap();
        handler.end_object(&first).await.unwrap();

        let second = dir.path().join("b");
        handler.begin_object(&second, &ObjectInfo::default()).await.unwrap();
        let stats = handler.end_object(&second).await.unwrap();

        assert_eq!(stats, ObjectStats::default());
        assert!(second.is_dir());
        assert!(!second.join("DC.0.xml").exists());
    }
}
