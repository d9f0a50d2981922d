//! Streaming FOXML processor
//!
//! Reads one FOXML document event by event and drives an
//! [`ObjectHandler`] with the object's properties and each datastream
//! version's content. Managed content referenced by `INTERNAL_ID` is
//! resolved through the run's [`ResolutionContext`]; the document is never
//! held in memory as a whole.

use super::models::{ControlGroup, DatastreamContent, DatastreamVersion, ObjectInfo};
use crate::adapters::handler::{ObjectHandler, ObjectStats};
use crate::adapters::resolver::IdResolver;
use crate::domain::{InternalId, MigrationError, Result};
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::BufReader;

/// Host name Fedora writes into URLs that point back at itself
const LOCAL_SERVER_PREFIX: &str = "http://local.fedora.server/";

/// Resolver plus repository host, shared by every processor in a run
#[derive(Clone)]
pub struct ResolutionContext {
    resolver: Arc<dyn IdResolver>,
    host: String,
}

impl ResolutionContext {
    /// Create a context for a resolver and a `host:port` repository host
    pub fn new(resolver: Arc<dyn IdResolver>, host: impl Into<String>) -> Self {
        Self {
            resolver,
            host: host.into(),
        }
    }

    /// The run's resolver
    pub fn resolver(&self) -> &Arc<dyn IdResolver> {
        &self.resolver
    }

    /// The repository host
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Rewrites `http://local.fedora.server/...` to the configured host
    pub fn rewrite_local_url(&self, url: &str) -> String {
        match url.strip_prefix(LOCAL_SERVER_PREFIX) {
            Some(rest) => format!("http://{}/{}", self.host, rest),
            None => url.to_string(),
        }
    }
}

impl std::fmt::Debug for ResolutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionContext")
            .field("resolver", &self.resolver.kind())
            .field("host", &self.host)
            .finish()
    }
}

/// Result of processing one object
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedObject {
    /// Object-level information read from the FOXML
    pub info: ObjectInfo,

    /// What the handler wrote
    pub stats: ObjectStats,
}

/// Processor for a single FOXML document
pub struct FoxmlProcessor<'a> {
    path: PathBuf,
    reader: Reader<BufReader<File>>,
    context: &'a ResolutionContext,
}

impl<'a> FoxmlProcessor<'a> {
    /// Open a FOXML file for processing
    ///
    /// # Errors
    ///
    /// Returns `SourceNotFound` if the file does not exist.
    pub async fn open(path: &Path, context: &'a ResolutionContext) -> Result<Self> {
        let file = match File::open(path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(MigrationError::SourceNotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => {
                return Err(MigrationError::Io(format!(
                    "Failed to open {}: {e}",
                    path.display()
                )))
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            reader: Reader::from_reader(BufReader::new(file)),
            context,
        })
    }

    /// Stream the object into `handler`, writing under `target`
    ///
    /// # Errors
    ///
    /// Returns `Foxml` for malformed documents, `Resolution` for unresolvable
    /// internal references, and whatever the handler reports for output
    /// failures.
    pub async fn process_object(
        mut self,
        target: &Path,
        handler: &mut dyn ObjectHandler,
    ) -> Result<ProcessedObject> {
        let path = self.path.clone();
        let mut walk = ObjectWalk::new(&path, target, self.context, handler);
        let mut buf = Vec::new();

        loop {
            let event = self
                .reader
                .read_event_into_async(&mut buf)
                .await
                .map_err(|e| malformed(&path, e))?;

            match event {
                Event::Eof => {
                    if walk.inline.is_some() || walk.binary.is_some() {
                        return Err(malformed(&path, "document ended inside datastream content"));
                    }
                    break;
                }
                _ if walk.inline.is_some() => walk.capture(&event)?,
                Event::Start(e) => walk.start(&e).await?,
                Event::Empty(e) => {
                    walk.start(&e).await?;
                    walk.end(e.local_name().as_ref()).await?;
                }
                Event::End(e) => walk.end(e.local_name().as_ref()).await?,
                Event::Text(e) => {
                    if let Some(binary) = walk.binary.as_mut() {
                        let text = e.unescape().map_err(|err| malformed(&path, err))?;
                        binary.push_str(&text);
                    }
                }
                _ => {}
            }
            buf.clear();
        }

        walk.finish().await
    }
}

/// Inline XML being re-serialized
struct InlineCapture {
    depth: usize,
    writer: Writer<Vec<u8>>,
}

impl InlineCapture {
    fn new() -> Self {
        Self {
            depth: 0,
            writer: Writer::new(Vec::new()),
        }
    }

    /// Feeds one event; returns true on the closing `xmlContent` tag
    fn feed(&mut self, event: &Event<'_>) -> std::result::Result<bool, String> {
        match event {
            Event::Start(_) => self.depth += 1,
            Event::End(_) if self.depth == 0 => return Ok(true),
            Event::End(_) => self.depth -= 1,
            _ => {}
        }
        self.writer
            .write_event(event.borrow())
            .map_err(|e| e.to_string())?;
        Ok(false)
    }
}

/// Attributes of the enclosing `datastream` element
struct DatastreamHeader {
    id: String,
    control_group: ControlGroup,
}

/// Parse state for one object
struct ObjectWalk<'w> {
    path: &'w Path,
    target: &'w Path,
    context: &'w ResolutionContext,
    handler: &'w mut dyn ObjectHandler,
    object: ObjectInfo,
    seen_root: bool,
    begun: bool,
    datastream: Option<DatastreamHeader>,
    version: Option<DatastreamVersion>,
    content: Option<DatastreamContent>,
    inline: Option<InlineCapture>,
    binary: Option<String>,
}

impl<'w> ObjectWalk<'w> {
    fn new(
        path: &'w Path,
        target: &'w Path,
        context: &'w ResolutionContext,
        handler: &'w mut dyn ObjectHandler,
    ) -> Self {
        Self {
            path,
            target,
            context,
            handler,
            object: ObjectInfo::default(),
            seen_root: false,
            begun: false,
            datastream: None,
            version: None,
            content: None,
            inline: None,
            binary: None,
        }
    }

    async fn begin(&mut self) -> Result<()> {
        if !self.begun {
            self.begun = true;
            self.handler.begin_object(self.target, &self.object).await?;
        }
        Ok(())
    }

    fn capture(&mut self, event: &Event<'_>) -> Result<()> {
        let finished = match self.inline.as_mut() {
            Some(capture) => capture.feed(event).map_err(|e| malformed(self.path, e))?,
            None => false,
        };
        if finished {
            if let Some(capture) = self.inline.take() {
                self.content = Some(DatastreamContent::InlineXml(capture.writer.into_inner()));
            }
        }
        Ok(())
    }

    async fn start(&mut self, e: &BytesStart<'_>) -> Result<()> {
        match e.local_name().as_ref() {
            b"digitalObject" => {
                self.seen_root = true;
                self.object.pid = self.attribute(e, "PID")?;
            }
            b"property" => {
                if let (Some(name), Some(value)) =
                    (self.attribute(e, "NAME")?, self.attribute(e, "VALUE")?)
                {
                    self.object.properties.push((name, value));
                }
            }
            b"datastream" => {
                self.begin().await?;
                let id = self
                    .attribute(e, "ID")?
                    .ok_or_else(|| malformed(self.path, "datastream without ID"))?;
                self.datastream = Some(DatastreamHeader {
                    id,
                    control_group: ControlGroup::parse(
                        &self.attribute(e, "CONTROL_GROUP")?.unwrap_or_default(),
                    ),
                });
            }
            b"datastreamVersion" => {
                let header = self
                    .datastream
                    .as_ref()
                    .ok_or_else(|| malformed(self.path, "datastreamVersion outside datastream"))?;
                let version = DatastreamVersion {
                    datastream_id: header.id.clone(),
                    control_group: header.control_group.clone(),
                    version_id: self.attribute(e, "ID")?.unwrap_or_default(),
                    mime_type: self.attribute(e, "MIMETYPE")?,
                    created: self
                        .attribute(e, "CREATED")?
                        .and_then(|c| DateTime::parse_from_rfc3339(&c).ok())
                        .map(|c| c.with_timezone(&Utc)),
                };
                self.version = Some(version);
                self.content = None;
            }
            b"xmlContent" if self.version.is_some() => {
                // closed by `capture`, or by `end` for an empty element
                self.inline = Some(InlineCapture::new());
            }
            b"binaryContent" if self.version.is_some() => {
                self.binary = Some(String::new());
            }
            b"contentLocation" if self.version.is_some() => {
                let location_type = self.attribute(e, "TYPE")?.unwrap_or_default();
                let reference = self
                    .attribute(e, "REF")?
                    .ok_or_else(|| malformed(self.path, "contentLocation without REF"))?;
                self.content = Some(self.locate(&location_type, &reference).await?);
            }
            _ => {}
        }
        Ok(())
    }

    async fn end(&mut self, local_name: &[u8]) -> Result<()> {
        match local_name {
            b"xmlContent" => {
                if let Some(capture) = self.inline.take() {
                    self.content = Some(DatastreamContent::InlineXml(capture.writer.into_inner()));
                }
            }
            b"binaryContent" => {
                if let Some(encoded) = self.binary.take() {
                    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
                    let bytes = general_purpose::STANDARD
                        .decode(compact)
                        .map_err(|e| malformed(self.path, format!("invalid binaryContent: {e}")))?;
                    self.content = Some(DatastreamContent::Binary(bytes));
                }
            }
            b"datastreamVersion" => {
                if let Some(version) = self.version.take() {
                    let content = self.content.take().unwrap_or(DatastreamContent::Empty);
                    self.handler
                        .datastream(self.target, &version, content)
                        .await?;
                }
            }
            b"datastream" => self.datastream = None,
            _ => {}
        }
        Ok(())
    }

    async fn locate(&self, location_type: &str, reference: &str) -> Result<DatastreamContent> {
        match location_type {
            "INTERNAL_ID" => {
                let id = InternalId::new(reference).map_err(|e| malformed(self.path, e))?;
                let created = self.version.as_ref().and_then(|v| v.created);
                let source = self.context.resolver().resolve(&id, created).await?;
                Ok(DatastreamContent::Resolved(source))
            }
            "URL" => Ok(DatastreamContent::Url(self.context.rewrite_local_url(reference))),
            other => Err(malformed(
                self.path,
                format!("unsupported contentLocation TYPE '{other}'"),
            )),
        }
    }

    fn attribute(&self, e: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
        match e.try_get_attribute(name) {
            Ok(Some(attr)) => attr
                .unescape_value()
                .map(|v| Some(v.into_owned()))
                .map_err(|err| malformed(self.path, err)),
            Ok(None) => Ok(None),
            Err(err) => Err(malformed(self.path, err)),
        }
    }

    async fn finish(mut self) -> Result<ProcessedObject> {
        if !self.seen_root {
            return Err(malformed(self.path, "no digitalObject element"));
        }
        self.begin().await?;
        let stats = self.handler.end_object(self.target).await?;
        Ok(ProcessedObject {
            info: self.object,
            stats,
        })
    }
}

fn malformed(path: &Path, err: impl std::fmt::Display) -> MigrationError {
    MigrationError::Foxml {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::handler::DirectoryObjectHandler;
    use crate::adapters::resolver::LegacyFsResolver;
    use crate::domain::ResolveError;
    use tempfile::TempDir;

    const FOXML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<foxml:digitalObject VERSION="1.1" PID="umd:1"
    xmlns:foxml="info:fedora/fedora-system:def/foxml#">
  <foxml:objectProperties>
    <foxml:property NAME="info:fedora/fedora-system:def/model#state" VALUE="A"/>
    <foxml:property NAME="info:fedora/fedora-system:def/model#label" VALUE="Photograph"/>
  </foxml:objectProperties>
  <foxml:datastream ID="DC" STATE="A" CONTROL_GROUP="X" VERSIONABLE="true">
    <foxml:datastreamVersion ID="DC.0" LABEL="Dublin Core" CREATED="2006-08-08T14:39:08.123Z" MIMETYPE="text/xml">
      <foxml:xmlContent><oai_dc:dc xmlns:oai_dc="http://www.openarchives.org/OAI/2.0/oai_dc/"><dc:title xmlns:dc="http://purl.org/dc/elements/1.1/">A &amp; B</dc:title></oai_dc:dc></foxml:xmlContent>
    </foxml:datastreamVersion>
  </foxml:datastream>
  <foxml:datastream ID="THUMB" STATE="A" CONTROL_GROUP="M">
    <foxml:datastreamVersion ID="THUMB.0" MIMETYPE="image/jpeg">
      <foxml:binaryContent>
        aGVsbG8g
        d29ybGQ=
      </foxml:binaryContent>
    </foxml:datastreamVersion>
  </foxml:datastream>
  <foxml:datastream ID="IMAGE" STATE="A" CONTROL_GROUP="M">
    <foxml:datastreamVersion ID="IMAGE.0" MIMETYPE="image/tiff">
      <foxml:contentLocation TYPE="INTERNAL_ID" REF="umd:1+IMAGE+IMAGE.0"/>
    </foxml:datastreamVersion>
  </foxml:datastream>
  <foxml:datastream ID="LINK" STATE="A" CONTROL_GROUP="R">
    <foxml:datastreamVersion ID="LINK.0" MIMETYPE="text/html">
      <foxml:contentLocation TYPE="URL" REF="http://local.fedora.server/fedora/get/umd:1/DC"/>
    </foxml:datastreamVersion>
  </foxml:datastream>
</foxml:digitalObject>
"#;

    struct Fixture {
        dir: TempDir,
        context: ResolutionContext,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let store = dir.path().join("store");
        std::fs::create_dir_all(&store).unwrap();
        std::fs::write(store.join("umd_1+IMAGE+IMAGE.0"), b"TIFFDATA").unwrap();

        let resolver = Arc::new(LegacyFsResolver::new(&store));
        let context = ResolutionContext::new(resolver, "fcrepo.example.com:8080");
        Fixture { dir, context }
    }

    #[test]
    fn test_rewrite_local_url() {
        let context = fixture().context;
        assert_eq!(
            context.rewrite_local_url("http://local.fedora.server/fedora/get/umd:1/DC"),
            "http://fcrepo.example.com:8080/fedora/get/umd:1/DC"
        );
        assert_eq!(
            context.rewrite_local_url("http://other.example.com/x"),
            "http://other.example.com/x"
        );
    }

    #[tokio::test]
    async fn test_process_object_writes_all_content_kinds() {
        let fx = fixture();
        let foxml = fx.dir.path().join("umd_1.xml");
        std::fs::write(&foxml, FOXML).unwrap();
        let target = fx.dir.path().join("out").join("umd_1");

        let mut handler = DirectoryObjectHandler::new();
        let processed = FoxmlProcessor::open(&foxml, &fx.context)
            .await
            .unwrap()
            .process_object(&target, &mut handler)
            .await
            .unwrap();

        assert_eq!(processed.info.pid.as_deref(), Some("umd:1"));
        assert_eq!(processed.info.state(), Some("A"));
        assert_eq!(processed.info.label(), Some("Photograph"));
        assert_eq!(processed.stats.files, 4);

        let dc = std::fs::read_to_string(target.join("DC.0.xml")).unwrap();
        assert!(dc.starts_with("<oai_dc:dc"));
        assert!(dc.contains("A &amp; B"));
        assert!(dc.ends_with("</oai_dc:dc>"));

        assert_eq!(std::fs::read(target.join("THUMB.0.jpg")).unwrap(), b"hello world");
        assert_eq!(std::fs::read(target.join("IMAGE.0.tif")).unwrap(), b"TIFFDATA");
        assert_eq!(
            std::fs::read_to_string(target.join("LINK.0.url")).unwrap(),
            "http://fcrepo.example.com:8080/fedora/get/umd:1/DC\n"
        );
    }

    #[tokio::test]
    async fn test_empty_xml_content_still_writes_version() {
        let fx = fixture();
        let foxml = fx.dir.path().join("umd_5.xml");
        std::fs::write(
            &foxml,
            r#"<foxml:digitalObject PID="umd:5" xmlns:foxml="info:fedora/fedora-system:def/foxml#">
  <foxml:datastream ID="EMPTYX" CONTROL_GROUP="X">
    <foxml:datastreamVersion ID="EMPTYX.0" MIMETYPE="text/xml">
      <foxml:xmlContent/>
    </foxml:datastreamVersion>
  </foxml:datastream>
  <foxml:datastream ID="DC" CONTROL_GROUP="X">
    <foxml:datastreamVersion ID="DC.0" MIMETYPE="text/xml">
      <foxml:xmlContent><dc/></foxml:xmlContent>
    </foxml:datastreamVersion>
  </foxml:datastream>
</foxml:digitalObject>"#,
        )
        .unwrap();
        let target = fx.dir.path().join("out").join("umd_5");

        let mut handler = DirectoryObjectHandler::new();
        let processed = FoxmlProcessor::open(&foxml, &fx.context)
            .await
            .unwrap()
            .process_object(&target, &mut handler)
            .await
            .unwrap();

        assert_eq!(processed.stats.files, 2);
        assert_eq!(std::fs::read(target.join("EMPTYX.0.xml")).unwrap(), b"");
        assert_eq!(std::fs::read(target.join("DC.0.xml")).unwrap(), b"<dc/>");
    }

    #[tokio::test]
    async fn test_each_version_is_written() {
        let fx = fixture();
        std::fs::write(
            fx.dir.path().join("store").join("umd_1+IMAGE+IMAGE.1"),
            b"NEWER",
        )
        .unwrap();
        let foxml = fx.dir.path().join("umd_1_versions.xml");
        std::fs::write(
            &foxml,
            r#"<foxml:digitalObject PID="umd:1" xmlns:foxml="info:fedora/fedora-system:def/foxml#">
  <foxml:datastream ID="IMAGE" CONTROL_GROUP="M">
    <foxml:datastreamVersion ID="IMAGE.0" MIMETYPE="image/tiff" CREATED="2006-08-08T14:39:08.123Z">
      <foxml:contentLocation TYPE="INTERNAL_ID" REF="umd:1+IMAGE+IMAGE.0"/>
    </foxml:datastreamVersion>
    <foxml:datastreamVersion ID="IMAGE.1" MIMETYPE="image/tiff" CREATED="2007-01-02T03:04:05.000Z">
      <foxml:contentLocation TYPE="INTERNAL_ID" REF="umd:1+IMAGE+IMAGE.1"/>
    </foxml:datastreamVersion>
  </foxml:datastream>
</foxml:digitalObject>"#,
        )
        .unwrap();
        let target = fx.dir.path().join("out").join("umd_1");

        let mut handler = DirectoryObjectHandler::new();
        FoxmlProcessor::open(&foxml, &fx.context)
            .await
            .unwrap()
            .process_object(&target, &mut handler)
            .await
            .unwrap();

        assert_eq!(std::fs::read(target.join("IMAGE.0.tif")).unwrap(), b"TIFFDATA");
        assert_eq!(std::fs::read(target.join("IMAGE.1.tif")).unwrap(), b"NEWER");
    }

    #[tokio::test]
    async fn test_missing_source() {
        let fx = fixture();
        let result = FoxmlProcessor::open(&fx.dir.path().join("missing.xml"), &fx.context).await;
        assert!(matches!(result, Err(MigrationError::SourceNotFound { .. })));
    }

    #[tokio::test]
    async fn test_unresolvable_internal_id() {
        let fx = fixture();
        let foxml = fx.dir.path().join("umd_2.xml");
        std::fs::write(&foxml, FOXML.replace("umd:1+IMAGE+IMAGE.0", "umd:2+IMAGE+IMAGE.0")).unwrap();

        let mut handler = DirectoryObjectHandler::new();
        let err = FoxmlProcessor::open(&foxml, &fx.context)
            .await
            .unwrap()
            .process_object(&fx.dir.path().join("out"), &mut handler)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            MigrationError::Resolution(ResolveError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_document() {
        let fx = fixture();
        let foxml = fx.dir.path().join("broken.xml");
        std::fs::write(
            &foxml,
            "<foxml:digitalObject PID=\"umd:3\"><foxml:datastream ID=\"DC\"></foxml:digitalObject>",
        )
        .unwrap();

        let mut handler = DirectoryObjectHandler::new();
        let err = FoxmlProcessor::open(&foxml, &fx.context)
            .await
            .unwrap()
            .process_object(&fx.dir.path().join("out"), &mut handler)
            .await
            .unwrap_err();
        assert!(matches!(err, MigrationError::Foxml { .. }));
    }

    #[tokio::test]
    async fn test_document_without_root_is_rejected() {
        let fx = fixture();
        let foxml = fx.dir.path().join("other.xml");
        std::fs::write(&foxml, "<html><body/></html>").unwrap();

        let mut handler = DirectoryObjectHandler::new();
        let err = FoxmlProcessor::open(&foxml, &fx.context)
            .await
            .unwrap()
            .process_object(&fx.dir.path().join("out"), &mut handler)
            .await
            .unwrap_err();
        assert!(matches!(err, MigrationError::Foxml { .. }));
    }

    #[tokio::test]
    async fn test_object_without_datastreams_creates_directory() {
        let fx = fixture();
        let foxml = fx.dir.path().join("bare.xml");
        std::fs::write(&foxml, r#"<digitalObject PID="umd:4"/>"#).unwrap();
        let target = fx.dir.path().join("out").join("umd_4");

        let mut handler = DirectoryObjectHandler::new();
        let processed = FoxmlProcessor::open(&foxml, &fx.context)
            .await
            .unwrap()
            .process_object(&target, &mut handler)
            .await
            .unwrap();

        assert_eq!(processed.stats.files, 0);
        assert!(target.is_dir());
    }
}
