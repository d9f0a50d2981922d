//! FOXML object and datastream models
//!
//! These are the records the processor hands to an
//! [`ObjectHandler`](crate::adapters::handler::ObjectHandler).

use crate::adapters::resolver::ContentSource;
use chrono::{DateTime, Utc};

/// Fedora object property URI for the object state
pub const STATE_PROPERTY: &str = "info:fedora/fedora-system:def/model#state";

/// Fedora object property URI for the object label
pub const LABEL_PROPERTY: &str = "info:fedora/fedora-system:def/model#label";

/// Object-level information from `digitalObject` and `objectProperties`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectInfo {
    /// PID attribute of `digitalObject`
    pub pid: Option<String>,

    /// Object properties as (NAME, VALUE) pairs in document order
    pub properties: Vec<(String, String)>,
}

impl ObjectInfo {
    /// Value of a property by its full name
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Object state (`A`, `I` or `D`)
    pub fn state(&self) -> Option<&str> {
        self.property(STATE_PROPERTY)
    }

    /// Object label
    pub fn label(&self) -> Option<&str> {
        self.property(LABEL_PROPERTY)
    }
}

/// Datastream control group
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlGroup {
    /// `X`: XML stored inline in the FOXML
    InlineXml,
    /// `M`: managed content held by the repository
    Managed,
    /// `E`: external content referenced by URL
    External,
    /// `R`: redirect to a URL
    Redirect,
    /// Anything else, kept verbatim
    Other(String),
}

impl ControlGroup {
    /// Parses a `CONTROL_GROUP` attribute value
    pub fn parse(value: &str) -> Self {
        match value {
            "X" => ControlGroup::InlineXml,
            "M" => ControlGroup::Managed,
            "E" => ControlGroup::External,
            "R" => ControlGroup::Redirect,
            other => ControlGroup::Other(other.to_string()),
        }
    }
}

/// One `datastreamVersion` together with its owning datastream's attributes
#[derive(Debug, Clone, PartialEq)]
pub struct DatastreamVersion {
    /// Datastream ID (`DC`, `RELS-EXT`, ...)
    pub datastream_id: String,

    /// Control group of the owning datastream
    pub control_group: ControlGroup,

    /// Version ID (`DC.0`, `DC.1`, ...)
    pub version_id: String,

    /// MIME type of the version
    pub mime_type: Option<String>,

    /// Creation date, if present and parseable; used to address the version
    /// when resolving over HTTP
    pub created: Option<DateTime<Utc>>,
}

/// Content of one datastream version
#[derive(Debug)]
pub enum DatastreamContent {
    /// Inline `xmlContent`, re-serialized
    InlineXml(Vec<u8>),
    /// Decoded `binaryContent`
    Binary(Vec<u8>),
    /// Internal reference resolved through the configured resolver
    Resolved(ContentSource),
    /// URL reference, not fetched
    Url(String),
    /// The version carried no content element
    Empty,
}

impl DatastreamContent {
    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            DatastreamContent::InlineXml(_) => "inline_xml",
            DatastreamContent::Binary(_) => "binary",
            DatastreamContent::Resolved(_) => "resolved",
            DatastreamContent::Url(_) => "url",
            DatastreamContent::Empty => "empty",
        }
    }
}
