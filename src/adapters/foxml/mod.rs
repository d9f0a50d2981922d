//! FOXML reading
//!
//! [`FoxmlProcessor`] streams one FOXML document into an
//! [`ObjectHandler`](crate::adapters::handler::ObjectHandler), resolving
//! internal datastream references on the way.

pub mod models;
pub mod processor;

pub use models::{ControlGroup, DatastreamContent, DatastreamVersion, ObjectInfo};
pub use processor::{FoxmlProcessor, ProcessedObject, ResolutionContext};
