//! Object handlers
//!
//! Handlers receive the events of one processed object and materialize them
//! in that object's output directory.

pub mod directory;
pub mod traits;

pub use directory::DirectoryObjectHandler;
pub use traits::{ObjectHandler, ObjectStats};
