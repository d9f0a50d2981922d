//! Integrations with the source repository and the export tree.
//!
//! - [`resolver`] - internal datastream id resolution (HTTP or legacy store)
//! - [`foxml`] - streaming FOXML processing
//! - [`handler`] - per-object output handlers
//!
//! # Design Pattern
//!
//! Adapters sit behind traits ([`resolver::IdResolver`],
//! [`handler::ObjectHandler`]) so the export loop never depends on where
//! content comes from or how it is written.

pub mod foxml;
pub mod handler;
pub mod resolver;
