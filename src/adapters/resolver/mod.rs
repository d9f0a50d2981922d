//! Internal ID resolution
//!
//! Internal datastream references inside FOXML are resolved either against a
//! live repository ([`HttpResolver`]) or a legacy low-level store on disk
//! ([`LegacyFsResolver`]). One variant is chosen per run by configuration.

pub mod factory;
pub mod http;
pub mod legacy_fs;
pub mod traits;

pub use factory::create_resolver;
pub use http::HttpResolver;
pub use legacy_fs::LegacyFsResolver;
pub use traits::{ContentSource, IdResolver};
