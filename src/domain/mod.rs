//! Domain models and types for the exporter.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`Pid`], [`InternalId`])
//! - **Manifest records** ([`UmdmRecord`], [`UmamRecord`])
//! - **Output layout** ([`ObjectLayout`], [`LayoutRegistry`])
//! - **Error types** ([`MigrationError`], [`ResolveError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Pids are validated on deserialization, so an empty `pid` in the manifest is a
//! parse error rather than an empty directory name later on:
//!
//! ```rust
//! use fedora_export::domain::Pid;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pid = Pid::new("umd:12345")?;
//! assert_eq!(pid.directory_name(), "umd_12345");
//! assert!(Pid::new("").is_err());
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod ids;
pub mod layout;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{MigrationError, ResolveError};
pub use ids::{InternalId, Pid};
pub use layout::{LayoutRegistry, ObjectLayout};
pub use record::{UmamRecord, UmdmRecord};
pub use result::Result;
