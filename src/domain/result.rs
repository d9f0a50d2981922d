//! Result type alias for the exporter
//!
//! This module provides a convenient Result type alias that uses MigrationError
//! as the error type.

use super::errors::MigrationError;

/// Result type alias for exporter operations
///
/// # Examples
///
/// ```
/// use fedora_export::domain::result::Result;
/// use fedora_export::domain::errors::MigrationError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(MigrationError::Configuration("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, MigrationError>;
