//! Logging and observability
//!
//! Structured logging with:
//! - Configurable log levels
//! - Console output
//! - JSON file logging with daily or hourly rotation
//!
//! # Example
//!
//! ```no_run
//! use fedora_export::logging::init_logging;
//! use fedora_export::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use fedora_export::log_error_with_context;
/// use fedora_export::domain::MigrationError;
///
/// let error = MigrationError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
