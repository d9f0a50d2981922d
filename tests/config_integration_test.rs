//! Integration tests for configuration loading and validation
//!
//! Tests that modify environment variables hold ENV_MUTEX so they do not
//! interfere with each other.

use fedora_export::config::{load_config, ResolverKind};
use fedora_export::domain::MigrationError;
use secrecy::ExposeSecret;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("FEDORA_EXPORT_APPLICATION_LOG_LEVEL");
    std::env::remove_var("FEDORA_EXPORT_SOURCE_HOST");
    std::env::remove_var("FEDORA_EXPORT_RESOLVER_KIND");
    std::env::remove_var("FEDORA_EXPORT_RESOLVER_LEGACY_FS_ROOT");
    std::env::remove_var("FEDORA_EXPORT_EXPORT_TARGET_DIR");
    std::env::remove_var("TEST_FEDORA_PASSWORD");
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

const MINIMAL: &str = r#"
[export]
manifest_path = "filter.json"
target_dir = "export"

[source]
host = "fedora.example.edu:8080"

[resolver]
kind = "http"
"#;

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[application]
log_level = "debug"

[export]
manifest_path = "/data/filter.json"
target_dir = "/data/export"
index_file = "/data/export/index.csv"
foxml_base_dir = "/data/objects"

[source]
host = "fedora.example.edu:8080"

[resolver]
kind = "legacy_fs"

[resolver.legacy_fs]
root = "/data/datastreams"

[resolver.http]
timeout_seconds = 10
username = "fedoraAdmin"
password = "secret"

[logging]
local_enabled = true
local_path = "/tmp/fedora-export"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.export.index_path(), PathBuf::from("/data/export/index.csv"));
    assert_eq!(
        config.export.foxml_path(std::path::Path::new("umd_1.xml")),
        PathBuf::from("/data/objects/umd_1.xml")
    );
    assert_eq!(config.resolver.kind, ResolverKind::LegacyFs);
    assert_eq!(
        config.resolver.legacy_fs.as_ref().unwrap().root,
        PathBuf::from("/data/datastreams")
    );
    assert_eq!(config.resolver.http.timeout_seconds, 10);
    assert_eq!(config.resolver.http.username.as_deref(), Some("fedoraAdmin"));
    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_load_minimal_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let config = load_config(write_config(MINIMAL).path()).unwrap();
    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.export.index_path(), PathBuf::from("export/export.csv"));
    assert!(config.export.foxml_base_dir.is_none());
    assert_eq!(config.resolver.kind, ResolverKind::Http);
    assert_eq!(config.resolver.http.timeout_seconds, 60);
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_FEDORA_PASSWORD", "from-env");

    let content = format!(
        "{MINIMAL}\n[resolver.http]\nusername = \"fedoraAdmin\"\npassword = \"${{TEST_FEDORA_PASSWORD}}\"\n"
    );
    let config = load_config(write_config(&content).path()).unwrap();
    let password = config.resolver.http.password.unwrap();
    let value: &str = password.expose_secret().as_ref();
    assert_eq!(value, "from-env");

    cleanup_env_vars();
}

#[test]
fn test_env_var_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("FEDORA_EXPORT_APPLICATION_LOG_LEVEL", "warn");
    std::env::set_var("FEDORA_EXPORT_SOURCE_HOST", "other.example.edu:80");
    std::env::set_var("FEDORA_EXPORT_RESOLVER_KIND", "legacy_fs");
    std::env::set_var("FEDORA_EXPORT_RESOLVER_LEGACY_FS_ROOT", "/mnt/store");
    std::env::set_var("FEDORA_EXPORT_EXPORT_TARGET_DIR", "/mnt/export");

    let result = load_config(write_config(MINIMAL).path());
    cleanup_env_vars();

    let config = result.unwrap();
    assert_eq!(config.application.log_level, "warn");
    assert_eq!(config.source.host, "other.example.edu:80");
    assert_eq!(config.resolver.kind, ResolverKind::LegacyFs);
    assert_eq!(
        config.resolver.legacy_fs.unwrap().root,
        PathBuf::from("/mnt/store")
    );
    assert_eq!(config.export.index_path(), PathBuf::from("/mnt/export/export.csv"));
}

#[test]
fn test_invalid_resolver_kind_override() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("FEDORA_EXPORT_RESOLVER_KIND", "ftp");

    let result = load_config(write_config(MINIMAL).path());
    cleanup_env_vars();

    assert!(matches!(result, Err(MigrationError::Configuration(_))));
}

#[test]
fn test_invalid_config_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    // legacy_fs without its section
    let missing_root = MINIMAL.replace("kind = \"http\"", "kind = \"legacy_fs\"");
    assert!(matches!(
        load_config(write_config(&missing_root).path()),
        Err(MigrationError::Configuration(_))
    ));

    // host with a scheme
    let bad_host = MINIMAL.replace("fedora.example.edu:8080", "http://fedora.example.edu");
    assert!(load_config(write_config(&bad_host).path()).is_err());

    // unknown resolver kind
    let bad_kind = MINIMAL.replace("kind = \"http\"", "kind = \"ftp\"");
    assert!(load_config(write_config(&bad_kind).path()).is_err());

    // invalid log level
    let bad_level = format!("[application]\nlog_level = \"verbose\"\n{MINIMAL}");
    assert!(load_config(write_config(&bad_level).path()).is_err());
}
