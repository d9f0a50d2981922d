//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "fedora-export.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing fedora-export configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Choose resolver.kind: 'http' or 'legacy_fs'");
                println!("  3. For the HTTP resolver, set FEDORA_USERNAME and FEDORA_PASSWORD");
                println!("     (or remove the username/password lines)");
                println!("  4. Validate configuration: fedora-export validate-config");
                println!("  5. Run export: fedora-export export");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Sample configuration
    fn generate_config() -> String {
        r#"# fedora-export configuration
# Exports UMDM/UMAM objects from a Fedora repository into a directory tree

[application]
log_level = "info"  # trace | debug | info | warn | error

[export]
# One JSON object per line: {"pid", "foxml", "title", "handle", "hasPart": [{"pid", "foxml"}]}
manifest_path = "filter.json"
target_dir = "export"
# index_file = "export/export.csv"
foxml_base_dir = "/data/fedora/objects"

[source]
host = "fedora.example.edu:8080"

[resolver]
kind = "legacy_fs"  # http | legacy_fs

[resolver.legacy_fs]
root = "/data/fedora/datastreams"

[resolver.http]
timeout_seconds = 60
# username = "${FEDORA_USERNAME}"
# password = "${FEDORA_PASSWORD}"

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"  # daily | hourly
"#
        .to_string()
    }
}
