//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod extract;
pub mod fit;
pub mod transform;

use std::path::{Path, PathBuf};

use grantprep_core::models::config::GrantConfig;
use tracing::debug;

/// Per-user configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("grantprep")
        .join("config.json")
}

/// Load `--config` if given, else the per-user file if it exists, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<GrantConfig> {
    let config = match config_path {
        Some(path) => GrantConfig::from_file(Path::new(path))
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path, e))?,
        None => {
            let user_path = default_config_path();
            if user_path.exists() {
                debug!("Using config from {}", user_path.display());
                GrantConfig::from_file(&user_path)?
            } else {
                GrantConfig::default()
            }
        }
    };
    config.validate()?;
    Ok(config)
}
