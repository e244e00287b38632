use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::http::HttpOptions;

/// Global configuration loaded from `~/.config/reeldl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReeldlConfig {
    /// Base URL of the download backend; routes live under `/api`.
    pub backend_url: String,
    /// Seconds allowed to establish the connection.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Seconds allowed for the whole exchange. The backend transcodes before it answers.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Where files are saved (None = current directory).
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    /// Replace existing files instead of saving as `name (n).ext`.
    #[serde(default)]
    pub overwrite: bool,
}

fn default_connect_timeout_secs() -> u64 {
    15
}

fn default_request_timeout_secs() -> u64 {
    600
}

impl Default for ReeldlConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8080".to_string(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            download_dir: None,
            overwrite: false,
        }
    }
}

impl ReeldlConfig {
    pub fn http_options(&self) -> HttpOptions {
        HttpOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("reeldl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ReeldlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ReeldlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ReeldlConfig = toml::from_str(&data)?;
    Ok(cfg)
}
