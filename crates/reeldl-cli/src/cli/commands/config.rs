//! `reeldl config` – show where the config lives and what is in effect.

use anyhow::Result;
use reeldl_core::config::{self, ReeldlConfig};

pub fn run_config(cfg: &ReeldlConfig) -> Result<()> {
    println!("config file:      {}", config::config_path()?.display());
    println!("backend_url:      {}", cfg.backend_url);
    println!("connect_timeout:  {}s", cfg.connect_timeout_secs);
    println!("request_timeout:  {}s", cfg.request_timeout_secs);
    match &cfg.download_dir {
        Some(d) => println!("download_dir:     {}", d.display()),
        None => println!("download_dir:     (current directory)"),
    }
    println!("overwrite:        {}", cfg.overwrite);
    Ok(())
}
