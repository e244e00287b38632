//! `reeldl health` – check that the backend answers.

use anyhow::{Context, Result};
use reeldl_core::config::ReeldlConfig;
use reeldl_core::health;

pub async fn run_health(cfg: &ReeldlConfig, backend: Option<&str>) -> Result<()> {
    let backend = backend.unwrap_or(&cfg.backend_url).to_string();
    let opts = cfg.http_options();
    let status = tokio::task::spawn_blocking({
        let backend = backend.clone();
        move || health::probe(&backend, opts)
    })
    .await
    .context("health task join")??;

    if status.is_ok() {
        println!("{}: ok", backend);
        Ok(())
    } else {
        anyhow::bail!("{} reports status {:?}", backend, status.status)
    }
}
