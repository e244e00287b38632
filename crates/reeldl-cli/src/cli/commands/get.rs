//! `reeldl get <platform> <url>` – fetch one artifact and save it.

use anyhow::Result;
use reeldl_core::config::ReeldlConfig;
use reeldl_core::{
    DirectoryTarget, DownloadController, MediaType, Platform, RequestClient, TriggerOutcome,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug)]
pub struct GetArgs {
    pub platform: Platform,
    pub url: String,
    pub media_type: MediaType,
    pub out: Option<PathBuf>,
    pub backend: Option<String>,
    pub overwrite: bool,
}

pub async fn run_get(cfg: &ReeldlConfig, args: GetArgs) -> Result<()> {
    let dir = match args.out.or_else(|| cfg.download_dir.clone()) {
        Some(d) => d,
        None => std::env::current_dir()?,
    };
    let target = DirectoryTarget::new(dir).overwrite(args.overwrite || cfg.overwrite);

    let mut cfg = cfg.clone();
    if let Some(backend) = args.backend {
        cfg.backend_url = backend;
    }
    let client = RequestClient::from_config(&cfg, Arc::new(target));
    let controller = DownloadController::new(client);

    println!(
        "Requesting {} {} from {} ...",
        args.platform, args.media_type, cfg.backend_url
    );
    match controller.trigger(&args.url, args.platform, args.media_type).await {
        TriggerOutcome::Saved(d) => {
            println!("Saved {} ({} bytes)", d.path.display(), d.bytes);
            Ok(())
        }
        TriggerOutcome::Failed(message) => anyhow::bail!(message),
        TriggerOutcome::Busy => anyhow::bail!("another download is already in progress"),
    }
}
