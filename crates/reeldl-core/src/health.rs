//! Backend liveness probe (`GET /api/health`).

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::http::{self, HttpOptions, RawResponse};

/// Body of a health response, e.g. `{"status":"ok"}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// Asks the backend at `backend_url` whether it is up.
/// Runs in the current thread; call from `spawn_blocking` if used from async code.
pub fn probe(backend_url: &str, opts: HttpOptions) -> Result<HealthStatus> {
    let url = format!("{}/api/health", backend_url.trim_end_matches('/'));
    let response = http::get(&url, opts).with_context(|| format!("GET {} failed", url))?;
    parse_health(&url, &response)
}

fn parse_health(url: &str, response: &RawResponse) -> Result<HealthStatus> {
    if !response.is_success() {
        anyhow::bail!("GET {} returned HTTP {}", url, response.status);
    }
    serde_json::from_slice(&response.body).context("health response is not valid JSON")
}
