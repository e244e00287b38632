//! Request client: one backend round-trip per download, then one save.
//!
//! The platform selects the route (`/api/{platform}`); the body carries
//! `{url, type}`. A 2xx body is the artifact itself; anything else is an
//! error envelope `{"error": "..."}`.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::ReeldlConfig;
use crate::delivery::SaveTarget;
use crate::error::{DownloadError, REMOTE_FALLBACK_MESSAGE};
use crate::filename::{derive_filename, fallback_filename};
use crate::http::{self, HttpOptions, RawResponse};
use crate::media::Platform;
use crate::request::DownloadRequest;

/// Receipt of a completed save. Informational only; nothing keeps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered {
    /// Filename the backend suggested (or the synthesized fallback).
    pub filename: String,
    /// Where the file actually landed after sanitization and de-duplication.
    pub path: PathBuf,
    pub bytes: usize,
}

/// Artifact extracted from a successful response, not yet saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    /// `{platform}_{type}.{ext}`, used when `filename` is unusable on disk.
    pub fallback: String,
    pub payload: Vec<u8>,
}

#[derive(Clone)]
pub struct RequestClient {
    backend_url: String,
    http: HttpOptions,
    target: Arc<dyn SaveTarget>,
}

impl RequestClient {
    pub fn new(backend_url: &str, target: Arc<dyn SaveTarget>) -> Self {
        Self {
            backend_url: backend_url.trim_end_matches('/').to_string(),
            http: HttpOptions::default(),
            target,
        }
    }

    pub fn from_config(cfg: &ReeldlConfig, target: Arc<dyn SaveTarget>) -> Self {
        Self::new(&cfg.backend_url, target).with_http_options(cfg.http_options())
    }

    pub fn with_http_options(mut self, http: HttpOptions) -> Self {
        self.http = http;
        self
    }

    /// `{backend}/api/{platform}`.
    pub fn endpoint(&self, platform: Platform) -> String {
        format!("{}/api/{}", self.backend_url, platform.as_str())
    }

    /// Fetches the artifact for `request` and saves it through the target.
    pub async fn send(&self, request: &DownloadRequest) -> Result<Delivered, DownloadError> {
        let endpoint = self.endpoint(request.platform());
        let body = serde_json::to_vec(&request.body())
            .map_err(|e| DownloadError::Internal(format!("encode request body: {}", e)))?;
        tracing::info!(
            platform = %request.platform(),
            media_type = %request.media_type(),
            "POST {} for {}",
            endpoint,
            request.url()
        );

        let opts = self.http;
        let response = tokio::task::spawn_blocking(move || http::post_json(&endpoint, &body, opts))
            .await
            .map_err(join_error)??;

        let artifact = interpret(response, request)?;
        let target = Arc::clone(&self.target);
        let delivered = tokio::task::spawn_blocking(move || -> Result<Delivered, DownloadError> {
            let path = target.save(&artifact.filename, &artifact.fallback, &artifact.payload)?;
            Ok(Delivered {
                filename: artifact.filename,
                path,
                bytes: artifact.payload.len(),
            })
        })
        .await
        .map_err(join_error)??;

        tracing::info!(
            "saved {} ({} bytes) to {}",
            delivered.filename,
            delivered.bytes,
            delivered.path.display()
        );
        Ok(delivered)
    }
}

/// Turns a raw response into the artifact to save, or the failure it reports.
pub fn interpret(response: RawResponse, request: &DownloadRequest) -> Result<Artifact, DownloadError> {
    if !response.is_success() {
        return Err(remote_error(&response));
    }
    let filename = derive_filename(
        response.header("Content-Disposition"),
        request.platform(),
        request.media_type(),
    );
    Ok(Artifact {
        filename,
        fallback: fallback_filename(request.platform(), request.media_type()),
        payload: response.body,
    })
}

fn remote_error(response: &RawResponse) -> DownloadError {
    let value: serde_json::Value = match serde_json::from_slice(&response.body) {
        Ok(v) => v,
        Err(source) => {
            tracing::warn!(status = response.status, "error response is not JSON");
            return DownloadError::MalformedResponse {
                status: response.status,
                source,
            };
        }
    };
    let message = value
        .get("error")
        .and_then(serde_json::Value::as_str)
        .filter(|m| !m.is_empty())
        .unwrap_or(REMOTE_FALLBACK_MESSAGE)
        .to_string();
    tracing::warn!(status = response.status, "backend refused download: {}", message);
    DownloadError::Remote {
        status: response.status,
        message,
    }
}

fn join_error(e: tokio::task::JoinError) -> DownloadError {
    DownloadError::Internal(e.to_string())
}
