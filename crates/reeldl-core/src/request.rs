//! Validated download request and its wire body.

use serde::Serialize;

use crate::error::{DownloadError, EMPTY_URL_MESSAGE};
use crate::media::{MediaType, Platform};

/// A request that passed pre-flight validation. `url` is stored trimmed and is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    url: String,
    platform: Platform,
    media_type: MediaType,
}

impl DownloadRequest {
    pub fn new(url: &str, platform: Platform, media_type: MediaType) -> Result<Self, DownloadError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(DownloadError::Validation(EMPTY_URL_MESSAGE.to_string()));
        }
        Ok(Self {
            url: url.to_string(),
            platform,
            media_type,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    /// JSON body sent to the backend. The platform travels in the path, not here.
    pub fn body(&self) -> RequestBody<'_> {
        RequestBody {
            url: &self.url,
            media_type: self.media_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RequestBody<'a> {
    pub url: &'a str,
    #[serde(rename = "type")]
    pub media_type: MediaType,
}
