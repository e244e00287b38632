//! Failure kinds of the download lifecycle.
//!
//! `Display` is the user-facing message: the controller stores exactly this
//! string, so variants never render protocol dumps or debug output.

use thiserror::Error;

/// Message used when a failed response carries no usable `error` field.
pub const REMOTE_FALLBACK_MESSAGE: &str = "Download failed";

/// Message stored when the submitted URL is empty after trimming.
pub const EMPTY_URL_MESSAGE: &str = "Please enter a URL";

#[derive(Debug, Error)]
pub enum DownloadError {
    /// Input rejected before any network call.
    #[error("{0}")]
    Validation(String),

    /// A platform or media type string named no known variant.
    #[error("{0}")]
    Configuration(String),

    /// The exchange itself failed (connect, DNS, timeout, reset).
    #[error("network error: {}", .0.description())]
    Transport(#[from] curl::Error),

    /// Backend answered with a non-2xx status.
    #[error("{message}")]
    Remote { status: u32, message: String },

    /// Backend answered non-2xx with a body that is not JSON.
    #[error("unexpected response from server (HTTP {status})")]
    MalformedResponse {
        status: u32,
        #[source]
        source: serde_json::Error,
    },

    /// Staging or committing the artifact on disk failed.
    #[error("could not save file: {0}")]
    Save(#[from] std::io::Error),

    /// Anything else: a blocking worker panicked, a request body failed to encode.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DownloadError {
    /// True for failures detected before dispatch.
    pub fn is_validation(&self) -> bool {
        matches!(self, DownloadError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_message_is_verbatim() {
        let e = DownloadError::Remote {
            status: 500,
            message: "rate limited".into(),
        };
        assert_eq!(e.to_string(), "rate limited");
    }

    #[test]
    fn malformed_keeps_parse_error_as_source() {
        let source = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let e = DownloadError::MalformedResponse { status: 502, source };
        assert_eq!(e.to_string(), "unexpected response from server (HTTP 502)");
        assert!(std::error::Error::source(&e).is_some());
    }

    #[test]
    fn validation_flag() {
        assert!(DownloadError::Validation(EMPTY_URL_MESSAGE.into()).is_validation());
        assert!(!DownloadError::Internal("x".into()).is_validation());
    }
}
