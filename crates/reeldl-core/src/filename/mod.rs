//! Save filename derivation.
//!
//! The backend suggests a name through `Content-Disposition`; when it does not,
//! a deterministic `{platform}_{type}.{ext}` name is synthesized.

mod content_disposition;
mod sanitize;

pub use content_disposition::quoted_filename;
pub use sanitize::sanitize_filename_for_linux;

use crate::media::{MediaType, Platform};

/// Name used when the backend suggests none, e.g. `tiktok_video.mp4`.
pub fn fallback_filename(platform: Platform, media_type: MediaType) -> String {
    format!("{}_{}.{}", platform, media_type, media_type.extension())
}

/// Picks the save filename for a successful response.
///
/// A `filename="..."` token in `content_disposition` wins and is used verbatim;
/// anything else yields [`fallback_filename`].
pub fn derive_filename(
    content_disposition: Option<&str>,
    platform: Platform,
    media_type: MediaType,
) -> String {
    content_disposition
        .and_then(quoted_filename)
        .unwrap_or_else(|| fallback_filename(platform, media_type))
}
