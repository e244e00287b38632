//! `filename="..."` extraction from a Content-Disposition header value.

const TOKEN: &str = "filename=\"";

/// Returns the quoted filename from a raw Content-Disposition value.
///
/// Matches the first `filename="` and captures up to the last `"` in the
/// value, so at least one character must sit between the quotes. Unquoted
/// `filename=` and `filename*=` forms are not recognized.
pub fn quoted_filename(header_value: &str) -> Option<String> {
    let start = header_value.find(TOKEN)? + TOKEN.len();
    let rest = &header_value[start..];
    match rest.rfind('"') {
        Some(end) if end > 0 => Some(rest[..end].to_string()),
        _ => None,
    }
}
