//! Linux-safe filename sanitization applied right before writing to disk.

const NAME_MAX: usize = 255;

/// Sanitizes a suggested filename for the local filesystem.
///
/// - Replaces NUL, `/`, `\` and control characters with `_` (runs collapse)
/// - Trims leading/trailing spaces and dots
/// - Limits length to 255 bytes on a char boundary
///
/// Returns an empty string when nothing usable remains; callers pick a fallback.
pub fn sanitize_filename_for_linux(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_replaced = false;

    for c in name.chars() {
        if c == '\0' || c == '/' || c == '\\' || c.is_control() {
            if !prev_replaced {
                out.push('_');
            }
            prev_replaced = true;
        } else {
            out.push(c);
            prev_replaced = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == ' ' || c == '.');
    if trimmed.len() <= NAME_MAX {
        return trimmed.to_string();
    }
    let mut take = NAME_MAX;
    while take > 0 && !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    trimmed[..take].to_string()
}
