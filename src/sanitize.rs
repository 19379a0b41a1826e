/// Name used when sanitization leaves nothing printable behind.
pub const PLACEHOLDER_NAME: &str = "Untitled";

/// Characters that are illegal in filenames on common filesystems.
const ILLEGAL: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Turn a playlist display name into a filesystem-safe file stem.
///
/// Illegal characters become `-`; an empty or whitespace-only result is
/// replaced by [`PLACEHOLDER_NAME`]. Idempotent: sanitizing an already
/// sanitized name returns it unchanged.
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if ILLEGAL.contains(&c) { '-' } else { c })
        .collect();
    if cleaned.trim().is_empty() {
        PLACEHOLDER_NAME.to_string()
    } else {
        cleaned
    }
}
