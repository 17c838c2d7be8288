//! URL modeling helpers for image assets.
//!
//! Classifies raw catalog values as remote URLs, infers image extensions from
//! the URL path, and sanitizes product keys for use on the filesystem.

mod path;
mod sanitize;

pub use path::{extension_from_url, url_path_lowercase, DEFAULT_EXTENSION};
pub use sanitize::{sanitize_identity, UNKNOWN_IDENTITY};

/// Length at which URLs are cut in diagnostics.
const DIAGNOSTIC_URL_CHARS: usize = 60;

/// True when `value` (trimmed) is an `http://` or `https://` URL.
pub fn is_remote_url(value: &str) -> bool {
    let v = value.trim();
    let head: String = v.chars().take(8).collect::<String>().to_ascii_lowercase();
    head.starts_with("http://") || head.starts_with("https://")
}

/// Truncates a URL to a fixed number of characters for log and error lines.
pub fn truncate_for_diagnostic(url: &str) -> &str {
    match url.char_indices().nth(DIAGNOSTIC_URL_CHARS) {
        Some((idx, _)) => &url[..idx],
        None => url,
    }
}
