//! Image extension inference from the URL path.

/// Extension used when the URL path carries no recognizable image suffix.
pub const DEFAULT_EXTENSION: &str = "jpg";

/// Returns the lower-cased path component of `url` (no query, no fragment).
///
/// Falls back to plain string splitting when the URL does not parse.
pub fn url_path_lowercase(url: &str) -> String {
    match url::Url::parse(url.trim()) {
        Ok(parsed) => parsed.path().to_ascii_lowercase(),
        Err(_) => url
            .trim()
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase(),
    }
}

/// Infers a file extension for an image URL.
///
/// This looks only at the URL text, never at response headers or content, so a
/// URL without a recognizable suffix is labelled `jpg` whatever it serves.
pub fn extension_from_url(url: &str) -> &'static str {
    let path = url_path_lowercase(url);
    if path.contains(".jpg") || path.ends_with(".jpeg") {
        "jpg"
    } else if path.contains(".png") {
        "png"
    } else if path.contains(".webp") {
        "webp"
    } else if path.contains(".gif") {
        "gif"
    } else {
        DEFAULT_EXTENSION
    }
}
