//! Path-safe identity sanitization.

/// Placeholder identity used when sanitization leaves nothing usable.
pub const UNKNOWN_IDENTITY: &str = "unknown";

/// Sanitizes a product key (SKU or id) for use as a folder and file name component.
///
/// - Keeps ASCII letters, digits, `_`, `-` and `.`
/// - Replaces every run of other characters with a single `_`
/// - Returns [`UNKNOWN_IDENTITY`] for an empty result or one made only of dots
pub fn sanitize_identity(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_replaced_run = false;

    for c in raw.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' {
            out.push(c);
            in_replaced_run = false;
        } else if !in_replaced_run {
            out.push('_');
            in_replaced_run = true;
        }
    }

    if out.is_empty() || out.chars().all(|c| c == '.') {
        UNKNOWN_IDENTITY.to_string()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_runs_of_invalid_chars() {
        assert_eq!(sanitize_identity("Chair #1/2"), "Chair_1_2");
        assert_eq!(sanitize_identity("a b\tc"), "a_b_c");
    }

    #[test]
    fn keeps_allowed_chars() {
        assert_eq!(sanitize_identity("ABC-1_x.v2"), "ABC-1_x.v2");
        assert_eq!(sanitize_identity("a__b"), "a__b");
    }

    #[test]
    fn non_ascii_is_replaced() {
        assert_eq!(sanitize_identity("café-1"), "caf_-1");
    }

    #[test]
    fn empty_and_dot_only_fall_back() {
        assert_eq!(sanitize_identity(""), UNKNOWN_IDENTITY);
        assert_eq!(sanitize_identity("."), UNKNOWN_IDENTITY);
        assert_eq!(sanitize_identity(".."), UNKNOWN_IDENTITY);
    }

    #[test]
    fn only_invalid_chars_become_single_underscore() {
        assert_eq!(sanitize_identity("###"), "_");
    }
}
