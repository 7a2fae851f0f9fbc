//! Character-level sanitization of untrusted identity, name and path segments.
//!
//! Everything here is total: illegal input degrades to a shorter (possibly empty)
//! string instead of failing. Callers that need a non-empty result check for it.

const PARENT_REF: &str = "..";

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '_' | '-')
}

/// Remove `..` until none is left.
///
/// A single pass is not enough: `....//` loses one `..` pair per pass and
/// would otherwise leave a fresh `../` behind.
fn strip_parent_refs(mut value: String) -> String {
    while value.contains(PARENT_REF) {
        value = value.replace(PARENT_REF, "");
    }
    value
}

/// Sanitize a single path segment (identity, file or folder name).
pub fn sanitize_segment(raw: &str) -> String {
    let filtered: String = raw.chars().filter(|c| is_allowed(*c)).collect();
    strip_parent_refs(filtered)
}
