const FALLBACK_NAME: &str = "upload";

/// Turn a client supplied filename into a single safe path component.
///
/// Only the last path segment is kept (either separator), anything
/// outside `[A-Za-z0-9._-]` becomes `_`, and leading dots are dropped
/// so the result can never be `.`, `..` or a hidden file.
pub fn sanitize_filename(name: &str) -> String {
    let last = name.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}
