//! Input token normalization

/// Normalize a raw token for dispatch
///
/// Trims surrounding whitespace and lower-cases. Returns `None` when nothing
/// is left, so blank lines in an input file never become work items.
///
/// # Examples
///
/// ```
/// use medlex_domain::normalize_token;
///
/// assert_eq!(normalize_token(" CARCINOMA "), Some("carcinoma".to_string()));
/// assert_eq!(normalize_token("   "), None);
/// ```
pub fn normalize_token(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}
