//! Null coalescing applied where rows leave the store.

/// Shown in place of a missing or blank text column.
pub const NOT_SPECIFIED: &str = "No especificado";

/// Trimmed text, or [`NOT_SPECIFIED`] when the column is NULL or blank.
pub fn text_or_default(value: Option<String>) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s.trim().to_string(),
        _ => NOT_SPECIFIED.to_string(),
    }
}

/// First present, non-blank value, or [`NOT_SPECIFIED`].
pub fn first_text(candidates: &[Option<&str>]) -> String {
    candidates
        .iter()
        .flatten()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| NOT_SPECIFIED.to_string())
}

pub fn is_specified(value: &str) -> bool {
    value != NOT_SPECIFIED
}
