//! Common utility functions shared across the codebase.

use std::path::Path;

/// Checks if a translation value is blank (empty or whitespace only).
///
/// # Examples
///
/// ```
/// use keysync::utils::is_blank;
///
/// assert!(is_blank(""));
/// assert!(is_blank("  \n\t"));
/// assert!(!is_blank("Hi"));
/// assert!(!is_blank(" 0 "));
/// ```
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Returns the file name of a catalog path (e.g., "frontend.json").
pub fn file_name(path: &str) -> Option<&str> {
    Path::new(path).file_name().and_then(|s| s.to_str())
}

/// Returns the file stem of a catalog path (e.g., "frontend").
pub fn file_stem(path: &str) -> Option<&str> {
    Path::new(path).file_stem().and_then(|s| s.to_str())
}

/// Checks whether a catalog file path has the given basename.
///
/// The basename may be given with or without extension, so both
/// `frontend` and `frontend.json` match `messages/en/frontend.json`.
///
/// # Examples
///
/// ```
/// use keysync::utils::matches_basename;
///
/// assert!(matches_basename("messages/en/frontend.json", "frontend"));
/// assert!(matches_basename("messages/en/frontend.json", "frontend.json"));
/// assert!(!matches_basename("messages/en/bot.json", "frontend"));
/// ```
pub fn matches_basename(path: &str, basename: &str) -> bool {
    file_name(path) == Some(basename) || file_stem(path) == Some(basename)
}

/// Checks if the text is a plain JS identifier (used for usage function names).
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use crate::utils::*;

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank(" "));
        assert!(is_blank("\n\t "));

        assert!(!is_blank("a"));
        assert!(!is_blank("  Hello  "));
        assert!(!is_blank("你好"));
    }

    #[test]
    fn test_matches_basename() {
        assert!(matches_basename("./messages/en/frontend.json", "frontend"));
        assert!(matches_basename("./messages/en.json", "en"));
        assert!(matches_basename("/abs/fr/common.json", "common.json"));

        assert!(!matches_basename("./messages/en/bot.json", "frontend"));
        assert!(!matches_basename("./messages/en/frontend.json", "front"));
        assert!(!matches_basename("", "frontend"));
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("t"));
        assert!(is_identifier("$t"));
        assert!(is_identifier("i18n_t"));
        assert!(is_identifier("translate2"));

        assert!(!is_identifier(""));
        assert!(!is_identifier("2t"));
        assert!(!is_identifier("t.raw"));
        assert!(!is_identifier("t("));
    }
}
