//! Destination-file resolution for newly created keys.
//!
//! Pure decision logic over candidate paths: no filesystem access.

use std::path::PathBuf;

use tracing::debug;

use crate::core::preferences::AutoSavePreferences;
use crate::utils::{file_stem, matches_basename};

/// Basenames recognized as catalog files when falling back to the editing context.
pub const RECOGNIZED_CATALOG_BASENAMES: &[&str] = &[
    "messages",
    "translation",
    "translations",
    "common",
    "locale",
    "index",
];

/// The file currently being edited, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditingContext {
    pub file_path: PathBuf,
    pub locale: String,
}

impl EditingContext {
    pub fn new(file_path: impl Into<PathBuf>, locale: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            locale: locale.into(),
        }
    }

    fn basename(&self) -> Option<&str> {
        self.file_path.file_stem().and_then(|s| s.to_str())
    }
}

pub struct FileRouter<'a> {
    preferences: &'a AutoSavePreferences,
    context: Option<&'a EditingContext>,
}

impl<'a> FileRouter<'a> {
    pub fn new(preferences: &'a AutoSavePreferences, context: Option<&'a EditingContext>) -> Self {
        Self {
            preferences,
            context,
        }
    }

    /// Pick the file a new `(key, locale)` record should be written to.
    ///
    /// First match wins:
    /// 1. the stored preference for `locale`, if one of `available_files` has that basename;
    /// 2. the editing context, if it is in `locale` and has a recognized catalog basename;
    /// 3. the sole candidate, when `available_files` has exactly one entry.
    ///
    /// Returns `None` otherwise; callers skip the pair instead of guessing.
    pub fn resolve_target_file(&self, locale: &str, available_files: &[String]) -> Option<String> {
        if let Some(preferred) = self.preferences.preferred(locale) {
            if let Some(file) = available_files
                .iter()
                .find(|f| matches_basename(f, preferred))
            {
                debug!(locale, file = %file, "routed by preference");
                return Some(file.clone());
            }
            debug!(locale, preferred, "preferred file not among candidates");
        }

        if let Some(file) = self.resolve_from_context(locale, available_files) {
            debug!(locale, file = %file, "routed by editing context");
            return Some(file);
        }

        match available_files {
            [only] => Some(only.clone()),
            _ => None,
        }
    }

    fn resolve_from_context(&self, locale: &str, available_files: &[String]) -> Option<String> {
        let context = self.context?;
        if context.locale != locale {
            return None;
        }
        let basename = context.basename()?;
        if !is_recognized_basename(basename, locale) {
            return None;
        }
        available_files
            .iter()
            .find(|f| file_stem(f) == Some(basename))
            .cloned()
    }
}

/// A recognized catalog basename, or the locale tag itself (`en.json`).
fn is_recognized_basename(basename: &str, locale: &str) -> bool {
    basename == locale || RECOGNIZED_CATALOG_BASENAMES.contains(&basename)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_preference_wins() {
        let prefs = AutoSavePreferences::new().with("en", "frontend");
        let context = EditingContext::new("messages/en/common.json", "en");
        let router = FileRouter::new(&prefs, Some(&context));

        let available = files(&["messages/en/bot.json", "messages/en/common.json", "messages/en/frontend.json"]);
        assert_eq!(
            router.resolve_target_file("en", &available),
            Some("messages/en/frontend.json".to_string())
        );
    }

    #[test]
    fn test_preference_without_matching_file_falls_back_to_context() {
        let prefs = AutoSavePreferences::new().with("en", "frontend");
        let context = EditingContext::new("messages/en/common.json", "en");
        let router = FileRouter::new(&prefs, Some(&context));

        let available = files(&["messages/en/bot.json", "messages/en/common.json"]);
        assert_eq!(
            router.resolve_target_file("en", &available),
            Some("messages/en/common.json".to_string())
        );
    }

    #[test]
    fn test_context_in_other_locale_is_ignored() {
        let prefs = AutoSavePreferences::new();
        let context = EditingContext::new("messages/fr/common.json", "fr");
        let router = FileRouter::new(&prefs, Some(&context));

        let available = files(&["messages/en/bot.json", "messages/en/common.json"]);
        assert_eq!(router.resolve_target_file("en", &available), None);
    }

    #[test]
    fn test_context_with_unrecognized_basename_is_ignored() {
        let prefs = AutoSavePreferences::new();
        let context = EditingContext::new("messages/en/bot.json", "en");
        let router = FileRouter::new(&prefs, Some(&context));

        let available = files(&["messages/en/bot.json", "messages/en/common.json"]);
        assert_eq!(router.resolve_target_file("en", &available), None);
    }

    #[test]
    fn test_context_locale_named_file() {
        let prefs = AutoSavePreferences::new();
        let context = EditingContext::new("messages/en.json", "en");
        let router = FileRouter::new(&prefs, Some(&context));

        let available = files(&["messages/en.json", "messages/en/extra.json"]);
        assert_eq!(
            router.resolve_target_file("en", &available),
            Some("messages/en.json".to_string())
        );
    }

    #[test]
    fn test_sole_candidate() {
        let prefs = AutoSavePreferences::new();
        let router = FileRouter::new(&prefs, None);

        assert_eq!(
            router.resolve_target_file("fr", &files(&["messages/fr.json"])),
            Some("messages/fr.json".to_string())
        );
    }

    #[test]
    fn test_ambiguous_or_empty_resolves_to_none() {
        let prefs = AutoSavePreferences::new();
        let router = FileRouter::new(&prefs, None);

        assert_eq!(router.resolve_target_file("fr", &[]), None);
        assert_eq!(
            router.resolve_target_file("fr", &files(&["fr/a.json", "fr/b.json"])),
            None
        );
    }
}
