use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    fmt,
};

use crate::utils::is_blank;

/// Position information in catalog files (JSON).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageLocation {
    /// Path to the catalog file (e.g., "./messages/en/frontend.json").
    pub file_path: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub col: usize,
}

impl MessageLocation {
    pub fn new(file_path: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            col,
        }
    }

    /// Create with default column (1).
    pub fn with_line(file_path: impl Into<String>, line: usize) -> Self {
        Self::new(file_path, line, 1)
    }
}

/// Value type for catalog entries.
///
/// - **String**: `"key": "value"`
/// - **StringArray**: `"key": ["Part 1", "Part 2"]`, kept as one record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValueType {
    String,
    StringArray,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::String => write!(f, "string"),
            ValueType::StringArray => write!(f, "array"),
        }
    }
}

/// The value of one keypath in one locale, plus where it is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleRecord {
    /// Dot-delimited keypath (e.g., "greeting.hello").
    pub keypath: String,
    pub locale: String,
    pub value: String,
    pub value_type: ValueType,
    pub location: MessageLocation,
}

impl LocaleRecord {
    pub fn new(
        keypath: impl Into<String>,
        locale: impl Into<String>,
        value: impl Into<String>,
        location: MessageLocation,
    ) -> Self {
        Self {
            keypath: keypath.into(),
            locale: locale.into(),
            value: value.into(),
            value_type: ValueType::String,
            location,
        }
    }

    pub fn file_path(&self) -> &str {
        &self.location.file_path
    }

    pub fn is_blank(&self) -> bool {
        is_blank(&self.value)
    }
}

/// All records of a single locale, possibly spread over several files.
#[derive(Debug, Clone, Default)]
pub struct LocaleMessages {
    /// Locale code (e.g., "en", "zh-CN").
    pub locale: String,
    /// Catalog files belonging to this locale, sorted.
    pub files: Vec<String>,
    /// Records keyed by keypath. A keypath may live in more than one file.
    pub entries: HashMap<String, Vec<LocaleRecord>>,
}

impl LocaleMessages {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            files: Vec::new(),
            entries: HashMap::new(),
        }
    }

    /// Register a catalog file for this locale (kept sorted, no duplicates).
    pub fn add_file(&mut self, file_path: impl Into<String>) {
        let file_path = file_path.into();
        if let Err(pos) = self.files.binary_search(&file_path) {
            self.files.insert(pos, file_path);
        }
    }

    pub fn insert(&mut self, record: LocaleRecord) {
        self.add_file(record.location.file_path.clone());
        self.entries
            .entry(record.keypath.clone())
            .or_default()
            .push(record);
    }

    /// First record for a keypath.
    pub fn get(&self, keypath: &str) -> Option<&LocaleRecord> {
        self.entries.get(keypath).and_then(|records| records.first())
    }

    /// Every record for a keypath (one per file holding it).
    pub fn records(&self, keypath: &str) -> &[LocaleRecord] {
        self.entries.get(keypath).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Value of a keypath. Prefers a non-blank record when the key is duplicated.
    pub fn value(&self, keypath: &str) -> Option<&str> {
        let records = self.entries.get(keypath)?;
        records
            .iter()
            .find(|r| !r.is_blank())
            .or_else(|| records.first())
            .map(|r| r.value.as_str())
    }

    pub fn contains_key(&self, keypath: &str) -> bool {
        self.entries.contains_key(keypath)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The full catalog: every locale found under the messages root.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub locales: BTreeMap<String, LocaleMessages>,
}

impl Catalog {
    pub fn locale(&self, locale: &str) -> Option<&LocaleMessages> {
        self.locales.get(locale)
    }

    pub fn locale_mut(&mut self, locale: &str) -> &mut LocaleMessages {
        self.locales
            .entry(locale.to_string())
            .or_insert_with(|| LocaleMessages::new(locale))
    }

    pub fn locale_names(&self) -> impl Iterator<Item = &String> {
        self.locales.keys()
    }

    /// Union of keypaths over every locale.
    pub fn all_keys(&self) -> BTreeSet<String> {
        self.locales
            .values()
            .flat_map(|messages| messages.keys().cloned())
            .collect()
    }

    /// Candidate files for a locale (empty when the locale has none yet).
    pub fn files(&self, locale: &str) -> &[String] {
        self.locales
            .get(locale)
            .map(|m| m.files.as_slice())
            .unwrap_or(&[])
    }

    /// Number of distinct catalog files.
    pub fn file_count(&self) -> usize {
        self.locales.values().map(|m| m.files.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(keypath: &str, locale: &str, value: &str, file: &str) -> LocaleRecord {
        LocaleRecord::new(keypath, locale, value, MessageLocation::with_line(file, 1))
    }

    #[test]
    fn test_message_location_with_line() {
        let loc = MessageLocation::with_line("./messages/en.json", 5);
        assert_eq!(loc.file_path, "./messages/en.json");
        assert_eq!(loc.line, 5);
        assert_eq!(loc.col, 1);
    }

    #[test]
    fn test_value_type_display() {
        assert_eq!(ValueType::String.to_string(), "string");
        assert_eq!(ValueType::StringArray.to_string(), "array");
    }

    #[test]
    fn test_locale_messages_tracks_files_sorted() {
        let mut messages = LocaleMessages::new("en");
        messages.insert(record("b", "en", "B", "en/zeta.json"));
        messages.insert(record("a", "en", "A", "en/alpha.json"));
        messages.insert(record("c", "en", "C", "en/alpha.json"));

        assert_eq!(messages.files, vec!["en/alpha.json", "en/zeta.json"]);
        assert_eq!(messages.len(), 3);
    }

    #[test]
    fn test_duplicate_key_prefers_non_blank_value() {
        let mut messages = LocaleMessages::new("en");
        messages.insert(record("title", "en", "", "en/a.json"));
        messages.insert(record("title", "en", "Title", "en/b.json"));

        assert_eq!(messages.records("title").len(), 2);
        assert_eq!(messages.value("title"), Some("Title"));
        assert_eq!(messages.get("title").map(|r| r.file_path()), Some("en/a.json"));
    }

    #[test]
    fn test_missing_key_lookups() {
        let messages = LocaleMessages::new("en");
        assert!(messages.is_empty());
        assert!(messages.get("nope").is_none());
        assert!(messages.records("nope").is_empty());
        assert_eq!(messages.value("nope"), None);
    }

    #[test]
    fn test_catalog_all_keys_and_files() {
        let mut catalog = Catalog::default();
        catalog
            .locale_mut("en")
            .insert(record("a", "en", "A", "en.json"));
        catalog
            .locale_mut("fr")
            .insert(record("b", "fr", "B", "fr.json"));

        let keys: Vec<String> = catalog.all_keys().into_iter().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(catalog.files("fr"), ["fr.json".to_string()]);
        assert!(catalog.files("de").is_empty());
        assert_eq!(catalog.file_count(), 2);
    }
}
