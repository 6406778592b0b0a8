use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde_json::Value;
use walkdir::WalkDir;

use crate::core::{Catalog, LocaleRecord, MessageLocation, ValueType};

/// A warning from scanning catalog files.
#[derive(Debug, Clone)]
pub struct CatalogScanWarning {
    pub file_path: String,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct ScanCatalogResult {
    pub catalog: Catalog,
    pub warnings: Vec<CatalogScanWarning>,
}

/// Parse one catalog file into flat records.
///
/// An empty (or whitespace-only) file is an empty catalog.
pub fn parse_json_file(path: &Path, locale: &str) -> Result<Vec<LocaleRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file: {:?}", path))?;

    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let json: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON file: {:?}", path))?;

    let file_path = path.to_string_lossy().to_string();
    let line_index = build_line_index(&content);
    let mut records = Vec::new();
    let mut ctx = FlattenContext {
        locale,
        file_path: &file_path,
        content: &content,
        line_index: &line_index,
        records: &mut records,
    };
    flatten_json(&json, String::new(), &mut ctx);
    Ok(records)
}

/// Build an index of line start byte offsets for O(log n) line lookups.
fn build_line_index(content: &str) -> Vec<usize> {
    let mut offsets = vec![0];
    for (i, c) in content.char_indices() {
        if c == '\n' {
            offsets.push(i + 1);
        }
    }
    offsets
}

/// Find 1-based line number for a byte offset.
fn offset_to_line(line_index: &[usize], offset: usize) -> usize {
    match line_index.binary_search(&offset) {
        Ok(line) => line + 1,
        Err(line) => line,
    }
}

/// Find the line where a keypath is declared.
///
/// Each segment is searched after the previous one, and a match only counts
/// when it is followed by `:` (a key, not a value with the same text).
fn find_key_line(content: &str, keypath: &str, line_index: &[usize]) -> usize {
    let mut search_start = 0;
    for part in keypath.split('.') {
        let pattern = format!("\"{}\"", part);
        let remaining = &content[search_start..];

        let mut pos = 0;
        let mut found = false;
        while let Some(rel_pos) = remaining[pos..].find(&pattern) {
            let abs_pos = pos + rel_pos;
            let after_pattern = abs_pos + pattern.len();

            if after_pattern < remaining.len()
                && remaining[after_pattern..].trim_start().starts_with(':')
            {
                search_start += after_pattern;
                found = true;
                break;
            }
            pos = abs_pos + 1;
        }

        if !found {
            break;
        }
    }

    if search_start > 0 {
        offset_to_line(line_index, search_start)
    } else {
        1
    }
}

struct FlattenContext<'a> {
    locale: &'a str,
    file_path: &'a str,
    content: &'a str,
    line_index: &'a [usize],
    records: &'a mut Vec<LocaleRecord>,
}

impl FlattenContext<'_> {
    fn push(&mut self, keypath: String, value: String, value_type: ValueType) {
        let line = find_key_line(self.content, &keypath, self.line_index);
        let mut record = LocaleRecord::new(
            keypath,
            self.locale,
            value,
            MessageLocation::with_line(self.file_path, line),
        );
        record.value_type = value_type;
        self.records.push(record);
    }
}

fn join_keypath(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}

fn flatten_json(value: &Value, prefix: String, ctx: &mut FlattenContext<'_>) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                flatten_json(val, join_keypath(&prefix, key), ctx);
            }
        }
        Value::String(s) => ctx.push(prefix, s.clone(), ValueType::String),
        Value::Array(arr) => {
            if arr.is_empty() {
                return;
            }

            // String-only arrays are one record; other arrays expand by index
            let is_string_array = arr.iter().all(|v| matches!(v, Value::String(_)));
            if is_string_array && !prefix.is_empty() {
                let values: Vec<&str> = arr.iter().filter_map(|v| v.as_str()).collect();
                ctx.push(prefix, values.join(", "), ValueType::StringArray);
            } else {
                for (index, val) in arr.iter().enumerate() {
                    flatten_json(val, join_keypath(&prefix, &index.to_string()), ctx);
                }
            }
        }
        _ => {}
    }
}

/// Infer the locale a catalog file belongs to.
///
/// - `<root>/en.json` -> `en`
/// - `<root>/en/frontend.json` -> `en`
/// - `<root>/en/nested/bot.json` -> `en`
pub fn locale_for_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut components = rel.components();
    let first = components.next()?.as_os_str().to_str()?;
    if components.next().is_none() {
        Path::new(first)
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string)
    } else {
        Some(first.to_string())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}

/// Collect `(locale, file)` pairs for both catalog layouts, sorted.
fn collect_catalog_files(root: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if path.is_dir() {
            let Some(locale) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };
            for nested in WalkDir::new(&path).sort_by_file_name().into_iter().flatten() {
                if nested.file_type().is_file() && is_json(nested.path()) {
                    files.push((locale.to_string(), nested.into_path()));
                }
            }
        } else if is_json(&path)
            && let Some(locale) = locale_for_path(root, &path)
        {
            files.push((locale, path));
        }
    }

    files.sort();
    Ok(files)
}

pub fn scan_catalog(root: impl AsRef<Path>) -> Result<ScanCatalogResult> {
    let root = root.as_ref();
    let mut result = ScanCatalogResult::default();

    if !root.exists() {
        bail!(
            "Messages directory '{}' does not exist.\n\
             Hint: Check your .keysyncrc.json 'messagesRoot' setting.",
            root.display()
        );
    }

    if !root.is_dir() {
        bail!("'{}' is not a directory.", root.display());
    }

    for (locale, path) in collect_catalog_files(root)? {
        match parse_json_file(&path, &locale) {
            Ok(records) => {
                let messages = result.catalog.locale_mut(&locale);
                messages.add_file(path.to_string_lossy().to_string());
                for record in records {
                    messages.insert(record);
                }
            }
            Err(e) => {
                result.warnings.push(CatalogScanWarning {
                    file_path: path.to_string_lossy().to_string(),
                    error: format!("{:#}", e),
                });
            }
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use crate::core::parsers::json::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn flatten(content: &str) -> Vec<LocaleRecord> {
        let json: Value = serde_json::from_str(content).unwrap();
        let line_index = build_line_index(content);
        let mut records = Vec::new();
        let mut ctx = FlattenContext {
            locale: "en",
            file_path: "test.json",
            content,
            line_index: &line_index,
            records: &mut records,
        };
        flatten_json(&json, String::new(), &mut ctx);
        records
    }

    fn value_of<'a>(records: &'a [LocaleRecord], keypath: &str) -> Option<&'a str> {
        records
            .iter()
            .find(|r| r.keypath == keypath)
            .map(|r| r.value.as_str())
    }

    #[test]
    fn test_flatten_nested() {
        let records = flatten(r#"{"Auth": {"Login": {"title": "Login", "button": "Submit"}}}"#);
        assert_eq!(value_of(&records, "Auth.Login.title"), Some("Login"));
        assert_eq!(value_of(&records, "Auth.Login.button"), Some("Submit"));
        assert!(records.iter().all(|r| r.locale == "en"));
    }

    #[test]
    fn test_flatten_object_array_expanded() {
        let records =
            flatten(r#"{"faq": {"items": [{"question": "Q1"}, {"question": "Q2"}]}}"#);
        assert_eq!(value_of(&records, "faq.items.0.question"), Some("Q1"));
        assert_eq!(value_of(&records, "faq.items.1.question"), Some("Q2"));
        assert_eq!(value_of(&records, "faq.items"), None);
    }

    #[test]
    fn test_flatten_string_array_single_record() {
        let records = flatten(r#"{"Page": {"benefits": ["Fast", "Easy"]}}"#);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].keypath, "Page.benefits");
        assert_eq!(records[0].value, "Fast, Easy");
        assert_eq!(records[0].value_type, ValueType::StringArray);
    }

    #[test]
    fn test_flatten_ignores_non_string_scalars() {
        let records = flatten(r#"{"count": 3, "flag": true, "none": null, "ok": "yes"}"#);
        assert_eq!(records.len(), 1);
        assert_eq!(value_of(&records, "ok"), Some("yes"));
    }

    #[test]
    fn test_flatten_keeps_empty_strings() {
        let records = flatten(r#"{"partial": {"note": ""}}"#);
        assert_eq!(value_of(&records, "partial.note"), Some(""));
        assert!(records[0].is_blank());
    }

    #[test]
    fn test_find_key_line_skips_value_matches() {
        let content = r#"{
  "Auth": {
    "message": "Welcome to Auth page",
    "title": "Auth Login"
  }
}"#;
        let records = flatten(content);
        let line_of = |key: &str| {
            records
                .iter()
                .find(|r| r.keypath == key)
                .map(|r| r.location.line)
        };
        assert_eq!(line_of("Auth.message"), Some(3));
        assert_eq!(line_of("Auth.title"), Some(4));
    }

    #[test]
    fn test_build_line_index() {
        let index = build_line_index("line1\nline2\nline3");
        assert_eq!(index, vec![0, 6, 12]);
        assert_eq!(offset_to_line(&index, 0), 1);
        assert_eq!(offset_to_line(&index, 8), 2);
        assert_eq!(offset_to_line(&index, 12), 3);
    }

    #[test]
    fn test_locale_for_path() {
        let root = Path::new("/p/messages");
        assert_eq!(
            locale_for_path(root, Path::new("/p/messages/en.json")),
            Some("en".to_string())
        );
        assert_eq!(
            locale_for_path(root, Path::new("/p/messages/zh-CN/frontend.json")),
            Some("zh-CN".to_string())
        );
        assert_eq!(
            locale_for_path(root, Path::new("/p/messages/fr/deep/bot.json")),
            Some("fr".to_string())
        );
        assert_eq!(locale_for_path(root, Path::new("/elsewhere/en.json")), None);
    }

    #[test]
    fn test_scan_catalog_both_layouts() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("en.json"), r#"{"greeting": {"hello": "Hi"}}"#).unwrap();
        fs::create_dir_all(root.join("fr")).unwrap();
        fs::write(root.join("fr/frontend.json"), r#"{"a": "A"}"#).unwrap();
        fs::write(root.join("fr/bot.json"), r#"{"b": "B"}"#).unwrap();
        fs::write(root.join("fr/notes.txt"), "ignored").unwrap();

        let result = scan_catalog(root).unwrap();
        assert!(result.warnings.is_empty());

        let en = result.catalog.locale("en").unwrap();
        assert_eq!(en.value("greeting.hello"), Some("Hi"));
        assert_eq!(en.files.len(), 1);

        let fr = result.catalog.locale("fr").unwrap();
        assert_eq!(fr.files.len(), 2);
        assert!(fr.files[0].ends_with("bot.json"));
        assert!(fr.files[1].ends_with("frontend.json"));
        assert!(fr.get("a").unwrap().file_path().ends_with("frontend.json"));
    }

    #[test]
    fn test_scan_catalog_registers_empty_files() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("de")).unwrap();
        fs::write(dir.path().join("de/frontend.json"), "").unwrap();

        let result = scan_catalog(dir.path()).unwrap();
        let de = result.catalog.locale("de").unwrap();
        assert!(de.is_empty());
        assert_eq!(de.files.len(), 1);
    }

    #[test]
    fn test_scan_catalog_with_invalid_json() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("en.json"), r#"{"submit": "Submit"}"#).unwrap();
        fs::write(dir.path().join("zh.json"), r#"{ invalid json }"#).unwrap();

        let result = scan_catalog(dir.path()).unwrap();
        assert_eq!(result.catalog.locales.len(), 1);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].file_path.contains("zh.json"));
    }

    #[test]
    fn test_scan_catalog_nonexistent_dir() {
        let err = scan_catalog(Path::new("/nonexistent/path"))
            .unwrap_err()
            .to_string();
        assert!(err.contains("does not exist"));
        assert!(err.contains("messagesRoot"));
    }
}
