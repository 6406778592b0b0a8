//! Source usage analysis.
//!
//! Scans source files for translation calls (`t("greeting.hello")`) and
//! compares the referenced keys with the catalog: referenced-but-absent keys
//! are `missing`, present-but-unreferenced keys are `idle`.
//!
//! Results are kept in an explicit [`UsageCache`] shared by reference, so the
//! cleanup path can invalidate it and decide whether to refresh.

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use glob::Pattern;
use rayon::prelude::*;
use regex::Regex;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::core::UsageReport;
use crate::core::store::CatalogStore;

/// Last usage report, if any.
#[derive(Debug, Default)]
pub struct UsageCache {
    report: Mutex<Option<UsageReport>>,
}

impl UsageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<UsageReport> {
        self.report.lock().ok().and_then(|guard| guard.clone())
    }

    pub fn store(&self, report: UsageReport) {
        if let Ok(mut guard) = self.report.lock() {
            *guard = Some(report);
        }
    }

    pub fn is_present(&self) -> bool {
        self.report.lock().map(|g| g.is_some()).unwrap_or(false)
    }

    pub fn invalidate(&self) {
        if let Ok(mut guard) = self.report.lock() {
            *guard = None;
        }
    }
}

#[async_trait]
pub trait UsageAnalyzer: Send + Sync {
    /// Point-in-time usage snapshot; may be served from cache.
    async fn analyze_usage(&self) -> Result<UsageReport>;

    /// Whether a cached report exists.
    fn has_cache(&self) -> bool;

    /// Drop the cached report so the next call rescans.
    fn invalidate(&self);
}

/// Pure comparison of referenced keys with catalog keys.
pub fn compute_usage_report(used: &BTreeSet<String>, catalog_keys: &BTreeSet<String>) -> UsageReport {
    UsageReport {
        missing: used.difference(catalog_keys).cloned().collect(),
        idle: catalog_keys.difference(used).cloned().collect(),
    }
}

/// Where and how to look for key references.
#[derive(Debug, Clone)]
pub struct UsageScanSettings {
    pub source_root: PathBuf,
    pub includes: Vec<String>,
    pub ignores: Vec<String>,
    pub usage_functions: Vec<String>,
}

impl UsageScanSettings {
    pub fn from_config(config: &Config, root_dir: &Path) -> Self {
        Self {
            source_root: root_dir.join(&config.source_root),
            includes: config.includes.clone(),
            ignores: config.ignores.clone(),
            usage_functions: config.usage_functions.clone(),
        }
    }
}

fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

fn is_scannable_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("tsx" | "ts" | "jsx" | "js" | "mjs" | "vue" | "svelte" | "rs")
    )
}

/// Collect source files to scan, sorted.
pub fn scan_source_files(settings: &UsageScanSettings) -> Vec<PathBuf> {
    let base = &settings.source_root;

    let mut literal_ignores: Vec<PathBuf> = Vec::new();
    let mut glob_ignores: Vec<Pattern> = vec![];
    for p in &settings.ignores {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_ignores.push(pattern),
                Err(e) => warn!(pattern = %p, error = %e, "invalid ignore pattern"),
            }
        } else {
            literal_ignores.push(base.join(p));
        }
    }
    // Dependency folders are never scanned
    if let Ok(pattern) = Pattern::new("**/node_modules/**") {
        glob_ignores.push(pattern);
    }

    let mut dirs: Vec<PathBuf> = Vec::new();
    if settings.includes.is_empty() {
        dirs.push(base.clone());
    }
    for inc in &settings.includes {
        if is_glob_pattern(inc) {
            let pattern = base.join(inc).to_string_lossy().to_string();
            match glob::glob(&pattern) {
                Ok(entries) => dirs.extend(entries.flatten().filter(|p| p.is_dir())),
                Err(e) => warn!(pattern = %inc, error = %e, "invalid include pattern"),
            }
        } else {
            let path = base.join(inc);
            if path.exists() {
                dirs.push(path);
            } else {
                debug!(path = %path.display(), "include path does not exist");
            }
        }
    }

    let mut files = BTreeSet::new();
    for dir in dirs {
        for entry in WalkDir::new(dir) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!(error = %e, "cannot access path");
                    continue;
                }
            };
            let path = entry.path();
            if literal_ignores.iter().any(|ignore| path.starts_with(ignore)) {
                continue;
            }
            let path_str = path.to_string_lossy();
            if glob_ignores.iter().any(|p| p.matches(&path_str)) {
                continue;
            }
            if entry.file_type().is_file() && is_scannable_file(path) {
                files.insert(path.to_path_buf());
            }
        }
    }

    files.into_iter().collect()
}

/// Build the key-reference matcher for the given call names.
///
/// Matches the first argument when it is a plain string literal:
/// `t("a.b")`, `t('a.b')` and `` t(`a.b`) `` (no interpolation).
pub fn build_usage_regex(functions: &[String]) -> Result<Regex> {
    let names: Vec<String> = functions.iter().map(|f| regex::escape(f)).collect();
    let pattern = format!(
        r#"(?:^|[^\w$])(?:{})\(\s*(?:"([^"\\\n]+)"|'([^'\\\n]+)'|`([^`$\\\n]+)`)"#,
        names.join("|")
    );
    Regex::new(&pattern).with_context(|| format!("Invalid usage pattern: {}", pattern))
}

pub fn extract_keys(source: &str, regex: &Regex) -> BTreeSet<String> {
    regex
        .captures_iter(source)
        .filter_map(|cap| cap.get(1).or_else(|| cap.get(2)).or_else(|| cap.get(3)))
        .map(|m| m.as_str().trim().to_string())
        .filter(|key| !key.is_empty())
        .collect()
}

/// Collect every key referenced under the configured source tree.
pub fn collect_used_keys(settings: &UsageScanSettings) -> Result<BTreeSet<String>> {
    let regex = build_usage_regex(&settings.usage_functions)?;
    let files = scan_source_files(settings);
    debug!(files = files.len(), "scanning source files for key usage");

    let used = files
        .par_iter()
        .filter_map(|path| match fs::read_to_string(path) {
            Ok(source) => Some(extract_keys(&source, &regex)),
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping unreadable source file");
                None
            }
        })
        .reduce(BTreeSet::new, |mut acc, keys| {
            acc.extend(keys);
            acc
        });

    Ok(used)
}

/// Usage analyzer that scans the source tree with [`collect_used_keys`].
pub struct SourceUsageAnalyzer {
    settings: UsageScanSettings,
    store: Arc<dyn CatalogStore>,
    cache: Arc<UsageCache>,
}

impl SourceUsageAnalyzer {
    pub fn new(
        settings: UsageScanSettings,
        store: Arc<dyn CatalogStore>,
        cache: Arc<UsageCache>,
    ) -> Self {
        Self {
            settings,
            store,
            cache,
        }
    }

    pub fn cache(&self) -> &Arc<UsageCache> {
        &self.cache
    }
}

#[async_trait]
impl UsageAnalyzer for SourceUsageAnalyzer {
    async fn analyze_usage(&self) -> Result<UsageReport> {
        if let Some(report) = self.cache.get() {
            return Ok(report);
        }

        let settings = self.settings.clone();
        let used = tokio::task::spawn_blocking(move || collect_used_keys(&settings))
            .await
            .context("usage scan task failed")??;

        let catalog_keys = self.store.load()?.catalog.all_keys();
        let report = compute_usage_report(&used, &catalog_keys);
        debug!(
            used = used.len(),
            missing = report.missing.len(),
            idle = report.idle.len(),
            "usage analyzed"
        );

        self.cache.store(report.clone());
        Ok(report)
    }

    fn has_cache(&self) -> bool {
        self.cache.is_present()
    }

    fn invalidate(&self) {
        self.cache.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::JsonCatalogStore;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn keys(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn functions(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_compute_usage_report() {
        let report = compute_usage_report(&keys(&["a", "b", "new"]), &keys(&["a", "b", "legacy.banner"]));
        assert_eq!(report.missing, keys(&["new"]));
        assert_eq!(report.idle, keys(&["legacy.banner"]));
    }

    #[test]
    fn test_extract_keys_quote_styles() {
        let regex = build_usage_regex(&functions(&["t"])).unwrap();
        let source = r#"
const a = t("greeting.hello");
const b = t('greeting.bye');
const c = t(`nav.home`);
const d = t(`nav.${page}`);
const e = i18n.t("dotted.call");
const f = format("not.a.key");
const g = t(variable);
"#;
        assert_eq!(
            extract_keys(source, &regex),
            keys(&["dotted.call", "greeting.bye", "greeting.hello", "nav.home"])
        );
    }

    #[test]
    fn test_extract_keys_custom_functions() {
        let regex = build_usage_regex(&functions(&["$t", "translate"])).unwrap();
        let source = r#"{{ $t("a.b") }} translate('c') t("ignored")"#;
        assert_eq!(extract_keys(source, &regex), keys(&["a.b", "c"]));
    }

    #[test]
    fn test_scan_source_files_respects_ignores() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/generated")).unwrap();
        fs::create_dir_all(root.join("src/node_modules/pkg")).unwrap();
        fs::write(root.join("src/app.tsx"), "").unwrap();
        fs::write(root.join("src/style.css"), "").unwrap();
        fs::write(root.join("src/generated/gen.ts"), "").unwrap();
        fs::write(root.join("src/node_modules/pkg/index.js"), "").unwrap();

        let settings = UsageScanSettings {
            source_root: root.to_path_buf(),
            includes: vec!["src".to_string()],
            ignores: vec!["src/generated".to_string()],
            usage_functions: functions(&["t"]),
        };
        let files = scan_source_files(&settings);
        assert_eq!(files, vec![root.join("src/app.tsx")]);
    }

    #[tokio::test]
    async fn test_source_analyzer_caches_until_invalidated() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("messages")).unwrap();
        fs::write(root.join("src/app.ts"), r#"t("greeting.hello"); t("brand.new");"#).unwrap();
        fs::write(
            root.join("messages/en.json"),
            r#"{"greeting": {"hello": "Hi"}, "legacy": {"banner": "Old"}}"#,
        )
        .unwrap();

        let store: Arc<dyn CatalogStore> =
            Arc::new(JsonCatalogStore::open(root.join("messages")).unwrap());
        let cache = Arc::new(UsageCache::new());
        let analyzer = SourceUsageAnalyzer::new(
            UsageScanSettings {
                source_root: root.to_path_buf(),
                includes: vec!["src".to_string()],
                ignores: Vec::new(),
                usage_functions: functions(&["t"]),
            },
            store,
            Arc::clone(&cache),
        );

        assert!(!analyzer.has_cache());
        let report = analyzer.analyze_usage().await.unwrap();
        assert_eq!(report.missing, keys(&["brand.new"]));
        assert_eq!(report.idle, keys(&["legacy.banner"]));
        assert!(cache.is_present());

        // Served from cache even though the source changed
        fs::write(root.join("src/app.ts"), r#"t("legacy.banner");"#).unwrap();
        assert_eq!(analyzer.analyze_usage().await.unwrap(), report);

        analyzer.invalidate();
        assert!(!analyzer.has_cache());
        let fresh = analyzer.analyze_usage().await.unwrap();
        assert_eq!(fresh.idle, keys(&["greeting.hello"]));
    }
}
