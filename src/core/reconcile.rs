//! Cross-reference of catalog coverage with the usage report.
//!
//! Missing keys are computed over the *source-backed* universe only: keys
//! that exist with a non-blank value in the source locale. A key without a
//! source value cannot be translated, so it never becomes a [`MissingKeyInfo`];
//! code-referenced keys in that situation are reported as untranslatable.

use std::collections::BTreeSet;

use tracing::debug;

use crate::core::coverage::compute_coverage;
use crate::core::preferences::AutoSavePreferences;
use crate::core::{
    Catalog, CoverageReport, LocaleMessages, MissingKeyInfo, UnusedKeyInfo, UsageReport,
    ValueType,
};

/// Inputs of one reconciliation pass.
pub struct ReconcileInput<'a> {
    pub catalog: &'a Catalog,
    pub source_locale: &'a str,
    pub target_locales: &'a [String],
    pub usage: &'a UsageReport,
    pub preferences: &'a AutoSavePreferences,
}

/// The unified discrepancy model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Translatable missing keys, sorted by keypath.
    pub missing: Vec<MissingKeyInfo>,
    /// `usage.missing` ∪ every target locale's coverage-missing keys.
    pub all_missing_keys: BTreeSet<String>,
    /// Missing keys with no source value: need manual authoring.
    pub untranslatable: BTreeSet<String>,
    /// Keys present but blank in the source locale.
    pub source_empty: BTreeSet<String>,
    /// Coverage of the source-backed universe, one report per target locale.
    pub coverage: Vec<CoverageReport>,
    /// Idle keys, restricted to preferred files, sorted by keypath.
    pub unused: Vec<UnusedKeyInfo>,
}

impl Reconciliation {
    /// Number of (keypath, locale) pairs to translate.
    pub fn pending_translations(&self) -> usize {
        self.missing.iter().map(|info| info.locales.len()).sum()
    }
}

/// Keys of a locale that have a non-blank value.
pub fn source_backed_keys(messages: &LocaleMessages) -> BTreeSet<String> {
    messages
        .entries
        .iter()
        .filter(|(_, records)| records.iter().any(|r| !r.is_blank()))
        .map(|(key, _)| key.clone())
        .collect()
}

pub fn reconcile(input: &ReconcileInput<'_>) -> Reconciliation {
    let empty_source = LocaleMessages::new(input.source_locale);
    let source = input
        .catalog
        .locale(input.source_locale)
        .unwrap_or(&empty_source);

    let source_keys = source_backed_keys(source);
    let source_present: BTreeSet<String> = source.keys().cloned().collect();
    let source_empty = compute_coverage(&source_present, source).empty_keys;

    let targets: Vec<&String> = input
        .target_locales
        .iter()
        .filter(|l| l.as_str() != input.source_locale)
        .collect();

    let empty_target = LocaleMessages::new("");
    let coverage: Vec<CoverageReport> = targets
        .iter()
        .map(|locale| {
            let messages = input.catalog.locale(locale).unwrap_or(&empty_target);
            let mut report = compute_coverage(&source_keys, messages);
            report.locale = locale.to_string();
            report
        })
        .collect();

    let mut all_missing_keys: BTreeSet<String> = input.usage.missing.clone();
    for report in &coverage {
        all_missing_keys.extend(report.missing_keys.iter().cloned());
    }

    let mut missing = Vec::new();
    let mut untranslatable = BTreeSet::new();
    for keypath in &all_missing_keys {
        let locales: Vec<String> = coverage
            .iter()
            .filter(|report| report.missing_keys.contains(keypath))
            .map(|report| report.locale.clone())
            .collect();

        match source.value(keypath) {
            Some(value) if source_keys.contains(keypath) && !locales.is_empty() => {
                missing.push(MissingKeyInfo {
                    keypath: keypath.clone(),
                    locales,
                    source_locale: input.source_locale.to_string(),
                    source_value: value.to_string(),
                    value_type: source_value_type(source, keypath),
                });
            }
            _ if !source_keys.contains(keypath) => {
                untranslatable.insert(keypath.clone());
            }
            _ => {}
        }
    }

    let unused = collect_unused(input, &targets);

    debug!(
        missing = missing.len(),
        untranslatable = untranslatable.len(),
        unused = unused.len(),
        "reconciled"
    );

    Reconciliation {
        missing,
        all_missing_keys,
        untranslatable,
        source_empty,
        coverage,
        unused,
    }
}

/// Shape of the non-blank source record, the one `value` reads.
fn source_value_type(source: &LocaleMessages, keypath: &str) -> ValueType {
    source
        .records(keypath)
        .iter()
        .find(|r| !r.is_blank())
        .map(|r| r.value_type)
        .unwrap_or(ValueType::String)
}

fn collect_unused(input: &ReconcileInput<'_>, targets: &[&String]) -> Vec<UnusedKeyInfo> {
    let active: Vec<&str> = std::iter::once(input.source_locale)
        .chain(targets.iter().map(|l| l.as_str()))
        .collect();

    input
        .usage
        .idle
        .iter()
        .filter_map(|keypath| {
            let mut locales = Vec::new();
            let mut files = BTreeSet::new();

            for locale in &active {
                let Some(messages) = input.catalog.locale(locale) else {
                    continue;
                };
                let in_scope: Vec<&str> = messages
                    .records(keypath)
                    .iter()
                    .map(|r| r.file_path())
                    .filter(|file| input.preferences.allows(locale, file))
                    .collect();
                if !in_scope.is_empty() {
                    locales.push(locale.to_string());
                    files.extend(in_scope.into_iter().map(str::to_string));
                }
            }

            (!locales.is_empty()).then(|| UnusedKeyInfo {
                keypath: keypath.clone(),
                locales,
                files: files.into_iter().collect(),
            })
        })
        .collect()
}
