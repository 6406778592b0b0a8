//! Issue types reported by `keysync check`.
//!
//! Each issue carries everything the reporter needs: a location in a catalog
//! file (when there is one), the keypath, and a short note.

use enum_dispatch::enum_dispatch;

use crate::core::{
    Catalog, MessageLocation, parsers::json::CatalogScanWarning, reconcile::Reconciliation,
};

// ============================================================
// Severity and Rule
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    MissingTranslation,
    Untranslatable,
    EmptyValue,
    UnusedKey,
    ParseError,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::MissingTranslation => write!(f, "missing-translation"),
            Rule::Untranslatable => write!(f, "untranslatable"),
            Rule::EmptyValue => write!(f, "empty-value"),
            Rule::UnusedKey => write!(f, "unused-key"),
            Rule::ParseError => write!(f, "parse-error"),
        }
    }
}

// ============================================================
// Issue Types
// ============================================================

/// Source-backed key absent from one or more target locales.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTranslationIssue {
    /// Where the key is defined in the source locale.
    pub location: MessageLocation,
    pub keypath: String,
    pub source_value: String,
    pub missing_in: Vec<String>,
}

impl MissingTranslationIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::MissingTranslation
    }
}

/// Key needed somewhere but with no source value to translate from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UntranslatableIssue {
    pub keypath: String,
    pub source_locale: String,
}

impl UntranslatableIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::Untranslatable
    }
}

/// Key present in a locale with a blank value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyValueIssue {
    pub location: MessageLocation,
    pub keypath: String,
    pub locale: String,
}

impl EmptyValueIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::EmptyValue
    }
}

/// Key defined in the catalog but never referenced in source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnusedKeyIssue {
    pub location: MessageLocation,
    pub keypath: String,
    pub locales: Vec<String>,
}

impl UnusedKeyIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::UnusedKey
    }
}

/// Catalog file that could not be read or parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrorIssue {
    pub file_path: String,
    pub error: String,
}

impl ParseErrorIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::ParseError
    }
}

// ============================================================
// Issue Enum
// ============================================================

#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    MissingTranslation(MissingTranslationIssue),
    Untranslatable(UntranslatableIssue),
    EmptyValue(EmptyValueIssue),
    UnusedKey(UnusedKeyIssue),
    ParseError(ParseErrorIssue),
}

impl Issue {
    pub fn severity(&self) -> Severity {
        self.report_severity()
    }

    pub fn rule(&self) -> Rule {
        self.report_rule()
    }
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

pub enum ReportLocation<'a> {
    Message(&'a MessageLocation),
    /// File-level only (no line).
    File { path: &'a str },
    /// Not tied to any catalog file.
    Detached,
}

#[enum_dispatch]
pub trait Report {
    fn location(&self) -> ReportLocation<'_>;

    /// Primary message (keypath or error text).
    fn message(&self) -> String;

    fn report_severity(&self) -> Severity;

    fn report_rule(&self) -> Rule;

    /// Optional details for the "= note:" line.
    fn details(&self) -> Option<String> {
        None
    }
}

impl Report for MissingTranslationIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Message(&self.location)
    }

    fn message(&self) -> String {
        self.keypath.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!(
            "(\"{}\") missing in: {}",
            self.source_value,
            self.missing_in.join(", ")
        ))
    }
}

impl Report for UntranslatableIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Detached
    }

    fn message(&self) -> String {
        self.keypath.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("no value in source locale '{}'", self.source_locale))
    }
}

impl Report for EmptyValueIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Message(&self.location)
    }

    fn message(&self) -> String {
        self.keypath.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("blank in {}", self.locale))
    }
}

impl Report for UnusedKeyIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Message(&self.location)
    }

    fn message(&self) -> String {
        self.keypath.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        Some(format!("defined in: {}", self.locales.join(", ")))
    }
}

impl Report for ParseErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }
}

// ============================================================
// Sorting
// ============================================================

impl Issue {
    fn sort_position(&self) -> Option<(&str, usize, usize)> {
        match self.location() {
            ReportLocation::Message(loc) => Some((loc.file_path.as_str(), loc.line, loc.col)),
            ReportLocation::File { path } => Some((path, 0, 0)),
            ReportLocation::Detached => None,
        }
    }
}

impl Ord for Issue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;

        // file_path, line, col, message; detached issues last
        match (self.sort_position(), other.sort_position()) {
            (Some(a), Some(b)) => a
                .cmp(&b)
                .then_with(|| self.message().cmp(&other.message())),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self
                .rule()
                .cmp(&other.rule())
                .then_with(|| self.message().cmp(&other.message())),
        }
    }
}

impl PartialOrd for Issue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================
// Collection
// ============================================================

/// Turn a reconciliation pass into sorted issues.
pub fn collect_issues(
    catalog: &Catalog,
    source_locale: &str,
    reconciliation: &Reconciliation,
    warnings: &[CatalogScanWarning],
) -> Vec<Issue> {
    let mut issues: Vec<Issue> = Vec::new();
    let source = catalog.locale(source_locale);

    for info in &reconciliation.missing {
        let Some(record) = source.and_then(|m| m.get(&info.keypath)) else {
            continue;
        };
        issues.push(
            MissingTranslationIssue {
                location: record.location.clone(),
                keypath: info.keypath.clone(),
                source_value: info.source_value.clone(),
                missing_in: info.locales.clone(),
            }
            .into(),
        );
    }

    for keypath in &reconciliation.untranslatable {
        issues.push(
            UntranslatableIssue {
                keypath: keypath.clone(),
                source_locale: source_locale.to_string(),
            }
            .into(),
        );
    }

    let empty_by_locale = std::iter::once((source_locale, &reconciliation.source_empty)).chain(
        reconciliation
            .coverage
            .iter()
            .map(|report| (report.locale.as_str(), &report.empty_keys)),
    );
    for (locale, keys) in empty_by_locale {
        let Some(messages) = catalog.locale(locale) else {
            continue;
        };
        for keypath in keys {
            for record in messages.records(keypath).iter().filter(|r| r.is_blank()) {
                issues.push(
                    EmptyValueIssue {
                        location: record.location.clone(),
                        keypath: keypath.clone(),
                        locale: locale.to_string(),
                    }
                    .into(),
                );
            }
        }
    }

    for info in &reconciliation.unused {
        let first = info.locales.iter().find_map(|locale| {
            catalog
                .locale(locale)?
                .records(&info.keypath)
                .iter()
                .find(|r| info.files.iter().any(|f| f == r.file_path()))
        });
        if let Some(record) = first {
            issues.push(
                UnusedKeyIssue {
                    location: record.location.clone(),
                    keypath: info.keypath.clone(),
                    locales: info.locales.clone(),
                }
                .into(),
            );
        }
    }

    issues.extend(warnings.iter().map(|w| {
        Issue::ParseError(ParseErrorIssue {
            file_path: w.file_path.clone(),
            error: w.error.clone(),
        })
    }));

    issues.sort();
    issues
}

// ============================================================
// Tests
// ============================================================
