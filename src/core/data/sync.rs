//! Reconciliation results and write requests.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::message::ValueType;

/// Missing and empty keys of one locale, relative to a key universe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageReport {
    pub locale: String,
    /// Keys of the universe with no record in this locale.
    pub missing_keys: BTreeSet<String>,
    /// Keys of the universe whose record in this locale is blank.
    pub empty_keys: BTreeSet<String>,
}

/// Snapshot produced by the usage analyzer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageReport {
    /// Referenced in source code but absent from every locale.
    pub missing: BTreeSet<String>,
    /// Present in the catalog but never referenced.
    pub idle: BTreeSet<String>,
}

/// A source-backed keypath that one or more target locales lack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingKeyInfo {
    pub keypath: String,
    /// Target locales lacking the key, in target-locale order.
    pub locales: Vec<String>,
    pub source_locale: String,
    /// Never blank.
    pub source_value: String,
    /// Shape of the source value. List values are joined in `source_value`
    /// and cannot round-trip through a single translated string.
    pub value_type: ValueType,
}

/// A keypath no code references, with where it lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnusedKeyInfo {
    pub keypath: String,
    /// Locales holding the key, in active-locale order.
    pub locales: Vec<String>,
    /// Distinct files holding the key, sorted.
    pub files: Vec<String>,
}

/// An empty slot about to be created before the backend fills it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWrite {
    pub keypath: String,
    pub locale: String,
    pub value: String,
    pub file_path: String,
}

impl PendingWrite {
    pub fn new(
        keypath: impl Into<String>,
        locale: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            keypath: keypath.into(),
            locale: locale.into(),
            value: String::new(),
            file_path: file_path.into(),
        }
    }
}

/// One mutation submitted to the catalog writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogWrite {
    /// Create the record with an empty value (kept if it already exists).
    Create(PendingWrite),
    SetValue {
        keypath: String,
        locale: String,
        value: String,
        file_path: String,
    },
    Delete {
        keypath: String,
        locale: String,
        file_path: String,
    },
}

impl CatalogWrite {
    pub fn file_path(&self) -> &str {
        match self {
            CatalogWrite::Create(pending) => &pending.file_path,
            CatalogWrite::SetValue { file_path, .. } | CatalogWrite::Delete { file_path, .. } => {
                file_path
            }
        }
    }

    pub fn keypath(&self) -> &str {
        match self {
            CatalogWrite::Create(pending) => &pending.keypath,
            CatalogWrite::SetValue { keypath, .. } | CatalogWrite::Delete { keypath, .. } => {
                keypath
            }
        }
    }
}
