//! Auto-save preferences: which file new keys of a locale go to.
//!
//! When a locale is split across several catalog files, the preference names
//! the basename (e.g. `frontend`) that new keys are written to. The same
//! preference scopes unused-key reporting to that file.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::utils::matches_basename;

/// Locale -> preferred file basename.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AutoSavePreferences(BTreeMap<String, String>);

impl AutoSavePreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, locale: impl Into<String>, basename: impl Into<String>) -> Self {
        self.0.insert(locale.into(), basename.into());
        self
    }

    pub fn preferred(&self, locale: &str) -> Option<&str> {
        self.0.get(locale).map(String::as_str)
    }

    /// Whether `file_path` is in scope for `locale`.
    ///
    /// Without a preference every file is in scope.
    pub fn allows(&self, locale: &str, file_path: &str) -> bool {
        match self.preferred(locale) {
            Some(basename) => matches_basename(file_path, basename),
            None => true,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub trait PreferenceStore: Send + Sync {
    fn get(&self) -> Result<AutoSavePreferences>;
    fn set(&self, locale: &str, basename: &str) -> Result<()>;
    /// Clear one locale, or every locale with `None`.
    fn clear(&self, locale: Option<&str>) -> Result<()>;
}

/// Preferences persisted as a JSON object, written atomically.
pub struct JsonPreferenceStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonPreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<AutoSavePreferences> {
        if !self.path.exists() {
            return Ok(AutoSavePreferences::default());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read preferences: {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(AutoSavePreferences::default());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse preferences: {}", self.path.display()))
    }

    /// Write to a sibling temp file and rename over the target.
    fn persist(&self, prefs: &AutoSavePreferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let mut content = serde_json::to_string_pretty(prefs)?;
        content.push('\n');

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)
            .with_context(|| format!("Failed to write file: {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace file: {}", self.path.display()))?;
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| anyhow!("preference store lock poisoned"))?;
        let mut prefs = self.read()?;
        apply(&mut prefs.0);
        self.persist(&prefs)
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn get(&self) -> Result<AutoSavePreferences> {
        self.read()
    }

    fn set(&self, locale: &str, basename: &str) -> Result<()> {
        self.update(|map| {
            map.insert(locale.to_string(), basename.to_string());
        })
    }

    fn clear(&self, locale: Option<&str>) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|map| match locale {
            Some(locale) => {
                map.remove(locale);
            }
            None => map.clear(),
        })
    }
}

/// In-process preferences, for fixtures.
#[derive(Default)]
pub struct MemoryPreferenceStore {
    prefs: Mutex<AutoSavePreferences>,
}

impl MemoryPreferenceStore {
    pub fn new(prefs: AutoSavePreferences) -> Self {
        Self {
            prefs: Mutex::new(prefs),
        }
    }

    fn with_lock<T>(&self, f: impl FnOnce(&mut AutoSavePreferences) -> T) -> Result<T> {
        let mut guard = self
            .prefs
            .lock()
            .map_err(|_| anyhow!("preference store lock poisoned"))?;
        Ok(f(&mut guard))
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self) -> Result<AutoSavePreferences> {
        self.with_lock(|prefs| prefs.clone())
    }

    fn set(&self, locale: &str, basename: &str) -> Result<()> {
        self.with_lock(|prefs| {
            prefs.0.insert(locale.to_string(), basename.to_string());
        })
    }

    fn clear(&self, locale: Option<&str>) -> Result<()> {
        self.with_lock(|prefs| match locale {
            Some(locale) => {
                prefs.0.remove(locale);
            }
            None => prefs.0.clear(),
        })
    }
}
