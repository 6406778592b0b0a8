//! Catalog persistence.
//!
//! [`CatalogStore`] is the seam through which every catalog mutation goes.
//! [`JsonCatalogStore`] is the JSON-on-disk implementation: it loads the whole
//! catalog with the JSON parser and applies write batches one file at a time,
//! one batch at a time.

mod document;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::core::CatalogWrite;
use crate::core::parsers::json::{ScanCatalogResult, scan_catalog};
use crate::error::SyncError;

pub use document::{JsonDocument, KeyAction};

/// Statistics from applying a write batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteStats {
    /// Operations that changed the catalog.
    pub applied: usize,
    /// Operations that were no-ops (record already present, or already gone).
    pub unchanged: usize,
    pub files_modified: usize,
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Load a fresh snapshot of the catalog.
    fn load(&self) -> Result<ScanCatalogResult>;

    /// Persist a batch of writes. Returns once every file is written.
    ///
    /// A keypath that cannot be placed in its file (a string or array where
    /// an object is needed) fails the batch. That file is left untouched;
    /// files earlier in the batch stay written.
    async fn write(&self, batch: Vec<CatalogWrite>) -> Result<WriteStats>;
}

pub struct JsonCatalogStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonCatalogStore {
    /// Open the catalog rooted at `root`, which must be an existing directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, SyncError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(SyncError::ConfigurationAbsent { path: root });
        }
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl CatalogStore for JsonCatalogStore {
    fn load(&self) -> Result<ScanCatalogResult> {
        scan_catalog(&self.root)
    }

    async fn write(&self, batch: Vec<CatalogWrite>) -> Result<WriteStats> {
        let _guard = self.write_lock.lock().await;

        let mut by_file: BTreeMap<String, Vec<CatalogWrite>> = BTreeMap::new();
        for op in batch {
            by_file.entry(op.file_path().to_string()).or_default().push(op);
        }

        let mut stats = WriteStats::default();
        for (file_path, ops) in by_file {
            let mut doc = JsonDocument::open_or_create(Path::new(&file_path))?;
            let mut changed = false;

            for op in &ops {
                let action = match op {
                    CatalogWrite::Create(pending) => {
                        doc.set_value(&pending.keypath, &pending.value, false)
                    }
                    CatalogWrite::SetValue { keypath, value, .. } => {
                        doc.set_value(keypath, value, true)
                    }
                    CatalogWrite::Delete { keypath, .. } => doc.delete_key(keypath),
                };
                match action {
                    KeyAction::Added | KeyAction::Updated | KeyAction::Removed => {
                        changed = true;
                        stats.applied += 1;
                    }
                    KeyAction::Unchanged | KeyAction::NotFound => stats.unchanged += 1,
                    KeyAction::Conflict => bail!(
                        "Cannot write '{}' in {}: a value on its path is not an object or array",
                        op.keypath(),
                        file_path
                    ),
                }
            }

            if changed {
                doc.save()?;
                stats.files_modified += 1;
                debug!(file = %file_path, ops = ops.len(), "catalog file written");
            }
        }

        Ok(stats)
    }
}
