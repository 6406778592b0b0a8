//! Removal of unused keys.
//!
//! Confirmed keys are deleted from every in-scope locale file in a single
//! batch write, then the usage report is refreshed in the background.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info, warn};

use crate::core::{
    Catalog, CatalogWrite, UnusedKeyInfo, store::CatalogStore, usage::UsageAnalyzer,
};
use crate::surface::{Prompter, RemovalDecision};

/// Delay before the usage analyzer re-runs after a removal.
pub const REFRESH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Which unused keys a cleanup call may touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    Keys(BTreeSet<String>),
}

impl Selection {
    pub fn from_keys(keys: &[String]) -> Self {
        if keys.is_empty() {
            Self::All
        } else {
            Self::Keys(keys.iter().cloned().collect())
        }
    }

    pub fn includes(&self, keypath: &str) -> bool {
        match self {
            Self::All => true,
            Self::Keys(keys) => keys.contains(keypath),
        }
    }
}

#[derive(Debug, Default)]
pub struct CleanupOutcome {
    /// Keypaths whose records were deleted.
    pub removed_keys: Vec<String>,
    /// Records deleted across all locales.
    pub removed_records: usize,
    pub files_modified: usize,
    /// Per-item confirmation was aborted with cancel-all.
    pub cancelled: bool,
    /// Background usage refresh, when one was scheduled. It only warms the
    /// cache of a long-lived host; a one-shot caller should await it or call
    /// [`CleanupOutcome::discard_refresh`].
    pub refresh: Option<JoinHandle<()>>,
}

impl CleanupOutcome {
    pub fn removed_count(&self) -> usize {
        self.removed_keys.len()
    }

    /// Abort the scheduled refresh. Returns whether one was pending.
    pub fn discard_refresh(&mut self) -> bool {
        match self.refresh.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }
}

/// Re-runs the usage analyzer after a quiet period; a newer schedule
/// replaces a pending one.
pub struct UsageRefresher {
    analyzer: Arc<dyn UsageAnalyzer>,
    delay: Duration,
    pending: Mutex<Option<AbortHandle>>,
}

impl UsageRefresher {
    pub fn new(analyzer: Arc<dyn UsageAnalyzer>, delay: Duration) -> Self {
        Self {
            analyzer,
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Drop the cached usage report. If one existed, schedule a refresh and
    /// return its handle.
    pub fn invalidate_and_schedule(&self) -> Option<JoinHandle<()>> {
        let had_cache = self.analyzer.has_cache();
        self.analyzer.invalidate();
        if !had_cache {
            debug!("no cached usage report; refresh deferred to next analysis");
            return None;
        }

        let analyzer = Arc::clone(&self.analyzer);
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = analyzer.analyze_usage().await {
                warn!(error = %format!("{e:#}"), "usage refresh failed");
            }
        });

        if let Ok(mut pending) = self.pending.lock()
            && let Some(previous) = pending.replace(handle.abort_handle())
        {
            previous.abort();
        }
        Some(handle)
    }
}

pub struct CleanupExecutor {
    store: Arc<dyn CatalogStore>,
    refresher: UsageRefresher,
}

impl CleanupExecutor {
    pub fn new(store: Arc<dyn CatalogStore>, analyzer: Arc<dyn UsageAnalyzer>) -> Self {
        Self::with_debounce(store, analyzer, REFRESH_DEBOUNCE)
    }

    pub fn with_debounce(
        store: Arc<dyn CatalogStore>,
        analyzer: Arc<dyn UsageAnalyzer>,
        delay: Duration,
    ) -> Self {
        Self {
            store,
            refresher: UsageRefresher::new(analyzer, delay),
        }
    }

    /// Remove the selected unused keys.
    ///
    /// With `confirm_each`, `prompter` is asked before every key; cancel-all
    /// stops the queue but keeps keys already confirmed. Without it the
    /// whole selection is removed.
    pub async fn cleanup(
        &self,
        unused: &[UnusedKeyInfo],
        catalog: &Catalog,
        selection: &Selection,
        confirm_each: bool,
        prompter: &dyn Prompter,
    ) -> Result<CleanupOutcome> {
        let mut outcome = CleanupOutcome::default();
        let mut confirmed: Vec<&UnusedKeyInfo> = Vec::new();

        for info in unused.iter().filter(|i| selection.includes(&i.keypath)) {
            if !confirm_each {
                confirmed.push(info);
                continue;
            }
            match prompter.confirm_removal(info).await? {
                RemovalDecision::Remove => confirmed.push(info),
                RemovalDecision::Skip => debug!(keypath = %info.keypath, "kept"),
                RemovalDecision::CancelAll => {
                    info!("cleanup cancelled");
                    outcome.cancelled = true;
                    break;
                }
            }
        }

        let batch = deletion_batch(&confirmed, catalog);
        if batch.is_empty() {
            return Ok(outcome);
        }

        outcome.removed_records = batch.len();
        let stats = self.store.write(batch).await?;
        outcome.files_modified = stats.files_modified;
        outcome.removed_keys = confirmed.iter().map(|i| i.keypath.clone()).collect();
        info!(
            keys = outcome.removed_keys.len(),
            records = outcome.removed_records,
            files = outcome.files_modified,
            "removed unused keys"
        );

        outcome.refresh = self.refresher.invalidate_and_schedule();
        Ok(outcome)
    }
}

/// One delete per record of each confirmed key, limited to the files the
/// key was reported in.
fn deletion_batch(confirmed: &[&UnusedKeyInfo], catalog: &Catalog) -> Vec<CatalogWrite> {
    let mut batch = Vec::new();
    for info in confirmed {
        for locale in &info.locales {
            let Some(messages) = catalog.locale(locale) else {
                continue;
            };
            for record in messages.records(&info.keypath) {
                if info.files.iter().any(|f| f == record.file_path()) {
                    batch.push(CatalogWrite::Delete {
                        keypath: info.keypath.clone(),
                        locale: locale.clone(),
                        file_path: record.file_path().to_string(),
                    });
                }
            }
        }
    }
    batch
}
