//! Sequential, rate-limited translation run.
//!
//! One run walks `Idle -> Analyzing -> AwaitingConfirmation -> Translating`
//! and ends in `Completed`, `Cancelled` or `Failed`. Work is single-lane: a
//! backend invocation for the next `(keypath, locale)` only starts after the
//! previous one signalled completion.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::core::{
    Catalog, CatalogWrite, MissingKeyInfo, PendingWrite, ValueType,
    preferences::PreferenceStore,
    reconcile::{ReconcileInput, Reconciliation, reconcile},
    routing::{EditingContext, FileRouter},
    store::CatalogStore,
    usage::UsageAnalyzer,
};
use crate::surface::{Prompter, TranslationPlan};
use crate::translate::backend::{TranslationBackend, TranslationJob, TranslationOutcome};
use crate::translate::cancel::CancellationToken;
use crate::utils::is_blank;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Analyzing,
    AwaitingConfirmation,
    Translating,
    Completed,
    Cancelled,
    Failed,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Analyzing => "analyzing",
            Self::AwaitingConfirmation => "awaiting-confirmation",
            Self::Translating => "translating",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Counts reported once a run stops translating.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslateSummary {
    /// Keypaths attempted, whatever happened to their locales.
    pub processed: usize,
    pub translated: usize,
    /// Locales with no destination file, plus locales of blank-source keys.
    pub skipped: usize,
    pub failed: usize,
    pub untranslatable: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    NothingToDo { untranslatable: Vec<String> },
    Declined,
    Completed(TranslateSummary),
    Cancelled(TranslateSummary),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorSettings {
    pub source_locale: String,
    pub target_locales: Vec<String>,
    pub key_delay: Duration,
    pub locale_delay: Duration,
    /// `None` waits forever.
    pub completion_timeout: Option<Duration>,
}

impl OrchestratorSettings {
    pub fn from_config(config: &Config, target_locales: Vec<String>) -> Self {
        Self {
            source_locale: config.source_locale.clone(),
            target_locales,
            key_delay: config.key_delay(),
            locale_delay: config.locale_delay(),
            completion_timeout: config.translator.completion_timeout(),
        }
    }
}

enum LocaleResult {
    Translated,
    Skipped,
}

pub struct Orchestrator {
    store: Arc<dyn CatalogStore>,
    usage: Arc<dyn UsageAnalyzer>,
    preferences: Arc<dyn PreferenceStore>,
    backend: Arc<dyn TranslationBackend>,
    settings: OrchestratorSettings,
    context: Option<EditingContext>,
    cancel: CancellationToken,
    state: RunState,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        usage: Arc<dyn UsageAnalyzer>,
        preferences: Arc<dyn PreferenceStore>,
        backend: Arc<dyn TranslationBackend>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            store,
            usage,
            preferences,
            backend,
            settings,
            context: None,
            cancel: CancellationToken::default(),
            state: RunState::Idle,
        }
    }

    pub fn with_context(mut self, context: Option<EditingContext>) -> Self {
        self.context = context;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    fn transition(&mut self, next: RunState) {
        debug!(from = %self.state, to = %next, "run state");
        self.state = next;
    }

    /// Run once. Errors that escape per-item recovery move the run to
    /// `Failed` and are returned; work already written stays written.
    pub async fn run(&mut self, prompter: &dyn Prompter) -> Result<RunOutcome> {
        match self.run_inner(prompter).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                self.transition(RunState::Failed);
                error!(error = %format!("{e:#}"), "translation run failed");
                Err(e)
            }
        }
    }

    async fn run_inner(&mut self, prompter: &dyn Prompter) -> Result<RunOutcome> {
        self.transition(RunState::Analyzing);
        let (catalog, reconciliation) = self.analyze().await?;
        let mut untranslatable = reconciliation.untranslatable.clone();

        // A list value cannot come back from a single translated string
        let (lists, missing): (Vec<MissingKeyInfo>, Vec<MissingKeyInfo>) = reconciliation
            .missing
            .into_iter()
            .partition(|info| info.value_type == ValueType::StringArray);
        for info in lists {
            warn!(keypath = %info.keypath, "list value needs manual translation; skipping");
            untranslatable.insert(info.keypath);
        }
        let untranslatable: Vec<String> = untranslatable.into_iter().collect();

        if missing.is_empty() {
            info!("no missing translations");
            self.transition(RunState::Completed);
            return Ok(RunOutcome::NothingToDo { untranslatable });
        }

        self.transition(RunState::AwaitingConfirmation);
        let plan = TranslationPlan::from_missing(&self.settings.source_locale, &missing);
        if !prompter.confirm_translation(&plan).await? {
            info!("translation declined");
            self.transition(RunState::Cancelled);
            return Ok(RunOutcome::Declined);
        }

        self.transition(RunState::Translating);
        let preferences = self.preferences.get()?;
        let router = FileRouter::new(&preferences, self.context.as_ref());

        let mut summary = TranslateSummary {
            untranslatable,
            ..TranslateSummary::default()
        };
        let cancelled = self
            .translate_all(&missing, &catalog, &router, &mut summary)
            .await;

        info!(
            processed = summary.processed,
            translated = summary.translated,
            skipped = summary.skipped,
            failed = summary.failed,
            "translation run finished"
        );

        if cancelled {
            self.transition(RunState::Cancelled);
            Ok(RunOutcome::Cancelled(summary))
        } else {
            self.transition(RunState::Completed);
            Ok(RunOutcome::Completed(summary))
        }
    }

    async fn analyze(&self) -> Result<(Catalog, Reconciliation)> {
        let catalog = self.store.load()?.catalog;
        let usage = self.usage.analyze_usage().await?;
        let preferences = self.preferences.get()?;

        let reconciliation = reconcile(&ReconcileInput {
            catalog: &catalog,
            source_locale: &self.settings.source_locale,
            target_locales: &self.settings.target_locales,
            usage: &usage,
            preferences: &preferences,
        });
        Ok((catalog, reconciliation))
    }

    /// Returns true when the run stopped on cancellation.
    async fn translate_all(
        &self,
        missing: &[MissingKeyInfo],
        catalog: &Catalog,
        router: &FileRouter<'_>,
        summary: &mut TranslateSummary,
    ) -> bool {
        let total = missing.len();
        for (index, info) in missing.iter().enumerate() {
            if self.cancel.is_cancelled() {
                info!(remaining = total - index, "translation cancelled");
                return true;
            }
            summary.processed += 1;

            if is_blank(&info.source_value) {
                warn!(keypath = %info.keypath, "source value is blank; skipping");
                summary.skipped += info.locales.len();
                continue;
            }

            debug!(keypath = %info.keypath, index, total, "translating key");
            let mut invoked = false;
            for locale in &info.locales {
                match self.translate_locale(info, locale, catalog, router, &mut invoked).await {
                    Ok(LocaleResult::Translated) => summary.translated += 1,
                    Ok(LocaleResult::Skipped) => summary.skipped += 1,
                    Err(e) => {
                        summary.failed += 1;
                        error!(keypath = %info.keypath, locale = %locale, error = %format!("{e:#}"), "translation failed");
                    }
                }
            }

            if invoked && index + 1 < total {
                tokio::time::sleep(self.settings.key_delay).await;
            }
        }
        false
    }

    async fn translate_locale(
        &self,
        info: &MissingKeyInfo,
        locale: &str,
        catalog: &Catalog,
        router: &FileRouter<'_>,
        invoked: &mut bool,
    ) -> Result<LocaleResult> {
        let Some(file_path) = router.resolve_target_file(locale, catalog.files(locale)) else {
            warn!(keypath = %info.keypath, locale, "no destination file; skipping");
            return Ok(LocaleResult::Skipped);
        };

        let pending = PendingWrite::new(&info.keypath, locale, file_path);
        self.store
            .write(vec![CatalogWrite::Create(pending.clone())])
            .await?;

        let handle = self.backend.translate(TranslationJob {
            record: pending,
            source_locale: info.source_locale.clone(),
            source_value: info.source_value.clone(),
        });
        *invoked = true;

        let outcome = handle.wait(self.settings.completion_timeout).await;
        tokio::time::sleep(self.settings.locale_delay).await;

        match outcome? {
            TranslationOutcome::Translated { .. } => {
                debug!(keypath = %info.keypath, locale, "translated");
                Ok(LocaleResult::Translated)
            }
            TranslationOutcome::Failed { reason } => Err(anyhow!(reason)),
        }
    }
}
