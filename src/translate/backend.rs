//! Translation backend contract.
//!
//! A backend is fire-and-forget: [`TranslationBackend::translate`] starts the
//! work and immediately returns a [`CompletionHandle`] for exactly that
//! `(keypath, locale)` pair. Awaiting the handle replaces subscribing to a
//! shared event stream and filtering for a matching "end" event.

use std::time::Duration;

use tokio::sync::oneshot;

use crate::core::PendingWrite;
use crate::error::SyncError;

/// One `(record, source locale, target locale)` unit of work.
/// The target locale is `record.locale`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationJob {
    pub record: PendingWrite,
    pub source_locale: String,
    pub source_value: String,
}

impl TranslationJob {
    pub fn keypath(&self) -> &str {
        &self.record.keypath
    }

    pub fn target_locale(&self) -> &str {
        &self.record.locale
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    Translated { value: String },
    Failed { reason: String },
}

/// Backend side of a completion handle.
#[derive(Debug)]
pub struct CompletionSender {
    tx: oneshot::Sender<TranslationOutcome>,
}

impl CompletionSender {
    /// Signal completion. Consumes the sender, so a job completes at most once.
    pub fn complete(self, outcome: TranslationOutcome) {
        // The receiver may have given up (timeout); nothing left to notify then
        let _ = self.tx.send(outcome);
    }

    /// Resolves once the handle is dropped, e.g. after a timed-out wait.
    pub async fn closed(&mut self) {
        self.tx.closed().await;
    }
}

/// Orchestrator side: resolves when the backend finishes this one job.
#[derive(Debug)]
pub struct CompletionHandle {
    keypath: String,
    locale: String,
    rx: oneshot::Receiver<TranslationOutcome>,
}

impl CompletionHandle {
    pub fn keypath(&self) -> &str {
        &self.keypath
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Wait for completion, bounded by `timeout` when given.
    pub async fn wait(self, timeout: Option<Duration>) -> Result<TranslationOutcome, SyncError> {
        let CompletionHandle {
            keypath,
            locale,
            rx,
        } = self;

        let received = match timeout {
            Some(limit) => match tokio::time::timeout(limit, rx).await {
                Ok(received) => received,
                Err(_) => {
                    return Err(SyncError::CompletionTimeout {
                        keypath,
                        locale,
                        timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                    });
                }
            },
            None => rx.await,
        };

        received.map_err(|_| SyncError::BackendDropped { keypath, locale })
    }
}

/// Create the two ends of a completion signal for one job.
pub fn completion_pair(
    keypath: impl Into<String>,
    locale: impl Into<String>,
) -> (CompletionSender, CompletionHandle) {
    let (tx, rx) = oneshot::channel();
    (
        CompletionSender { tx },
        CompletionHandle {
            keypath: keypath.into(),
            locale: locale.into(),
            rx,
        },
    )
}

pub trait TranslationBackend: Send + Sync {
    /// Start translating one job. Must not block; completion is signalled
    /// through the returned handle.
    fn translate(&self, job: TranslationJob) -> CompletionHandle;
}
