//! Typed error kinds.
//!
//! Most of the crate propagates `anyhow::Error`; the kinds below are the ones
//! callers need to match on.

use std::path::PathBuf;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// No catalog is configured (or the configured root is gone).
    #[error(
        "no translation catalog found at '{}'\nHint: check the 'messagesRoot' setting in .keysyncrc.json",
        .path.display()
    )]
    ConfigurationAbsent { path: PathBuf },

    /// The backend did not signal completion within the bounded wait.
    #[error("translation of '{keypath}' into '{locale}' did not complete within {timeout_ms}ms")]
    CompletionTimeout {
        keypath: String,
        locale: String,
        timeout_ms: u64,
    },

    /// The backend dropped the completion handle without answering.
    #[error("translation backend dropped '{keypath}' ({locale}) without signalling completion")]
    BackendDropped { keypath: String, locale: String },

    #[error("locale '{locale}' has no catalog files")]
    UnknownLocale { locale: String },
}
