//! Translation pipeline.
//!
//! - `backend`: Backend contract and per-job completion handles
//! - `command`: Backend that runs an external translator command
//! - `cancel`: Cooperative cancellation flag
//! - `orchestrator`: The sequential run state machine

pub mod backend;
pub mod cancel;
pub mod command;
pub mod orchestrator;

pub use backend::{CompletionHandle, TranslationBackend, TranslationJob, TranslationOutcome};
pub use cancel::{CancellationSource, CancellationToken};
pub use command::CommandBackend;
pub use orchestrator::{Orchestrator, OrchestratorSettings, RunOutcome, RunState, TranslateSummary};
