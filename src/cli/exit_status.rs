use std::process::ExitCode;

/// Process exit status.
///
/// - `Success` (0): nothing to report, or the requested change was made
/// - `Failure` (1): `check` found problems, or a run ended with failed items
/// - `Error` (2): the command could not run (bad config, missing catalog, ...)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl ExitStatus {
    /// `Failure` when `problems` is non-zero.
    pub fn from_problem_count(problems: usize) -> Self {
        if problems > 0 {
            Self::Failure
        } else {
            Self::Success
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
