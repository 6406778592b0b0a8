use anyhow::{Context, Result, bail};

use super::{
    args::{Arguments, Command},
    commands::{check::check, clean::clean, init::init, prefs::prefs, translate::translate},
    exit_status::ExitStatus,
};

/// Dispatch to the command handler on a single-threaded runtime.
pub fn run(Arguments { command }: Arguments) -> Result<ExitStatus> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?
        .block_on(async move {
            match command {
                Some(Command::Check(cmd)) => check(cmd).await,
                Some(Command::Translate(cmd)) => translate(cmd).await,
                Some(Command::Clean(cmd)) => clean(cmd).await,
                Some(Command::Prefs(cmd)) => prefs(cmd),
                Some(Command::Init) => init(),
                None => bail!("No command provided. Use --help to see available commands."),
            }
        })
}
