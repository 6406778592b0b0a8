use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use tracing::info;

use super::super::{
    args::TranslateCommand, exit_status::ExitStatus, prompt::TerminalPrompter,
    report::print_translate,
};
use crate::core::{Workspace, store::CatalogStore};
use crate::error::SyncError;
use crate::surface::{AutoApprove, Prompter};
use crate::translate::{
    CancellationSource, CommandBackend, Orchestrator, OrchestratorSettings, RunOutcome,
};

pub async fn translate(cmd: TranslateCommand) -> Result<ExitStatus> {
    let ws = Workspace::new(&cmd.common)?;
    let catalog = ws.load_catalog()?.catalog;
    ws.require_source_locale(&catalog)?;

    let active = ws.active_locales(&catalog);
    if let Some(unknown) = cmd.locales.iter().find(|l| !active.contains(l)) {
        return Err(SyncError::UnknownLocale {
            locale: unknown.clone(),
        }
        .into());
    }
    let targets = ws.target_locales(&catalog, &cmd.locales);
    let context = cmd
        .context
        .as_deref()
        .map(|file| ws.editing_context(file))
        .transpose()?;

    let store: Arc<dyn CatalogStore> = ws.store.clone();
    let backend = Arc::new(CommandBackend::new(
        &ws.config.translator.command,
        Arc::clone(&store),
    )?);

    let cancel = CancellationSource::new();
    let token = cancel.token();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!(
                "{} finishing the current key, press Ctrl-C again to abort",
                "Cancelling:".yellow().bold()
            );
            cancel.cancel();
            if tokio::signal::ctrl_c().await.is_ok() {
                std::process::exit(130);
            }
        }
    });

    let settings = OrchestratorSettings::from_config(&ws.config, targets);
    info!(targets = ?settings.target_locales, "starting translation run");
    let mut orchestrator = Orchestrator::new(
        store,
        ws.analyzer.clone(),
        ws.preferences.clone(),
        backend,
        settings,
    )
    .with_context(context)
    .with_cancellation(token);

    let prompter: Box<dyn Prompter> = if cmd.yes {
        Box::new(AutoApprove)
    } else {
        Box::new(TerminalPrompter::new())
    };

    let outcome = orchestrator.run(prompter.as_ref()).await;
    ctrl_c.abort();
    let outcome = outcome?;

    print_translate(&outcome);
    Ok(match &outcome {
        RunOutcome::Completed(summary) | RunOutcome::Cancelled(summary) => {
            ExitStatus::from_problem_count(summary.failed)
        }
        RunOutcome::NothingToDo { .. } | RunOutcome::Declined => ExitStatus::Success,
    })
}
