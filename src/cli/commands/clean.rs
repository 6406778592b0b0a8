use anyhow::Result;

use super::super::{
    args::CleanCommand,
    exit_status::ExitStatus,
    prompt::TerminalPrompter,
    report::{print_clean, print_clean_preview},
};
use super::shared::analyze;
use crate::cleanup::{CleanupExecutor, Selection};
use crate::core::{UnusedKeyInfo, Workspace};
use crate::surface::{AutoApprove, Prompter};

pub async fn clean(cmd: CleanCommand) -> Result<ExitStatus> {
    let ws = Workspace::new(&cmd.common)?;
    let analysis = analyze(&ws).await?;

    let selection = Selection::from_keys(&cmd.keys);
    let candidates: Vec<UnusedKeyInfo> = analysis
        .reconciliation
        .unused
        .into_iter()
        .filter(|info| selection.includes(&info.keypath))
        .collect();

    let is_apply = cmd.apply || cmd.interactive;
    if !is_apply || candidates.is_empty() {
        print_clean_preview(&candidates);
        return Ok(ExitStatus::Success);
    }

    let prompter: Box<dyn Prompter> = if cmd.yes && !cmd.interactive {
        Box::new(AutoApprove)
    } else {
        Box::new(TerminalPrompter::new())
    };

    if !cmd.interactive && !prompter.confirm_cleanup(&candidates).await? {
        println!("Cleanup cancelled; no files were changed.");
        return Ok(ExitStatus::Success);
    }

    let executor = CleanupExecutor::new(ws.store.clone(), ws.analyzer.clone());
    let mut outcome = executor
        .cleanup(
            &candidates,
            &analysis.scan.catalog,
            &selection,
            cmd.interactive,
            prompter.as_ref(),
        )
        .await?;

    print_clean(&outcome);
    // The process exits next; nothing would read the refreshed report
    outcome.discard_refresh();
    Ok(ExitStatus::Success)
}
