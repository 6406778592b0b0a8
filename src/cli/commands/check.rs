use anyhow::Result;

use super::super::{
    args::CheckCommand,
    exit_status::ExitStatus,
    report::{print_success, report},
};
use super::shared::analyze;
use crate::core::Workspace;
use crate::issues::collect_issues;

pub async fn check(cmd: CheckCommand) -> Result<ExitStatus> {
    let ws = Workspace::new(&cmd.common)?;
    let analysis = analyze(&ws).await?;
    let catalog = &analysis.scan.catalog;

    let issues = collect_issues(
        catalog,
        &ws.config.source_locale,
        &analysis.reconciliation,
        &analysis.scan.warnings,
    );

    if issues.is_empty() {
        print_success(catalog.file_count(), catalog.all_keys().len());
        return Ok(ExitStatus::Success);
    }

    report(&issues);
    Ok(ExitStatus::from_problem_count(issues.len()))
}
