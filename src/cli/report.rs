//! Report formatting and printing utilities.
//!
//! Issues are printed cargo-style; command summaries are one or two lines.
//! Every function has a `_to` variant taking a writer for tests.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use crate::cleanup::CleanupOutcome;
use crate::core::{UnusedKeyInfo, preferences::AutoSavePreferences};
use crate::issues::{Issue, Report, ReportLocation, Severity};
use crate::translate::{RunOutcome, TranslateSummary};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Maximum number of untranslatable keys listed after a run.
const MAX_UNTRANSLATABLE_DISPLAY: usize = 10;

// ============================================================
// Check
// ============================================================

pub fn report(issues: &[Issue]) {
    report_to(issues, &mut io::stdout().lock());
}

pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let mut sorted = issues.to_vec();
    sorted.sort();

    let max_line_width = calculate_max_line_width(&sorted);
    for issue in &sorted {
        print_issue(issue, writer, max_line_width);
    }

    print_summary(&sorted, writer);
}

pub fn print_success(locale_files: usize, keys: usize) {
    print_success_to(locale_files, keys, &mut io::stdout().lock());
}

pub fn print_success_to<W: Write>(locale_files: usize, keys: usize, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Checked {} {} in {} locale {} - no issues found",
            keys,
            if keys == 1 { "key" } else { "keys" },
            locale_files,
            if locale_files == 1 { "file" } else { "files" }
        )
        .green()
    );
}

fn print_issue<W: Write>(issue: &Issue, writer: &mut W, max_line_width: usize) {
    let severity_str = match issue.report_severity() {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: \"{}\"  {}",
        severity_str,
        issue.message(),
        issue.report_rule().to_string().dimmed().cyan()
    );

    match issue.location() {
        ReportLocation::Message(loc) => {
            let _ = writeln!(
                writer,
                "  {} {}:{}:{}",
                "-->".blue(),
                loc.file_path,
                loc.line,
                loc.col
            );
        }
        ReportLocation::File { path } => {
            let _ = writeln!(writer, "  {} {}", "-->".blue(), path);
        }
        ReportLocation::Detached => {}
    }

    if let Some(details) = issue.details() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "note:".bold(),
            details,
            width = max_line_width
        );
    }

    let _ = writeln!(writer);
}

fn print_summary<W: Write>(issues: &[Issue], writer: &mut W) {
    let total_errors = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Error)
        .count();
    let total_warnings = issues.len() - total_errors;

    let _ = writeln!(
        writer,
        "{} {} problems ({} {}, {} {})",
        FAILURE_MARK.red(),
        issues.len(),
        total_errors,
        if total_errors == 1 { "error" } else { "errors" }.red(),
        total_warnings,
        if total_warnings == 1 {
            "warning"
        } else {
            "warnings"
        }
        .yellow()
    );
}

fn calculate_max_line_width(issues: &[Issue]) -> usize {
    issues
        .iter()
        .filter_map(|i| match i.location() {
            ReportLocation::Message(loc) => Some(loc.line),
            _ => None,
        })
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1)
}

// ============================================================
// Translate
// ============================================================

pub fn print_translate(outcome: &RunOutcome) {
    print_translate_to(outcome, &mut io::stdout().lock());
}

pub fn print_translate_to<W: Write>(outcome: &RunOutcome, writer: &mut W) {
    match outcome {
        RunOutcome::NothingToDo { untranslatable } => {
            let _ = writeln!(
                writer,
                "{} {}",
                SUCCESS_MARK.green(),
                "No missing translations".green()
            );
            print_untranslatable(untranslatable, writer);
        }
        RunOutcome::Declined => {
            let _ = writeln!(writer, "Translation cancelled; no files were changed.");
        }
        RunOutcome::Completed(summary) => {
            let mark = if summary.failed == 0 {
                SUCCESS_MARK.green()
            } else {
                FAILURE_MARK.red()
            };
            let _ = writeln!(
                writer,
                "{} Translated {} value(s) for {} key(s){}",
                mark,
                summary.translated,
                summary.processed,
                counts_suffix(summary)
            );
            print_untranslatable(&summary.untranslatable, writer);
        }
        RunOutcome::Cancelled(summary) => {
            let _ = writeln!(
                writer,
                "{} Cancelled after {} key(s); translated {} value(s){}",
                FAILURE_MARK.yellow(),
                summary.processed,
                summary.translated,
                counts_suffix(summary)
            );
            print_untranslatable(&summary.untranslatable, writer);
        }
    }
}

fn counts_suffix(summary: &TranslateSummary) -> String {
    let mut parts = Vec::new();
    if summary.skipped > 0 {
        parts.push(format!("{} skipped", summary.skipped));
    }
    if summary.failed > 0 {
        parts.push(format!("{} failed", summary.failed).red().to_string());
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

fn print_untranslatable<W: Write>(keys: &[String], writer: &mut W) {
    if keys.is_empty() {
        return;
    }
    let _ = writeln!(
        writer,
        "{} {} key(s) cannot be translated automatically and need manual translation:",
        "note:".bold(),
        keys.len()
    );
    for key in keys.iter().take(MAX_UNTRANSLATABLE_DISPLAY) {
        let _ = writeln!(writer, "  - {}", key);
    }
    if keys.len() > MAX_UNTRANSLATABLE_DISPLAY {
        let _ = writeln!(
            writer,
            "  (and {} more)",
            keys.len() - MAX_UNTRANSLATABLE_DISPLAY
        );
    }
}

// ============================================================
// Clean
// ============================================================

pub fn print_clean_preview(unused: &[UnusedKeyInfo]) {
    print_clean_preview_to(unused, &mut io::stdout().lock());
}

pub fn print_clean_preview_to<W: Write>(unused: &[UnusedKeyInfo], writer: &mut W) {
    if unused.is_empty() {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            "No unused keys".green()
        );
        return;
    }

    let width = unused
        .iter()
        .map(|i| UnicodeWidthStr::width(i.keypath.as_str()))
        .max()
        .unwrap_or(0);
    for info in unused {
        let padding = width - UnicodeWidthStr::width(info.keypath.as_str());
        let _ = writeln!(
            writer,
            "  {}{}  {}",
            info.keypath,
            " ".repeat(padding),
            info.locales.join(", ").dimmed()
        );
    }
    let _ = writeln!(
        writer,
        "{} {} unused key(s). Run with {} to remove them.",
        "Would remove".yellow().bold(),
        unused.len(),
        "--apply".cyan()
    );
}

pub fn print_clean(outcome: &CleanupOutcome) {
    print_clean_to(outcome, &mut io::stdout().lock());
}

pub fn print_clean_to<W: Write>(outcome: &CleanupOutcome, writer: &mut W) {
    if outcome.removed_count() == 0 {
        let _ = writeln!(writer, "No keys removed.");
        return;
    }
    let _ = writeln!(
        writer,
        "{} {} key(s) ({} value(s)) from {} file(s){}",
        "Removed".green().bold(),
        outcome.removed_count(),
        outcome.removed_records,
        outcome.files_modified,
        if outcome.cancelled {
            "; stopped early"
        } else {
            ""
        }
    );
}

// ============================================================
// Prefs
// ============================================================

pub fn print_prefs(prefs: &AutoSavePreferences) {
    print_prefs_to(prefs, &mut io::stdout().lock());
}

pub fn print_prefs_to<W: Write>(prefs: &AutoSavePreferences, writer: &mut W) {
    if prefs.is_empty() {
        let _ = writeln!(writer, "No preferences set.");
        return;
    }
    let width = prefs
        .iter()
        .map(|(locale, _)| UnicodeWidthStr::width(locale.as_str()))
        .max()
        .unwrap_or(0);
    for (locale, basename) in prefs.iter() {
        let _ = writeln!(writer, "{:<width$}  {}", locale, basename, width = width);
    }
}
