//! Terminal implementation of the confirmation surface.
//!
//! Questions go to stderr so stdout only carries reports. A closed stdin
//! counts as "no" (and as cancel-all for per-item removal).

use anyhow::{Context, Result};
use async_trait::async_trait;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::Mutex;

use crate::core::UnusedKeyInfo;
use crate::surface::{Prompter, RemovalDecision, TranslationPlan};

pub struct TerminalPrompter {
    // One reader for the whole session so buffered answers are not dropped
    input: Mutex<BufReader<Stdin>>,
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            input: Mutex::new(BufReader::new(tokio::io::stdin())),
        }
    }

    /// Print `question` and read one trimmed, lowercased line.
    /// `None` on end of input.
    async fn ask(&self, question: &str) -> Result<Option<String>> {
        eprint!("{} ", question);
        let mut line = String::new();
        let read = self
            .input
            .lock()
            .await
            .read_line(&mut line)
            .await
            .context("Failed to read answer from stdin")?;
        if read == 0 {
            eprintln!();
            return Ok(None);
        }
        Ok(Some(line.trim().to_lowercase()))
    }
}

fn is_yes(answer: Option<&str>) -> bool {
    matches!(answer, Some("y" | "yes"))
}

fn removal_decision(answer: Option<&str>) -> RemovalDecision {
    match answer {
        Some("y" | "yes") => RemovalDecision::Remove,
        Some("q" | "quit" | "c" | "cancel") | None => RemovalDecision::CancelAll,
        Some(_) => RemovalDecision::Skip,
    }
}

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn confirm_translation(&self, plan: &TranslationPlan) -> Result<bool> {
        eprintln!(
            "{} {} key(s) from {}:",
            "Translate".cyan().bold(),
            plan.keys,
            plan.source_locale
        );
        for (locale, count) in &plan.per_locale {
            eprintln!("  - {}: {} key(s)", locale, count);
        }
        let answer = self.ask("Proceed? [y/N]").await?;
        Ok(is_yes(answer.as_deref()))
    }

    async fn confirm_cleanup(&self, unused: &[UnusedKeyInfo]) -> Result<bool> {
        let question = format!("Remove {} unused key(s)? [y/N]", unused.len());
        let answer = self.ask(&question).await?;
        Ok(is_yes(answer.as_deref()))
    }

    async fn confirm_removal(&self, info: &UnusedKeyInfo) -> Result<RemovalDecision> {
        let question = format!(
            "Remove {} ({})? [y]es / [n]o / [q]uit",
            info.keypath.bold(),
            info.locales.join(", ")
        );
        let answer = self.ask(&question).await?;
        Ok(removal_decision(answer.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answers() {
        assert!(is_yes(Some("y")));
        assert!(is_yes(Some("yes")));
        assert!(!is_yes(Some("")));
        assert!(!is_yes(None));

        assert_eq!(removal_decision(Some("y")), RemovalDecision::Remove);
        assert_eq!(removal_decision(Some("n")), RemovalDecision::Skip);
        assert_eq!(removal_decision(Some("")), RemovalDecision::Skip);
        assert_eq!(removal_decision(Some("q")), RemovalDecision::CancelAll);
        assert_eq!(removal_decision(None), RemovalDecision::CancelAll);
    }
}
