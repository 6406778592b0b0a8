//! Confirmation surface consumed by the orchestrator and cleanup paths.
//!
//! The core treats it as a blocking request/response channel: it asks, waits
//! for the answer, and never retries.

use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;

use crate::core::{MissingKeyInfo, UnusedKeyInfo};

/// What a translation run is about to do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationPlan {
    pub source_locale: String,
    pub keys: usize,
    /// Target locale -> number of keys missing there.
    pub per_locale: BTreeMap<String, usize>,
}

impl TranslationPlan {
    pub fn from_missing(source_locale: &str, missing: &[MissingKeyInfo]) -> Self {
        let mut per_locale: BTreeMap<String, usize> = BTreeMap::new();
        for info in missing {
            for locale in &info.locales {
                *per_locale.entry(locale.clone()).or_default() += 1;
            }
        }
        Self {
            source_locale: source_locale.to_string(),
            keys: missing.len(),
            per_locale,
        }
    }

    pub fn total_translations(&self) -> usize {
        self.per_locale.values().sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalDecision {
    Remove,
    Skip,
    /// Stop asking; keys already removed stay removed.
    CancelAll,
}

#[async_trait]
pub trait Prompter: Send + Sync {
    async fn confirm_translation(&self, plan: &TranslationPlan) -> Result<bool>;

    /// Batch mode: one answer for the whole removal set.
    async fn confirm_cleanup(&self, unused: &[UnusedKeyInfo]) -> Result<bool>;

    /// Per-item mode.
    async fn confirm_removal(&self, info: &UnusedKeyInfo) -> Result<RemovalDecision>;
}

/// Answers yes to everything (`--yes`).
pub struct AutoApprove;

#[async_trait]
impl Prompter for AutoApprove {
    async fn confirm_translation(&self, _plan: &TranslationPlan) -> Result<bool> {
        Ok(true)
    }

    async fn confirm_cleanup(&self, _unused: &[UnusedKeyInfo]) -> Result<bool> {
        Ok(true)
    }

    async fn confirm_removal(&self, _info: &UnusedKeyInfo) -> Result<RemovalDecision> {
        Ok(RemovalDecision::Remove)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ValueType;
    use pretty_assertions::assert_eq;

    fn info(keypath: &str, locales: &[&str]) -> MissingKeyInfo {
        MissingKeyInfo {
            keypath: keypath.to_string(),
            locales: locales.iter().map(|l| l.to_string()).collect(),
            source_locale: "en".to_string(),
            source_value: "v".to_string(),
            value_type: ValueType::String,
        }
    }

    #[test]
    fn test_plan_counts_per_locale() {
        let plan = TranslationPlan::from_missing(
            "en",
            &[info("a", &["fr", "de"]), info("b", &["fr"])],
        );
        assert_eq!(plan.keys, 2);
        assert_eq!(plan.per_locale.get("fr"), Some(&2));
        assert_eq!(plan.per_locale.get("de"), Some(&1));
        assert_eq!(plan.total_translations(), 3);
    }
}
