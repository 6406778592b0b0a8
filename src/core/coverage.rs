//! Per-locale coverage of a key universe.

use std::collections::BTreeSet;

use crate::core::{CoverageReport, LocaleMessages};

/// Classify a key universe against one locale.
///
/// `missing_keys` are the keys of `key_universe` with no record in `messages`;
/// `empty_keys` are the keys of `key_universe` whose record is blank.
/// Keys present in the locale but outside the universe are not reported.
pub fn compute_coverage(key_universe: &BTreeSet<String>, messages: &LocaleMessages) -> CoverageReport {
    let mut report = CoverageReport {
        locale: messages.locale.clone(),
        ..Default::default()
    };

    for key in key_universe {
        match messages.entries.get(key) {
            None => {
                report.missing_keys.insert(key.clone());
            }
            Some(records) if records.iter().all(|r| r.is_blank()) => {
                report.empty_keys.insert(key.clone());
            }
            Some(_) => {}
        }
    }

    report
}
