use anyhow::Result;

use crate::core::{
    Workspace,
    parsers::json::ScanCatalogResult,
    preferences::PreferenceStore,
    reconcile::{ReconcileInput, Reconciliation, reconcile},
    usage::UsageAnalyzer,
};

/// Catalog snapshot plus the reconciliation pass shared by `check` and `clean`.
pub struct Analysis {
    pub scan: ScanCatalogResult,
    pub reconciliation: Reconciliation,
}

pub async fn analyze(ws: &Workspace) -> Result<Analysis> {
    let scan = ws.load_catalog()?;
    ws.require_source_locale(&scan.catalog)?;

    let usage = ws.analyzer.analyze_usage().await?;
    let preferences = ws.preferences.get()?;
    let targets = ws.target_locales(&scan.catalog, &[]);

    let reconciliation = reconcile(&ReconcileInput {
        catalog: &scan.catalog,
        source_locale: &ws.config.source_locale,
        target_locales: &targets,
        usage: &usage,
        preferences: &preferences,
    });

    Ok(Analysis {
        scan,
        reconciliation,
    })
}
