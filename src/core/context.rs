use std::{
    path::{Component, Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context as _, Result, anyhow};
use tracing::{debug, warn};

use crate::{
    cli::args::CommonArgs,
    config::{Config, load_config},
    core::{
        Catalog,
        parsers::json::{ScanCatalogResult, locale_for_path},
        preferences::JsonPreferenceStore,
        routing::EditingContext,
        store::{CatalogStore, JsonCatalogStore},
        usage::{SourceUsageAnalyzer, UsageCache, UsageScanSettings},
    },
    error::SyncError,
};

/// Everything a command needs: configuration plus the wired-up collaborators.
pub struct Workspace {
    pub config: Config,
    /// Directory holding the config file (or the start directory).
    pub root_dir: PathBuf,
    pub from_file: bool,
    pub store: Arc<JsonCatalogStore>,
    pub usage_cache: Arc<UsageCache>,
    pub analyzer: Arc<SourceUsageAnalyzer>,
    pub preferences: Arc<JsonPreferenceStore>,
}

impl Workspace {
    /// Create a workspace from command line arguments.
    ///
    /// Priority: CLI args > config file > defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the config file is invalid, or
    /// [`SyncError::ConfigurationAbsent`] if the messages directory is missing.
    pub fn new(common_args: &CommonArgs) -> Result<Self> {
        let start_dir = common_args
            .source_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));

        let config_result = load_config(&start_dir)?;
        if !config_result.from_file {
            debug!("no .keysyncrc.json found, using default configuration");
        }

        let mut config = config_result.config;
        if let Some(ref source_locale) = common_args.source_locale {
            config.source_locale = source_locale.clone();
        }
        if let Some(ref messages_root) = common_args.messages_root {
            config.messages_root = messages_root.to_string_lossy().to_string();
        }
        config.validate()?;

        let root_dir = config_result.root_dir;
        let messages_dir = resolve_relative(&root_dir, Path::new(&config.messages_root));
        let store = Arc::new(JsonCatalogStore::open(&messages_dir)?);

        let usage_cache = Arc::new(UsageCache::new());
        let analyzer = Arc::new(SourceUsageAnalyzer::new(
            UsageScanSettings::from_config(&config, &root_dir),
            store.clone(),
            Arc::clone(&usage_cache),
        ));

        let preferences = Arc::new(JsonPreferenceStore::new(resolve_relative(
            &root_dir,
            Path::new(&config.preferences_file),
        )));

        Ok(Self {
            config,
            root_dir,
            from_file: config_result.from_file,
            store,
            usage_cache,
            analyzer,
            preferences,
        })
    }

    pub fn messages_dir(&self) -> &Path {
        self.store.root()
    }

    /// Load the catalog, logging files that failed to parse.
    pub fn load_catalog(&self) -> Result<ScanCatalogResult> {
        let result = self.store.load()?;
        for warning in &result.warnings {
            warn!(file = %warning.file_path, error = %warning.error, "skipping unreadable catalog file");
        }
        Ok(result)
    }

    /// Fail when the source locale has no catalog files.
    pub fn require_source_locale(&self, catalog: &Catalog) -> Result<(), SyncError> {
        if catalog.files(&self.config.source_locale).is_empty() {
            return Err(SyncError::UnknownLocale {
                locale: self.config.source_locale.clone(),
            });
        }
        Ok(())
    }

    /// Active locales: configured ones, or every locale on disk.
    /// The source locale always comes first.
    pub fn active_locales(&self, catalog: &Catalog) -> Vec<String> {
        let source = &self.config.source_locale;
        let configured: Vec<String> = if self.config.locales.is_empty() {
            catalog.locale_names().cloned().collect()
        } else {
            self.config.locales.clone()
        };

        std::iter::once(source.clone())
            .chain(configured.into_iter().filter(|l| l != source))
            .collect()
    }

    /// Target locales, optionally narrowed to `only`.
    pub fn target_locales(&self, catalog: &Catalog, only: &[String]) -> Vec<String> {
        self.active_locales(catalog)
            .into_iter()
            .skip(1)
            .filter(|l| only.is_empty() || only.contains(l))
            .collect()
    }

    /// Build the editing context for a file given on the command line.
    pub fn editing_context(&self, file: &Path) -> Result<EditingContext> {
        let absolute = if file.is_absolute() {
            file.to_path_buf()
        } else {
            std::env::current_dir()
                .context("Failed to read current directory")?
                .join(file)
        };
        let messages_dir = self
            .messages_dir()
            .canonicalize()
            .unwrap_or_else(|_| self.messages_dir().to_path_buf());
        let absolute = absolute.canonicalize().unwrap_or(absolute);

        let locale = locale_for_path(&messages_dir, &absolute).ok_or_else(|| {
            anyhow!(
                "'{}' is not a catalog file under '{}'",
                file.display(),
                self.messages_dir().display()
            )
        })?;

        // Match the spelling the loader uses for candidate paths
        let rel = absolute.strip_prefix(&messages_dir).unwrap_or(&absolute);
        Ok(EditingContext::new(self.messages_dir().join(rel), locale))
    }
}

/// Resolve a config-relative path against the config directory.
fn resolve_relative(root_dir: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() {
        return p.to_path_buf();
    }
    let is_cur_dir = root_dir
        .components()
        .all(|c| matches!(c, Component::CurDir));
    if is_cur_dir {
        p.to_path_buf()
    } else {
        let rel = p.strip_prefix(Path::new(".")).unwrap_or(p);
        root_dir.join(rel)
    }
}
