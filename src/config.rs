use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::utils::is_identifier;

pub const CONFIG_FILE_NAME: &str = ".keysyncrc.json";

/// Fixed delay between two locales of the same keypath.
pub const LOCALE_DELAY_MS: u64 = 200;

/// Fixed delay between two keypaths.
pub const KEY_DELAY_MS: u64 = 500;

pub const DEFAULT_COMPLETION_TIMEOUT_MS: u64 = 120_000;

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_messages_root", alias = "messagesDir")]
    pub messages_root: String,
    #[serde(default = "default_source_locale", alias = "primaryLocale")]
    pub source_locale: String,
    /// Active locales. Empty means every locale found on disk.
    #[serde(default)]
    pub locales: Vec<String>,
    #[serde(default = "default_source_root")]
    pub source_root: String,
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default = "default_usage_functions")]
    pub usage_functions: Vec<String>,
    #[serde(default = "default_preferences_file")]
    pub preferences_file: String,
    #[serde(default)]
    pub translator: TranslatorConfig,
    #[serde(default = "default_key_delay_ms")]
    pub key_delay_ms: u64,
    #[serde(default = "default_locale_delay_ms")]
    pub locale_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatorConfig {
    /// Program and arguments; `{source}` and `{target}` are substituted.
    #[serde(default)]
    pub command: Vec<String>,
    /// Bounded completion wait. `0` waits forever.
    #[serde(default = "default_completion_timeout_ms")]
    pub completion_timeout_ms: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            completion_timeout_ms: default_completion_timeout_ms(),
        }
    }
}

impl TranslatorConfig {
    pub fn completion_timeout(&self) -> Option<Duration> {
        (self.completion_timeout_ms > 0).then(|| Duration::from_millis(self.completion_timeout_ms))
    }
}

fn default_messages_root() -> String {
    "./messages".to_string()
}

fn default_source_locale() -> String {
    "en".to_string()
}

fn default_source_root() -> String {
    "./".to_string()
}

fn default_includes() -> Vec<String> {
    vec!["src".to_string()]
}

fn default_usage_functions() -> Vec<String> {
    vec!["t".to_string()]
}

fn default_preferences_file() -> String {
    ".keysync/preferences.json".to_string()
}

fn default_completion_timeout_ms() -> u64 {
    DEFAULT_COMPLETION_TIMEOUT_MS
}

fn default_key_delay_ms() -> u64 {
    KEY_DELAY_MS
}

fn default_locale_delay_ms() -> u64 {
    LOCALE_DELAY_MS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            messages_root: default_messages_root(),
            source_locale: default_source_locale(),
            locales: Vec::new(),
            source_root: default_source_root(),
            includes: default_includes(),
            ignores: Vec::new(),
            usage_functions: default_usage_functions(),
            preferences_file: default_preferences_file(),
            translator: TranslatorConfig::default(),
            key_delay_ms: default_key_delay_ms(),
            locale_delay_ms: default_locale_delay_ms(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob pattern is invalid, the source locale is
    /// empty, or a usage function name is not an identifier.
    pub fn validate(&self) -> Result<()> {
        if self.source_locale.trim().is_empty() {
            bail!("'sourceLocale' must not be empty");
        }

        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        // Patterns without wildcards are literal directory paths
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        for name in &self.usage_functions {
            if !is_identifier(name) {
                bail!("Invalid name in 'usageFunctions': \"{}\"", name);
            }
        }

        Ok(())
    }

    pub fn key_delay(&self) -> Duration {
        Duration::from_millis(self.key_delay_ms)
    }

    pub fn locale_delay(&self) -> Duration {
        Duration::from_millis(self.locale_delay_ms)
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Directory containing the config file, or the start directory.
    pub root_dir: PathBuf,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            let root_dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| start_dir.to_path_buf());
            Ok(ConfigLoadResult {
                config,
                root_dir,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            root_dir: start_dir.to_path_buf(),
            from_file: false,
        }),
    }
}
