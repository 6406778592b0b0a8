//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `check`: Report missing, empty, unused and untranslatable keys
//! - `translate`: Fill missing translations through the configured translator
//! - `clean`: Remove keys no source file references
//! - `prefs`: Show or edit per-locale destination file preferences
//! - `init`: Write a default `.keysyncrc.json`

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Check(cmd)) => cmd.common.verbose,
            Some(Command::Translate(cmd)) => cmd.common.verbose,
            Some(Command::Clean(cmd)) => cmd.common.verbose,
            Some(Command::Prefs(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Source locale (overrides config file)
    #[arg(long, env = "KEYSYNC_SOURCE_LOCALE")]
    pub source_locale: Option<String>,

    /// Project root where the config file is looked up
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Messages directory path (overrides config file)
    #[arg(long)]
    pub messages_root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct TranslateCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Only translate into these locales (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub locales: Vec<String>,

    /// Catalog file being edited; used to pick where new keys go
    #[arg(long)]
    pub context: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CleanCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Actually delete keys (default is dry-run)
    #[arg(long)]
    pub apply: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Ask before removing each key
    #[arg(short, long)]
    pub interactive: bool,

    /// Only consider these keys (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub keys: Vec<String>,
}

#[derive(Debug, Args)]
pub struct PrefsCommand {
    #[command(subcommand)]
    pub action: PrefsAction,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum PrefsAction {
    /// Print stored preferences
    Get,
    /// Route new keys for LOCALE into files named BASENAME
    Set { locale: String, basename: String },
    /// Forget the preference for LOCALE, or all preferences
    Clear { locale: Option<String> },
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Report missing, empty, unused and untranslatable keys
    Check(CheckCommand),
    /// Fill missing translations one key and locale at a time
    Translate(TranslateCommand),
    /// Remove keys that no source file references
    Clean(CleanCommand),
    /// Manage destination file preferences
    Prefs(PrefsCommand),
    /// Initialize a new .keysyncrc.json configuration file
    Init,
}
