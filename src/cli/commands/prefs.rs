use anyhow::Result;
use colored::Colorize;

use super::super::{
    args::{PrefsAction, PrefsCommand},
    exit_status::ExitStatus,
    report::{SUCCESS_MARK, print_prefs},
};
use crate::core::{Workspace, preferences::PreferenceStore};

pub fn prefs(cmd: PrefsCommand) -> Result<ExitStatus> {
    let ws = Workspace::new(&cmd.common)?;
    let store = ws.preferences.as_ref();

    match cmd.action {
        PrefsAction::Get => print_prefs(&store.get()?),
        PrefsAction::Set { locale, basename } => {
            store.set(&locale, &basename)?;
            println!(
                "{} New {} keys will be saved to '{}'",
                SUCCESS_MARK.green(),
                locale.bold(),
                basename
            );
        }
        PrefsAction::Clear { locale } => {
            store.clear(locale.as_deref())?;
            match locale {
                Some(locale) => println!("{} Cleared preference for {}", SUCCESS_MARK.green(), locale),
                None => println!("{} Cleared all preferences", SUCCESS_MARK.green()),
            }
        }
    }

    Ok(ExitStatus::Success)
}
