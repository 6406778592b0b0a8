use anyhow::Result;
use insta_cmd::{SpawnExt, assert_cmd_snapshot};
use pretty_assertions::assert_eq;

use crate::{CliTest, json_key_exists, setup_config};

fn project() -> Result<CliTest> {
    let test = CliTest::new()?;
    setup_config(&test)?;
    test.write_file(
        "messages/en.json",
        r#"{
  "title": "Title",
  "old": { "banner": "Banner", "footer": "Footer" }
}"#,
    )?;
    test.write_file(
        "messages/fr.json",
        r#"{
  "title": "Titre",
  "old": { "banner": "Bannière" }
}"#,
    )?;
    test.write_file("src/page.tsx", r#"t("title")"#)?;
    Ok(test)
}

#[test]
fn test_clean_dry_run_lists_keys() -> Result<()> {
    let test = project()?;
    let before = test.read_file("messages/en.json")?;

    assert_cmd_snapshot!(test.command_with(&["clean"]), @r"
    success: true
    exit_code: 0
    ----- stdout -----
      old.banner  en, fr
      old.footer  en
    Would remove 2 unused key(s). Run with --apply to remove them.

    ----- stderr -----
    ");
    assert_eq!(test.read_file("messages/en.json")?, before);

    Ok(())
}

#[test]
fn test_clean_apply_removes_from_every_locale() -> Result<()> {
    let test = project()?;

    assert_cmd_snapshot!(test.command_with(&["clean", "--apply", "--yes"]), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Removed 2 key(s) (3 value(s)) from 2 file(s)

    ----- stderr -----
    ");

    let en = test.read_json("messages/en.json")?;
    let fr = test.read_json("messages/fr.json")?;
    assert!(json_key_exists(&en, "title"));
    assert!(json_key_exists(&fr, "title"));
    assert!(!json_key_exists(&en, "old.banner"));
    assert!(!json_key_exists(&en, "old.footer"));
    assert!(!json_key_exists(&fr, "old.banner"));

    Ok(())
}

#[test]
fn test_clean_only_selected_keys() -> Result<()> {
    let test = project()?;

    let output = test.run(&["clean", "--apply", "--yes", "--keys", "old.footer"])?;

    assert_eq!(output.status.code(), Some(0));
    let en = test.read_json("messages/en.json")?;
    assert!(json_key_exists(&en, "old.banner"));
    assert!(!json_key_exists(&en, "old.footer"));

    Ok(())
}

#[test]
fn test_clean_interactive_quit_stops_early() -> Result<()> {
    let test = project()?;

    // Remove the first key, then quit.
    let mut command = test.command_with(&["clean", "--interactive"]);
    let mut answered = command.pass_stdin("y\nq\n");
    assert_cmd_snapshot!(answered, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Removed 1 key(s) (2 value(s)) from 2 file(s); stopped early

    ----- stderr -----
    Remove old.banner (en, fr)? [y]es / [n]o / [q]uit Remove old.footer (en)? [y]es / [n]o / [q]uit
    ");

    let en = test.read_json("messages/en.json")?;
    assert!(!json_key_exists(&en, "old.banner"));
    assert!(json_key_exists(&en, "old.footer"));

    Ok(())
}

#[test]
fn test_clean_declined_leaves_files() -> Result<()> {
    let test = project()?;
    let before = test.read_file("messages/fr.json")?;

    assert_cmd_snapshot!(test.command_with(&["clean", "--apply"]), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Cleanup cancelled; no files were changed.

    ----- stderr -----
    Remove 2 unused key(s)? [y/N]
    ");
    assert_eq!(test.read_file("messages/fr.json")?, before);

    Ok(())
}
