use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;

use crate::{CliTest, lookup, setup_config, stderr};

fn project() -> Result<CliTest> {
    let test = CliTest::new()?;
    setup_config(&test)?;
    test.write_file(
        "messages/en.json",
        r#"{
  "greeting": { "hello": "Hello" },
  "farewell": "Bye"
}"#,
    )?;
    test.write_file("messages/fr.json", r#"{ "greeting": {} }"#)?;
    test.write_file(
        "src/app.tsx",
        r#"t("greeting.hello"); t("farewell");"#,
    )?;
    Ok(test)
}

// `cat` echoes the source value back, which is enough to see where it lands.
#[cfg(unix)]
#[test]
fn test_translate_fills_missing_values() -> Result<()> {
    let test = project()?;

    assert_cmd_snapshot!(test.command_with(&["translate", "--yes"]), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Translated 2 value(s) for 2 key(s)

    ----- stderr -----
    ");

    let fr = test.read_json("messages/fr.json")?;
    assert_eq!(lookup(&fr, "greeting.hello").and_then(|v| v.as_str()), Some("Hello"));
    assert_eq!(lookup(&fr, "farewell").and_then(|v| v.as_str()), Some("Bye"));

    Ok(())
}

#[test]
fn test_translate_declined_without_input() -> Result<()> {
    let test = project()?;

    assert_cmd_snapshot!(test.command_with(&["translate"]), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Translation cancelled; no files were changed.

    ----- stderr -----
    Translate 2 key(s) from en:
      - fr: 2 key(s)
    Proceed? [y/N]
    ");
    assert_eq!(test.read_file("messages/fr.json")?, r#"{ "greeting": {} }"#);

    Ok(())
}

#[test]
fn test_translate_nothing_to_do() -> Result<()> {
    let test = CliTest::new()?;
    setup_config(&test)?;
    test.write_file("messages/en.json", r#"{ "title": "Title" }"#)?;
    test.write_file("messages/fr.json", r#"{ "title": "Titre" }"#)?;
    test.write_file("src/page.tsx", r#"t("title")"#)?;

    assert_cmd_snapshot!(test.command_with(&["translate", "--yes"]), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ No missing translations

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_translate_rejects_unknown_locale() -> Result<()> {
    let test = project()?;

    let output = test.run(&["translate", "--yes", "--locales", "xx"])?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("xx"));

    Ok(())
}
