use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;

use crate::{CliTest, setup_config, stdout};

#[test]
fn test_check_reports_missing_and_unused() -> Result<()> {
    let test = CliTest::new()?;
    setup_config(&test)?;
    test.write_file(
        "messages/en.json",
        r#"{
  "greeting": { "hello": "Hello" },
  "stale": "Old"
}"#,
    )?;
    test.write_file("messages/fr.json", r#"{ "stale": "Vieux" }"#)?;
    test.write_file(
        "src/app.tsx",
        r#"export const App = () => <p>{t("greeting.hello")}</p>;"#,
    )?;

    assert_cmd_snapshot!(test.command_with(&["check"]), @r#"
    success: false
    exit_code: 1
    ----- stdout -----
    error: "greeting.hello"  missing-translation
      --> ./messages/en.json:2:1
      = note: ("Hello") missing in: fr

    warning: "stale"  unused-key
      --> ./messages/en.json:3:1
      = note: defined in: en, fr

    ✘ 2 problems (1 error, 1 warning)

    ----- stderr -----
    "#);

    Ok(())
}

#[test]
fn test_check_used_key_without_source_value() -> Result<()> {
    let test = CliTest::new()?;
    setup_config(&test)?;
    test.write_file("messages/en.json", r#"{ "title": "Title" }"#)?;
    test.write_file(
        "src/page.tsx",
        r#"t("title"); t('nav.ghost');"#,
    )?;

    let output = test.run(&["check"])?;

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("\"nav.ghost\"  untranslatable"));

    Ok(())
}

#[test]
fn test_check_clean_catalog() -> Result<()> {
    let test = CliTest::new()?;
    setup_config(&test)?;
    test.write_file("messages/en.json", r#"{ "title": "Title" }"#)?;
    test.write_file("messages/fr.json", r#"{ "title": "Titre" }"#)?;
    test.write_file("src/page.tsx", r#"t("title")"#)?;

    assert_cmd_snapshot!(test.command_with(&["check"]), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Checked 1 key in 2 locale files - no issues found

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_check_without_catalog_is_an_error() -> Result<()> {
    let test = CliTest::new()?;
    setup_config(&test)?;
    test.write_file("src/page.tsx", r#"t("title")"#)?;
    let missing_root = test.root().join("i18n").to_string_lossy().into_owned();
    let project = regex::escape(&test.root().to_string_lossy());

    insta::with_settings!({filters => vec![(project.as_str(), "[PROJECT]")]}, {
        assert_cmd_snapshot!(
            test.command_with(&["check", "--messages-root", &missing_root]),
            @r"
        success: false
        exit_code: 2
        ----- stdout -----

        ----- stderr -----
        Error: no translation catalog found at '[PROJECT]/i18n'
        Hint: check the 'messagesRoot' setting in .keysyncrc.json
        "
        );
    });

    Ok(())
}
