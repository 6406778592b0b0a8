use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::CliTest;

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command_with(&["init"]), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created .keysyncrc.json

    ----- stderr -----
    ");

    let config: Value = serde_json::from_str(&test.read_file(".keysyncrc.json")?)?;
    assert_eq!(config["sourceLocale"], "en");
    assert_eq!(config["messagesRoot"], "./messages");

    Ok(())
}

#[test]
fn test_init_refuses_to_overwrite() -> Result<()> {
    let test = CliTest::with_file(".keysyncrc.json", "{}")?;

    assert_cmd_snapshot!(test.command_with(&["init"]), @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    Error: .keysyncrc.json already exists
    ");
    assert_eq!(test.read_file(".keysyncrc.json")?, "{}");

    Ok(())
}
