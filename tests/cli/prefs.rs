use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, setup_config, stdout};

#[test]
fn test_prefs_set_get_clear() -> Result<()> {
    let test = CliTest::new()?;
    setup_config(&test)?;
    test.write_file("messages/fr/common.json", r#"{ "title": "Titre" }"#)?;

    let output = test.run(&["prefs", "get"])?;
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("No preferences set."));

    let output = test.run(&["prefs", "set", "fr", "common"])?;
    assert_eq!(output.status.code(), Some(0));
    assert!(test.root().join(".keysync/preferences.json").exists());

    let output = test.run(&["prefs", "get"])?;
    assert!(stdout(&output).contains("fr  common"));

    let output = test.run(&["prefs", "clear", "fr"])?;
    assert_eq!(output.status.code(), Some(0));

    let output = test.run(&["prefs", "get"])?;
    assert!(stdout(&output).contains("No preferences set."));

    Ok(())
}
