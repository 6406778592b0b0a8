//! In-memory JSON catalog document with keypath edits.
//!
//! Supports nested dot-keys, preserves key order, and writes 2-space
//! pretty-printed output with a trailing newline.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Added,
    Updated,
    Unchanged,
    Removed,
    NotFound,
    /// The keypath runs through a value that cannot hold it.
    Conflict,
}

#[derive(Debug)]
pub struct JsonDocument {
    file_path: PathBuf,
    root: Value,
}

impl JsonDocument {
    pub fn open_or_create(path: &Path) -> Result<Self> {
        let root = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path.display()))?;
            if content.trim().is_empty() {
                Value::Object(Map::new())
            } else {
                serde_json::from_str(&content)
                    .with_context(|| format!("Failed to parse JSON: {}", path.display()))?
            }
        } else {
            Value::Object(Map::new())
        };

        Ok(Self {
            file_path: path.to_path_buf(),
            root,
        })
    }

    /// Set a keypath to a string value, creating parent objects as needed.
    ///
    /// Numeric segments index into arrays, which are padded with empty
    /// objects up to the index. An existing parent that is neither an object
    /// nor an array, or an existing non-string leaf, is a `Conflict` and the
    /// document is left untouched. With `overwrite == false` an existing
    /// value is left alone.
    pub fn set_value(&mut self, keypath: &str, value: &str, overwrite: bool) -> KeyAction {
        let parts: Vec<&str> = keypath.split('.').collect();
        let Some((final_key, parents)) = parts.split_last() else {
            return KeyAction::Unchanged;
        };
        if !path_is_writable(&self.root, &parts) {
            return KeyAction::Conflict;
        }

        let mut current = &mut self.root;
        for part in parents {
            let Some(child) = child_container(current, part) else {
                return KeyAction::Conflict;
            };
            current = child;
        }

        let existing = match &mut *current {
            Value::Object(map) => map.get_mut(*final_key),
            Value::Array(items) => match final_key.parse::<usize>() {
                Ok(index) => items.get_mut(index),
                Err(_) => return KeyAction::Conflict,
            },
            _ => return KeyAction::Conflict,
        };

        match existing {
            Some(Value::String(_)) if !overwrite => KeyAction::Unchanged,
            Some(Value::String(s)) if s.as_str() == value => KeyAction::Unchanged,
            Some(Value::String(s)) => {
                *s = value.to_string();
                KeyAction::Updated
            }
            Some(_) => KeyAction::Conflict,
            None => insert_leaf(current, final_key, value),
        }
    }

    /// Remove a keypath and prune parent objects it leaves empty.
    pub fn delete_key(&mut self, keypath: &str) -> KeyAction {
        let parts: Vec<&str> = keypath.split('.').collect();
        let action = delete_path(&mut self.root, &parts);
        if action == KeyAction::Removed {
            remove_empty_objects(&mut self.root);
        }
        action
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut content =
            serde_json::to_string_pretty(&self.root).context("Failed to serialize JSON")?;
        if !content.ends_with('\n') {
            content.push('\n');
        }

        fs::write(&self.file_path, content)
            .with_context(|| format!("Failed to write file: {}", self.file_path.display()))?;
        Ok(())
    }

    #[cfg(test)]
    pub fn root(&self) -> &Value {
        &self.root
    }
}

/// Check, without mutating, that every existing value along `parts` can
/// hold the next segment.
fn path_is_writable(root: &Value, parts: &[&str]) -> bool {
    let mut current = root;
    for part in parts {
        let next = match current {
            Value::Object(map) => map.get(*part),
            Value::Array(items) => match part.parse::<usize>() {
                Ok(index) => items.get(index),
                Err(_) => return false,
            },
            _ => return false,
        };
        match next {
            Some(value) => current = value,
            None => return true,
        }
    }
    true
}

/// Step into `segment`, creating an object when it is absent.
fn child_container<'a>(value: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    let child = match value {
        Value::Object(map) => map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new())),
        Value::Array(items) => {
            let index = segment.parse::<usize>().ok()?;
            while items.len() <= index {
                items.push(Value::Object(Map::new()));
            }
            &mut items[index]
        }
        _ => return None,
    };
    matches!(*child, Value::Object(_) | Value::Array(_)).then_some(child)
}

fn insert_leaf(container: &mut Value, key: &str, value: &str) -> KeyAction {
    match container {
        Value::Object(map) => {
            map.insert(key.to_string(), Value::String(value.to_string()));
            KeyAction::Added
        }
        // Appending is fine; a gap before a string slot is not
        Value::Array(items) if key.parse::<usize>().ok() == Some(items.len()) => {
            items.push(Value::String(value.to_string()));
            KeyAction::Added
        }
        _ => KeyAction::Conflict,
    }
}

fn delete_path(value: &mut Value, parts: &[&str]) -> KeyAction {
    let Some((first, rest)) = parts.split_first() else {
        return KeyAction::NotFound;
    };
    match value {
        Value::Object(map) if rest.is_empty() => {
            // shift_remove keeps sibling order
            if map.shift_remove(*first).is_some() {
                KeyAction::Removed
            } else {
                KeyAction::NotFound
            }
        }
        Value::Object(map) => match map.get_mut(*first) {
            Some(child) => delete_path(child, rest),
            None => KeyAction::NotFound,
        },
        Value::Array(items) => match first.parse::<usize>().ok().and_then(|i| items.get_mut(i)) {
            Some(child) if !rest.is_empty() => delete_path(child, rest),
            _ => KeyAction::NotFound,
        },
        _ => KeyAction::NotFound,
    }
}

fn remove_empty_objects(value: &mut Value) {
    if let Value::Object(map) = value {
        for child in map.values_mut() {
            remove_empty_objects(child);
        }
        map.retain(|_, v| !matches!(v, Value::Object(m) if m.is_empty()));
    }
}
