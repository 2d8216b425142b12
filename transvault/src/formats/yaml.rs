//! YAML translation files (`messages.en.yml`).
//!
//! Nested mappings are flattened to dot-joined keys on read, and expanded back to a tree
//! on write.

use std::io::{BufRead, Write};

use serde_yaml::Value;

use crate::{
    error::Error,
    traits::Parser,
    types::Messages,
    yaml::{YamlWriter, expand_to_tree},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Format {
    pub messages: Messages,
}

impl Parser for Format {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let value: Value = serde_yaml::from_reader(reader)?;
        let mut messages = Messages::new();
        match value {
            Value::Null => {}
            Value::Mapping(_) => flatten(None, &value, &mut messages)?,
            _ => {
                return Err(Error::InvalidResource(
                    "YAML translation file must contain a mapping".to_string(),
                ));
            }
        }
        Ok(Format { messages })
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let tree = expand_to_tree(&self.messages)?;
        writer.write_all(YamlWriter::default().serialize(&tree).as_bytes())?;
        Ok(())
    }
}

impl From<Format> for Messages {
    fn from(value: Format) -> Self {
        value.messages
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn join(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}.{key}"),
        None => key.to_string(),
    }
}

fn flatten(prefix: Option<&str>, value: &Value, out: &mut Messages) -> Result<(), Error> {
    match value {
        Value::Mapping(mapping) => {
            for (key, child) in mapping {
                let key = scalar_text(key).ok_or_else(|| {
                    Error::InvalidResource(format!("Unsupported YAML key {key:?}"))
                })?;
                flatten(Some(&join(prefix, &key)), child, out)?;
            }
        }
        Value::Sequence(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten(Some(&join(prefix, &index.to_string())), child, out)?;
            }
        }
        Value::Tagged(tagged) => flatten(prefix, &tagged.value, out)?,
        scalar => {
            if let (Some(key), Some(text)) = (prefix, scalar_text(scalar)) {
                out.insert(key.to_string(), text);
            }
        }
    }
    Ok(())
}
