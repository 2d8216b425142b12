//! JSON translation files (`messages.en.json`).
//!
//! Objects nest the same way YAML mappings do and are flattened to dot-joined keys.
//! Writing produces a flat, pretty-printed object.

use std::io::{BufRead, Write};

use serde_json::Value;

use crate::{error::Error, traits::Parser, types::Messages};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Format {
    pub messages: Messages,
}

impl Parser for Format {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let value: Value = serde_json::from_reader(reader)?;
        let Value::Object(_) = value else {
            return Err(Error::InvalidResource(
                "JSON translation file must contain an object".to_string(),
            ));
        };
        let mut messages = Messages::new();
        flatten(None, &value, &mut messages);
        Ok(Format { messages })
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        serde_json::to_writer_pretty(&mut writer, &self.messages)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

impl From<Format> for Messages {
    fn from(value: Format) -> Self {
        value.messages
    }
}

fn flatten(prefix: Option<&str>, value: &Value, out: &mut Messages) {
    let join = |key: &str| match prefix {
        Some(prefix) => format!("{prefix}.{key}"),
        None => key.to_string(),
    };

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten(Some(&join(key)), child, out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten(Some(&join(&index.to_string())), child, out);
            }
        }
        scalar => {
            if let Some(key) = prefix {
                let text = match scalar {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                out.insert(key.to_string(), text);
            }
        }
    }
}
