//! CSV translation files (`messages.en.csv`).
//!
//! One `key;value` pair per row. Rows starting with `#` are comments, and a row with a
//! single field maps the key to an empty text.
use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::{error::Error, traits::Parser, types::Messages};

const DELIMITER: u8 = b';';

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct CSVRecord {
    pub key: String,
    pub value: String,
}

/// A CSV catalogue, rows in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Format {
    pub records: Vec<CSVRecord>,
}

impl Parser for Format {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .delimiter(DELIMITER)
            .from_reader(reader);
        let mut records = Vec::new();
        for result in rdr.records() {
            let row = result?;
            let Some(key) = row.get(0).filter(|k| !k.is_empty()) else {
                continue;
            };
            records.push(CSVRecord {
                key: key.to_string(),
                value: row.get(1).unwrap_or_default().to_string(),
            });
        }
        Ok(Format { records })
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .delimiter(DELIMITER)
            .from_writer(writer);
        for record in &self.records {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl From<Format> for Messages {
    fn from(value: Format) -> Self {
        value
            .records
            .into_iter()
            .map(|record| (record.key, record.value))
            .collect()
    }
}

impl From<&Messages> for Format {
    fn from(value: &Messages) -> Self {
        Format {
            records: value
                .iter()
                .map(|(key, value)| CSVRecord {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect(),
        }
    }
}
