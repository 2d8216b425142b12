//! Persistence of index snapshots between runs.
//!
//! A snapshot is the JSON form of [`RawData`]: five top-level keys, `bundles`, `domains`,
//! `locales`, `files` and `messages`.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use serde_json::Value;

use crate::{error::Error, translations::Translations, types::RawData};

/// Key used when the caller does not name one.
pub const DEFAULT_STORAGE_KEY: &str = "transvault.translations";

/// Keeps index snapshots under string keys.
pub trait Storage {
    /// Stores the snapshot of `translations`, replacing any previous one.
    fn save(&mut self, translations: &Translations, key: &str) -> Result<bool, Error>;

    /// Rebuilds an index from the snapshot under `key`. A missing snapshot fails the same
    /// way an incomplete one does.
    fn load(&self, key: &str) -> Result<Translations, Error>;

    /// True when a snapshot exists under `key` and carries all five top-level keys.
    fn has_valid(&self, key: &str) -> bool;

    /// Forgets the snapshot under `key`. Resetting a missing key is not an error.
    fn reset(&mut self, key: &str) -> Result<bool, Error>;
}

fn is_valid_snapshot(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| RawData::REQUIRED_KEYS.iter().all(|key| map.contains_key(*key)))
}

fn snapshot_to_translations(value: Option<Value>) -> Result<Translations, Error> {
    let raw = match value {
        Some(value) => serde_json::from_value::<RawData>(value)?,
        None => RawData::default(),
    };
    Translations::try_from(raw)
}

/// Snapshots held in memory, for tests and one-shot tools.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: IndexMap<String, Value>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an arbitrary JSON value, valid snapshot or not.
    pub fn insert_raw(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }
}

impl Storage for MemoryStorage {
    fn save(&mut self, translations: &Translations, key: &str) -> Result<bool, Error> {
        let value = serde_json::to_value(translations.get_raw_data())?;
        self.entries.insert(key.to_string(), value);
        Ok(true)
    }

    fn load(&self, key: &str) -> Result<Translations, Error> {
        snapshot_to_translations(self.entries.get(key).cloned())
    }

    fn has_valid(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(is_valid_snapshot)
    }

    fn reset(&mut self, key: &str) -> Result<bool, Error> {
        self.entries.shift_remove(key);
        Ok(true)
    }
}

/// One pretty-printed JSON file per key inside a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStorage {
    folder: PathBuf,
}

impl FileStorage {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    /// File a key is stored in. Characters outside `[A-Za-z0-9._-]` become `_`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.folder.join(format!("{name}.json"))
    }

    fn read(&self, key: &str) -> Result<Option<Value>, Error> {
        read_json(&self.path_for(key))
    }
}

fn read_json(path: &Path) -> Result<Option<Value>, Error> {
    match File::open(path) {
        Ok(file) => Ok(Some(serde_json::from_reader(BufReader::new(file))?)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(Error::Io(err)),
    }
}

impl Storage for FileStorage {
    fn save(&mut self, translations: &Translations, key: &str) -> Result<bool, Error> {
        fs::create_dir_all(&self.folder)?;
        let mut writer = BufWriter::new(File::create(self.path_for(key))?);
        serde_json::to_writer_pretty(&mut writer, &translations.get_raw_data())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(true)
    }

    fn load(&self, key: &str) -> Result<Translations, Error> {
        snapshot_to_translations(self.read(key)?)
    }

    fn has_valid(&self, key: &str) -> bool {
        matches!(self.read(key), Ok(Some(value)) if is_valid_snapshot(&value))
    }

    fn reset(&mut self, key: &str) -> Result<bool, Error> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(true),
            Err(err) => Err(Error::Io(err)),
        }
    }
}
