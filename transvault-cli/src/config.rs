//! `transvault.toml` handling.
//!
//! ```toml
//! root = "."
//! resource_folder = "Resources/translations"
//! store = ".transvault/translations.json"
//! export_prefix = "transvault"
//!
//! [[bundles]]
//! name = "BlogBundle"
//! path = "vendor/acme/blog-bundle"
//! ```
//!
//! Relative paths are resolved against the folder holding the file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use transvault::{FileStorage, ScanOptions, Scanner, scanner::DEFAULT_RESOURCE_FOLDER};

pub const CONFIG_FILE_NAME: &str = "transvault.toml";
pub const DEFAULT_STORE: &str = ".transvault/translations.json";
pub const DEFAULT_EXPORT_PREFIX: &str = "transvault";

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub root: Option<PathBuf>,
    pub resource_folder: Option<PathBuf>,
    pub store: Option<PathBuf>,
    pub export_prefix: Option<String>,
    pub bundles: Vec<BundleConfig>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BundleConfig {
    pub name: String,
    pub path: PathBuf,
}

impl Config {
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Invalid configuration: {}", e))
    }

    /// Reads a config file, resolving its relative paths against the file's folder.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
        let config = Self::parse(&content)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(config.relative_to(base))
    }

    /// `transvault.toml` inside `dir`, if there is one.
    pub fn discover(dir: &Path) -> Result<Option<Self>, String> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path).map(Some)
        } else {
            Ok(None)
        }
    }

    fn relative_to(mut self, base: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_absolute() { p } else { base.join(p) };
        self.root = Some(resolve(self.root.unwrap_or_else(|| PathBuf::from("."))));
        self.store = self.store.map(resolve);
        for bundle in &mut self.bundles {
            bundle.path = resolve(std::mem::take(&mut bundle.path));
        }
        self
    }
}

/// Command line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub root: Option<PathBuf>,
    pub resource_folder: Option<PathBuf>,
    pub store: Option<PathBuf>,
    pub export_prefix: Option<String>,
    /// `NAME=PATH` pairs, added after the configured bundles.
    pub bundles: Vec<String>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub root: PathBuf,
    pub resource_folder: PathBuf,
    pub store: PathBuf,
    pub export_prefix: String,
    pub bundles: Vec<BundleConfig>,
}

impl Settings {
    pub fn resolve(config: Config, overrides: Overrides) -> Result<Self, String> {
        let mut bundles = config.bundles;
        for spec in &overrides.bundles {
            bundles.push(parse_bundle_spec(spec)?);
        }

        let root = overrides
            .root
            .or(config.root)
            .unwrap_or_else(|| PathBuf::from("."));
        let store = overrides
            .store
            .or(config.store)
            .unwrap_or_else(|| root.join(DEFAULT_STORE));

        Ok(Settings {
            resource_folder: overrides
                .resource_folder
                .or(config.resource_folder)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RESOURCE_FOLDER)),
            export_prefix: overrides
                .export_prefix
                .or(config.export_prefix)
                .unwrap_or_else(|| DEFAULT_EXPORT_PREFIX.to_string()),
            root,
            store,
            bundles,
        })
    }

    pub fn scanner(&self) -> Scanner {
        self.bundles.iter().fold(
            Scanner::new(&self.root).with_options(ScanOptions {
                resource_folder: self.resource_folder.clone(),
            }),
            |scanner, bundle| scanner.with_bundle(&bundle.name, &bundle.path),
        )
    }

    /// File storage rooted at the store file's folder; the key is the file stem.
    pub fn storage(&self) -> (FileStorage, String) {
        let folder = self
            .store
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let key = self
            .store
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| transvault::DEFAULT_STORAGE_KEY.to_string());
        (FileStorage::new(folder), key)
    }
}

/// Parses `NAME=PATH`.
pub fn parse_bundle_spec(spec: &str) -> Result<BundleConfig, String> {
    match spec.split_once('=') {
        Some((name, path)) if !name.trim().is_empty() && !path.trim().is_empty() => {
            Ok(BundleConfig {
                name: name.trim().to_string(),
                path: PathBuf::from(path.trim()),
            })
        }
        _ => Err(format!(
            "Invalid bundle '{}'. Expected NAME=PATH",
            spec
        )),
    }
}
