//! Discovery of translation files on disk.
//!
//! The [`Scanner`] visits the application root and every registered bundle, looks inside
//! each one's resource folder, and loads every `<domain>.<locale>.<loader>` file through
//! the loader registered for `<loader>`.

use std::{
    fmt,
    fs,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;

use crate::{
    error::Error,
    formats::CatalogueFormat,
    traits::CatalogueLoader,
    translations::Translations,
};

/// Bundle name the application root is scanned under.
pub const ROOT_BUNDLE: &str = "App";

/// Folder, relative to a bundle, holding its translation files.
pub const DEFAULT_RESOURCE_FOLDER: &str = "Resources/translations";

/// How a loader is supplied on registration.
pub enum LoaderSpec {
    /// A built-in format name, such as `yaml` or `xlf`.
    Named(String),
    /// Constructor called once, on registration.
    Factory(fn() -> Box<dyn CatalogueLoader>),
    Instance(Box<dyn CatalogueLoader>),
}

impl fmt::Debug for LoaderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderSpec::Named(name) => f.debug_tuple("Named").field(name).finish(),
            LoaderSpec::Factory(_) => f.write_str("Factory"),
            LoaderSpec::Instance(_) => f.write_str("Instance"),
        }
    }
}

/// Loader name → loader. Every entry is resolved when it is registered.
pub struct LoaderRegistry {
    loaders: IndexMap<String, Box<dyn CatalogueLoader>>,
}

impl LoaderRegistry {
    /// A registry with no loader at all.
    pub fn empty() -> Self {
        Self {
            loaders: IndexMap::new(),
        }
    }

    /// A registry with every [`CatalogueFormat`] under its default names.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for format in CatalogueFormat::ALL {
            for name in format.loader_names() {
                registry.loaders.insert(name.to_string(), format.loader());
            }
        }
        registry
    }

    /// Registers (or replaces) the loader used for files ending in `.<name>`.
    pub fn register(&mut self, name: &str, spec: LoaderSpec) -> Result<&mut Self, Error> {
        let loader = match spec {
            LoaderSpec::Named(class) if class.is_empty() => None,
            LoaderSpec::Named(class) => Some(class.parse::<CatalogueFormat>()?.loader()),
            LoaderSpec::Factory(factory) => Some(factory()),
            LoaderSpec::Instance(loader) => Some(loader),
        };

        match loader {
            Some(loader) if !name.is_empty() => {
                self.loaders.insert(name.to_string(), loader);
                Ok(self)
            }
            _ => Err(Error::InvalidArgument(
                "Invalid argument. Required [name, loader]".to_string(),
            )),
        }
    }

    pub fn get(&self, name: &str) -> Result<&dyn CatalogueLoader, Error> {
        if name.is_empty() {
            return Err(Error::InvalidArgument(
                "Invalid argument. Required [loader]".to_string(),
            ));
        }
        self.loaders
            .get(name)
            .map(|loader| loader.as_ref())
            .ok_or_else(|| Error::NotImplemented(format!("Loader {name} not implemented!")))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.loaders.keys().map(String::as_str)
    }
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.loaders.keys()).finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Resource folder, relative to each bundle path.
    pub resource_folder: PathBuf,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            resource_folder: PathBuf::from(DEFAULT_RESOURCE_FOLDER),
        }
    }
}

/// A named location whose resource folder holds translation files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleLocation {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug)]
pub struct Scanner {
    root: PathBuf,
    bundles: Vec<BundleLocation>,
    options: ScanOptions,
    loaders: LoaderRegistry,
}

impl Scanner {
    /// Scanner for an application rooted at `root`, with the built-in loaders.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            bundles: Vec::new(),
            options: ScanOptions::default(),
            loaders: LoaderRegistry::new(),
        }
    }

    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_loaders(mut self, loaders: LoaderRegistry) -> Self {
        self.loaders = loaders;
        self
    }

    pub fn with_bundle(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.bundles.push(BundleLocation {
            name: name.into(),
            path: path.into(),
        });
        self
    }

    pub fn bundles(&self) -> &[BundleLocation] {
        &self.bundles
    }

    pub fn add_file_loader(&mut self, name: &str, spec: LoaderSpec) -> Result<&mut Self, Error> {
        self.loaders.register(name, spec)?;
        Ok(self)
    }

    pub fn get_file_loader(&self, name: &str) -> Result<&dyn CatalogueLoader, Error> {
        self.loaders.get(name)
    }

    /// Scans the root under [`ROOT_BUNDLE`], then every bundle in registration order.
    ///
    /// Later bundles win when the same translation is defined twice.
    pub fn scan(&self) -> Result<Translations, Error> {
        let mut translations = Translations::new();
        translations.merge(&self.scan_bundle(ROOT_BUNDLE, &self.root)?)?;
        for bundle in &self.bundles {
            translations.merge(&self.scan_bundle(&bundle.name, &bundle.path)?)?;
        }
        Ok(translations)
    }

    /// Loads every regular file directly inside the bundle's resource folder, in file name
    /// order. A bundle without that folder contributes nothing.
    pub fn scan_bundle(&self, bundle: &str, path: &Path) -> Result<Translations, Error> {
        let mut translations = Translations::new();

        let folder = path.join(&self.options.resource_folder);
        if !folder.is_dir() {
            return Ok(translations);
        }
        let folder = fs::canonicalize(&folder)?;

        let mut names = fs::read_dir(&folder)?
            .map(|entry| entry.map(|e| e.file_name()))
            .collect::<Result<Vec<_>, _>>()?;
        names.sort();

        for name in names {
            let Some(name) = name.to_str() else {
                continue;
            };
            if folder.join(name).is_file() {
                translations.merge(&self.scan_file(bundle, &folder, name)?)?;
            }
        }
        Ok(translations)
    }

    /// Loads one `<domain>.<locale>.<loader>` file. Names with a missing or empty segment
    /// are not translation files and yield an empty index.
    pub fn scan_file(
        &self,
        bundle: &str,
        folder: &Path,
        file_name: &str,
    ) -> Result<Translations, Error> {
        let mut translations = Translations::new();

        let mut segments = file_name.split('.');
        let (Some(domain), Some(locale), Some(loader)) =
            (segments.next(), segments.next(), segments.next())
        else {
            return Ok(translations);
        };
        if domain.is_empty() || locale.is_empty() || loader.is_empty() {
            return Ok(translations);
        }

        let catalogue = self
            .get_file_loader(loader)?
            .load(&folder.join(file_name), locale, domain)?;
        translations.add_catalogue(bundle, &folder.to_string_lossy(), &catalogue)?;
        Ok(translations)
    }
}
