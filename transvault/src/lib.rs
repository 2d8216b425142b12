#![forbid(unsafe_code)]
//! Translation catalogue aggregation for multi-bundle applications.
//!
//! Scans the translation files of an application and its bundles into one in-memory
//! index, and moves that index through two exchange formats: a spreadsheet-like grid
//! (one row per resource, one column per locale) for translators, and nested YAML files
//! for the application itself.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use transvault::{
//!     DelimitedEngine, GridEngine, GridExporter, Scanner, Selection, YamlExporter,
//! };
//!
//! let mut translations = Scanner::new("/srv/app")
//!     .with_bundle("BlogBundle", "/srv/app/vendor/blog")
//!     .scan()?;
//! translations.sort();
//!
//! // Grid for translators
//! let grid = GridExporter.export(&translations, &Selection::all())?;
//! DelimitedEngine::csv().save(&grid, std::path::Path::new("translations.csv"))?;
//!
//! // YAML dump of everything
//! let yaml = YamlExporter::default().export(&translations, &Selection::all())?;
//! println!("{yaml}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Catalogue formats
//!
//! - **YAML** (`.yml`, `.yaml`): nested keys, flattened with dots
//! - **XLIFF 1.2** (`.xlf`, `.xliff`)
//! - **JSON** (`.json`): nested objects, flattened with dots
//! - **CSV** (`.csv`): `key;value` rows
//!
//! The library never logs; errors carry everything a caller needs to report.

pub mod error;
pub mod formats;
pub mod grid;
pub mod reconcile;
pub mod scanner;
pub mod storage;
pub mod traits;
pub mod translations;
pub mod types;
pub mod yaml;

// Re-export most used types for easy consumption
pub use crate::{
    error::Error,
    formats::CatalogueFormat,
    grid::{DelimitedEngine, Grid, GridEngine, GridExporter, GridImporter, RowCursor, Sheet},
    reconcile::{ImportPolicy, ImportReport, reconcile},
    scanner::{LoaderRegistry, LoaderSpec, ScanOptions, Scanner},
    storage::{DEFAULT_STORAGE_KEY, FileStorage, MemoryStorage, Storage},
    traits::{CatalogueLoader, Parser},
    translations::Translations,
    types::{
        Catalogue, FileRecord, Messages, RawData, ResourceRow, Selection, export_filename,
        timestamped_filename,
    },
    yaml::{YamlExporter, YamlFileCreator, YamlWriter, expand_to_tree},
};
