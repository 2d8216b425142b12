//! Translation file formats the scanner can load.
//!
//! Each format module exposes a `Format` implementing [`Parser`](crate::traits::Parser),
//! and [`CatalogueFormat`] maps loader names to them.

pub mod csv;
pub mod json;
pub mod xliff;
pub mod yaml;

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

pub use csv::Format as CsvFormat;
pub use json::Format as JsonFormat;
pub use xliff::Format as XliffFormat;
pub use yaml::Format as YamlFormat;

use crate::{
    Error,
    traits::{CatalogueLoader, FormatLoader},
};

/// Built-in catalogue formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogueFormat {
    Yaml,
    Xliff,
    Json,
    Csv,
}

impl CatalogueFormat {
    pub const ALL: [CatalogueFormat; 4] = [
        CatalogueFormat::Yaml,
        CatalogueFormat::Xliff,
        CatalogueFormat::Json,
        CatalogueFormat::Csv,
    ];

    /// Loader names (file extensions) registered for this format by default.
    pub fn loader_names(&self) -> &'static [&'static str] {
        match self {
            CatalogueFormat::Yaml => &["yml", "yaml"],
            CatalogueFormat::Xliff => &["xlf", "xliff"],
            CatalogueFormat::Json => &["json"],
            CatalogueFormat::Csv => &["csv"],
        }
    }

    pub fn loader(&self) -> Box<dyn CatalogueLoader> {
        match self {
            CatalogueFormat::Yaml => Box::new(FormatLoader::<YamlFormat>::new()),
            CatalogueFormat::Xliff => Box::new(FormatLoader::<XliffFormat>::new()),
            CatalogueFormat::Json => Box::new(FormatLoader::<JsonFormat>::new()),
            CatalogueFormat::Csv => Box::new(FormatLoader::<CsvFormat>::new()),
        }
    }
}

impl Display for CatalogueFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogueFormat::Yaml => write!(f, "yaml"),
            CatalogueFormat::Xliff => write!(f, "xliff"),
            CatalogueFormat::Json => write!(f, "json"),
            CatalogueFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Accepts format names and their loader names, case-insensitively.
///
/// Returns [`Error::InvalidClass`] for anything else.
///
/// # Example
/// ```rust
/// use transvault::formats::CatalogueFormat;
/// use std::str::FromStr;
/// assert_eq!(CatalogueFormat::from_str("YML").unwrap(), CatalogueFormat::Yaml);
/// assert!(CatalogueFormat::from_str("php").is_err());
/// ```
impl FromStr for CatalogueFormat {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "yaml" | "yml" => Ok(CatalogueFormat::Yaml),
            "xliff" | "xlf" => Ok(CatalogueFormat::Xliff),
            "json" => Ok(CatalogueFormat::Json),
            "csv" => Ok(CatalogueFormat::Csv),
            other => Err(Error::InvalidClass(format!(
                "Loader class {other} does not exist"
            ))),
        }
    }
}
