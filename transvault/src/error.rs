//! All error types for the transvault crate.
//!
//! These are returned from every fallible operation (index mutation, scanning, grid and
//! YAML encoding, storage). Nothing is retried internally.

use thiserror::Error;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("not implemented: {0}")]
    NotImplemented(String),

    #[error("invalid class: {0}")]
    InvalidClass(String),

    #[error("export error: {message}")]
    Exporter {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("import error: {message}")]
    Importer {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Creates a new exporter error with optional source error
    pub fn exporter(message: impl Into<String>, source: Option<BoxedSource>) -> Self {
        Error::Exporter {
            message: message.into(),
            source,
        }
    }

    /// Creates a new importer error with optional source error
    pub fn importer(message: impl Into<String>, source: Option<BoxedSource>) -> Self {
        Error::Importer {
            message: message.into(),
            source,
        }
    }

    pub(crate) fn missing_arguments() -> Self {
        Error::InvalidArgument("All arguments are mandatory.".to_string())
    }
}
