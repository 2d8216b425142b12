//! CLI library for testing purposes

pub mod config;
pub mod export;
pub mod formats;
pub mod import;
pub mod logging;
pub mod path_glob;
pub mod store;
pub mod validation;

pub use config::{Config, Overrides, Settings};
pub use formats::{ByExtension, parse_grid_format};
