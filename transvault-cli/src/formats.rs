use std::{
    io::{Read, Write},
    path::Path,
};

use transvault::{DelimitedEngine, Error, Grid, GridEngine};

/// Parse a grid format name
pub fn parse_grid_format(format: &str) -> Result<DelimitedEngine, String> {
    match format.trim().to_ascii_lowercase().as_str() {
        "csv" => Ok(DelimitedEngine::csv()),
        "tsv" | "tab" => Ok(DelimitedEngine::tsv()),
        other => Err(format!(
            "Unsupported grid format: {}. Supported formats: csv, tsv",
            other
        )),
    }
}

/// Grid engine choosing CSV or TSV per file from its extension, with a fallback for
/// unknown extensions and in-memory streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByExtension {
    fallback: DelimitedEngine,
}

impl ByExtension {
    pub fn new(fallback: DelimitedEngine) -> Self {
        Self { fallback }
    }

    pub fn pick(&self, path: &Path) -> DelimitedEngine {
        DelimitedEngine::for_path(path).unwrap_or(self.fallback)
    }
}

impl GridEngine for ByExtension {
    fn extension(&self) -> &'static str {
        self.fallback.extension()
    }

    fn read_grid(&self, reader: &mut dyn Read) -> Result<Grid, Error> {
        self.fallback.read_grid(reader)
    }

    fn write_grid(&self, grid: &Grid, writer: &mut dyn Write) -> Result<(), Error> {
        self.fallback.write_grid(grid, writer)
    }

    fn open(&self, path: &Path) -> Result<Grid, Error> {
        self.pick(path).open(path)
    }

    fn save(&self, grid: &Grid, path: &Path) -> Result<(), Error> {
        self.pick(path).save(grid, path)
    }
}
