//! Tabular grid exchange: one row per (bundle, domain, resource), one column per locale.
//!
//! Row 1 is always `Bundle, Domain, Resource, <locale1>, ..., <localeN>`. Data rows follow
//! until the first row whose three key cells are blank. The sheet itself comes from a
//! [`GridEngine`]; [`DelimitedEngine`] reads and writes CSV/TSV files.

use std::{
    fs::File,
    io::{BufWriter, Read, Write},
    path::Path,
};

use crate::{
    error::Error,
    translations::Translations,
    types::Selection,
};

/// Leading header cells of every grid.
pub const FIXED_HEADER: [&str; 3] = ["Bundle", "Domain", "Resource"];

const BUNDLE_COL: usize = 0;
const DOMAIN_COL: usize = 1;
const RESOURCE_COL: usize = 2;

/// Read/write access to a rectangular sheet of text cells, addressed from `(0, 0)`.
///
/// Cells outside the written area read as blank.
pub trait Sheet {
    fn cell(&self, row: usize, col: usize) -> &str;

    fn set_cell(&mut self, row: usize, col: usize, value: &str);
}

/// In-memory sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl Sheet for Grid {
    fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    fn set_cell(&mut self, row: usize, col: usize, value: &str) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize(col + 1, String::new());
        }
        cells[col] = value.to_string();
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Cursor over the data rows of a sheet, starting below the header.
///
/// The data ends at the first row whose bundle, domain and resource cells are all blank;
/// there is no row count.
pub struct RowCursor<'a, S: ?Sized> {
    sheet: &'a S,
    row: usize,
}

impl<'a, S: Sheet + ?Sized> RowCursor<'a, S> {
    pub fn new(sheet: &'a S) -> Self {
        Self { sheet, row: 1 }
    }

    /// False once the cursor sits on the terminating all-blank key row.
    pub fn has_next(&self) -> bool {
        [BUNDLE_COL, DOMAIN_COL, RESOURCE_COL]
            .iter()
            .any(|&col| !is_blank(self.sheet.cell(self.row, col)))
    }

    /// Returns the current row index and moves on, or `None` at the end of the data.
    pub fn advance(&mut self) -> Option<usize> {
        if !self.has_next() {
            return None;
        }
        let row = self.row;
        self.row += 1;
        Some(row)
    }
}

/// Reads row 1 up to its first blank cell and checks it starts with [`FIXED_HEADER`] plus
/// at least one locale column.
pub fn read_header<S: Sheet + ?Sized>(sheet: &S) -> Result<Vec<String>, Error> {
    let headers: Vec<String> = (0..)
        .map(move |col| sheet.cell(0, col))
        .take_while(|value| !is_blank(value))
        .map(str::to_string)
        .collect();

    let valid = headers.len() > FIXED_HEADER.len()
        && FIXED_HEADER
            .iter()
            .zip(&headers)
            .all(|(expected, found)| expected == found);

    if !valid {
        return Err(Error::importer(
            "The header of the grid file is invalid",
            None,
        ));
    }
    Ok(headers)
}

/// Builds grids out of an index.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridExporter;

impl GridExporter {
    /// Header plus one row per selected (bundle, domain, resource); cells of missing
    /// translations are left blank.
    pub fn export(&self, translations: &Translations, selection: &Selection) -> Result<Grid, Error> {
        let selection = selection.resolve(translations);
        let mut grid = Grid::new();

        let mut header: Vec<String> = FIXED_HEADER.iter().map(|h| h.to_string()).collect();
        header.extend(selection.locales.iter().cloned());
        grid.push_row(header);

        for bundle in &selection.bundles {
            for domain in &selection.domains {
                for resource in translations.get_resources(bundle, domain, None)? {
                    let mut row = vec![bundle.clone(), domain.clone(), resource.clone()];
                    for locale in &selection.locales {
                        let text = translations.get_translation(bundle, domain, locale, &resource)?;
                        row.push(text.unwrap_or_default().to_string());
                    }
                    grid.push_row(row);
                }
            }
        }

        Ok(grid)
    }
}

/// Reads grids back into an index, writing only new or changed translations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridImporter {
    read_resources: usize,
    new_translations: usize,
}

impl GridImporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Data rows with a full (bundle, domain, resource) key seen by the last import.
    pub fn read_resources(&self) -> usize {
        self.read_resources
    }

    /// Translations written by the last import.
    pub fn new_translations(&self) -> usize {
        self.new_translations
    }

    /// Imports one sheet into `translations`.
    ///
    /// Rows with a partially blank key are skipped. A cell is written when its bundle,
    /// domain and locale pass `selection`, it is not empty, and it differs from the value
    /// already stored.
    pub fn import<S: Sheet + ?Sized>(
        &mut self,
        sheet: &S,
        translations: &mut Translations,
        selection: &Selection,
    ) -> Result<(), Error> {
        self.read_resources = 0;
        self.new_translations = 0;

        let headers = read_header(sheet)?;
        self.import_rows(sheet, &headers, translations, selection)
    }

    /// Opens `path` with `engine` and imports its first sheet.
    pub fn import_file<E: GridEngine + ?Sized>(
        &mut self,
        engine: &E,
        path: &Path,
        translations: &mut Translations,
        selection: &Selection,
    ) -> Result<(), Error> {
        self.read_resources = 0;
        self.new_translations = 0;

        let grid = engine.open(path)?;
        let headers = read_header(&grid).map_err(|err| {
            Error::importer(
                format!("Invalid grid file {}", display_name(path)),
                Some(Box::new(err)),
            )
        })?;
        self.import_rows(&grid, &headers, translations, selection)
    }

    fn import_rows<S: Sheet + ?Sized>(
        &mut self,
        sheet: &S,
        headers: &[String],
        translations: &mut Translations,
        selection: &Selection,
    ) -> Result<(), Error> {
        let mut cursor = RowCursor::new(sheet);
        while let Some(row) = cursor.advance() {
            let bundle = sheet.cell(row, BUNDLE_COL);
            let domain = sheet.cell(row, DOMAIN_COL);
            let resource = sheet.cell(row, RESOURCE_COL);
            if is_blank(bundle) || is_blank(domain) || is_blank(resource) {
                continue;
            }

            self.read_resources += 1;
            if !selection.accepts_bundle(bundle) || !selection.accepts_domain(domain) {
                continue;
            }

            for (col, locale) in headers.iter().enumerate().skip(FIXED_HEADER.len()) {
                if !selection.accepts_locale(locale) {
                    continue;
                }

                let value = sheet.cell(row, col);
                if value.is_empty() {
                    continue;
                }
                let current = translations.get_translation(bundle, domain, locale, resource)?;
                if current != Some(value) {
                    translations.add_translation(bundle, domain, locale, resource, value)?;
                    self.new_translations += 1;
                }
            }
        }
        Ok(())
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// A spreadsheet engine able to persist grids.
pub trait GridEngine {
    /// Extension of the files this engine writes, without the dot.
    fn extension(&self) -> &'static str;

    fn read_grid(&self, reader: &mut dyn Read) -> Result<Grid, Error>;

    fn write_grid(&self, grid: &Grid, writer: &mut dyn Write) -> Result<(), Error>;

    /// Loads a grid file. Failures are reported as [`Error::Importer`].
    fn open(&self, path: &Path) -> Result<Grid, Error> {
        let name = display_name(path);
        let mut file = File::open(path).map_err(|err| {
            Error::importer(format!("Error loading file: {name}"), Some(Box::new(err)))
        })?;
        self.read_grid(&mut file).map_err(|err| {
            Error::importer(format!("Corrupted grid file: {name}"), Some(Box::new(err)))
        })
    }

    /// Writes a grid file. Failures are reported as [`Error::Exporter`].
    fn save(&self, grid: &Grid, path: &Path) -> Result<(), Error> {
        let name = display_name(path);
        let file = File::create(path).map_err(|err| {
            Error::exporter(format!("Can't create the grid file {name}"), Some(Box::new(err)))
        })?;
        let mut writer = BufWriter::new(file);
        self.write_grid(grid, &mut writer)
            .and_then(|()| writer.flush().map_err(Error::Io))
            .map_err(|err| {
                Error::exporter(format!("Can't write the grid file {name}"), Some(Box::new(err)))
            })
    }
}

/// CSV or TSV sheets through the `csv` crate.
///
/// Input is decoded BOM-aware, so UTF-16 text exported by spreadsheet tools loads too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimitedEngine {
    delimiter: u8,
    extension: &'static str,
}

impl DelimitedEngine {
    pub fn csv() -> Self {
        Self {
            delimiter: b',',
            extension: "csv",
        }
    }

    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            extension: "tsv",
        }
    }

    /// Picks the engine matching a file extension (`csv`, `tsv`, `tab`, `txt`).
    pub fn for_path(path: &Path) -> Option<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") => Some(Self::csv()),
            Some("tsv" | "tab" | "txt") => Some(Self::tsv()),
            _ => None,
        }
    }
}

impl Default for DelimitedEngine {
    fn default() -> Self {
        Self::csv()
    }
}

impl GridEngine for DelimitedEngine {
    fn extension(&self) -> &'static str {
        self.extension
    }

    fn read_grid(&self, reader: &mut dyn Read) -> Result<Grid, Error> {
        let decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .strip_bom(true)
            .build(reader);

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(decoder);

        let mut grid = Grid::new();
        for record in rdr.records() {
            let record = record?;
            grid.push_row(record.iter().map(str::to_string).collect());
        }
        Ok(grid)
    }

    fn write_grid(&self, grid: &Grid, writer: &mut dyn Write) -> Result<(), Error> {
        let mut wtr = csv::WriterBuilder::new()
            .flexible(true)
            .delimiter(self.delimiter)
            .from_writer(writer);
        for row in grid.rows() {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
