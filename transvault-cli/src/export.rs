use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};
use transvault::{
    DelimitedEngine, GridEngine, GridExporter, Selection, Translations, YamlExporter,
    YamlFileCreator, timestamped_filename,
};

use crate::validation::validate_output_dir;

/// Where an export goes: an explicit file, or a timestamped name inside a folder.
#[derive(Debug, Clone, Default)]
pub struct Destination {
    pub output: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
}

impl Destination {
    pub fn resolve(&self, prefix: &str, extension: &str) -> Result<PathBuf, String> {
        if let Some(output) = &self.output {
            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                validate_output_dir(parent)?;
            }
            return Ok(output.clone());
        }
        let dir = self.out_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        validate_output_dir(&dir)?;
        Ok(dir.join(timestamped_filename(prefix, extension)))
    }
}

pub fn export_grid(
    translations: &Translations,
    selection: &Selection,
    engine: DelimitedEngine,
    destination: &Destination,
    prefix: &str,
) -> Result<PathBuf, String> {
    let grid = GridExporter
        .export(translations, selection)
        .map_err(|e| format!("Export failed: {}", e))?;
    let path = destination.resolve(prefix, engine.extension())?;

    engine
        .save(&grid, &path)
        .map_err(|e| format!("Export failed: {}", e))?;
    info!("Wrote {} grid rows to {}", grid.row_count(), path.display());
    Ok(path)
}

/// Writes the YAML dump to a file, or returns it when `destination` is `None`.
pub fn export_yaml(
    translations: &Translations,
    selection: &Selection,
    destination: Option<&Destination>,
    prefix: &str,
) -> Result<(Option<PathBuf>, String), String> {
    let text = YamlExporter::default()
        .export(translations, selection)
        .map_err(|e| format!("Export failed: {}", e))?;

    let Some(destination) = destination else {
        return Ok((None, text));
    };
    let path = destination.resolve(prefix, transvault::translations::EXPORT_EXTENSION)?;
    fs::write(&path, &text).map_err(|e| format!("Cannot write {}: {}", path.display(), e))?;
    info!("Wrote YAML export to {}", path.display());
    Ok((Some(path), text))
}

/// Outcome of writing one translation file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub key: String,
    pub path: Option<PathBuf>,
    pub result: Result<bool, String>,
}

/// Writes one YAML file per listed (bundle, domain, locale).
///
/// Files go back to the folder they were scanned from, or under `out_dir/<bundle>/`.
/// A failing file is reported and the others are still written. With `dry_run` nothing
/// is written and every result is `Ok(false)`.
pub fn save_yaml(
    translations: &Translations,
    selection: &Selection,
    out_dir: Option<&Path>,
    dry_run: bool,
) -> Vec<SavedFile> {
    let creator = YamlFileCreator;
    let mut saved = Vec::new();

    for (key, record) in translations.get_files(selection) {
        let path = match out_dir {
            Some(dir) => Some(dir.join(&record.bundle).join(&record.filename)),
            None => record.folder.as_ref().map(|_| record.path()),
        };

        let result = match &path {
            None => Err("No source folder is known for this file; use --out-dir".to_string()),
            Some(_) if dry_run => Ok(false),
            Some(path) => creator
                .create_file(
                    translations,
                    &record.bundle,
                    &record.domain,
                    &record.locale,
                    path,
                )
                .map_err(|e| e.to_string()),
        };

        match &result {
            Ok(_) => debug!("{} -> {:?}", key, path),
            Err(e) => warn!("{}: {}", key, e),
        }
        saved.push(SavedFile { key, path, result });
    }
    saved
}
