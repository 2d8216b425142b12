//! Multi-file grid imports against a running index.

use std::{error::Error as _, path::Path};

use crate::{
    error::Error,
    grid::{GridEngine, GridImporter},
    translations::Translations,
    types::Selection,
};

/// What to do when one file of a batch fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportPolicy {
    /// Stop at the first failure and return its error.
    #[default]
    Abort,
    /// Record the failure and move on to the next file.
    Continue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFailure {
    pub file: String,
    /// The error and its causes, one line.
    pub message: String,
}

/// Totals over every imported file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Files imported without error.
    pub files: usize,
    pub read_resources: usize,
    pub new_translations: usize,
    pub failures: Vec<ImportFailure>,
}

impl ImportReport {
    pub fn summary(&self) -> String {
        format!(
            "Import result: {} resources processed. {} new translations inserted.",
            self.read_resources, self.new_translations
        )
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Renders an error followed by its sources, separated by `: `.
pub fn describe_error(err: &Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Imports every file in order into `translations`, adding up the importer counters.
///
/// Only cells that are non-empty and differ from the stored text are written.
pub fn reconcile<E, P>(
    engine: &E,
    files: &[P],
    translations: &mut Translations,
    selection: &Selection,
    policy: ImportPolicy,
) -> Result<ImportReport, Error>
where
    E: GridEngine + ?Sized,
    P: AsRef<Path>,
{
    let mut report = ImportReport::default();
    let mut importer = GridImporter::new();

    for file in files {
        let path = file.as_ref();
        match importer.import_file(engine, path, translations, selection) {
            Ok(()) => {
                report.files += 1;
                report.read_resources += importer.read_resources();
                report.new_translations += importer.new_translations();
            }
            Err(err) => match policy {
                ImportPolicy::Abort => return Err(err),
                ImportPolicy::Continue => report.failures.push(ImportFailure {
                    file: path.display().to_string(),
                    message: describe_error(&err),
                }),
            },
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::DelimitedEngine;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_counters_accumulate_across_files() {
        let dir = TempDir::new().unwrap();
        let first = write(
            dir.path(),
            "first.csv",
            "Bundle,Domain,Resource,en,es\nApp,messages,a,A,A-es\n",
        );
        let second = write(
            dir.path(),
            "second.csv",
            "Bundle,Domain,Resource,en\nApp,messages,a,A\nApp,messages,b,B\n",
        );

        let mut translations = Translations::new();
        let report = reconcile(
            &DelimitedEngine::csv(),
            &[first, second],
            &mut translations,
            &Selection::all(),
            ImportPolicy::Abort,
        )
        .unwrap();

        assert_eq!(report.files, 2);
        assert_eq!(report.read_resources, 3);
        assert_eq!(report.new_translations, 3);
        assert_eq!(
            report.summary(),
            "Import result: 3 resources processed. 3 new translations inserted."
        );
    }

    #[test]
    fn test_abort_returns_first_error() {
        let dir = TempDir::new().unwrap();
        let bad = write(dir.path(), "bad.csv", "Bundle,Domain,Value,en\n");
        let good = write(dir.path(), "good.csv", "Bundle,Domain,Resource,en\nApp,m,a,A\n");

        let mut translations = Translations::new();
        let err = reconcile(
            &DelimitedEngine::csv(),
            &[bad, good],
            &mut translations,
            &Selection::all(),
            ImportPolicy::Abort,
        )
        .unwrap_err();

        assert!(matches!(err, Error::Importer { .. }));
        assert!(translations.is_empty());
    }

    #[test]
    fn test_continue_records_failures() {
        let dir = TempDir::new().unwrap();
        let good = write(dir.path(), "good.csv", "Bundle,Domain,Resource,en\nApp,m,a,A\n");
        let missing = dir.path().join("missing.csv");

        let mut translations = Translations::new();
        let report = reconcile(
            &DelimitedEngine::csv(),
            &[missing, good],
            &mut translations,
            &Selection::all(),
            ImportPolicy::Continue,
        )
        .unwrap();

        assert_eq!(report.files, 1);
        assert_eq!(report.new_translations, 1);
        assert!(!report.is_clean());
        assert!(report.failures[0].file.ends_with("missing.csv"));
        assert!(
            report.failures[0]
                .message
                .starts_with("import error: Error loading file: missing.csv: ")
        );
    }
}
