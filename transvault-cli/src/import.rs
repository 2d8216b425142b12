use std::path::PathBuf;

use tracing::{info, warn};
use transvault::{
    GridEngine, ImportPolicy, ImportReport, Selection, Translations,
    reconcile::{describe_error, reconcile},
};

use crate::path_glob::expand_input_globs;

/// Expands `inputs` and imports every grid into `translations`.
///
/// With [`ImportPolicy::Abort`] the first failing file stops the import and its message is
/// returned; `translations` must then be discarded by the caller.
pub fn import_grids<E: GridEngine + ?Sized>(
    engine: &E,
    inputs: &[String],
    translations: &mut Translations,
    selection: &Selection,
    policy: ImportPolicy,
) -> Result<ImportReport, String> {
    if inputs.is_empty() {
        return Err("At least one input file is required.".to_string());
    }
    let files: Vec<PathBuf> = expand_input_globs(inputs)?;
    info!("Importing {} grid files", files.len());

    let report = reconcile(engine, &files, translations, selection, policy)
        .map_err(|e| describe_error(&e))?;
    if !report.is_clean() {
        warn!("{} of {} files failed", report.failures.len(), report.files);
    }
    Ok(report)
}
