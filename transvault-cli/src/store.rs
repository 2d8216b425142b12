use tracing::{debug, info};
use transvault::{Storage, Translations};

use crate::config::Settings;

/// Scans every configured location into a sorted index.
pub fn scan(settings: &Settings) -> Result<Translations, String> {
    debug!(
        "Scanning root={} bundles={}",
        settings.root.display(),
        settings.bundles.len()
    );
    let mut translations = settings
        .scanner()
        .scan()
        .map_err(|e| format!("Scan failed: {}", e))?;
    translations.sort();
    info!("Scanned {} translations", translations.len());
    Ok(translations)
}

/// The stored index when there is a valid one, a fresh scan (saved) otherwise.
pub fn current(settings: &Settings) -> Result<Translations, String> {
    load_or_scan(settings, true)
}

/// Like [`current`], but a fresh scan is only saved when `persist` is set.
pub fn load_or_scan(settings: &Settings, persist: bool) -> Result<Translations, String> {
    let (storage, key) = settings.storage();
    if storage.has_valid(&key) {
        debug!("Loading stored translations from {}", settings.store.display());
        return storage
            .load(&key)
            .map_err(|e| format!("Cannot load {}: {}", settings.store.display(), e));
    }

    info!("No valid store at {}, scanning", settings.store.display());
    let translations = scan(settings)?;
    if persist {
        save(settings, &translations)?;
    }
    Ok(translations)
}

pub fn save(settings: &Settings, translations: &Translations) -> Result<(), String> {
    let (mut storage, key) = settings.storage();
    storage
        .save(translations, &key)
        .map_err(|e| format!("Cannot save {}: {}", settings.store.display(), e))?;
    debug!("Saved translations to {}", settings.store.display());
    Ok(())
}

pub fn reset(settings: &Settings) -> Result<(), String> {
    let (mut storage, key) = settings.storage();
    storage
        .reset(&key)
        .map_err(|e| format!("Cannot reset {}: {}", settings.store.display(), e))?;
    Ok(())
}

/// One-line overview of an index.
pub fn describe(translations: &Translations) -> String {
    format!(
        "{} translations in {} bundles, {} domains, {} locales",
        translations.len(),
        translations.get_bundles().len(),
        translations.get_domains(None).len(),
        translations.get_locales(None, None).len()
    )
}
