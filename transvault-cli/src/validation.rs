use std::path::Path;
use unic_langid::LanguageIdentifier;

/// Validate output directory exists or can be created
pub fn validate_output_dir(path: &Path) -> Result<(), String> {
    if path.exists() && !path.is_dir() {
        return Err(format!("Output path is not a directory: {}", path.display()));
    }
    std::fs::create_dir_all(path)
        .map_err(|e| format!("Cannot create output directory: {}", e))
}

/// Validate locale code format using unic-langid.
///
/// Both `en-US` and `en_US` spellings are accepted.
pub fn validate_locale(locale: &str) -> Result<(), String> {
    if locale.is_empty() {
        return Err("Locale cannot be empty".to_string());
    }

    match locale.parse::<LanguageIdentifier>() {
        Ok(lang_id) if !lang_id.language.is_empty() => Ok(()),
        _ => Err(format!(
            "Invalid locale format: {}. Expected valid BCP 47 language identifier",
            locale
        )),
    }
}

/// Validate every locale of a filter list
pub fn validate_locales(locales: &[String]) -> Result<(), String> {
    for locale in locales {
        validate_locale(locale).map_err(|e| format!("Locale validation failed: {}", e))?;
    }
    Ok(())
}

/// Validate a bundle, domain or export prefix name
pub fn validate_name(kind: &str, name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err(format!("{} cannot be empty", kind));
    }
    if name.contains(['/', '\\', '|']) {
        return Err(format!("{} contains an invalid character: {}", kind, name));
    }
    Ok(())
}
