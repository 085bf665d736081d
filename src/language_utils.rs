use anyhow::{Result, anyhow};
use isolang::Language;

// @module: ISO language code handling
// Backend language codes are ISO 639-1 (2-letter) or ISO 639-3 (3-letter).

/// Resolve a language code to its ISO language
fn lookup(code: &str) -> Option<Language> {
    let normalized_code = code.trim().to_lowercase();
    match normalized_code.len() {
        2 => Language::from_639_1(&normalized_code),
        3 => Language::from_639_3(&normalized_code),
        _ => None,
    }
}

/// Validate that a code is a known ISO 639-1 or ISO 639-3 language code
pub fn validate_language_code(code: &str) -> Result<()> {
    lookup(code)
        .map(|_| ())
        .ok_or_else(|| anyhow!("Invalid language code: {:?}", code))
}

/// Validate a source language code, where an empty code or `auto` means auto-detection
pub fn validate_source_language(code: &str) -> Result<()> {
    if is_auto_detect(code) {
        return Ok(());
    }
    validate_language_code(code)
}

/// Whether a source language code asks the backend to detect the language
pub fn is_auto_detect(code: &str) -> bool {
    let code = code.trim();
    code.is_empty() || code.eq_ignore_ascii_case("auto")
}

/// Get the English name of a language code
pub fn get_language_name(code: &str) -> Result<String> {
    lookup(code)
        .map(|lang| lang.to_name().to_string())
        .ok_or_else(|| anyhow!("Invalid language code: {:?}", code))
}
