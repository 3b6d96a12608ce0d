//! Input validation
//!
//! Both checks run before any engine work: empty or oversize text and
//! out-of-table languages never reach a backend or the network.

use crate::engine::{languages, EngineKind};
use crate::error::{Result, TtsError};

/// Upper bound on synthesizable text, in characters
pub const MAX_TEXT_LEN: usize = 5000;

/// Trim and check text; returns the trimmed slice.
///
/// Empty (after trimming) and oversize text are validation errors.
pub fn validate_text(text: &str) -> Result<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TtsError::field_validation(
            "text",
            "text must not be empty",
        ));
    }
    let chars = trimmed.chars().count();
    if chars > MAX_TEXT_LEN {
        return Err(TtsError::field_validation(
            "text",
            format!("text is {} characters, the limit is {}", chars, MAX_TEXT_LEN),
        ));
    }
    Ok(trimmed)
}

/// Normalize a language code and check it against the engine's table.
///
/// Returns the lowercased code accepted by the adapter.
pub fn validate_language(engine: EngineKind, language: &str) -> Result<String> {
    let code = language.trim().to_lowercase();
    if code.is_empty() {
        return Err(TtsError::field_validation(
            "language",
            "language code must not be empty",
        ));
    }
    if !languages::is_supported(engine, &code) {
        return Err(TtsError::field_validation(
            "language",
            format!("language '{}' is not supported by the {} engine", code, engine),
        ));
    }
    Ok(code)
}
