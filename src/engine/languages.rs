//! Per-engine language tables
//!
//! Closed ISO-639-1 tables, one per backend. Kept sorted so lookup is a
//! binary search and the mismatch between the two engines' coverage stays
//! visible in one place.

use crate::engine::EngineKind;

/// Languages the offline synthesizer ships voices for
pub const OFFLINE_LANGUAGES: &[&str] = &[
    "af", "bg", "bs", "cs", "cy", "da", "de", "el", "en", "eo", "es", "et", "fi", "fr", "ga",
    "hi", "hr", "hu", "hy", "id", "is", "it", "ja", "ka", "ko", "la", "lt", "lv", "mk", "ms",
    "nl", "no", "pl", "pt", "ro", "ru", "sk", "sl", "sq", "sr", "sv", "sw", "ta", "tr", "uk",
    "vi", "zh",
];

/// Languages the cloud service accepts
pub const CLOUD_LANGUAGES: &[&str] = &[
    "ar", "bg", "ca", "cs", "da", "de", "el", "en", "es", "fi", "fr", "gu", "he", "hi", "hu",
    "id", "it", "ja", "kn", "ko", "lt", "lv", "ml", "mr", "ms", "nb", "nl", "pa", "pl", "pt",
    "ro", "ru", "sk", "sr", "sv", "ta", "te", "th", "tr", "uk", "vi", "zh",
];

/// Language table for an engine
pub fn supported(kind: EngineKind) -> &'static [&'static str] {
    match kind {
        EngineKind::Offline => OFFLINE_LANGUAGES,
        EngineKind::Cloud => CLOUD_LANGUAGES,
    }
}

/// Whether `code` (already normalized to lowercase) is in the engine's table
pub fn is_supported(kind: EngineKind, code: &str) -> bool {
    supported(kind).binary_search(&code).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_sorted() {
        // binary_search depends on it
        for table in [OFFLINE_LANGUAGES, CLOUD_LANGUAGES] {
            let mut sorted = table.to_vec();
            sorted.sort_unstable();
            assert_eq!(table, sorted.as_slice());
        }
    }

    #[test]
    fn test_english_everywhere() {
        assert!(is_supported(EngineKind::Offline, "en"));
        assert!(is_supported(EngineKind::Cloud, "en"));
    }

    #[test]
    fn test_coverage_differs() {
        // esperanto only offline, thai only cloud
        assert!(is_supported(EngineKind::Offline, "eo"));
        assert!(!is_supported(EngineKind::Cloud, "eo"));
        assert!(is_supported(EngineKind::Cloud, "th"));
        assert!(!is_supported(EngineKind::Offline, "th"));
    }

    #[test]
    fn test_unknown_rejected() {
        assert!(!is_supported(EngineKind::Offline, "xx"));
        assert!(!is_supported(EngineKind::Cloud, "xx"));
        assert!(!is_supported(EngineKind::Cloud, ""));
    }
}
