//! Crate configuration
//!
//! Defaults for engine selection, output naming, and the two backends,
//! overridable through `TTS_*` environment variables. `from_env` never
//! fails: unparseable values fall back to defaults with a warning.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

use crate::core::pipeline::OutputMode;
use crate::engine::EngineKind;

/// Default cloud synthesis endpoint (any service speaking the same
/// request shape can be substituted via `TTS_CLOUD_URL`)
pub const DEFAULT_CLOUD_URL: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";

/// Default cloud request timeout in seconds
pub const DEFAULT_CLOUD_TIMEOUT_SECS: u64 = 30;

/// Default offline synthesizer binary
pub const DEFAULT_OFFLINE_BIN: &str = "espeak-ng";

/// Crate configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Engine used when a call does not pick one
    pub engine: EngineKind,
    /// Language used when a call does not pick one
    pub language: String,
    /// Output mode the CLI defaults to
    pub output_format: OutputMode,
    /// Directory for derived filenames
    pub audio_dir: PathBuf,
    /// Prefix for derived filenames
    pub filename_prefix: String,
    /// Interactive app plays audio right after saving
    pub auto_play: bool,
    /// Cloud backend settings
    pub cloud: CloudConfig,
    /// Offline backend settings
    pub offline: OfflineConfig,
}

/// Cloud backend settings
#[derive(Debug, Clone)]
pub struct CloudConfig {
    /// Synthesis endpoint URL
    pub base_url: String,
    /// API key; the cloud engine is unavailable without one
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Offline backend settings
#[derive(Debug, Clone)]
pub struct OfflineConfig {
    /// Synthesizer binary name or path
    pub binary: PathBuf,
    /// Speech rate in words per minute
    pub rate_wpm: u32,
    /// Amplitude, 0-200
    pub amplitude: u32,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CLOUD_URL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_CLOUD_TIMEOUT_SECS,
        }
    }
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_OFFLINE_BIN),
            rate_wpm: 175,
            amplitude: 100,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::Cloud,
            language: "en".to_string(),
            output_format: OutputMode::File,
            audio_dir: PathBuf::from("audio"),
            filename_prefix: "tts".to_string(),
            auto_play: false,
            cloud: CloudConfig::default(),
            offline: OfflineConfig::default(),
        }
    }
}

impl AppConfig {
    /// Create configuration builder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::new()
    }

    /// Load configuration from `TTS_*` environment variables.
    ///
    /// Unset keys keep their defaults; set-but-invalid values warn and keep
    /// the default too.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(raw) = env_value("TTS_ENGINE") {
            match EngineKind::from_str(&raw) {
                Ok(engine) => config.engine = engine,
                Err(_) => warn!("TTS_ENGINE={raw} is not a known engine, using {}", config.engine),
            }
        }
        if let Some(language) = env_value("TTS_LANGUAGE") {
            config.language = language.to_lowercase();
        }
        if let Some(raw) = env_value("TTS_OUTPUT_FORMAT") {
            match OutputMode::from_str(&raw) {
                Ok(mode) => config.output_format = mode,
                Err(_) => warn!("TTS_OUTPUT_FORMAT={raw} is not a known mode, using {}", config.output_format),
            }
        }
        if let Some(dir) = env_value("TTS_AUDIO_DIR") {
            config.audio_dir = PathBuf::from(dir);
        }
        if let Some(prefix) = env_value("TTS_FILENAME_PREFIX") {
            config.filename_prefix = prefix;
        }
        if let Some(raw) = env_value("TTS_AUTO_PLAY") {
            config.auto_play = parse_bool(&raw);
        }

        if let Some(url) = env_value("TTS_CLOUD_URL") {
            config.cloud.base_url = url;
        }
        if let Some(key) = env_value("TTS_CLOUD_API_KEY") {
            config.cloud.api_key = Some(key);
        }
        if let Some(raw) = env_value("TTS_CLOUD_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => config.cloud.timeout_secs = secs,
                _ => warn!("TTS_CLOUD_TIMEOUT_SECS={raw} is not a positive integer, using {}", config.cloud.timeout_secs),
            }
        }

        if let Some(bin) = env_value("TTS_OFFLINE_BIN") {
            config.offline.binary = PathBuf::from(bin);
        }
        if let Some(raw) = env_value("TTS_OFFLINE_RATE") {
            match raw.parse::<u32>() {
                Ok(rate) if rate > 0 => config.offline.rate_wpm = rate,
                _ => warn!("TTS_OFFLINE_RATE={raw} is not a positive integer, using {}", config.offline.rate_wpm),
            }
        }
        if let Some(raw) = env_value("TTS_OFFLINE_AMPLITUDE") {
            match raw.parse::<u32>() {
                Ok(amp) if amp <= 200 => config.offline.amplitude = amp,
                _ => warn!("TTS_OFFLINE_AMPLITUDE={raw} is not in 0-200, using {}", config.offline.amplitude),
            }
        }

        config
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool(raw: &str) -> bool {
    matches!(raw.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Configuration builder
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Create new builder with defaults
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// Set the default engine
    pub fn engine(mut self, engine: EngineKind) -> Self {
        self.config.engine = engine;
        self
    }

    /// Set the default language
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.config.language = language.into().to_lowercase();
        self
    }

    /// Set the default output mode
    pub fn output_format(mut self, mode: OutputMode) -> Self {
        self.config.output_format = mode;
        self
    }

    /// Set the derived-filename directory
    pub fn audio_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.audio_dir = dir.into();
        self
    }

    /// Set the derived-filename prefix
    pub fn filename_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.filename_prefix = prefix.into();
        self
    }

    /// Enable/disable auto-play in the interactive app
    pub fn auto_play(mut self, enable: bool) -> Self {
        self.config.auto_play = enable;
        self
    }

    /// Set the cloud endpoint URL
    pub fn cloud_url(mut self, url: impl Into<String>) -> Self {
        self.config.cloud.base_url = url.into();
        self
    }

    /// Set the cloud API key
    pub fn cloud_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.cloud.api_key = Some(key.into());
        self
    }

    /// Set the cloud request timeout
    pub fn cloud_timeout_secs(mut self, secs: u64) -> Self {
        self.config.cloud.timeout_secs = secs;
        self
    }

    /// Set the offline synthesizer binary
    pub fn offline_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.config.offline.binary = binary.into();
        self
    }

    /// Set the offline speech rate
    pub fn offline_rate(mut self, wpm: u32) -> Self {
        self.config.offline.rate_wpm = wpm;
        self
    }

    /// Set the offline amplitude
    pub fn offline_amplitude(mut self, amplitude: u32) -> Self {
        self.config.offline.amplitude = amplitude;
        self
    }

    /// Build configuration
    pub fn build(self) -> AppConfig {
        self.config
    }
}

impl Default for AppConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.engine, EngineKind::Cloud);
        assert_eq!(config.language, "en");
        assert_eq!(config.audio_dir, PathBuf::from("audio"));
        assert_eq!(config.filename_prefix, "tts");
        assert!(!config.auto_play);
        assert_eq!(config.cloud.timeout_secs, DEFAULT_CLOUD_TIMEOUT_SECS);
        assert_eq!(config.offline.binary, PathBuf::from(DEFAULT_OFFLINE_BIN));
    }

    #[test]
    fn test_builder() {
        let config = AppConfig::builder()
            .engine(EngineKind::Offline)
            .language("DE")
            .audio_dir("/tmp/voices")
            .cloud_timeout_secs(5)
            .offline_rate(150)
            .build();
        assert_eq!(config.engine, EngineKind::Offline);
        assert_eq!(config.language, "de");
        assert_eq!(config.audio_dir, PathBuf::from("/tmp/voices"));
        assert_eq!(config.cloud.timeout_secs, 5);
        assert_eq!(config.offline.rate_wpm, 150);
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("1"));
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("yes"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("nope"));
    }
}
