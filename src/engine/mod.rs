//! Engine adapters
//!
//! One trait over the two synthesis backends:
//! - **offline** drives a local synthesizer process and produces WAV
//! - **cloud** calls a remote synthesis API and produces MP3
//!
//! Engine and format selection are closed enums; each adapter publishes
//! the language table it accepts. Adapters never validate text or
//! language themselves, the conversion core does that before dispatch.

pub mod cloud;
pub mod languages;
pub mod offline;

pub use cloud::CloudEngine;
pub use offline::OfflineEngine;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::audio::AudioResult;
use crate::config::AppConfig;
use crate::error::{Result, TtsError};

/// Engine selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Local synthesizer process, WAV output
    Offline,
    /// Remote synthesis API, MP3 output
    Cloud,
}

impl EngineKind {
    /// Both selectors, in display order
    pub const ALL: [EngineKind; 2] = [EngineKind::Offline, EngineKind::Cloud];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offline => "offline",
            Self::Cloud => "cloud",
        }
    }

    /// Container format this engine produces
    pub fn audio_format(&self) -> AudioFormat {
        match self {
            Self::Offline => AudioFormat::Wav,
            Self::Cloud => AudioFormat::Mp3,
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineKind {
    type Err = TtsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "offline" => Ok(Self::Offline),
            "cloud" => Ok(Self::Cloud),
            other => Err(TtsError::field_validation(
                "engine",
                format!("unknown engine '{}', expected 'offline' or 'cloud'", other),
            )),
        }
    }
}

/// Audio container format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Wav,
    Mp3,
}

impl AudioFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
        }
    }

    /// MIME type
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
        }
    }

    /// Best-effort container detection from leading bytes.
    ///
    /// Recognizes the RIFF/WAVE header, an ID3 tag, and a bare MPEG frame
    /// sync; anything else is `None`.
    pub fn sniff(bytes: &[u8]) -> Option<AudioFormat> {
        if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE" {
            return Some(AudioFormat::Wav);
        }
        if bytes.len() >= 3 && &bytes[0..3] == b"ID3" {
            return Some(AudioFormat::Mp3);
        }
        if bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] & 0xE0 == 0xE0 {
            return Some(AudioFormat::Mp3);
        }
        None
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Uniform interface over the synthesis backends.
///
/// Implementations receive pre-validated input: non-empty trimmed text
/// and a language from their own table.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Selector this adapter serves
    fn kind(&self) -> EngineKind;

    /// Container format of produced audio
    fn audio_format(&self) -> AudioFormat {
        self.kind().audio_format()
    }

    /// Language codes this adapter accepts
    fn supported_languages(&self) -> &'static [&'static str];

    /// Synthesize `text` in `language`, returning encoded audio
    async fn synthesize(&self, text: &str, language: &str) -> Result<AudioResult>;

    /// Probe whether the backend can serve requests right now
    async fn is_available(&self) -> bool;
}

/// Build the adapter for a selector from configuration
pub fn engine_for(kind: EngineKind, config: &AppConfig) -> Result<Arc<dyn SpeechEngine>> {
    match kind {
        EngineKind::Offline => Ok(Arc::new(OfflineEngine::new(config.offline.clone()))),
        EngineKind::Cloud => Ok(Arc::new(CloudEngine::new(config.cloud.clone())?)),
    }
}

/// Availability of each engine under the given configuration
pub async fn availability_report(config: &AppConfig) -> Vec<(EngineKind, bool)> {
    let mut report = Vec::with_capacity(EngineKind::ALL.len());
    for kind in EngineKind::ALL {
        let available = match engine_for(kind, config) {
            Ok(engine) => engine.is_available().await,
            Err(_) => false,
        };
        report.push((kind, available));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_kind_round_trip() {
        for kind in EngineKind::ALL {
            assert_eq!(EngineKind::from_str(kind.as_str()).unwrap(), kind);
        }
        assert_eq!(EngineKind::from_str("Cloud").unwrap(), EngineKind::Cloud);
        assert_eq!(EngineKind::from_str(" OFFLINE ").unwrap(), EngineKind::Offline);
    }

    #[test]
    fn test_unknown_engine_is_validation_error() {
        let err = EngineKind::from_str("gpt").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_format_per_engine() {
        assert_eq!(EngineKind::Offline.audio_format(), AudioFormat::Wav);
        assert_eq!(EngineKind::Cloud.audio_format(), AudioFormat::Mp3);
    }

    #[test]
    fn test_sniff_wav() {
        let mut header = Vec::new();
        header.extend_from_slice(b"RIFF");
        header.extend_from_slice(&36u32.to_le_bytes());
        header.extend_from_slice(b"WAVE");
        assert_eq!(AudioFormat::sniff(&header), Some(AudioFormat::Wav));
    }

    #[test]
    fn test_sniff_mp3() {
        assert_eq!(AudioFormat::sniff(b"ID3\x04\x00"), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::sniff(&[0xFF, 0xFB, 0x90, 0x00]), Some(AudioFormat::Mp3));
    }

    #[test]
    fn test_sniff_unknown() {
        assert_eq!(AudioFormat::sniff(b"OggS"), None);
        assert_eq!(AudioFormat::sniff(b""), None);
    }
}
