//! Cloud engine adapter
//!
//! Speaks the `text:synthesize` JSON shape: the request carries the text,
//! a region-qualified language code, and the MP3 encoding choice; the
//! response carries base64 audio. Endpoint, API key, and timeout come from
//! `CloudConfig`, so any service with the same shape can be substituted.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::Engine as _;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::audio::AudioResult;
use crate::config::CloudConfig;
use crate::engine::{languages, AudioFormat, EngineKind, SpeechEngine};
use crate::error::{Result, TtsError};

/// Remote synthesis service adapter
pub struct CloudEngine {
    config: CloudConfig,
    client: Client,
}

/// Request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesisBody {
    input: TextInput,
    voice: VoiceSelection,
    audio_config: AudioConfigBody,
}

#[derive(Debug, Serialize)]
struct TextInput {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection {
    language_code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfigBody {
    audio_encoding: &'static str,
}

/// Response body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesisReply {
    audio_content: String,
}

/// Expand a bare ISO-639-1 code to the region-qualified form the service
/// expects. Unlisted codes double up (`nl` to `nl-NL`), which matches most
/// of the remaining table.
fn region_code(language: &str) -> String {
    match language {
        "ar" => "ar-XA".to_string(),
        "cs" => "cs-CZ".to_string(),
        "da" => "da-DK".to_string(),
        "el" => "el-GR".to_string(),
        "en" => "en-US".to_string(),
        "he" => "he-IL".to_string(),
        "hi" => "hi-IN".to_string(),
        "ja" => "ja-JP".to_string(),
        "ko" => "ko-KR".to_string(),
        "nb" => "nb-NO".to_string(),
        "pt" => "pt-BR".to_string(),
        "sv" => "sv-SE".to_string(),
        "uk" => "uk-UA".to_string(),
        "vi" => "vi-VN".to_string(),
        "zh" => "cmn-CN".to_string(),
        other => format!("{}-{}", other, other.to_uppercase()),
    }
}

/// Pull the human-readable message out of a `{"error": {"message": ...}}`
/// failure body; fall back to the raw text when the body is not that shape.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("message")?
                .as_str()
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| body.trim().to_string())
}

impl CloudEngine {
    /// Create the adapter; builds the HTTP client with the configured
    /// timeout and headers. A missing API key is not an error here, it
    /// just leaves the engine unavailable.
    pub fn new(config: CloudConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key).map_err(|_| {
                TtsError::config("cloud API key contains characters not allowed in a header")
            })?;
            headers.insert("X-Goog-Api-Key", value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| TtsError::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl SpeechEngine for CloudEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Cloud
    }

    fn supported_languages(&self) -> &'static [&'static str] {
        languages::CLOUD_LANGUAGES
    }

    async fn synthesize(&self, text: &str, language: &str) -> Result<AudioResult> {
        if self.config.api_key.is_none() {
            return Err(TtsError::unavailable(
                "cloud",
                "no API key configured, set TTS_CLOUD_API_KEY",
            ));
        }
        let start = Instant::now();

        let body = SynthesisBody {
            input: TextInput {
                text: text.to_string(),
            },
            voice: VoiceSelection {
                language_code: region_code(language),
            },
            audio_config: AudioConfigBody {
                audio_encoding: "MP3",
            },
        };

        // timeout / connect failures map to EngineNotAvailable via From
        let response = self
            .client
            .post(&self.config.base_url)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(TtsError::synthesis(format!(
                "cloud service error ({}): {}",
                status,
                error_detail(&detail)
            )));
        }

        let reply: SynthesisReply = response
            .json()
            .await
            .map_err(|e| TtsError::synthesis("failed to parse cloud response").with_source(e))?;

        let audio = base64::engine::general_purpose::STANDARD
            .decode(reply.audio_content.as_bytes())
            .map_err(|e| {
                TtsError::synthesis("cloud response carried undecodable audio").with_source(e)
            })?;
        if audio.is_empty() {
            return Err(TtsError::synthesis("cloud service returned empty audio"));
        }

        debug!(
            "cloud synthesis: {} chars -> {} bytes in {:?}",
            text.chars().count(),
            audio.len(),
            start.elapsed()
        );
        Ok(AudioResult::new(audio, AudioFormat::Mp3, EngineKind::Cloud))
    }

    async fn is_available(&self) -> bool {
        if self.config.api_key.is_none() {
            debug!("cloud engine unavailable: no API key configured");
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyless_config() -> CloudConfig {
        CloudConfig {
            api_key: None,
            ..CloudConfig::default()
        }
    }

    #[test]
    fn test_region_code_mapping() {
        assert_eq!(region_code("en"), "en-US");
        assert_eq!(region_code("pt"), "pt-BR");
        assert_eq!(region_code("zh"), "cmn-CN");
        assert_eq!(region_code("nl"), "nl-NL");
        assert_eq!(region_code("pl"), "pl-PL");
    }

    #[test]
    fn test_kind_and_format() {
        let engine = CloudEngine::new(keyless_config()).unwrap();
        assert_eq!(engine.kind(), EngineKind::Cloud);
        assert_eq!(engine.audio_format(), AudioFormat::Mp3);
    }

    #[test]
    fn test_error_detail_extraction() {
        let body = r#"{"error": {"code": 403, "message": "API key expired"}}"#;
        assert_eq!(error_detail(body), "API key expired");
        assert_eq!(error_detail("plain text failure\n"), "plain text failure");
        assert_eq!(error_detail("{\"ok\":true}"), "{\"ok\":true}");
    }

    #[tokio::test]
    async fn test_no_key_means_unavailable() {
        let engine = CloudEngine::new(keyless_config()).unwrap();
        assert!(!engine.is_available().await);

        // rejected before any request goes out
        let err = engine.synthesize("hello", "en").await.unwrap_err();
        assert!(err.is_engine_unavailable());
    }

    #[tokio::test]
    async fn test_key_makes_probe_pass() {
        let config = CloudConfig {
            api_key: Some("test-key".to_string()),
            ..CloudConfig::default()
        };
        let engine = CloudEngine::new(config).unwrap();
        assert!(engine.is_available().await);
    }
}
