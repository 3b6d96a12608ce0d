//! Offline engine adapter
//!
//! Drives a local `espeak-ng` style synthesizer as a child process: text
//! goes in on stdin, a WAV container comes back on stdout. The backend is
//! not safe for simultaneous use, so every synthesis in the process takes
//! the same lock.

use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::debug;

use crate::audio::AudioResult;
use crate::config::OfflineConfig;
use crate::engine::{languages, AudioFormat, EngineKind, SpeechEngine};
use crate::error::{Result, TtsError};

/// At most one in-flight offline synthesis process-wide
static SYNTH_LOCK: Mutex<()> = Mutex::const_new(());

/// Local subprocess-backed synthesizer
pub struct OfflineEngine {
    config: OfflineConfig,
}

impl OfflineEngine {
    /// Create the adapter with the given backend settings
    pub fn new(config: OfflineConfig) -> Self {
        Self { config }
    }
}

/// Arguments for one synthesis invocation; text is piped on stdin
fn speak_args(config: &OfflineConfig, language: &str) -> Vec<String> {
    vec![
        "-v".to_string(),
        language.to_string(),
        "-s".to_string(),
        config.rate_wpm.to_string(),
        "-a".to_string(),
        config.amplitude.to_string(),
        "--stdout".to_string(),
    ]
}

#[async_trait]
impl SpeechEngine for OfflineEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Offline
    }

    fn supported_languages(&self) -> &'static [&'static str] {
        languages::OFFLINE_LANGUAGES
    }

    async fn synthesize(&self, text: &str, language: &str) -> Result<AudioResult> {
        let _guard = SYNTH_LOCK.lock().await;
        let start = Instant::now();

        let mut child = Command::new(&self.config.binary)
            .args(speak_args(&self.config, language))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    TtsError::unavailable(
                        "offline",
                        format!(
                            "synthesizer binary '{}' not found, install espeak-ng or set TTS_OFFLINE_BIN",
                            self.config.binary.display()
                        ),
                    )
                } else {
                    TtsError::synthesis("failed to start offline synthesizer").with_source(e)
                }
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .map_err(|e| TtsError::synthesis("failed to send text to synthesizer").with_source(e))?;
            stdin
                .write_all(b"\n")
                .await
                .map_err(|e| TtsError::synthesis("failed to send text to synthesizer").with_source(e))?;
            // closing stdin lets the process finish
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| TtsError::synthesis("offline synthesizer did not finish").with_source(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TtsError::synthesis(format!(
                "offline synthesizer exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        if output.stdout.is_empty() {
            return Err(TtsError::synthesis("offline synthesizer produced no audio"));
        }

        debug!(
            "offline synthesis: {} chars -> {} bytes in {:?}",
            text.chars().count(),
            output.stdout.len(),
            start.elapsed()
        );
        Ok(AudioResult::new(
            output.stdout,
            AudioFormat::Wav,
            EngineKind::Offline,
        ))
    }

    async fn is_available(&self) -> bool {
        let probe = Command::new(&self.config.binary)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;
        match probe {
            Ok(status) if status.success() => true,
            Ok(status) => {
                debug!("offline probe: {} exited with {}", self.config.binary.display(), status);
                false
            }
            Err(e) => {
                debug!("offline probe: cannot run {}: {}", self.config.binary.display(), e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn missing_binary_config() -> OfflineConfig {
        OfflineConfig {
            binary: PathBuf::from("/definitely/not/an/installed/synthesizer"),
            rate_wpm: 175,
            amplitude: 100,
        }
    }

    #[test]
    fn test_speak_args_shape() {
        let config = OfflineConfig {
            binary: PathBuf::from("espeak-ng"),
            rate_wpm: 150,
            amplitude: 80,
        };
        let args = speak_args(&config, "de");
        assert_eq!(args, ["-v", "de", "-s", "150", "-a", "80", "--stdout"]);
    }

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let engine = OfflineEngine::new(missing_binary_config());
        let err = engine.synthesize("hello", "en").await.unwrap_err();
        assert!(err.is_engine_unavailable());
    }

    #[tokio::test]
    async fn test_missing_binary_probe_is_false() {
        let engine = OfflineEngine::new(missing_binary_config());
        assert!(!engine.is_available().await);
    }

    #[test]
    fn test_kind_and_format() {
        let engine = OfflineEngine::new(OfflineConfig::default());
        assert_eq!(engine.kind(), EngineKind::Offline);
        assert_eq!(engine.audio_format(), AudioFormat::Wav);
    }
}
