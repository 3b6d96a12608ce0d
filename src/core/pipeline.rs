//! Configuration-bound pipelines
//!
//! `create_tts_pipeline` binds an engine and language once; the returned
//! `Pipeline` is immutable, cheap to clone, and safe to share. Each call
//! picks an output shape: raw audio, an in-memory reader, or a written
//! file with a derived or explicit path.

use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use bytes::Bytes;

use crate::audio::{output, AudioResult};
use crate::config::AppConfig;
use crate::core::convert::{block_on, ConversionRequest, Converter};
use crate::core::validate::validate_language;
use crate::engine::{AudioFormat, EngineKind};
use crate::error::{Result, TtsError};

/// How a pipeline call returns its audio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// The encoded audio value itself
    Bytes,
    /// An in-memory reader over the encoded audio (the `bytesio` mode)
    Buffer,
    /// A file on disk; path explicit or derived
    File,
}

impl OutputMode {
    /// Wire name as accepted by the CLI and configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bytes => "bytes",
            Self::Buffer => "bytesio",
            Self::File => "file",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputMode {
    type Err = TtsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "bytes" => Ok(Self::Bytes),
            "bytesio" | "buffer" => Ok(Self::Buffer),
            "file" => Ok(Self::File),
            other => Err(TtsError::field_validation(
                "format",
                format!("unknown output format '{}', expected bytes, bytesio, or file", other),
            )),
        }
    }
}

/// Result of one pipeline call
#[derive(Debug)]
pub enum PipelineOutput {
    Bytes(AudioResult),
    Buffer(Cursor<Bytes>),
    File(PathBuf),
}

impl PipelineOutput {
    /// Written path, when this was a file-mode call
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            _ => None,
        }
    }
}

/// A reusable conversion bound to one engine and language.
///
/// Holds no mutable state; concurrent callers may share one value. The
/// offline backend still serializes underneath.
#[derive(Debug, Clone)]
pub struct Pipeline {
    engine: EngineKind,
    language: String,
    audio_dir: PathBuf,
    filename_prefix: String,
    converter: Converter,
}

/// Bind engine and language into a reusable pipeline, taking everything
/// else from the ambient environment configuration.
///
/// The language is checked against the engine's table here, so a bad pair
/// fails at construction rather than on first use.
pub fn create_tts_pipeline(engine: EngineKind, language: &str) -> Result<Pipeline> {
    Pipeline::new(engine, language, &AppConfig::from_env())
}

impl Pipeline {
    /// Bind engine and language with explicit configuration
    pub fn new(engine: EngineKind, language: &str, config: &AppConfig) -> Result<Self> {
        let converter = Converter::from_config(config)?;
        Self::with_converter(engine, language, config, converter)
    }

    /// Like [`Pipeline::new`] but over caller-supplied adapters
    pub fn with_converter(
        engine: EngineKind,
        language: &str,
        config: &AppConfig,
        converter: Converter,
    ) -> Result<Self> {
        let language = validate_language(engine, language)?;
        Ok(Self {
            engine,
            language,
            audio_dir: config.audio_dir.clone(),
            filename_prefix: config.filename_prefix.clone(),
            converter,
        })
    }

    /// Engine this pipeline is bound to
    pub fn engine(&self) -> EngineKind {
        self.engine
    }

    /// Language this pipeline is bound to
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Synthesize and hand back the audio value
    pub async fn synthesize_async(&self, text: &str) -> Result<AudioResult> {
        let request = ConversionRequest::new(text, self.engine, self.language.clone());
        self.converter.convert_async(&request).await
    }

    /// Blocking wrapper around [`Pipeline::synthesize_async`]
    pub fn synthesize(&self, text: &str) -> Result<AudioResult> {
        block_on(self.synthesize_async(text))
    }

    /// Synthesize to a file.
    ///
    /// Without a destination the path is derived:
    /// `<audio_dir>/<prefix>_<timestamp>.<ext>`. Either way the extension
    /// is corrected to the engine's format and parent directories are
    /// created. Returns the path actually written.
    pub async fn save_async(&self, text: &str, destination: Option<&Path>) -> Result<PathBuf> {
        let audio = self.synthesize_async(text).await?;
        let path = match destination {
            Some(path) => path.to_path_buf(),
            None => self.derived_path(audio.format()),
        };
        audio.save(path)
    }

    /// Blocking wrapper around [`Pipeline::save_async`]
    pub fn save(&self, text: &str, destination: Option<&Path>) -> Result<PathBuf> {
        block_on(self.save_async(text, destination))
    }

    /// One conversion; `mode` decides the returned shape. `destination`
    /// only applies to file mode.
    pub async fn run_async(
        &self,
        text: &str,
        mode: OutputMode,
        destination: Option<&Path>,
    ) -> Result<PipelineOutput> {
        match mode {
            OutputMode::Bytes => Ok(PipelineOutput::Bytes(self.synthesize_async(text).await?)),
            OutputMode::Buffer => {
                Ok(PipelineOutput::Buffer(self.synthesize_async(text).await?.into_reader()))
            }
            OutputMode::File => Ok(PipelineOutput::File(self.save_async(text, destination).await?)),
        }
    }

    /// Blocking wrapper around [`Pipeline::run_async`]
    pub fn run(
        &self,
        text: &str,
        mode: OutputMode,
        destination: Option<&Path>,
    ) -> Result<PipelineOutput> {
        block_on(self.run_async(text, mode, destination))
    }

    fn derived_path(&self, format: AudioFormat) -> PathBuf {
        self.audio_dir
            .join(output::timestamp_name(&self.filename_prefix, format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{languages, SpeechEngine};
    use async_trait::async_trait;
    use std::io::Read;
    use std::sync::Arc;

    struct StubEngine {
        kind: EngineKind,
    }

    #[async_trait]
    impl SpeechEngine for StubEngine {
        fn kind(&self) -> EngineKind {
            self.kind
        }

        fn supported_languages(&self) -> &'static [&'static str] {
            languages::supported(self.kind)
        }

        async fn synthesize(&self, _text: &str, _language: &str) -> Result<AudioResult> {
            Ok(AudioResult::new(
                b"RIFF0000WAVEfake".to_vec(),
                self.kind.audio_format(),
                self.kind,
            ))
        }

        async fn is_available(&self) -> bool {
            true
        }
    }

    fn stub_converter() -> Converter {
        Converter::new(
            Arc::new(StubEngine {
                kind: EngineKind::Offline,
            }),
            Arc::new(StubEngine {
                kind: EngineKind::Cloud,
            }),
        )
    }

    fn test_pipeline(engine: EngineKind, language: &str, audio_dir: &Path) -> Result<Pipeline> {
        let config = AppConfig::builder().audio_dir(audio_dir).build();
        Pipeline::with_converter(engine, language, &config, stub_converter())
    }

    #[test]
    fn test_bad_language_fails_at_construction() {
        let dir = tempfile::tempdir().unwrap();
        let err = test_pipeline(EngineKind::Offline, "xx-not-real", dir.path()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_bytes_mode() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = test_pipeline(EngineKind::Offline, "en", dir.path()).unwrap();
        match pipeline.run("Hello", OutputMode::Bytes, None).unwrap() {
            PipelineOutput::Bytes(audio) => {
                assert!(!audio.is_empty());
                assert_eq!(audio.format(), AudioFormat::Wav);
            }
            other => panic!("unexpected output: {:?}", other),
        }
    }

    #[test]
    fn test_buffer_mode_reads_back_payload() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = test_pipeline(EngineKind::Cloud, "en", dir.path()).unwrap();
        match pipeline.run("Hello", OutputMode::Buffer, None).unwrap() {
            PipelineOutput::Buffer(mut reader) => {
                let mut payload = Vec::new();
                reader.read_to_end(&mut payload).unwrap();
                assert_eq!(payload, b"RIFF0000WAVEfake");
            }
            other => panic!("unexpected output: {:?}", other),
        }
    }

    #[test]
    fn test_file_mode_with_explicit_destination() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = test_pipeline(EngineKind::Offline, "en", dir.path()).unwrap();
        let destination = dir.path().join("nested").join("speech.mp3");

        let written = pipeline
            .save("Hello", Some(destination.as_path()))
            .unwrap();
        // extension corrected to the engine's container
        assert_eq!(written.extension().unwrap(), "wav");
        assert!(written.exists());
    }

    #[test]
    fn test_file_mode_derives_timestamp_name() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = test_pipeline(EngineKind::Offline, "en", dir.path()).unwrap();

        let written = pipeline.save("Hello", None).unwrap();
        assert!(written.starts_with(dir.path()));
        let name = written.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("tts_"));
        assert!(name.ends_with(".wav"));
    }

    #[test]
    fn test_pipeline_is_reusable() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = test_pipeline(EngineKind::Offline, "en", dir.path()).unwrap();

        let first = pipeline.save("one", Some(&dir.path().join("a.wav"))).unwrap();
        let second = pipeline.save("two", Some(&dir.path().join("b.wav"))).unwrap();
        assert_ne!(first, second);
        assert!(first.exists());
        assert!(second.exists());
    }

    #[test]
    fn test_output_mode_parsing() {
        assert_eq!(OutputMode::from_str("bytes").unwrap(), OutputMode::Bytes);
        assert_eq!(OutputMode::from_str("bytesio").unwrap(), OutputMode::Buffer);
        assert_eq!(OutputMode::from_str("buffer").unwrap(), OutputMode::Buffer);
        assert_eq!(OutputMode::from_str("FILE").unwrap(), OutputMode::File);
        assert!(OutputMode::from_str("tape").is_err());
    }
}
