//! Multi-text batch conversion
//!
//! One timestamp is captured per run and every member name carries a
//! 1-based zero-padded index, so a batch never collides with itself even
//! when two items land in the same second. Items run sequentially in
//! caller order.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::audio::output;
use crate::config::AppConfig;
use crate::core::convert::{block_on, ConversionRequest, Converter};
use crate::core::validate::validate_language;
use crate::engine::EngineKind;
use crate::error::{Result, TtsError};

/// Outcome of a best-effort batch run
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Written files with their input indices, in input order
    pub completed: Vec<(usize, PathBuf)>,
    /// Failed items with their input indices, in input order
    pub failed: Vec<(usize, String)>,
    /// Wall-clock time for the whole run in milliseconds
    pub elapsed_ms: u64,
}

impl BatchReport {
    /// Fraction of items that produced a file; an empty run counts as 1.0
    pub fn success_rate(&self) -> f64 {
        let total = self.completed.len() + self.failed.len();
        if total == 0 {
            1.0
        } else {
            self.completed.len() as f64 / total as f64
        }
    }

    /// True when no item failed
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Written paths without their indices
    pub fn paths(&self) -> Vec<PathBuf> {
        self.completed.iter().map(|(_, path)| path.clone()).collect()
    }
}

/// Convert several texts into one directory and return the written paths.
///
/// Sequential and fail-fast: the first failure aborts the run with the
/// item tagged in the error, and files already written stay on disk. The
/// returned paths follow input order. For partial-failure tolerance build
/// a [`BatchRunner`] and opt into best-effort.
pub fn batch_tts<S: AsRef<str>>(
    texts: &[S],
    engine: EngineKind,
    language: &str,
    output_dir: impl Into<PathBuf>,
) -> Result<Vec<PathBuf>> {
    let runner = BatchRunner::new(engine, language)?.with_output_dir(output_dir);
    Ok(runner.run(texts)?.paths())
}

/// Options builder over the sequential batch loop
#[derive(Debug, Clone)]
pub struct BatchRunner {
    engine: EngineKind,
    language: String,
    output_dir: PathBuf,
    prefix: String,
    best_effort: bool,
    converter: Converter,
}

impl BatchRunner {
    /// Runner bound to one engine and language, taking everything else
    /// from the ambient environment configuration
    pub fn new(engine: EngineKind, language: &str) -> Result<Self> {
        Self::with_config(engine, language, &AppConfig::from_env())
    }

    /// Runner with explicit configuration
    pub fn with_config(engine: EngineKind, language: &str, config: &AppConfig) -> Result<Self> {
        let converter = Converter::from_config(config)?;
        Self::with_converter(engine, language, config, converter)
    }

    /// Like [`BatchRunner::with_config`] but over caller-supplied adapters
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
            output_dir: config.audio_dir.clone(),
            prefix: config.filename_prefix.clone(),
            best_effort: false,
            converter,
        })
    }

    /// Write files somewhere other than the configured audio directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Filename prefix for batch members
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Keep going after a failed item and report it instead of aborting
    pub fn with_best_effort(mut self, enabled: bool) -> Self {
        self.best_effort = enabled;
        self
    }

    /// Convert every text in order.
    ///
    /// Fail-fast (the default): the first error aborts the run and names
    /// the failing item. Best-effort: every item runs and the report
    /// lists failures alongside the written files.
    pub async fn run_async<S: AsRef<str>>(&self, texts: &[S]) -> Result<BatchReport> {
        let start = Instant::now();
        let mut report = BatchReport::default();
        if texts.is_empty() {
            return Ok(report);
        }

        output::ensure_dir(&self.output_dir)?;
        let stamp = output::timestamp();
        info!(
            "batch of {} texts via {} ({})",
            texts.len(),
            self.engine,
            self.language
        );

        for (index, text) in texts.iter().enumerate() {
            match self.run_item(index, &stamp, text.as_ref()).await {
                Ok(path) => report.completed.push((index, path)),
                Err(err) if self.best_effort => {
                    warn!("batch item {} failed: {}", index + 1, err);
                    report.failed.push((index, err.to_string()));
                }
                Err(err) => return Err(tag_item(index, err)),
            }
        }

        report.elapsed_ms = start.elapsed().as_millis() as u64;
        debug!(
            "batch done: {} written, {} failed, {}ms",
            report.completed.len(),
            report.failed.len(),
            report.elapsed_ms
        );
        Ok(report)
    }

    /// Blocking wrapper around [`BatchRunner::run_async`]
    pub fn run<S: AsRef<str>>(&self, texts: &[S]) -> Result<BatchReport> {
        block_on(self.run_async(texts))
    }

    async fn run_item(&self, index: usize, stamp: &str, text: &str) -> Result<PathBuf> {
        let request = ConversionRequest::new(text, self.engine, self.language.clone());
        let audio = self.converter.convert_async(&request).await?;
        let name = output::batch_member_name(&self.prefix, stamp, index, audio.format());
        audio.save(self.output_dir.join(name))
    }
}

/// Rewrite an error message to name the failing batch item (1-based),
/// keeping its kind so callers can still classify it.
fn tag_item(index: usize, err: TtsError) -> TtsError {
    let tag = format!("batch item {}", index + 1);
    match err {
        TtsError::Validation { message, field } => TtsError::Validation {
            message: format!("{}: {}", tag, message),
            field,
        },
        TtsError::EngineNotAvailable { engine, reason } => TtsError::EngineNotAvailable {
            engine,
            reason: format!("{}: {}", tag, reason),
        },
        TtsError::Synthesis { message, source } => TtsError::Synthesis {
            message: format!("{}: {}", tag, message),
            source,
        },
        TtsError::Io {
            message,
            path,
            source,
        } => TtsError::Io {
            message: format!("{}: {}", tag, message),
            path,
            source,
        },
        TtsError::Playback { message, source } => TtsError::Playback {
            message: format!("{}: {}", tag, message),
            source,
        },
        TtsError::Config { message } => TtsError::Config {
            message: format!("{}: {}", tag, message),
        },
    }
}
