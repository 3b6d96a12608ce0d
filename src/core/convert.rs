//! Conversion core
//!
//! `Converter` owns one adapter per engine and is the only place that
//! invokes them. Every request passes text and language validation first;
//! an invalid CLOUD language never causes a network call.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use crate::audio::AudioResult;
use crate::config::AppConfig;
use crate::core::combinators::RequestTemplate;
use crate::core::validate::{validate_language, validate_text};
use crate::engine::{engine_for, EngineKind, SpeechEngine};
use crate::error::{Result, TtsError};

/// One unit of work for the conversion core
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub text: String,
    pub engine: EngineKind,
    pub language: String,
}

impl ConversionRequest {
    pub fn new(text: impl Into<String>, engine: EngineKind, language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            engine,
            language: language.into(),
        }
    }
}

/// Dispatcher holding one adapter per engine.
///
/// `from_config` wires the real backends; `new` accepts any adapters,
/// which is how tests run hermetically.
#[derive(Clone)]
pub struct Converter {
    offline: Arc<dyn SpeechEngine>,
    cloud: Arc<dyn SpeechEngine>,
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter").finish_non_exhaustive()
    }
}

impl Converter {
    /// Build from explicit adapters
    pub fn new(offline: Arc<dyn SpeechEngine>, cloud: Arc<dyn SpeechEngine>) -> Self {
        Self { offline, cloud }
    }

    /// Build the real adapters from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            offline: engine_for(EngineKind::Offline, config)?,
            cloud: engine_for(EngineKind::Cloud, config)?,
        })
    }

    /// Build the real adapters from `TTS_*` environment configuration
    pub fn from_env() -> Result<Self> {
        Self::from_config(&AppConfig::from_env())
    }

    /// Adapter serving a selector
    pub fn engine(&self, kind: EngineKind) -> &Arc<dyn SpeechEngine> {
        match kind {
            EngineKind::Offline => &self.offline,
            EngineKind::Cloud => &self.cloud,
        }
    }

    /// Validate the request, then dispatch to the selected adapter
    pub async fn convert_async(&self, request: &ConversionRequest) -> Result<AudioResult> {
        let text = validate_text(&request.text)?;
        let language = validate_language(request.engine, &request.language)?;

        debug!(
            "converting {} chars via {} ({})",
            text.chars().count(),
            request.engine,
            language
        );
        let audio = self.engine(request.engine).synthesize(text, &language).await?;
        if audio.is_empty() {
            return Err(TtsError::synthesis(format!(
                "{} engine returned an empty buffer",
                request.engine
            )));
        }
        Ok(audio)
    }

    /// Blocking wrapper around [`Converter::convert_async`]
    pub fn convert(&self, request: &ConversionRequest) -> Result<AudioResult> {
        block_on(self.convert_async(request))
    }
}

/// Run a conversion future to completion from sync code.
///
/// Inside a Tokio runtime the current worker is parked with
/// `block_in_place`; otherwise a throwaway runtime drives the future.
pub(crate) fn block_on<T>(future: impl Future<Output = Result<T>>) -> Result<T> {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => tokio::task::block_in_place(|| handle.block_on(future)),
        Err(_) => {
            let runtime = tokio::runtime::Runtime::new()
                .map_err(|e| TtsError::synthesis("failed to start async runtime").with_source(e))?;
            runtime.block_on(future)
        }
    }
}

/// Convert with adapters built from the ambient environment configuration
pub fn convert(request: &ConversionRequest) -> Result<AudioResult> {
    Converter::from_env()?.convert(request)
}

/// Async variant of [`convert`]
pub async fn convert_async(request: &ConversionRequest) -> Result<AudioResult> {
    Converter::from_env()?.convert_async(request).await
}

/// Synthesis entry in the combinator shape: unset template fields fall
/// back to the configured defaults.
pub fn text_to_speech(text: &str, template: RequestTemplate) -> Result<AudioResult> {
    let config = AppConfig::from_env();
    let request = template.into_request(text, &config);
    Converter::from_config(&config)?.convert(&request)
}
