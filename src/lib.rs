//! # voxpipe - Composable Text-to-Speech Pipelines
//!
//! A convenience layer over two speech backends: a local synthesizer
//! producing WAV and a cloud service producing MP3, behind one validated
//! request shape with composable binders, reusable pipelines, and batch
//! conversion.
//!
//! ## Features
//!
//! - **Two engines, one API**: offline (WAV from a local synthesizer
//!   subprocess) and cloud (MP3 from an HTTP service)
//! - **Validation first**: empty or oversize text and unsupported
//!   languages are rejected before any engine is touched
//! - **Combinators**: `compose` plus `with_engine`/`with_language`
//!   binders over a shared request template, order-independent
//! - **Pipelines**: bind engine and language once, then produce bytes,
//!   an in-memory reader, or timestamped files
//! - **Batch**: sequential fail-fast conversion of many texts with
//!   collision-free member names; best-effort as an opt-in
//! - **Playback**: blocking audio output from file or memory
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use voxpipe::{create_tts_pipeline, EngineKind};
//!
//! // Bind engine and language once; the pair is validated here
//! let pipeline = create_tts_pipeline(EngineKind::Offline, "en")?;
//!
//! // Synthesize to a timestamped file under the audio directory
//! let path = pipeline.save("Hello, world!", None)?;
//!
//! // Or keep the audio in memory
//! let audio = pipeline.synthesize("Hello again")?;
//! ```
//!
//! ## Binders
//!
//! ```rust,ignore
//! use voxpipe::{synth_fn, with_engine, with_language, EngineKind, RequestTemplate};
//!
//! // Binder application order does not matter
//! let speak = with_language("de")(with_engine(EngineKind::Cloud)(synth_fn()));
//! let audio = speak("Guten Tag", RequestTemplate::new())?;
//! ```
//!
//! ## Batch
//!
//! ```rust,ignore
//! use voxpipe::{batch_tts, EngineKind};
//!
//! let texts = ["one", "two", "three"];
//! let paths = batch_tts(&texts, EngineKind::Offline, "en", "out")?;
//! ```

pub mod audio;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;

// Re-exports for convenience
pub use audio::{playback, AudioResult};
pub use config::{AppConfig, AppConfigBuilder, CloudConfig, OfflineConfig};
// self:: keeps the module from colliding with the `core` crate
pub use self::core::{
    batch_tts, compose, convert, convert_async, create_tts_pipeline, identity, synth_fn,
    text_to_speech, validate_language, validate_text, with_engine, with_language, BatchReport,
    BatchRunner, ConversionRequest, Converter, OutputMode, Pipeline, PipelineOutput,
    RequestTemplate, SynthFn, MAX_TEXT_LEN,
};
pub use engine::{
    availability_report, engine_for, AudioFormat, CloudEngine, EngineKind, OfflineEngine,
    SpeechEngine,
};
pub use error::{Result, TtsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
