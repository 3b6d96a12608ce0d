//! Conversion core: validation, dispatch, combinators, pipelines, batch
//!
//! # Modules
//!
//! - `validate`: text and language checks applied before any engine runs
//! - `convert`: `ConversionRequest` → `AudioResult` dispatch over the adapters
//! - `combinators`: `compose`, `identity`, and the engine/language binders
//! - `pipeline`: configuration-bound reusable conversion with output modes
//! - `batch`: fail-fast batch driver with a best-effort opt-in

pub mod batch;
pub mod combinators;
pub mod convert;
pub mod pipeline;
pub mod validate;

pub use batch::{batch_tts, BatchReport, BatchRunner};
pub use combinators::{compose, identity, synth_fn, with_engine, with_language, RequestTemplate, SynthFn};
pub use convert::{convert, convert_async, text_to_speech, ConversionRequest, Converter};
pub use pipeline::{create_tts_pipeline, OutputMode, Pipeline, PipelineOutput};
pub use validate::{validate_language, validate_text, MAX_TEXT_LEN};
