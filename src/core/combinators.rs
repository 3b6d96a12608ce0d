//! Function combinators
//!
//! `compose`/`compose!` chain unary functions right to left, with
//! [`identity`] as the empty chain. `with_engine` and `with_language`
//! pre-bind one field of a synthesis call each; because they touch
//! disjoint fields, binding order never matters.

use std::sync::Arc;

use crate::audio::AudioResult;
use crate::config::AppConfig;
use crate::core::convert::{text_to_speech, ConversionRequest};
use crate::engine::EngineKind;
use crate::error::Result;

/// Compose two unary functions; the right one runs first:
/// `compose(f, g)(x) == f(g(x))`.
pub fn compose<A, B, C, F, G>(outer: F, inner: G) -> impl Fn(A) -> C
where
    F: Fn(B) -> C,
    G: Fn(A) -> B,
{
    move |x| outer(inner(x))
}

/// The identity function; composing zero functions yields this
pub fn identity<T>(x: T) -> T {
    x
}

/// Variadic right-to-left composition.
///
/// `compose!(f, g, h)(x)` is `f(g(h(x)))`; `compose!()` is [`identity`].
/// Errors from any stage surface at call time, unchanged.
#[macro_export]
macro_rules! compose {
    () => {
        $crate::core::combinators::identity
    };
    ($f:expr $(,)?) => {
        $f
    };
    ($f:expr, $($rest:expr),+ $(,)?) => {
        $crate::core::combinators::compose($f, $crate::compose!($($rest),+))
    };
}

/// Partially-configured synthesis call.
///
/// Fields still unset when the call happens fall back to the configured
/// defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestTemplate {
    pub engine: Option<EngineKind>,
    pub language: Option<String>,
}

impl RequestTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve unset fields against defaults into a dispatchable request
    pub fn into_request(self, text: &str, config: &AppConfig) -> ConversionRequest {
        ConversionRequest {
            text: text.to_string(),
            engine: self.engine.unwrap_or(config.engine),
            language: self.language.unwrap_or_else(|| config.language.clone()),
        }
    }
}

/// Shareable synthesis function the binders operate on
pub type SynthFn = Arc<dyn Fn(&str, RequestTemplate) -> Result<AudioResult> + Send + Sync>;

/// The base synthesis function in binder shape, backed by the ambient
/// environment configuration
pub fn synth_fn() -> SynthFn {
    Arc::new(|text, template| text_to_speech(text, template))
}

/// Pre-bind the engine of a synthesis function.
///
/// The bound value wins over whatever the eventual caller put in the
/// template; all other fields pass through untouched.
pub fn with_engine(engine: EngineKind) -> impl Fn(SynthFn) -> SynthFn {
    move |f: SynthFn| {
        let bound: SynthFn = Arc::new(move |text, mut template| {
            template.engine = Some(engine);
            f(text, template)
        });
        bound
    }
}

/// Pre-bind the language of a synthesis function; symmetric to
/// [`with_engine`].
pub fn with_language(language: impl Into<String>) -> impl Fn(SynthFn) -> SynthFn {
    let language = language.into();
    move |f: SynthFn| {
        let language = language.clone();
        let bound: SynthFn = Arc::new(move |text, mut template| {
            template.language = Some(language.clone());
            f(text, template)
        });
        bound
    }
}
