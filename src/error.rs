//! Structured error handling for voxpipe
//!
//! One error enum covers the whole crate: validation failures, unavailable
//! engines, and the catch-all synthesis/I/O/playback kinds that wrap an
//! underlying cause.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias with TtsError
pub type Result<T> = std::result::Result<T, TtsError>;

/// Boxed error cause attached to the catch-all kinds
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for voxpipe
#[derive(Error, Debug)]
pub enum TtsError {
    /// Malformed input: empty text, oversize text, unknown engine or
    /// unsupported language. Never worth retrying.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Backend unreachable or missing: binary not installed, no network,
    /// request timeout, missing API key.
    #[error("Engine not available ({engine}): {reason}")]
    EngineNotAvailable { engine: String, reason: String },

    /// Backend failed while synthesizing
    #[error("Synthesis error: {message}")]
    Synthesis {
        message: String,
        #[source]
        source: Option<Cause>,
    },

    /// Filesystem failures around written audio
    #[error("I/O error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Cause>,
    },

    /// Audio output device or decoding failures
    #[error("Playback error: {message}")]
    Playback {
        message: String,
        #[source]
        source: Option<Cause>,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl TtsError {
    /// Validation failure without a field
    pub fn validation(message: impl Into<String>) -> Self {
        TtsError::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Validation failure for a named field
    pub fn field_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        TtsError::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Engine unreachable or missing
    pub fn unavailable(engine: impl Into<String>, reason: impl Into<String>) -> Self {
        TtsError::EngineNotAvailable {
            engine: engine.into(),
            reason: reason.into(),
        }
    }

    /// Backend synthesis failure
    pub fn synthesis(message: impl Into<String>) -> Self {
        TtsError::Synthesis {
            message: message.into(),
            source: None,
        }
    }

    /// Filesystem failure, optionally tied to a path
    pub fn io(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        TtsError::Io {
            message: message.into(),
            path,
            source: None,
        }
    }

    /// Playback failure
    pub fn playback(message: impl Into<String>) -> Self {
        TtsError::Playback {
            message: message.into(),
            source: None,
        }
    }

    /// Configuration failure
    pub fn config(message: impl Into<String>) -> Self {
        TtsError::Config {
            message: message.into(),
        }
    }

    /// Attach the underlying cause to a catch-all kind.
    ///
    /// No-op for Validation/EngineNotAvailable/Config, which carry their
    /// whole story in the message.
    pub fn with_source(mut self, cause: impl Into<Cause>) -> Self {
        match &mut self {
            TtsError::Synthesis { source, .. }
            | TtsError::Io { source, .. }
            | TtsError::Playback { source, .. } => *source = Some(cause.into()),
            _ => {}
        }
        self
    }

    /// True for malformed-input errors
    pub fn is_validation(&self) -> bool {
        matches!(self, TtsError::Validation { .. })
    }

    /// True when the backend was unreachable or missing
    pub fn is_engine_unavailable(&self) -> bool {
        matches!(self, TtsError::EngineNotAvailable { .. })
    }

    /// Whether a caller could reasonably retry or fall back.
    ///
    /// Only unavailable engines qualify; validation failures and backend
    /// errors will repeat identically.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TtsError::EngineNotAvailable { .. })
    }
}

impl From<std::io::Error> for TtsError {
    fn from(err: std::io::Error) -> Self {
        TtsError::Io {
            message: err.to_string(),
            path: None,
            source: Some(Box::new(err)),
        }
    }
}

/// Network failures from the cloud adapter.
///
/// Timeouts and connection errors mean the service was unreachable and map
/// to the unavailable kind; everything else is a synthesis failure with the
/// cause attached.
impl From<reqwest::Error> for TtsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TtsError::unavailable("cloud", format!("request timed out: {}", err))
        } else if err.is_connect() {
            TtsError::unavailable("cloud", format!("connection failed: {}", err))
        } else {
            TtsError::Synthesis {
                message: format!("cloud request failed: {}", err),
                source: Some(Box::new(err)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TtsError::validation("text must not be empty");
        assert!(err.to_string().contains("Validation error"));
        assert!(err.to_string().contains("text must not be empty"));

        let err = TtsError::unavailable("offline", "espeak-ng not found");
        assert!(err.to_string().contains("offline"));
        assert!(err.to_string().contains("espeak-ng not found"));
    }

    #[test]
    fn test_field_validation_carries_field() {
        let err = TtsError::field_validation("language", "unsupported code 'xx'");
        match err {
            TtsError::Validation { field, .. } => assert_eq!(field.as_deref(), Some("language")),
            other => panic!("unexpected kind: {other}"),
        }
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(TtsError::unavailable("cloud", "timeout").is_retryable());
        assert!(!TtsError::validation("empty").is_retryable());
        assert!(!TtsError::synthesis("backend crashed").is_retryable());
    }

    #[test]
    fn test_with_source_attaches_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = TtsError::synthesis("write failed").with_source(io);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_with_source_noop_for_validation() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "x");
        let err = TtsError::validation("empty").with_source(io);
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: TtsError = io.into();
        assert!(matches!(err, TtsError::Io { .. }));
    }
}
