//! Audio value types, file output, and playback
//!
//! Synthesis hands back encoded containers (WAV from the offline engine,
//! MP3 from the cloud), never raw sample buffers. `AudioResult` is the
//! immutable value passed between the pipeline, the filesystem helpers,
//! and the player.

pub mod output;
pub mod playback;

use std::io::Cursor;
use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::engine::{AudioFormat, EngineKind};
use crate::error::Result;

/// Encoded audio produced by one synthesis call.
///
/// The payload is reference-counted, so cloning is cheap and sharing a
/// result between saving and playback copies nothing.
#[derive(Debug, Clone)]
pub struct AudioResult {
    bytes: Bytes,
    format: AudioFormat,
    engine: EngineKind,
}

impl AudioResult {
    /// Wrap encoded audio with its format and originating engine
    pub fn new(bytes: impl Into<Bytes>, format: AudioFormat, engine: EngineKind) -> Self {
        Self {
            bytes: bytes.into(),
            format,
            engine,
        }
    }

    /// Container format of the payload
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Engine that produced this audio
    pub fn engine(&self) -> EngineKind {
        self.engine
    }

    /// Payload size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True when the payload is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Borrow the payload
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Cheap handle to the payload
    pub fn bytes(&self) -> Bytes {
        self.bytes.clone()
    }

    /// Consume into the payload
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    /// Consume into an in-memory reader positioned at the start
    pub fn into_reader(self) -> Cursor<Bytes> {
        Cursor::new(self.bytes)
    }

    /// Write the payload to `path`.
    ///
    /// The extension is corrected to match the container format and parent
    /// directories are created as needed. Returns the path actually
    /// written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        output::write_audio(&self.bytes, path.as_ref(), self.format)
    }

    /// Duration read from the WAV header; `None` for MP3 payloads or
    /// anything hound cannot parse.
    pub fn wav_duration_secs(&self) -> Option<f32> {
        if self.format != AudioFormat::Wav {
            return None;
        }
        let reader = hound::WavReader::new(Cursor::new(self.bytes.as_ref())).ok()?;
        let spec = reader.spec();
        if spec.sample_rate == 0 {
            return None;
        }
        Some(reader.duration() as f32 / spec.sample_rate as f32)
    }
}
