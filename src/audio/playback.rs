//! Synchronous audio playback
//!
//! Decodes WAV or MP3 from a file or an in-memory buffer and blocks until
//! the sink drains. Requires a working audio output device; failures
//! surface as `TtsError::Playback`.

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;

use bytes::Bytes;
use rodio::Decoder;
use tracing::debug;

use crate::audio::AudioResult;
use crate::error::{Result, TtsError};

/// Play a synthesis result from memory
pub fn play(audio: &AudioResult) -> Result<()> {
    debug!("playing {} bytes of {}", audio.len(), audio.format());
    play_bytes(audio.bytes())
}

/// Play encoded audio bytes, blocking until playback completes
pub fn play_bytes(bytes: impl Into<Bytes>) -> Result<()> {
    let bytes = bytes.into();
    if bytes.is_empty() {
        return Err(TtsError::playback("nothing to play: empty audio buffer"));
    }
    let stream_handle = rodio::OutputStreamBuilder::open_default_stream()
        .map_err(|e| TtsError::playback("failed to open audio output device").with_source(e))?;
    let sink = rodio::Sink::connect_new(stream_handle.mixer());
    let source = Decoder::new(Cursor::new(bytes))
        .map_err(|e| TtsError::playback("failed to decode audio buffer").with_source(e))?;
    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}

/// Play an audio file, blocking until playback completes
pub fn play_file(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    debug!("playing {}", path.display());
    let file = File::open(path).map_err(|e| {
        TtsError::playback(format!("failed to open {}", path.display())).with_source(e)
    })?;
    let stream_handle = rodio::OutputStreamBuilder::open_default_stream()
        .map_err(|e| TtsError::playback("failed to open audio output device").with_source(e))?;
    let sink = rodio::Sink::connect_new(stream_handle.mixer());
    let source = Decoder::new(BufReader::new(file)).map_err(|e| {
        TtsError::playback(format!("failed to decode {}", path.display())).with_source(e)
    })?;
    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_is_rejected() {
        let err = play_bytes(Vec::new()).unwrap_err();
        assert!(matches!(err, TtsError::Playback { .. }));
    }

    #[test]
    fn test_missing_file_is_playback_error() {
        let err = play_file("definitely/not/here.wav").unwrap_err();
        assert!(matches!(err, TtsError::Playback { .. }));
    }
}
