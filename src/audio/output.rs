//! File naming and audio writing
//!
//! Derived filenames follow `<prefix>_<UTC %Y%m%d_%H%M%S>.<ext>`; batch
//! members add a zero-padded index so one batch never collides with
//! itself. Writing corrects the extension to the container format and
//! creates missing parent directories.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, warn};

use crate::engine::AudioFormat;
use crate::error::{Result, TtsError};

/// Timestamp pattern used in derived filenames
const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Current UTC timestamp in the derived-filename format
pub fn timestamp() -> String {
    Utc::now().format(STAMP_FORMAT).to_string()
}

/// Derived filename for a single synthesis, e.g. `tts_20250101_120000.wav`
pub fn timestamp_name(prefix: &str, format: AudioFormat) -> String {
    format!("{}_{}.{}", prefix, timestamp(), format.extension())
}

/// Filename for one batch member, e.g. `tts_20250101_120000_003.mp3`.
///
/// `stamp` is captured once per batch; the 1-based index keeps members
/// distinct within it.
pub fn batch_member_name(prefix: &str, stamp: &str, index: usize, format: AudioFormat) -> String {
    format!("{}_{}_{:03}.{}", prefix, stamp, index + 1, format.extension())
}

/// Create `dir` and any missing parents
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| {
        TtsError::io(
            format!("failed to create directory {}", dir.display()),
            Some(dir.to_path_buf()),
        )
        .with_source(e)
    })
}

/// Path with its extension forced to match `format`.
///
/// A caller asking for `speech.mp3` from the offline engine gets
/// `speech.wav` back rather than a mislabeled container.
pub fn with_corrected_extension(path: &Path, format: AudioFormat) -> PathBuf {
    let wanted = format.extension();
    let matches = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted));
    if matches {
        return path.to_path_buf();
    }
    let mut corrected = path.to_path_buf();
    corrected.set_extension(wanted);
    corrected
}

/// Write encoded audio to `path`, correcting the extension and creating
/// parent directories. Returns the path actually written.
pub fn write_audio(bytes: &[u8], path: &Path, format: AudioFormat) -> Result<PathBuf> {
    let path = with_corrected_extension(path, format);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }
    fs::write(&path, bytes).map_err(|e| {
        TtsError::io(
            format!("failed to write {}", path.display()),
            Some(path.clone()),
        )
        .with_source(e)
    })?;
    debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}

/// Audio files in `dir`, newest first, at most `limit` entries.
///
/// Listing is advisory: an unreadable directory yields an empty list with
/// a warning instead of an error.
pub fn recent_files(dir: &Path, limit: usize) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("cannot list {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut files: Vec<(std::time::SystemTime, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    ext.eq_ignore_ascii_case("wav") || ext.eq_ignore_ascii_case("mp3")
                })
        })
        .filter_map(|path| {
            let modified = fs::metadata(&path).and_then(|m| m.modified()).ok()?;
            Some((modified, path))
        })
        .collect();

    files.sort_by(|a, b| b.0.cmp(&a.0));
    files.into_iter().take(limit).map(|(_, path)| path).collect()
}
