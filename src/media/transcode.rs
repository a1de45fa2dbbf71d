//! # Transcoding
//!
//! Output files are written next to their source and named after the
//! source's validated file name: `<dir>/<file_name>.<format>`.

use std::fmt;
use std::path::{Path, PathBuf};

use super::errors::{MediaError, MediaResult};

/// Audio extracted from video is always written as WAV
pub const EXTRACTED_AUDIO_FORMAT: &str = "wav";

/// Audio/video transcoding service
pub trait Transcoder: Send + Sync + fmt::Debug {
    /// Transcodes `source` into `target`, the format following `target`'s
    /// extension
    fn transcode(&self, source: &Path, target: &Path) -> MediaResult<()>;
}

/// Strips leading and trailing dots from a requested format.
///
/// # Errors
///
/// `InvalidFormat` if nothing remains.
pub fn normalize_format(format: &str) -> MediaResult<&str> {
    let trimmed = format.trim_matches('.');
    if trimmed.is_empty() {
        return Err(MediaError::InvalidFormat(format.to_string()));
    }
    Ok(trimmed)
}

/// Builds `<source dir>/<file_name>.<format>`
pub fn output_path(source: &Path, file_name: &str, format: &str) -> PathBuf {
    let file = format!("{}.{}", file_name, format);
    match source.parent() {
        Some(dir) => dir.join(file),
        None => PathBuf::from(file),
    }
}
