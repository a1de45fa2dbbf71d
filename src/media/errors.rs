//! # Media Errors

use thiserror::Error;

use crate::validation::ValidationError;

use super::file::MediaKind;

/// Result type for media operations
pub type MediaResult<T> = Result<T, MediaError>;

/// Media layer errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MediaError {
    // Field errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // Collaborator errors
    #[error("Probe failed for {path}: {reason}")]
    Probe { path: String, reason: String },

    #[error("Transcode failed for {path}: {reason}")]
    Transcode { path: String, reason: String },

    #[error("Silence detection failed for {path}: {reason}")]
    SilenceDetection { path: String, reason: String },

    #[error("Plotting failed: {0}")]
    Plot(String),

    // Usage errors
    #[error("Operation '{operation}' requires {expected} media, got {actual}")]
    WrongKind {
        operation: &'static str,
        expected: MediaKind,
        actual: MediaKind,
    },

    #[error("Invalid target format: '{0}'")]
    InvalidFormat(String),

    #[error("Invalid silence parameters: {0}")]
    InvalidParameters(String),

    #[error("Sound interval ends before it starts: [{start_ms}, {end_ms})")]
    InvalidInterval { start_ms: u64, end_ms: u64 },

    // I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl MediaError {
    /// Get stable error code
    pub fn code(&self) -> &'static str {
        match self {
            MediaError::Validation(e) => e.code(),
            MediaError::Probe { .. } => "MEDIA_PROBE_FAILED",
            MediaError::Transcode { .. } => "MEDIA_TRANSCODE_FAILED",
            MediaError::SilenceDetection { .. } => "MEDIA_SILENCE_FAILED",
            MediaError::Plot(_) => "MEDIA_PLOT_FAILED",
            MediaError::WrongKind { .. } => "MEDIA_WRONG_KIND",
            MediaError::InvalidFormat(_) => "MEDIA_INVALID_FORMAT",
            MediaError::InvalidParameters(_) => "MEDIA_INVALID_PARAMETERS",
            MediaError::InvalidInterval { .. } => "MEDIA_INVALID_INTERVAL",
            MediaError::Io(_) => "MEDIA_IO",
        }
    }
}

impl From<std::io::Error> for MediaError {
    fn from(err: std::io::Error) -> Self {
        MediaError::Io(err.to_string())
    }
}
