//! CLI-specific error types
//!
//! Field and media failures keep the code of the error they wrap.

use std::fmt;
use std::io;

use crate::media::MediaError;
use crate::validation::ValidationError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (files, stdout)
    IoError,
    /// Input file is not the expected JSON shape
    InvalidInput,
    /// Name is neither a field kind nor an alias
    UnknownField,
    /// Rejected by the field or media layer, carrying its code
    Rejected(&'static str),
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "MEDIA_CLI_CONFIG_ERROR",
            Self::IoError => "MEDIA_CLI_IO_ERROR",
            Self::InvalidInput => "MEDIA_CLI_INVALID_INPUT",
            Self::UnknownField => "MEDIA_CLI_UNKNOWN_FIELD",
            Self::Rejected(code) => code,
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Malformed input file
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidInput, msg)
    }

    /// Unknown field name
    pub fn unknown_field(name: &str) -> Self {
        Self::new(
            CliErrorCode::UnknownField,
            format!("'{}' is not a media field or alias. Run 'mediafields fields'.", name),
        )
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ValidationError> for CliError {
    fn from(e: ValidationError) -> Self {
        Self::new(CliErrorCode::Rejected(e.code()), e.to_string())
    }
}

impl From<MediaError> for CliError {
    fn from(e: MediaError) -> Self {
        match e {
            MediaError::Io(msg) => Self::io_error(msg),
            other => Self::new(CliErrorCode::Rejected(other.code()), other.to_string()),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_errors_keep_codes() {
        let err = CliError::from(ValidationError::missing("duration"));
        assert_eq!(err.code_str(), "MEDIA_FIELD_MISSING");
        assert_eq!(err.message(), "duration should not be null");

        let err = CliError::from(MediaError::InvalidFormat(".".into()));
        assert_eq!(err.code(), &CliErrorCode::Rejected("MEDIA_INVALID_FORMAT"));

        let err = CliError::from(MediaError::Io("disk full".into()));
        assert_eq!(err.code(), &CliErrorCode::IoError);
    }
}
