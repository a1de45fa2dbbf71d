//! Validation error types
//!
//! Error codes:
//! - MEDIA_FIELD_CONFIGURATION (FATAL)
//! - MEDIA_FIELD_MISSING (REJECT)
//! - MEDIA_FIELD_TYPE (REJECT)
//! - MEDIA_FIELD_RANGE (REJECT)
//! - MEDIA_FIELD_LENGTH (REJECT)
//! - MEDIA_FIELD_CHARACTER (REJECT)
//! - MEDIA_FIELD_FORMAT (REJECT)
//! - MEDIA_FIELD_UNKNOWN (REJECT)
//! - MEDIA_FIELD_STATE (REJECT)

use std::fmt;

use thiserror::Error;

/// Severity levels for validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The offending value is rejected, the record type stays usable
    Reject,
    /// The field definition itself is unusable
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Which side of an inclusive bound was violated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundSide {
    Lower,
    Upper,
}

impl fmt::Display for BoundSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundSide::Lower => write!(f, "at least"),
            BoundSide::Upper => write!(f, "at most"),
        }
    }
}

/// Every failure the validator framework and binder can raise.
///
/// Each variant carries the field it concerns and enough context
/// (offending value, violated bound, format or character) to build a
/// diagnostic without re-deriving it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Validator parameters are inconsistent, or a declaration is invalid
    #[error("invalid field configuration{}: {reason}", field_suffix(.field))]
    Configuration {
        field: Option<String>,
        reason: String,
    },

    /// A required value is null or was never assigned
    #[error("{field} should not be null{}", record_suffix(.record))]
    MissingValue {
        field: String,
        record: Option<String>,
    },

    /// The runtime type is not in the allowed set
    #[error("{field} should be of type {expected}, not type {actual}")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: &'static str,
    },

    /// Numeric or chronological bound violated (inclusive)
    #[error("{field} should be {side} {limit}, but is currently {value}")]
    OutOfRange {
        field: String,
        value: String,
        limit: String,
        side: BoundSide,
    },

    /// String length bound violated (inclusive, in characters)
    #[error("len({field}) should be {side} {limit}, but is currently {length}")]
    Length {
        field: String,
        length: usize,
        limit: usize,
        side: BoundSide,
    },

    /// A character outside the allowed set
    #[error("{field} contains invalid character '{character}' at position {position}")]
    InvalidCharacter {
        field: String,
        character: char,
        position: usize,
    },

    /// No configured date format matched
    #[error("{field} value '{value}' does not match any of the formats {formats:?}")]
    Format {
        field: String,
        value: String,
        formats: Vec<String>,
    },

    /// Named assignment to a field the record type does not declare
    #[error("record type '{record}' does not declare field '{field}'")]
    UnknownField { record: String, field: String },

    /// Population attempted on a record that is no longer fresh
    #[error("record '{record}' is already {state} and cannot be populated again")]
    AlreadyPopulated { record: String, state: &'static str },
}

fn field_suffix(field: &Option<String>) -> String {
    field
        .as_ref()
        .map(|f| format!(" for '{}'", f))
        .unwrap_or_default()
}

fn record_suffix(record: &Option<String>) -> String {
    record
        .as_ref()
        .map(|r| format!(" on record '{}'", r))
        .unwrap_or_default()
}

impl ValidationError {
    /// Configuration error not yet attributed to a field
    pub fn configuration(reason: impl Into<String>) -> Self {
        ValidationError::Configuration {
            field: None,
            reason: reason.into(),
        }
    }

    /// Missing value for a field
    pub fn missing(field: impl Into<String>) -> Self {
        ValidationError::MissingValue {
            field: field.into(),
            record: None,
        }
    }

    /// Attributes an unattributed configuration error to `field`.
    pub fn for_field(self, field: &str) -> Self {
        match self {
            ValidationError::Configuration { field: None, reason } => {
                ValidationError::Configuration {
                    field: Some(field.to_string()),
                    reason,
                }
            }
            other => other,
        }
    }

    /// Names the record type on a missing-value error.
    pub fn on_record(self, record: &str) -> Self {
        match self {
            ValidationError::MissingValue { field, .. } => ValidationError::MissingValue {
                field,
                record: Some(record.to_string()),
            },
            other => other,
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::Configuration { .. } => "MEDIA_FIELD_CONFIGURATION",
            ValidationError::MissingValue { .. } => "MEDIA_FIELD_MISSING",
            ValidationError::TypeMismatch { .. } => "MEDIA_FIELD_TYPE",
            ValidationError::OutOfRange { .. } => "MEDIA_FIELD_RANGE",
            ValidationError::Length { .. } => "MEDIA_FIELD_LENGTH",
            ValidationError::InvalidCharacter { .. } => "MEDIA_FIELD_CHARACTER",
            ValidationError::Format { .. } => "MEDIA_FIELD_FORMAT",
            ValidationError::UnknownField { .. } => "MEDIA_FIELD_UNKNOWN",
            ValidationError::AlreadyPopulated { .. } => "MEDIA_FIELD_STATE",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            ValidationError::Configuration { .. } => Severity::Fatal,
            _ => Severity::Reject,
        }
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// Returns the field the error concerns, if known
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::Configuration { field, .. } => field.as_deref(),
            ValidationError::MissingValue { field, .. }
            | ValidationError::TypeMismatch { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::Length { field, .. }
            | ValidationError::InvalidCharacter { field, .. }
            | ValidationError::Format { field, .. }
            | ValidationError::UnknownField { field, .. } => Some(field),
            ValidationError::AlreadyPopulated { .. } => None,
        }
    }
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;
