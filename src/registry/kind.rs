//! Field kind definitions
//!
//! A field kind is a tagged variant: a canonical name plus the validator
//! strategy and parameters to instantiate for it. The tag carries no
//! behavior of its own; `ValidatorSpec::build` is the only place where a
//! spec turns into a validator.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::validation::{
    DateValidator, ExistsValidator, FieldValidator, IntValidator, StringValidator,
    ValidationResult, ValidatorKind,
};

/// Validator strategy and its constructor parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "validator", rename_all = "lowercase")]
pub enum ValidatorSpec {
    /// Any non-null value
    Exists,
    /// Integer with optional inclusive bounds
    Int {
        #[serde(default)]
        min_value: Option<i64>,
        #[serde(default)]
        max_value: Option<i64>,
    },
    /// String with length bounds and optional character set
    String {
        #[serde(default)]
        min_length: usize,
        #[serde(default)]
        max_length: Option<usize>,
        #[serde(default)]
        valid_characters: Option<String>,
    },
    /// Date-time parsed from ordered formats, optional inclusive bounds
    Date {
        #[serde(default)]
        formats: Vec<String>,
        #[serde(default)]
        earliest: Option<NaiveDateTime>,
        #[serde(default)]
        latest: Option<NaiveDateTime>,
    },
}

impl ValidatorSpec {
    /// Returns the strategy kind this spec builds
    pub fn kind(&self) -> ValidatorKind {
        match self {
            ValidatorSpec::Exists => ValidatorKind::Exists,
            ValidatorSpec::Int { .. } => ValidatorKind::Int,
            ValidatorSpec::String { .. } => ValidatorKind::String,
            ValidatorSpec::Date { .. } => ValidatorKind::Date,
        }
    }

    /// Instantiates a fresh validator.
    ///
    /// # Errors
    ///
    /// `Configuration` if the parameters are inconsistent.
    pub fn build(&self) -> ValidationResult<Box<dyn FieldValidator>> {
        let validator: Box<dyn FieldValidator> = match self {
            ValidatorSpec::Exists => Box::new(ExistsValidator),
            ValidatorSpec::Int {
                min_value,
                max_value,
            } => Box::new(IntValidator::new(*min_value, *max_value)?),
            ValidatorSpec::String {
                min_length,
                max_length,
                valid_characters,
            } => Box::new(StringValidator::new(
                *min_length,
                *max_length,
                valid_characters.as_deref(),
            )?),
            ValidatorSpec::Date {
                formats,
                earliest,
                latest,
            } => Box::new(DateValidator::new(formats.iter().cloned(), *earliest, *latest)?),
        };
        Ok(validator)
    }
}

/// A named, reusable field definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldKind {
    /// Canonical field name, also the storage key on records
    pub name: String,
    /// Validator to install for this field
    #[serde(flatten)]
    pub spec: ValidatorSpec,
}

impl FieldKind {
    pub fn new(name: impl Into<String>, spec: ValidatorSpec) -> Self {
        Self {
            name: name.into(),
            spec,
        }
    }

    /// Create an existence-only field
    pub fn exists(name: impl Into<String>) -> Self {
        Self::new(name, ValidatorSpec::Exists)
    }

    /// Create an integer field
    pub fn int(name: impl Into<String>, min_value: Option<i64>, max_value: Option<i64>) -> Self {
        Self::new(
            name,
            ValidatorSpec::Int {
                min_value,
                max_value,
            },
        )
    }

    /// Create a string field
    pub fn string(
        name: impl Into<String>,
        min_length: usize,
        max_length: Option<usize>,
        valid_characters: Option<&str>,
    ) -> Self {
        Self::new(
            name,
            ValidatorSpec::String {
                min_length,
                max_length,
                valid_characters: valid_characters.map(str::to_string),
            },
        )
    }

    /// Create a date-time field
    pub fn date<I, S>(
        name: impl Into<String>,
        formats: I,
        earliest: Option<NaiveDateTime>,
        latest: Option<NaiveDateTime>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            ValidatorSpec::Date {
                formats: formats.into_iter().map(Into::into).collect(),
                earliest,
                latest,
            },
        )
    }

    /// Builds this kind's validator, attributing configuration errors to it.
    pub fn validator(&self) -> ValidationResult<Box<dyn FieldValidator>> {
        self.spec.build().map_err(|e| e.for_field(&self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{FieldValue, ValidationError};
    use serde_json::json;

    #[test]
    fn test_build_matches_kind() {
        let kinds = [
            FieldKind::exists("format"),
            FieldKind::int("duration", Some(1), None),
            FieldKind::string("extension", 1, Some(5), None),
            FieldKind::date("date_created", ["%Y-%m-%d"], None, None),
        ];
        for kind in &kinds {
            assert_eq!(kind.validator().unwrap().kind(), kind.spec.kind());
        }
    }

    #[test]
    fn test_inconsistent_kind_names_field() {
        let kind = FieldKind::int("duration", Some(10), Some(1));
        match kind.validator().unwrap_err() {
            ValidationError::Configuration { field, .. } => {
                assert_eq!(field.as_deref(), Some("duration"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_validator_enforces_spec() {
        let kind = FieldKind::string("name", 1, Some(3), Some("abc"));
        let validator = kind.validator().unwrap();
        assert!(validator.validate("name", FieldValue::from("abc")).is_ok());
        assert!(matches!(
            validator.validate("name", FieldValue::from("abd")),
            Err(ValidationError::InvalidCharacter { character: 'd', .. })
        ));
    }

    #[test]
    fn test_serde_shape() {
        let kind = FieldKind::int("duration", Some(1), Some(360000000));
        let value = serde_json::to_value(&kind).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "duration",
                "validator": "int",
                "min_value": 1,
                "max_value": 360000000
            })
        );

        let parsed: FieldKind =
            serde_json::from_value(json!({"name": "format", "validator": "exists"})).unwrap();
        assert_eq!(parsed, FieldKind::exists("format"));
    }
}
