//! Typed, bounded validators
//!
//! Parameters are checked for self-consistency at construction; a
//! validator that exists is always usable.

use std::collections::BTreeSet;

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime};

use super::errors::{ValidationError, ValidationResult};
use super::validator::{
    validate_bounds, validate_chars, validate_exists, validate_length, validate_type,
    FieldValidator, ValidatorKind,
};
use super::value::{FieldValue, ValueType};

/// Integer field with optional inclusive bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntValidator {
    min_value: Option<i64>,
    max_value: Option<i64>,
}

impl IntValidator {
    /// # Errors
    ///
    /// `Configuration` if both bounds are set and `min_value > max_value`.
    pub fn new(min_value: Option<i64>, max_value: Option<i64>) -> ValidationResult<Self> {
        if let (Some(min), Some(max)) = (min_value, max_value) {
            if min > max {
                return Err(ValidationError::configuration(format!(
                    "Minimum value {} cannot be greater than maximum value {}",
                    min, max
                )));
            }
        }
        Ok(Self { min_value, max_value })
    }

    pub fn min_value(&self) -> Option<i64> {
        self.min_value
    }

    pub fn max_value(&self) -> Option<i64> {
        self.max_value
    }
}

impl FieldValidator for IntValidator {
    fn kind(&self) -> ValidatorKind {
        ValidatorKind::Int
    }

    fn validate(&self, name: &str, value: FieldValue) -> ValidationResult<FieldValue> {
        validate_exists(name, Some(&value))?;
        validate_type(name, &value, &[ValueType::Int])?;
        if let FieldValue::Int(i) = value {
            validate_bounds(name, &i, self.min_value.as_ref(), self.max_value.as_ref())?;
        }
        Ok(value)
    }
}

/// String field with inclusive length bounds and an optional allowed
/// character set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringValidator {
    min_length: usize,
    max_length: Option<usize>,
    valid_characters: Option<BTreeSet<char>>,
}

impl StringValidator {
    /// # Errors
    ///
    /// `Configuration` if `max_length` is set and smaller than `min_length`.
    pub fn new(
        min_length: usize,
        max_length: Option<usize>,
        valid_characters: Option<&str>,
    ) -> ValidationResult<Self> {
        if let Some(max) = max_length {
            if min_length > max {
                return Err(ValidationError::configuration(format!(
                    "Minimum length {} cannot be greater than maximum length {}",
                    min_length, max
                )));
            }
        }
        Ok(Self {
            min_length,
            max_length,
            valid_characters: valid_characters.map(|chars| chars.chars().collect()),
        })
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    pub fn valid_characters(&self) -> Option<&BTreeSet<char>> {
        self.valid_characters.as_ref()
    }
}

impl FieldValidator for StringValidator {
    fn kind(&self) -> ValidatorKind {
        ValidatorKind::String
    }

    fn validate(&self, name: &str, value: FieldValue) -> ValidationResult<FieldValue> {
        validate_exists(name, Some(&value))?;
        validate_type(name, &value, &[ValueType::Str])?;
        if let FieldValue::Str(s) = &value {
            validate_length(name, s, self.min_length, self.max_length)?;
            if let Some(allowed) = &self.valid_characters {
                validate_chars(name, s, allowed)?;
            }
        }
        Ok(value)
    }
}

/// Date-time field.
///
/// String input is parsed with the configured `chrono` formats, tried in
/// order; the first exact match wins. Already-parsed date-times are taken
/// as is. Either way the result is checked against the inclusive
/// `earliest`/`latest` bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateValidator {
    formats: Vec<String>,
    earliest: Option<NaiveDateTime>,
    latest: Option<NaiveDateTime>,
}

impl DateValidator {
    /// # Errors
    ///
    /// `Configuration` if a format is empty or not a valid strftime
    /// pattern, or if `earliest > latest`.
    pub fn new<I, S>(
        formats: I,
        earliest: Option<NaiveDateTime>,
        latest: Option<NaiveDateTime>,
    ) -> ValidationResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let formats: Vec<String> = formats.into_iter().map(Into::into).collect();
        for fmt in &formats {
            if fmt.is_empty() {
                return Err(ValidationError::configuration("Date format cannot be empty"));
            }
            if StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error)) {
                return Err(ValidationError::configuration(format!(
                    "Invalid date format '{}'",
                    fmt
                )));
            }
        }

        if let (Some(earliest), Some(latest)) = (earliest, latest) {
            if earliest > latest {
                return Err(ValidationError::configuration(format!(
                    "Earliest date {} cannot be later than latest date {}",
                    earliest, latest
                )));
            }
        }

        Ok(Self {
            formats,
            earliest,
            latest,
        })
    }

    pub fn formats(&self) -> &[String] {
        &self.formats
    }

    pub fn earliest(&self) -> Option<NaiveDateTime> {
        self.earliest
    }

    pub fn latest(&self) -> Option<NaiveDateTime> {
        self.latest
    }

    /// Parses `date` with the first matching format.
    ///
    /// A format without time fields yields midnight of the parsed day.
    pub fn parse(date: &str, formats: &[String]) -> Option<NaiveDateTime> {
        formats.iter().find_map(|fmt| {
            NaiveDateTime::parse_from_str(date, fmt).ok().or_else(|| {
                NaiveDate::parse_from_str(date, fmt)
                    .ok()
                    .and_then(|day| day.and_hms_opt(0, 0, 0))
            })
        })
    }
}

impl FieldValidator for DateValidator {
    fn kind(&self) -> ValidatorKind {
        ValidatorKind::Date
    }

    fn validate(&self, name: &str, value: FieldValue) -> ValidationResult<FieldValue> {
        validate_exists(name, Some(&value))?;
        validate_type(name, &value, &[ValueType::Str, ValueType::DateTime])?;

        let date = match value {
            FieldValue::Str(s) => Self::parse(&s, &self.formats).ok_or_else(|| {
                ValidationError::Format {
                    field: name.to_string(),
                    value: s.clone(),
                    formats: self.formats.clone(),
                }
            })?,
            FieldValue::DateTime(dt) => dt,
            // unreachable after the type check
            other => return Ok(other),
        };

        validate_bounds(name, &date, self.earliest.as_ref(), self.latest.as_ref())?;
        Ok(FieldValue::DateTime(date))
    }
}
