//! Field validator contract and the shared checks every kind composes
//!
//! Check order (fixed, short-circuiting):
//! 1. Existence: null is always rejected first
//! 2. Exact type membership, no coercion
//! 3. Kind-specific structure (bounds, length, characters, formats)

use std::collections::BTreeSet;
use std::fmt;

use super::errors::{BoundSide, ValidationError, ValidationResult};
use super::value::{FieldValue, ValueType};

/// Validation strategy kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorKind {
    Exists,
    Int,
    String,
    Date,
}

impl ValidatorKind {
    pub fn name(&self) -> &'static str {
        match self {
            ValidatorKind::Exists => "exists",
            ValidatorKind::Int => "int",
            ValidatorKind::String => "string",
            ValidatorKind::Date => "date",
        }
    }
}

impl fmt::Display for ValidatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A reusable field contract.
///
/// Implementations hold only their constraint parameters. They never hold
/// per-record data, so one instance can serve every record of a type.
pub trait FieldValidator: fmt::Debug + Send + Sync {
    /// Returns the strategy kind
    fn kind(&self) -> ValidatorKind;

    /// Checks `value` for the field `name` and returns the value to store.
    ///
    /// # Errors
    ///
    /// Returns the first violated check in the fixed order above.
    fn validate(&self, name: &str, value: FieldValue) -> ValidationResult<FieldValue>;
}

/// Fails with `MissingValue` if `value` is absent or null.
pub fn validate_exists(name: &str, value: Option<&FieldValue>) -> ValidationResult<()> {
    match value {
        None | Some(FieldValue::Null) => Err(ValidationError::missing(name)),
        Some(_) => Ok(()),
    }
}

/// Fails with `TypeMismatch` if the runtime type of `value` is not in `allowed`.
pub fn validate_type(name: &str, value: &FieldValue, allowed: &[ValueType]) -> ValidationResult<()> {
    if allowed.contains(&value.value_type()) {
        return Ok(());
    }
    Err(ValidationError::TypeMismatch {
        field: name.to_string(),
        expected: allowed
            .iter()
            .map(ValueType::type_name)
            .collect::<Vec<_>>()
            .join(" | "),
        actual: value.type_name(),
    })
}

/// Inclusive bounds check; an absent bound disables that side.
pub fn validate_bounds<T>(
    name: &str,
    value: &T,
    lower: Option<&T>,
    upper: Option<&T>,
) -> ValidationResult<()>
where
    T: PartialOrd + fmt::Display,
{
    if let Some(lower) = lower {
        if value < lower {
            return Err(out_of_range(name, value, lower, BoundSide::Lower));
        }
    }
    if let Some(upper) = upper {
        if value > upper {
            return Err(out_of_range(name, value, upper, BoundSide::Upper));
        }
    }
    Ok(())
}

/// Inclusive length check, measured in characters.
pub fn validate_length(
    name: &str,
    value: &str,
    min_length: usize,
    max_length: Option<usize>,
) -> ValidationResult<()> {
    let length = value.chars().count();
    if length < min_length {
        return Err(ValidationError::Length {
            field: name.to_string(),
            length,
            limit: min_length,
            side: BoundSide::Lower,
        });
    }
    if let Some(max_length) = max_length {
        if length > max_length {
            return Err(ValidationError::Length {
                field: name.to_string(),
                length,
                limit: max_length,
                side: BoundSide::Upper,
            });
        }
    }
    Ok(())
}

/// Fails on the first character, in scan order, not in `allowed`.
pub fn validate_chars(name: &str, value: &str, allowed: &BTreeSet<char>) -> ValidationResult<()> {
    match value.chars().enumerate().find(|(_, c)| !allowed.contains(c)) {
        Some((position, character)) => Err(ValidationError::InvalidCharacter {
            field: name.to_string(),
            character,
            position,
        }),
        None => Ok(()),
    }
}

fn out_of_range<T: fmt::Display>(name: &str, value: &T, limit: &T, side: BoundSide) -> ValidationError {
    ValidationError::OutOfRange {
        field: name.to_string(),
        value: value.to_string(),
        limit: limit.to_string(),
        side,
    }
}

/// Accepts any non-null value unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExistsValidator;

impl FieldValidator for ExistsValidator {
    fn kind(&self) -> ValidatorKind {
        ValidatorKind::Exists
    }

    fn validate(&self, name: &str, value: FieldValue) -> ValidationResult<FieldValue> {
        validate_exists(name, Some(&value))?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_exists() {
        for value in [
            FieldValue::Int(123),
            FieldValue::Int(0),
            FieldValue::from("hello"),
            FieldValue::from(""),
            FieldValue::Float(0.0),
            FieldValue::List(vec![]),
            FieldValue::Bool(false),
        ] {
            assert!(validate_exists("prop", Some(&value)).is_ok());
        }
    }

    #[test]
    fn test_validate_exists_invalid() {
        let err = validate_exists("prop", Some(&FieldValue::Null)).unwrap_err();
        assert_eq!(err, ValidationError::missing("prop"));
        assert!(err.to_string().contains("prop"));

        assert!(validate_exists("prop", None).is_err());
    }

    #[test]
    fn test_validate_type() {
        assert!(validate_type("prop", &FieldValue::Int(123), &[ValueType::Int]).is_ok());
        assert!(validate_type(
            "prop",
            &FieldValue::from("hello"),
            &[ValueType::Int, ValueType::Float, ValueType::Str]
        )
        .is_ok());
    }

    #[test]
    fn test_validate_type_invalid() {
        let err = validate_type("prop", &FieldValue::Int(123), &[ValueType::Str, ValueType::Float])
            .unwrap_err();
        match err {
            ValidationError::TypeMismatch { field, expected, actual } => {
                assert_eq!(field, "prop");
                assert_eq!(expected, "str | float");
                assert_eq!(actual, "int");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_bool_is_not_int() {
        assert!(validate_type("prop", &FieldValue::Bool(true), &[ValueType::Int]).is_err());
        assert!(validate_type("prop", &FieldValue::Float(10.5), &[ValueType::Int]).is_err());
    }

    #[test]
    fn test_validate_bounds() {
        for (lower, upper) in [(-20, -10), (-10, 0), (-5, 5), (1, 1), (0, 10), (10, 20)] {
            for value in lower..=upper {
                assert!(validate_bounds("prop", &value, Some(&lower), Some(&upper)).is_ok());
            }
            for value in (lower - 5)..lower {
                let err = validate_bounds("prop", &value, Some(&lower), Some(&upper)).unwrap_err();
                let display = err.to_string();
                assert!(display.contains("prop"));
                assert!(display.contains(&value.to_string()));
                assert!(display.contains(&lower.to_string()));
            }
            for value in (upper + 1)..=(upper + 5) {
                let err = validate_bounds("prop", &value, Some(&lower), Some(&upper)).unwrap_err();
                assert!(matches!(
                    err,
                    ValidationError::OutOfRange { side: BoundSide::Upper, .. }
                ));
            }
        }
    }

    #[test]
    fn test_absent_bound_disables_side() {
        assert!(validate_bounds("prop", &i64::MIN, None, Some(&0)).is_ok());
        assert!(validate_bounds("prop", &i64::MAX, Some(&0), None).is_ok());
    }

    #[test]
    fn test_validate_length_counts_chars() {
        assert!(validate_length("prop", "héllo", 1, Some(5)).is_ok());
        assert!(matches!(
            validate_length("prop", "", 1, Some(5)),
            Err(ValidationError::Length { side: BoundSide::Lower, length: 0, .. })
        ));
    }

    #[test]
    fn test_validate_chars() {
        let allowed: BTreeSet<char> = ('a'..='z').collect();
        assert!(validate_chars("prop", "helloworld", &allowed).is_ok());

        let err = validate_chars("prop", "hello_World", &allowed).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidCharacter {
                field: "prop".into(),
                character: '_',
                position: 5,
            }
        );
    }

    #[test]
    fn test_exists_validator_passes_value_through() {
        let value = FieldValue::List(vec![FieldValue::Int(1), FieldValue::Int(2)]);
        assert_eq!(ExistsValidator.validate("prop", value.clone()), Ok(value));
        assert!(ExistsValidator.validate("prop", FieldValue::Null).is_err());
    }
}
