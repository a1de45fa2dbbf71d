//! Validator framework
//!
//! Reusable field contracts that check, and where needed normalize, every
//! value written to a record field.
//!
//! # Design Principles
//!
//! - Fail fast: inconsistent parameters never produce a validator
//! - Fixed check order: existence, exact type, kind-specific structure
//! - No coercion: a bool is not an int, a float is not an int
//! - Validators are stateless with respect to records
//! - No I/O, no logging, errors are returned to the caller untouched

mod bounded;
mod errors;
mod validator;
mod value;

pub use bounded::{DateValidator, IntValidator, StringValidator};
pub use errors::{BoundSide, Severity, ValidationError, ValidationResult};
pub use validator::{
    validate_bounds, validate_chars, validate_exists, validate_length, validate_type,
    ExistsValidator, FieldValidator, ValidatorKind,
};
pub use value::{FieldValue, ValueType};
