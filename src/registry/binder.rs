//! Record type declaration
//!
//! `RecordType::declare` is the binder: it runs once per record type,
//! instantiates one validator per declared field kind, binds it to the
//! kind's canonical name and keeps the resulting table. Records created
//! from the type share these validators; values live in the records.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::observability::{log_event_with_fields, Event};
use crate::validation::{FieldValidator, FieldValue, ValidationError, ValidationResult};

use super::catalog::FieldRegistry;
use super::kind::FieldKind;
use super::record::Record;

/// A validator bound to one field name on one record type.
pub struct BoundField {
    name: String,
    validator: Box<dyn FieldValidator>,
}

impl BoundField {
    /// Binds `validator` to `name`
    pub fn bind(name: impl Into<String>, validator: Box<dyn FieldValidator>) -> Self {
        Self {
            name: name.into(),
            validator,
        }
    }

    /// Returns the bound field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the installed validator
    pub fn validator(&self) -> &dyn FieldValidator {
        self.validator.as_ref()
    }

    /// Validates `value` for this field without storing it
    pub fn validate(&self, value: impl Into<FieldValue>) -> ValidationResult<FieldValue> {
        self.validator.validate(&self.name, value.into())
    }

    /// Returns the value stored on `record`, if any. No validation occurs.
    pub fn get<'r>(&self, record: &'r Record) -> Option<&'r FieldValue> {
        record.value(&self.name)
    }

    /// Validates `value` and stores the normalized result on `record`.
    ///
    /// A rejected value leaves the record unchanged.
    ///
    /// # Errors
    ///
    /// The validator's error, or `UnknownField` if this binding does not
    /// belong to `record`'s type, even when that type has a field of the
    /// same name.
    pub fn set(&self, record: &mut Record, value: impl Into<FieldValue>) -> ValidationResult<()> {
        let owned = record
            .record_type()
            .field(&self.name)
            .map_or(false, |field| std::ptr::eq(field, self));
        if !owned {
            return Err(ValidationError::UnknownField {
                record: record.record_type().name().to_string(),
                field: self.name.clone(),
            });
        }
        let value = self.validate(value)?;
        record.store(&self.name, value);
        Ok(())
    }
}

impl fmt::Debug for BoundField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundField")
            .field("name", &self.name)
            .field("kind", &self.validator.kind())
            .finish()
    }
}

/// A declared record type: an ordered table of bound fields.
#[derive(Debug)]
pub struct RecordType {
    name: String,
    fields: Vec<BoundField>,
    index: HashMap<String, usize>,
}

impl RecordType {
    /// Declares a record type from an ordered list of field kinds.
    ///
    /// # Errors
    ///
    /// `Configuration` if a kind's validator cannot be constructed, or if
    /// two kinds share a canonical name.
    pub fn declare<'k, I>(name: impl Into<String>, kinds: I) -> ValidationResult<Arc<Self>>
    where
        I: IntoIterator<Item = &'k FieldKind>,
    {
        let name = name.into();
        let mut fields = Vec::new();
        let mut index = HashMap::new();

        for kind in kinds {
            if index.contains_key(&kind.name) {
                return Err(ValidationError::configuration(format!(
                    "Record type '{}' declares field '{}' more than once",
                    name, kind.name
                ))
                .for_field(&kind.name));
            }
            let validator = kind.validator()?;
            index.insert(kind.name.clone(), fields.len());
            fields.push(BoundField::bind(kind.name.clone(), validator));
        }

        let field_list = fields
            .iter()
            .map(BoundField::name)
            .collect::<Vec<_>>()
            .join(",");
        log_event_with_fields(
            Event::RecordTypeDeclared,
            &[("record", name.as_str()), ("fields", field_list.as_str())],
        );

        Ok(Arc::new(Self {
            name,
            fields,
            index,
        }))
    }

    /// Declares a record type from names resolved through `registry`.
    ///
    /// Aliases are accepted and resolve to their canonical kind, so an
    /// alias and its canonical name in one declaration collide.
    ///
    /// # Errors
    ///
    /// `Configuration` for unknown names, plus everything `declare` rejects.
    pub fn declare_from(
        name: impl Into<String>,
        registry: &FieldRegistry,
        field_names: &[&str],
    ) -> ValidationResult<Arc<Self>> {
        let name = name.into();
        let kinds = field_names
            .iter()
            .map(|field| {
                registry.resolve(field).ok_or_else(|| {
                    ValidationError::configuration(format!(
                        "Record type '{}' declares unknown field kind '{}'",
                        name, field
                    ))
                    .for_field(field)
                })
            })
            .collect::<ValidationResult<Vec<_>>>()?;
        Self::declare(name, kinds)
    }

    /// Returns the record type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the bound fields in declaration order
    pub fn fields(&self) -> &[BoundField] {
        &self.fields
    }

    /// Gets a bound field by canonical name
    pub fn field(&self, name: &str) -> Option<&BoundField> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// Checks if the type declares `name`
    pub fn declares(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns the declared field names in order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(BoundField::name)
    }

    /// Creates an empty record of this type
    pub fn instantiate(self: &Arc<Self>) -> Record {
        Record::new(Arc::clone(self))
    }
}
