//! Record instances
//!
//! A record exclusively owns one value slot per declared field. Writes go
//! through the field's bound validator; reads never validate.
//!
//! Lifecycle: `Instantiated -> Populated | Failed`. Both outcomes are
//! terminal: only an `Instantiated` record can be populated. Fields of a
//! failed record may be partially set and are the caller's responsibility.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::observability::{log_event_with_fields, Event};
use crate::validation::{validate_exists, FieldValue, ValidationError, ValidationResult};

use super::binder::RecordType;
use super::catalog::FieldRegistry;

/// Population state of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    /// Created, not yet populated
    Instantiated,
    /// Every declared field received a valid value
    Populated,
    /// An assignment or the completeness check failed
    Failed,
}

impl RecordState {
    /// Returns the lowercase state name
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordState::Instantiated => "instantiated",
            RecordState::Populated => "populated",
            RecordState::Failed => "failed",
        }
    }
}

/// One instance of a declared record type
#[derive(Debug, Clone)]
pub struct Record {
    record_type: Arc<RecordType>,
    values: HashMap<String, FieldValue>,
    state: RecordState,
}

impl Record {
    pub(super) fn new(record_type: Arc<RecordType>) -> Self {
        Self {
            record_type,
            values: HashMap::new(),
            state: RecordState::Instantiated,
        }
    }

    pub(super) fn value(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    pub(super) fn store(&mut self, field: &str, value: FieldValue) {
        self.values.insert(field.to_string(), value);
    }

    /// Returns the record's type
    pub fn record_type(&self) -> &RecordType {
        &self.record_type
    }

    /// Returns the population state
    pub fn state(&self) -> RecordState {
        self.state
    }

    /// Returns the stored value of a declared field, if assigned
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.value(field)
    }

    /// Assigns a value to a declared field through its validator.
    ///
    /// # Errors
    ///
    /// `UnknownField` if the type does not declare `field`, otherwise the
    /// validator's error. A rejected value leaves the record unchanged.
    pub fn set(&mut self, field: &str, value: impl Into<FieldValue>) -> ValidationResult<()> {
        let record_type = Arc::clone(&self.record_type);
        let bound = record_type
            .field(field)
            .ok_or_else(|| ValidationError::UnknownField {
                record: record_type.name().to_string(),
                field: field.to_string(),
            })?;
        bound.set(self, value)
    }

    /// Populates from a source keyed by canonical field names.
    ///
    /// See [`Record::populate_with`]; entries not named exactly like a
    /// declared field are ignored.
    pub fn populate<I, K, V>(&mut self, source: I) -> ValidationResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FieldValue>,
    {
        self.populate_resolved(source, None)
    }

    /// Populates from a noisy source whose names resolve through `registry`.
    ///
    /// Each entry whose name (canonical or alias) resolves to a declared
    /// field is assigned through that field's validator; the first rejected
    /// value aborts. Entries resolving to nothing declared are ignored.
    /// Afterwards every declared field must hold a value.
    ///
    /// # Errors
    ///
    /// `AlreadyPopulated` if the record is not `Instantiated`; the record
    /// is then left untouched. Otherwise the first assignment error, or
    /// `MissingValue` naming the first declared field left unset, and the
    /// record is `Failed`.
    pub fn populate_with<I, K, V>(&mut self, registry: &FieldRegistry, source: I) -> ValidationResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FieldValue>,
    {
        self.populate_resolved(source, Some(registry))
    }

    fn populate_resolved<I, K, V>(
        &mut self,
        source: I,
        registry: Option<&FieldRegistry>,
    ) -> ValidationResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FieldValue>,
    {
        if self.state != RecordState::Instantiated {
            return Err(ValidationError::AlreadyPopulated {
                record: self.record_type.name().to_string(),
                state: self.state.as_str(),
            });
        }
        let result = self.assign_all(source, registry).and_then(|()| self.check_complete());
        self.state = match result {
            Ok(()) => RecordState::Populated,
            Err(_) => RecordState::Failed,
        };
        if result.is_ok() {
            log_event_with_fields(
                Event::PopulateComplete,
                &[("record", self.record_type.name())],
            );
        }
        result
    }

    fn assign_all<I, K, V>(&mut self, source: I, registry: Option<&FieldRegistry>) -> ValidationResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FieldValue>,
    {
        let record_type = Arc::clone(&self.record_type);
        let mut ignored = 0usize;

        for (name, raw) in source {
            let name = name.as_ref();
            let canonical = match registry {
                Some(registry) => registry.canonical_name(name),
                None => Some(name),
            };
            let bound = canonical.and_then(|canonical| record_type.field(canonical));
            match bound {
                Some(bound) => bound.set(self, raw)?,
                None => ignored += 1,
            }
        }

        if ignored > 0 {
            let ignored = ignored.to_string();
            log_event_with_fields(
                Event::PopulateIgnoredFields,
                &[("record", record_type.name()), ("count", ignored.as_str())],
            );
        }
        Ok(())
    }

    /// Completeness check: every declared field holds a non-null value.
    ///
    /// # Errors
    ///
    /// `MissingValue` naming the first unset field (declaration order) and
    /// this record's type.
    pub fn check_complete(&self) -> ValidationResult<()> {
        for name in self.record_type.field_names() {
            validate_exists(name, self.values.get(name))
                .map_err(|e| e.on_record(self.record_type.name()))?;
        }
        Ok(())
    }

    /// Returns the assigned fields in declaration order
    pub fn values(&self) -> Vec<(&str, &FieldValue)> {
        self.record_type
            .field_names()
            .filter_map(|name| self.values.get(name).map(|value| (name, value)))
            .collect()
    }

    /// Returns the assigned fields as a JSON object
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (name, value) in self.values() {
            map.insert(name.to_string(), value.to_json());
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FieldKind;
    use serde_json::json;

    fn thing() -> Arc<RecordType> {
        RecordType::declare(
            "Thing",
            [
                &FieldKind::string("name", 1, Some(10), Some("abcdefghijklmnopqrstuvwxyz")),
                &FieldKind::int("count", Some(1), Some(5)),
            ],
        )
        .unwrap()
    }

    fn source(value: Value) -> Vec<(String, FieldValue)> {
        match value {
            Value::Object(entries) => entries
                .into_iter()
                .map(|(k, v)| (k, FieldValue::from(v)))
                .collect(),
            _ => panic!("source must be an object"),
        }
    }

    #[test]
    fn test_populate_valid() {
        let mut record = thing().instantiate();
        record.populate(source(json!({"name": "abc", "count": 3}))).unwrap();

        assert_eq!(record.state(), RecordState::Populated);
        assert_eq!(record.get("name"), Some(&FieldValue::from("abc")));
        assert_eq!(record.get("count"), Some(&FieldValue::Int(3)));
    }

    #[test]
    fn test_populate_invalid_character() {
        let mut record = thing().instantiate();
        let err = record
            .populate(source(json!({"name": "ABC", "count": 3})))
            .unwrap_err();

        assert_eq!(record.state(), RecordState::Failed);
        assert!(matches!(
            err,
            ValidationError::InvalidCharacter { character: 'A', position: 0, .. }
        ));
    }

    #[test]
    fn test_populate_missing_field() {
        let mut record = thing().instantiate();
        let err = record.populate(source(json!({"count": 3}))).unwrap_err();

        assert_eq!(record.state(), RecordState::Failed);
        assert_eq!(
            err,
            ValidationError::MissingValue {
                field: "name".into(),
                record: Some("Thing".into()),
            }
        );
    }

    #[test]
    fn test_failed_record_cannot_be_repopulated() {
        let mut record = thing().instantiate();
        record.populate(source(json!({"name": "abc"}))).unwrap_err();
        assert_eq!(record.state(), RecordState::Failed);

        let err = record.populate(source(json!({"count": 3}))).unwrap_err();
        assert_eq!(
            err,
            ValidationError::AlreadyPopulated {
                record: "Thing".into(),
                state: "failed",
            }
        );
        assert_eq!(record.state(), RecordState::Failed);
        assert!(record.get("count").is_none());
    }

    #[test]
    fn test_populated_record_cannot_be_repopulated() {
        let mut record = thing().instantiate();
        record.populate(source(json!({"name": "abc", "count": 3}))).unwrap();

        let err = record
            .populate(source(json!({"name": "xyz", "count": 4})))
            .unwrap_err();
        assert_eq!(err.code(), "MEDIA_FIELD_STATE");
        assert_eq!(record.state(), RecordState::Populated);
        assert_eq!(record.get("name"), Some(&FieldValue::from("abc")));
    }

    #[test]
    fn test_populate_ignores_extra_keys() {
        let mut record = thing().instantiate();
        record
            .populate(source(json!({
                "name": "abc",
                "count": 3,
                "general_bitrate": 128000,
                "video_width": "not a number"
            })))
            .unwrap();
        assert_eq!(record.values().len(), 2);
    }

    #[test]
    fn test_populate_explicit_null_is_missing() {
        let mut record = thing().instantiate();
        let err = record
            .populate(source(json!({"name": null, "count": 3})))
            .unwrap_err();
        assert_eq!(err.code(), "MEDIA_FIELD_MISSING");
        assert_eq!(err.field(), Some("name"));
    }

    #[test]
    fn test_populate_with_aliases() {
        let registry = FieldRegistry::builder()
            .kind(FieldKind::string("name", 1, Some(10), None))
            .unwrap()
            .kind(FieldKind::int("count", Some(1), Some(5)))
            .unwrap()
            .alias("general_name", "name")
            .unwrap()
            .alias("general_count", "count")
            .unwrap()
            .build();
        let record_type = RecordType::declare_from("Thing", &registry, &["name", "count"]).unwrap();

        let mut record = record_type.instantiate();
        record
            .populate_with(
                &registry,
                vec![("general_name", FieldValue::from("clip")), ("general_count", FieldValue::Int(2))],
            )
            .unwrap();
        assert_eq!(record.get("name"), Some(&FieldValue::from("clip")));
        assert_eq!(record.get("count"), Some(&FieldValue::Int(2)));
    }

    #[test]
    fn test_set_unknown_field() {
        let mut record = thing().instantiate();
        let err = record.set("title", "abc").unwrap_err();
        assert_eq!(err.code(), "MEDIA_FIELD_UNKNOWN");
    }

    #[test]
    fn test_to_json() {
        let mut record = thing().instantiate();
        record.set("count", 4).unwrap();
        assert_eq!(record.to_json(), json!({"count": 4}));
        assert!(record.check_complete().is_err());
    }

    #[test]
    fn test_instances_are_independent() {
        let record_type = thing();
        let mut a = record_type.instantiate();
        let b = record_type.instantiate();
        a.set("name", "abc").unwrap();
        assert!(b.get("name").is_none());
    }
}
