//! Declarative field registry and binder
//!
//! Record types are declared as ordered lists of field kinds. Declaring a
//! type binds one validator per field; records of that type own their
//! values and route every write through the bound validator.
//!
//! ```ignore
//! let record_type = RecordType::declare_from("Video", &registry, &["file_name", "duration"])?;
//! let mut record = record_type.instantiate();
//! record.populate_with(&registry, probe_properties)?;
//! ```

mod binder;
mod catalog;
mod kind;
mod record;

pub use binder::{BoundField, RecordType};
pub use catalog::{FieldRegistry, FieldRegistryBuilder};
pub use kind::{FieldKind, ValidatorSpec};
pub use record::{Record, RecordState};
