//! mediafields - declarative, validated media metadata
//!
//! Field kinds name a validator strategy; record types declare the kinds
//! they carry; every write to a record field goes through its validator.

pub mod cli;
pub mod media;
pub mod observability;
pub mod registry;
pub mod validation;
