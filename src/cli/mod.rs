//! CLI module for mediafields
//!
//! Provides command-line interface for:
//! - fields: List the media field catalog
//! - inspect: Populate and print a media record from a probe dump
//! - check: Validate a single raw value against a field
//! - intervals: Filter sound intervals and build the silence plot series

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, KindArg};
pub use commands::{check, execute, fields, inspect, intervals, run, run_command, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_json_file, write_error, write_response};
