//! Media field catalog
//!
//! The registry of media field kinds, the aliases under which a metadata
//! probe reports them, and the Video and Audio record types declared from
//! it. Built once per process.

use std::sync::{Arc, OnceLock};

use crate::registry::{FieldKind, FieldRegistry, RecordType};
use crate::validation::ValidationResult;

use super::file::MediaKind;

pub const FILE_NAME: &str = "file_name";
pub const EXTENSION: &str = "extension";
pub const DURATION: &str = "duration";
pub const DATE_CREATED: &str = "date_created";
pub const FORMAT: &str = "format";

/// Characters allowed in file names and extensions
pub const FILE_NAME_CHARACTERS: &str =
    "-_.() abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Longest accepted duration in milliseconds (100 hours)
pub const MAX_DURATION_MS: i64 = 360_000_000;

/// Creation date layouts reported by probes, tried in order
pub const DATE_FORMATS: [&str; 2] = ["%H:%M:%S %d/%m/%Y", "%Z %Y-%m-%d %H:%M:%S%.f"];

/// Fields declared by both Video and Audio
pub const MEDIA_FIELDS: [&str; 4] = [FILE_NAME, EXTENSION, DURATION, DATE_CREATED];

/// Probe property name -> canonical field
const PROBE_ALIASES: [(&str, &str); 5] = [
    ("general_file_name", FILE_NAME),
    ("general_file_extension", EXTENSION),
    ("general_duration", DURATION),
    ("general_file_creation_date", DATE_CREATED),
    ("general_format", FORMAT),
];

/// Builds the media field registry
pub fn media_registry() -> ValidationResult<FieldRegistry> {
    let mut builder = FieldRegistry::builder().kinds([
        FieldKind::string(FILE_NAME, 1, Some(99), Some(FILE_NAME_CHARACTERS)),
        FieldKind::string(EXTENSION, 1, Some(5), Some(FILE_NAME_CHARACTERS)),
        FieldKind::int(DURATION, Some(1), Some(MAX_DURATION_MS)),
        FieldKind::date(DATE_CREATED, DATE_FORMATS, None, None),
        FieldKind::exists(FORMAT),
    ])?;
    for (alias, canonical) in PROBE_ALIASES {
        builder = builder.alias(alias, canonical)?;
    }
    Ok(builder.build())
}

/// Media registry plus the record types declared from it.
#[derive(Debug)]
pub struct MediaCatalog {
    registry: FieldRegistry,
    video: Arc<RecordType>,
    audio: Arc<RecordType>,
}

impl MediaCatalog {
    /// Builds the standard media catalog
    pub fn new() -> ValidationResult<Self> {
        Self::with_registry(media_registry()?)
    }

    /// Declares Video and Audio against `registry`.
    ///
    /// `registry` must define every name in [`MEDIA_FIELDS`]; an extended
    /// media registry works, a foreign one fails with `Configuration`.
    pub fn with_registry(registry: FieldRegistry) -> ValidationResult<Self> {
        let video = RecordType::declare_from(MediaKind::Video.type_name(), &registry, &MEDIA_FIELDS)?;
        let audio = RecordType::declare_from(MediaKind::Audio.type_name(), &registry, &MEDIA_FIELDS)?;
        Ok(Self {
            registry,
            video,
            audio,
        })
    }

    /// Returns the process-wide catalog, built on first use.
    pub fn global() -> ValidationResult<&'static MediaCatalog> {
        static CATALOG: OnceLock<ValidationResult<MediaCatalog>> = OnceLock::new();
        CATALOG.get_or_init(MediaCatalog::new).as_ref().map_err(Clone::clone)
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn video(&self) -> &Arc<RecordType> {
        &self.video
    }

    pub fn audio(&self) -> &Arc<RecordType> {
        &self.audio
    }

    /// Returns the record type for `kind`
    pub fn record_type(&self, kind: MediaKind) -> &Arc<RecordType> {
        match kind {
            MediaKind::Video => &self.video,
            MediaKind::Audio => &self.audio,
        }
    }
}
