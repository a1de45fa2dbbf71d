//! # Metadata Probe
//!
//! A probe reports named properties grouped by logical track (general,
//! video, audio). Flattening turns them into the noisy name -> value source
//! record population consumes: `"<lowercase track type>_<property>"`.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::FieldValue;

use super::errors::{MediaError, MediaResult};

/// One logical track and its raw properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub track_type: String,
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
}

impl Track {
    pub fn new(track_type: impl Into<String>) -> Self {
        Self {
            track_type: track_type.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Adds a property, replacing any previous value
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

/// Metadata probing service
pub trait MetadataProbe: Send + Sync + fmt::Debug {
    /// Probe `path` and return its tracks
    fn probe(&self, path: &Path) -> MediaResult<Vec<Track>>;
}

/// Flattens tracks into `(track_property, value)` pairs, track order first.
pub fn flatten_tracks(tracks: &[Track]) -> Vec<(String, FieldValue)> {
    tracks
        .iter()
        .flat_map(|track| {
            let prefix = track.track_type.to_lowercase();
            track.properties.iter().map(move |(property, value)| {
                (format!("{}_{}", prefix, property), FieldValue::from(value.clone()))
            })
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct ProbeDump {
    tracks: Vec<Track>,
}

/// Probe backed by a pre-computed JSON dump: `{"tracks": [...]}`.
///
/// The probed media path is ignored; every call reads the dump.
#[derive(Debug, Clone)]
pub struct JsonProbe {
    dump: PathBuf,
}

impl JsonProbe {
    pub fn new(dump: impl Into<PathBuf>) -> Self {
        Self { dump: dump.into() }
    }

    pub fn dump(&self) -> &Path {
        &self.dump
    }

    /// Parses a dump from a string
    pub fn parse(content: &str) -> Result<Vec<Track>, serde_json::Error> {
        serde_json::from_str::<ProbeDump>(content).map(|dump| dump.tracks)
    }
}

impl MetadataProbe for JsonProbe {
    fn probe(&self, path: &Path) -> MediaResult<Vec<Track>> {
        let failure = |reason: String| MediaError::Probe {
            path: path.display().to_string(),
            reason,
        };
        let content = fs::read_to_string(&self.dump)
            .map_err(|e| failure(format!("cannot read {}: {}", self.dump.display(), e)))?;
        Self::parse(&content).map_err(|e| failure(format!("invalid dump: {}", e)))
    }
}
