//! # Media Files
//!
//! A `Media` is a probed file whose metadata populated and validated a
//! Video or Audio record. Opening either succeeds with every declared field
//! valid or fails; a half-populated media is never handed out.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::observability::{log_event_with_fields, Event};
use crate::registry::Record;
use crate::validation::{FieldValue, ValidationError, ValidationResult};

use super::catalog::{MediaCatalog, DATE_CREATED, DURATION, EXTENSION, FILE_NAME};
use super::errors::{MediaError, MediaResult};
use super::probe::{flatten_tracks, MetadataProbe};
use super::silence::{filter_intervals, PlotSeries, PlotSink, SilenceDetector, SilenceParams, SoundInterval};
use super::transcode::{normalize_format, output_path, Transcoder, EXTRACTED_AUDIO_FORMAT};

/// Media record kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
        }
    }

    /// Name of the declared record type
    pub fn type_name(&self) -> &'static str {
        match self {
            MediaKind::Video => "Video",
            MediaKind::Audio => "Audio",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated media file
#[derive(Debug)]
pub struct Media<'c> {
    catalog: &'c MediaCatalog,
    kind: MediaKind,
    path: PathBuf,
    record: Record,
    file_name: String,
    extension: String,
    duration_ms: i64,
    date_created: NaiveDateTime,
    /// Last computed intervals and the parameters they were computed with
    intervals: Option<(SilenceParams, Vec<SoundInterval>)>,
}

impl<'c> Media<'c> {
    /// Probes `path` and populates a `kind` record from the result.
    pub fn open(
        catalog: &'c MediaCatalog,
        kind: MediaKind,
        path: impl Into<PathBuf>,
        probe: &dyn MetadataProbe,
    ) -> MediaResult<Self> {
        let path = path.into();
        let tracks = probe.probe(&path)?;
        Self::from_properties(catalog, kind, path, flatten_tracks(&tracks))
    }

    /// Populates a `kind` record from already-flattened probe properties.
    ///
    /// # Errors
    ///
    /// The first field error; unknown properties are ignored.
    pub fn from_properties<I, K, V>(
        catalog: &'c MediaCatalog,
        kind: MediaKind,
        path: impl Into<PathBuf>,
        properties: I,
    ) -> MediaResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FieldValue>,
    {
        let path = path.into();
        let mut record = catalog.record_type(kind).instantiate();
        record.populate_with(catalog.registry(), properties)?;

        let media = Self {
            catalog,
            kind,
            file_name: text(&record, FILE_NAME)?.to_string(),
            extension: text(&record, EXTENSION)?.to_string(),
            duration_ms: int(&record, DURATION)?,
            date_created: datetime(&record, DATE_CREATED)?,
            path,
            record,
            intervals: None,
        };

        let path = media.path.display().to_string();
        log_event_with_fields(
            Event::MediaOpened,
            &[("kind", kind.as_str()), ("path", path.as_str())],
        );
        Ok(media)
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the populated record
    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Duration in milliseconds
    pub fn duration_ms(&self) -> i64 {
        self.duration_ms
    }

    pub fn date_created(&self) -> NaiveDateTime {
        self.date_created
    }

    /// Writes this video's audio track to `<file_name>.wav` next to the
    /// source and opens the result as audio.
    pub fn extract_audio(
        &self,
        transcoder: &dyn Transcoder,
        probe: &dyn MetadataProbe,
    ) -> MediaResult<Media<'c>> {
        self.require(MediaKind::Video, "extract_audio")?;
        let target = output_path(&self.path, &self.file_name, EXTRACTED_AUDIO_FORMAT);
        self.transcode_to(transcoder, target, probe)
    }

    /// Converts this audio to `format` (surrounding dots ignored) next to
    /// the source and opens the result.
    pub fn convert_audio(
        &self,
        format: &str,
        transcoder: &dyn Transcoder,
        probe: &dyn MetadataProbe,
    ) -> MediaResult<Media<'c>> {
        self.require(MediaKind::Audio, "convert_audio")?;
        let format = normalize_format(format)?;
        let target = output_path(&self.path, &self.file_name, format);
        self.transcode_to(transcoder, target, probe)
    }

    /// Non-silent intervals at least `params.min_sound_len` long.
    ///
    /// Results are cached per parameter set; different parameters
    /// recompute and replace the cache.
    pub fn sound_intervals(
        &mut self,
        detector: &dyn SilenceDetector,
        params: &SilenceParams,
    ) -> MediaResult<&[SoundInterval]> {
        self.require(MediaKind::Audio, "sound_intervals")?;

        let cached = matches!(&self.intervals, Some((computed_with, _)) if computed_with == params);
        if !cached {
            params.validate()?;
            let raw = detector.detect_nonsilent(&self.path, params)?;
            raw.iter().try_for_each(SoundInterval::check)?;
            let kept = filter_intervals(raw, params.min_sound_len);

            let path = self.path.display().to_string();
            let count = kept.len().to_string();
            log_event_with_fields(
                Event::SoundIntervalsComputed,
                &[("path", path.as_str()), ("count", count.as_str())],
            );
            self.intervals = Some((*params, kept));
        }

        Ok(self
            .intervals
            .as_ref()
            .map(|(_, intervals)| intervals.as_slice())
            .unwrap_or_default())
    }

    /// Renders the sound/silence step series to `sink` and returns it.
    pub fn plot_silence(
        &mut self,
        detector: &dyn SilenceDetector,
        sink: &mut dyn PlotSink,
        params: &SilenceParams,
    ) -> MediaResult<PlotSeries> {
        let duration_ms = u64::try_from(self.duration_ms).unwrap_or_default();
        let intervals = self.sound_intervals(detector, params)?;
        let series = PlotSeries::from_intervals(intervals, duration_ms);
        sink.render(&series)?;
        Ok(series)
    }

    /// Returns kind, path and validated fields as JSON
    pub fn to_json(&self) -> Value {
        json!({
            "kind": self.kind.as_str(),
            "path": self.path.display().to_string(),
            "fields": self.record.to_json(),
        })
    }

    fn require(&self, expected: MediaKind, operation: &'static str) -> MediaResult<()> {
        if self.kind != expected {
            return Err(MediaError::WrongKind {
                operation,
                expected,
                actual: self.kind,
            });
        }
        Ok(())
    }

    fn transcode_to(
        &self,
        transcoder: &dyn Transcoder,
        target: PathBuf,
        probe: &dyn MetadataProbe,
    ) -> MediaResult<Media<'c>> {
        transcoder.transcode(&self.path, &target)?;

        let source = self.path.display().to_string();
        let output = target.display().to_string();
        log_event_with_fields(
            Event::TranscodeComplete,
            &[("source", source.as_str()), ("target", output.as_str())],
        );
        Media::open(self.catalog, MediaKind::Audio, target, probe)
    }
}

fn required<'r>(record: &'r Record, field: &str) -> ValidationResult<&'r FieldValue> {
    record
        .get(field)
        .ok_or_else(|| ValidationError::missing(field).on_record(record.record_type().name()))
}

fn mismatch(field: &str, expected: &str, actual: &FieldValue) -> ValidationError {
    ValidationError::TypeMismatch {
        field: field.to_string(),
        expected: expected.to_string(),
        actual: actual.type_name(),
    }
}

fn text<'r>(record: &'r Record, field: &str) -> ValidationResult<&'r str> {
    let value = required(record, field)?;
    value.as_str().ok_or_else(|| mismatch(field, "str", value))
}

fn int(record: &Record, field: &str) -> ValidationResult<i64> {
    let value = required(record, field)?;
    value.as_int().ok_or_else(|| mismatch(field, "int", value))
}

fn datetime(record: &Record, field: &str) -> ValidationResult<NaiveDateTime> {
    let value = required(record, field)?;
    value.as_datetime().ok_or_else(|| mismatch(field, "datetime", value))
}
