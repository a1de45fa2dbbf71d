//! CLI command implementations
//!
//! Each command computes a JSON `data` value; `run_command` writes it as
//! the single response object, or writes the error object and logs the
//! failure.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::media::{
    JsonProbe, Media, MediaCatalog, MediaKind, PlotSeries, PrecomputedIntervals, SilenceParams,
    SoundInterval,
};
use crate::observability::{log_event_with_fields, Event, Logger, Severity};
use crate::validation::FieldValue;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_json_file, write_error, write_response};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Minimum log severity (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Silence detection parameters (optional, each field defaulted)
    #[serde(default)]
    pub silence: SilenceParams,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            silence: SilenceParams::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load from `path` if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> CliResult<()> {
        if Severity::parse(&self.log_level).is_none() {
            return Err(CliError::config_error(format!(
                "Invalid log_level: '{}'. Expected trace, info, warn, error or fatal.",
                self.log_level
            )));
        }

        self.silence
            .validate()
            .map_err(|e| CliError::config_error(e.to_string()))?;

        Ok(())
    }

    /// Configured minimum log severity
    pub fn severity(&self) -> Severity {
        Severity::parse(&self.log_level).unwrap_or(Severity::Info)
    }

    /// Installs the log level for the rest of the process
    pub fn apply(&self) {
        Logger::set_min_severity(self.severity());
        log_event_with_fields(Event::ConfigLoaded, &[("log_level", self.severity().as_str())]);
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run a command and write its response to stdout
pub fn run_command(cmd: Command) -> CliResult<()> {
    match execute(cmd) {
        Ok(data) => write_response(data),
        Err(e) => {
            log_event_with_fields(
                Event::CommandFailed,
                &[("code", e.code_str()), ("message", e.message())],
            );
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Run a command against the process-wide media catalog
pub fn execute(cmd: Command) -> CliResult<Value> {
    let catalog = MediaCatalog::global()?;
    match cmd {
        Command::Fields => fields(catalog),
        Command::Inspect {
            kind,
            probe,
            path,
            config,
        } => inspect(catalog, kind.into(), &probe, path.as_deref(), config.as_deref()),
        Command::Check { field, value } => check(catalog, &field, &value),
        Command::Intervals {
            probe,
            intervals: raw,
            path,
            config,
        } => intervals(catalog, &probe, &raw, path.as_deref(), config.as_deref()),
    }
}

/// List field kinds with their aliases, and the declared record types
pub fn fields(catalog: &MediaCatalog) -> CliResult<Value> {
    let registry = catalog.registry();
    let mut kinds = Vec::with_capacity(registry.len());
    for kind in registry.kinds() {
        let mut entry = serde_json::to_value(kind)?;
        if let Value::Object(map) = &mut entry {
            map.insert("aliases".to_string(), json!(registry.aliases_of(&kind.name)));
        }
        kinds.push(entry);
    }

    let mut record_types = serde_json::Map::new();
    for kind in [MediaKind::Video, MediaKind::Audio] {
        let record_type = catalog.record_type(kind);
        record_types.insert(
            record_type.name().to_string(),
            json!(record_type.field_names().collect::<Vec<_>>()),
        );
    }

    Ok(json!({
        "kinds": kinds,
        "record_types": record_types,
    }))
}

/// Populate a media record from a probe dump
pub fn inspect(
    catalog: &MediaCatalog,
    kind: MediaKind,
    probe: &Path,
    path: Option<&Path>,
    config: Option<&Path>,
) -> CliResult<Value> {
    Config::load_or_default(config)?.apply();

    let probe = JsonProbe::new(probe);
    let path = path.unwrap_or(probe.dump()).to_path_buf();
    let media = Media::open(catalog, kind, path, &probe)?;
    Ok(media.to_json())
}

/// Validate one raw value against a field; non-JSON input is a string
pub fn check(catalog: &MediaCatalog, field: &str, raw: &str) -> CliResult<Value> {
    let kind = catalog
        .registry()
        .resolve(field)
        .ok_or_else(|| CliError::unknown_field(field))?;

    let raw = serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    let validator = kind.validator()?;
    let normalized = validator.validate(&kind.name, FieldValue::from(raw))?;

    Ok(json!({
        "field": kind.name,
        "validator": kind.spec.kind().name(),
        "value": normalized.to_json(),
    }))
}

/// Filter pre-computed intervals of an audio file and build its plot series
pub fn intervals(
    catalog: &MediaCatalog,
    probe: &Path,
    raw_intervals: &Path,
    path: Option<&Path>,
    config: Option<&Path>,
) -> CliResult<Value> {
    let config = Config::load_or_default(config)?;
    config.apply();

    let raw: Vec<(u64, u64)> = read_json_file(raw_intervals)?;
    let raw = raw
        .into_iter()
        .map(SoundInterval::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            CliError::invalid_input(format!("Invalid interval in {}: {}", raw_intervals.display(), e))
        })?;
    let detector = PrecomputedIntervals::new(raw);

    let probe = JsonProbe::new(probe);
    let path = path.unwrap_or(probe.dump()).to_path_buf();
    let mut media = Media::open(catalog, MediaKind::Audio, path, &probe)?;

    let mut sink: Vec<PlotSeries> = Vec::new();
    let series = media.plot_silence(&detector, &mut sink, &config.silence)?;
    let kept = media.sound_intervals(&detector, &config.silence)?.to_vec();

    Ok(json!({
        "path": media.path().display().to_string(),
        "duration_ms": media.duration_ms(),
        "params": config.silence,
        "intervals": kept,
        "plot": series,
    }))
}

#[cfg(test)]
mod tests {
    use super::super::errors::CliErrorCode;
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn catalog() -> &'static MediaCatalog {
        MediaCatalog::global().unwrap()
    }

    fn write_dump(temp_dir: &TempDir, duration: Value) -> PathBuf {
        let path = temp_dir.path().join("clip.json");
        let dump = json!({
            "tracks": [
                {
                    "track_type": "General",
                    "properties": {
                        "file_name": "clip",
                        "file_extension": "wav",
                        "duration": duration,
                        "file_creation_date": "UTC 2020-11-15 13:14:25.000",
                        "format": "Wave"
                    }
                },
                {"track_type": "Audio", "properties": {"sampling_rate": 44100}}
            ]
        });
        fs::write(&path, dump.to_string()).unwrap();
        path
    }

    #[test]
    fn test_config_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("mediafields.json");
        fs::write(&config_path, "{}").unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.severity(), Severity::Info);
        assert_eq!(Config::load_or_default(None).unwrap(), Config::default());
    }

    #[test]
    fn test_config_validates_log_level() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("mediafields.json");
        fs::write(&config_path, json!({"log_level": "verbose"}).to_string()).unwrap();

        let err = Config::load(&config_path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_config_validates_silence() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("mediafields.json");
        fs::write(
            &config_path,
            json!({"silence": {"silence_thresh": 6}}).to_string(),
        )
        .unwrap();

        assert!(Config::load(&config_path).is_err());
    }

    #[test]
    fn test_fields_lists_kinds_and_aliases() {
        let data = fields(catalog()).unwrap();
        let kinds = data["kinds"].as_array().unwrap();
        assert_eq!(kinds.len(), 5);
        assert_eq!(kinds[2]["name"], "duration");
        assert_eq!(kinds[2]["validator"], "int");
        assert_eq!(kinds[2]["aliases"], json!(["general_duration"]));
        assert_eq!(
            data["record_types"]["Audio"],
            json!(["file_name", "extension", "duration", "date_created"])
        );
    }

    #[test]
    fn test_check_normalizes_and_resolves_aliases() {
        let data = check(catalog(), "general_file_creation_date", "13:14:25 15/11/2020").unwrap();
        assert_eq!(data["field"], "date_created");
        assert_eq!(data["value"], "2020-11-15T13:14:25");

        let data = check(catalog(), "duration", "1200").unwrap();
        assert_eq!(data["value"], 1200);
    }

    #[test]
    fn test_check_rejections() {
        let err = check(catalog(), "duration", "true").unwrap_err();
        assert_eq!(err.code_str(), "MEDIA_FIELD_TYPE");

        let err = check(catalog(), "file_name", "\"a/b\"").unwrap_err();
        assert_eq!(err.code_str(), "MEDIA_FIELD_CHARACTER");

        let err = check(catalog(), "bitrate", "1").unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::UnknownField);
    }

    #[test]
    fn test_inspect_prints_validated_fields() {
        let temp_dir = TempDir::new().unwrap();
        let dump = write_dump(&temp_dir, json!(2000));

        let data = inspect(catalog(), MediaKind::Audio, &dump, None, None).unwrap();
        assert_eq!(data["kind"], "audio");
        assert_eq!(data["fields"]["duration"], 2000);
        assert_eq!(data["fields"]["date_created"], "2020-11-15T13:14:25");
        assert!(data["fields"].get("format").is_none());
    }

    #[test]
    fn test_inspect_rejects_invalid_dump() {
        let temp_dir = TempDir::new().unwrap();
        let dump = write_dump(&temp_dir, json!(-5));

        let err = inspect(catalog(), MediaKind::Video, &dump, None, None).unwrap_err();
        assert_eq!(err.code_str(), "MEDIA_FIELD_RANGE");
    }

    #[test]
    fn test_intervals_filters_and_plots() {
        let temp_dir = TempDir::new().unwrap();
        let dump = write_dump(&temp_dir, json!(3000));
        let raw = temp_dir.path().join("raw.json");
        fs::write(&raw, "[[0, 200], [500, 1500], [2000, 2600]]").unwrap();

        let data = intervals(catalog(), &dump, &raw, None, None).unwrap();
        assert_eq!(
            data["intervals"],
            json!([
                {"start_ms": 500, "end_ms": 1500},
                {"start_ms": 2000, "end_ms": 2600}
            ])
        );
        assert_eq!(
            data["plot"]["x"],
            json!([0, 500, 500, 1500, 1500, 2000, 2000, 2600, 2600, 3000])
        );
        assert_eq!(data["params"]["min_sound_len"], 500);
    }

    #[test]
    fn test_intervals_rejects_malformed_input() {
        let temp_dir = TempDir::new().unwrap();
        let dump = write_dump(&temp_dir, json!(3000));
        let raw = temp_dir.path().join("raw.json");
        fs::write(&raw, r#"{"intervals": []}"#).unwrap();

        let err = intervals(catalog(), &dump, &raw, None, None).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::InvalidInput);
    }

    #[test]
    fn test_intervals_rejects_reversed_interval() {
        let temp_dir = TempDir::new().unwrap();
        let dump = write_dump(&temp_dir, json!(3000));
        let raw = temp_dir.path().join("raw.json");
        fs::write(&raw, "[[0, 800], [500, 100]]").unwrap();

        let err = intervals(catalog(), &dump, &raw, None, None).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::InvalidInput);
        assert!(err.to_string().contains("[500, 100)"));
    }
}
