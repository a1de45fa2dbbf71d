//! Observable events
//!
//! Events are explicit and typed. The validator framework never emits
//! events for rejected values; callers decide how to surface those.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Declaration
    /// A field registry finished building
    RegistryBuilt,
    /// Validators installed for a record type
    RecordTypeDeclared,

    // Population
    /// A record passed its completeness check
    PopulateComplete,
    /// Source entries that matched no declared field
    PopulateIgnoredFields,

    // Configuration
    ConfigLoaded,

    // Media
    /// Media file probed and validated
    MediaOpened,
    /// Transcoder produced a new file
    TranscodeComplete,
    /// Non-silent intervals computed for a parameter set
    SoundIntervalsComputed,

    // CLI
    CommandFailed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::RegistryBuilt => "REGISTRY_BUILT",
            Event::RecordTypeDeclared => "RECORD_TYPE_DECLARED",
            Event::PopulateComplete => "POPULATE_COMPLETE",
            Event::PopulateIgnoredFields => "POPULATE_IGNORED_FIELDS",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::MediaOpened => "MEDIA_OPENED",
            Event::TranscodeComplete => "TRANSCODE_COMPLETE",
            Event::SoundIntervalsComputed => "SOUND_INTERVALS_COMPUTED",
            Event::CommandFailed => "COMMAND_FAILED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::PopulateComplete | Event::PopulateIgnoredFields | Event::RegistryBuilt => {
                Severity::Trace
            }
            Event::CommandFailed => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
