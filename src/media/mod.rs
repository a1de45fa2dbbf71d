//! # Media
//!
//! Video and Audio records declared from the media field catalog, plus the
//! collaborator seams around them: metadata probing, transcoding, silence
//! detection and plotting. Collaborators are traits; this crate ships only
//! file-backed and replaying implementations.

pub mod catalog;
mod errors;
mod file;
mod probe;
mod silence;
mod transcode;

pub use catalog::{media_registry, MediaCatalog};
pub use errors::{MediaError, MediaResult};
pub use file::{Media, MediaKind};
pub use probe::{flatten_tracks, JsonProbe, MetadataProbe, Track};
pub use silence::{
    filter_intervals, PlotSeries, PlotSink, PrecomputedIntervals, SilenceDetector, SilenceParams,
    SoundInterval,
};
pub use transcode::{normalize_format, output_path, Transcoder, EXTRACTED_AUDIO_FORMAT};
