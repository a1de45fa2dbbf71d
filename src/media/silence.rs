//! # Silence Detection and Plotting
//!
//! Detection itself is a collaborator; this module owns the parameters,
//! the minimum-length filter and the step series used to plot sound
//! against silence.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{MediaError, MediaResult};

/// Silence detection parameters (milliseconds, dBFS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SilenceParams {
    /// Shortest sound interval kept
    pub min_sound_len: u64,
    /// Shortest gap counted as silence
    pub min_silence_len: u64,
    /// Loudness below which audio is silent
    pub silence_thresh: i32,
    /// Detection step
    pub seek_step: u64,
}

impl Default for SilenceParams {
    fn default() -> Self {
        Self {
            min_sound_len: 500,
            min_silence_len: 500,
            silence_thresh: -24,
            seek_step: 10,
        }
    }
}

impl SilenceParams {
    /// Checks that a detector can use these parameters
    pub fn validate(&self) -> MediaResult<()> {
        if self.seek_step == 0 {
            return Err(MediaError::InvalidParameters(
                "seek_step must be greater than 0".into(),
            ));
        }
        if self.min_silence_len == 0 {
            return Err(MediaError::InvalidParameters(
                "min_silence_len must be greater than 0".into(),
            ));
        }
        if self.silence_thresh > 0 {
            return Err(MediaError::InvalidParameters(format!(
                "silence_thresh must be at most 0 dBFS, got {}",
                self.silence_thresh
            )));
        }
        Ok(())
    }
}

/// A non-silent stretch of audio, `[start_ms, end_ms)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundInterval {
    pub start_ms: u64,
    pub end_ms: u64,
}

impl SoundInterval {
    pub fn new(start_ms: u64, end_ms: u64) -> Self {
        Self { start_ms, end_ms }
    }

    /// Builds an interval, rejecting one that ends before it starts
    pub fn try_new(start_ms: u64, end_ms: u64) -> MediaResult<Self> {
        let interval = Self::new(start_ms, end_ms);
        interval.check()?;
        Ok(interval)
    }

    /// Rejects an interval that ends before it starts
    pub fn check(&self) -> MediaResult<()> {
        if self.start_ms > self.end_ms {
            return Err(MediaError::InvalidInterval {
                start_ms: self.start_ms,
                end_ms: self.end_ms,
            });
        }
        Ok(())
    }

    pub fn len_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

impl TryFrom<(u64, u64)> for SoundInterval {
    type Error = MediaError;

    fn try_from((start_ms, end_ms): (u64, u64)) -> MediaResult<Self> {
        Self::try_new(start_ms, end_ms)
    }
}

/// Silence detection service
pub trait SilenceDetector: Send + Sync + fmt::Debug {
    /// Returns the non-silent intervals of the audio at `path`
    fn detect_nonsilent(&self, path: &Path, params: &SilenceParams)
        -> MediaResult<Vec<SoundInterval>>;
}

/// Drops intervals shorter than `min_sound_len`
pub fn filter_intervals(raw: Vec<SoundInterval>, min_sound_len: u64) -> Vec<SoundInterval> {
    raw.into_iter()
        .filter(|interval| interval.len_ms() >= min_sound_len)
        .collect()
}

/// Detector replaying intervals computed elsewhere.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedIntervals {
    intervals: Vec<SoundInterval>,
}

impl PrecomputedIntervals {
    pub fn new(intervals: Vec<SoundInterval>) -> Self {
        Self { intervals }
    }
}

impl SilenceDetector for PrecomputedIntervals {
    fn detect_nonsilent(&self, _path: &Path, _params: &SilenceParams) -> MediaResult<Vec<SoundInterval>> {
        Ok(self.intervals.clone())
    }
}

/// Step series of sound (1) against silence (0) over time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlotSeries {
    pub x: Vec<u64>,
    pub y: Vec<u8>,
}

impl PlotSeries {
    /// Starts at (0,0), rises and falls at each interval edge, ends at
    /// (duration_ms,0).
    pub fn from_intervals(intervals: &[SoundInterval], duration_ms: u64) -> Self {
        let mut x = Vec::with_capacity(intervals.len() * 4 + 2);
        let mut y = Vec::with_capacity(intervals.len() * 4 + 2);
        x.push(0);
        y.push(0);
        for interval in intervals {
            x.extend([interval.start_ms, interval.start_ms, interval.end_ms, interval.end_ms]);
            y.extend([0, 1, 1, 0]);
        }
        x.push(duration_ms);
        y.push(0);
        Self { x, y }
    }

    pub fn points(&self) -> impl Iterator<Item = (u64, u8)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

/// Plot rendering sink
pub trait PlotSink {
    fn render(&mut self, series: &PlotSeries) -> MediaResult<()>;
}

/// Collects rendered series
impl PlotSink for Vec<PlotSeries> {
    fn render(&mut self, series: &PlotSeries) -> MediaResult<()> {
        self.push(series.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = SilenceParams::default();
        assert_eq!(params.min_sound_len, 500);
        assert_eq!(params.min_silence_len, 500);
        assert_eq!(params.silence_thresh, -24);
        assert_eq!(params.seek_step, 10);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_params_partial_json() {
        let params: SilenceParams = serde_json::from_str(r#"{"silence_thresh": -40}"#).unwrap();
        assert_eq!(params.silence_thresh, -40);
        assert_eq!(params.seek_step, 10);
    }

    #[test]
    fn test_invalid_params() {
        let zero_step = SilenceParams {
            seek_step: 0,
            ..SilenceParams::default()
        };
        assert!(zero_step.validate().is_err());

        let positive = SilenceParams {
            silence_thresh: 3,
            ..SilenceParams::default()
        };
        assert_eq!(positive.validate().unwrap_err().code(), "MEDIA_INVALID_PARAMETERS");
    }

    #[test]
    fn test_filter_keeps_exact_minimum() {
        let raw: Vec<SoundInterval> = vec![(0, 499), (1000, 1500), (2000, 4000)]
            .into_iter()
            .map(|(start, end)| SoundInterval::new(start, end))
            .collect();
        assert_eq!(
            filter_intervals(raw, 500),
            vec![SoundInterval::new(1000, 1500), SoundInterval::new(2000, 4000)]
        );
    }

    #[test]
    fn test_reversed_interval_rejected() {
        assert_eq!(
            SoundInterval::try_new(500, 100).unwrap_err(),
            MediaError::InvalidInterval {
                start_ms: 500,
                end_ms: 100,
            }
        );
        assert_eq!(SoundInterval::try_from((300, 300)).unwrap().len_ms(), 0);
        assert_eq!(
            SoundInterval::try_from((900, 100)).unwrap_err().code(),
            "MEDIA_INVALID_INTERVAL"
        );
    }

    #[test]
    fn test_plot_series_shape() {
        let series = PlotSeries::from_intervals(
            &[SoundInterval::new(100, 700), SoundInterval::new(900, 1600)],
            2000,
        );
        assert_eq!(series.x, vec![0, 100, 100, 700, 700, 900, 900, 1600, 1600, 2000]);
        assert_eq!(series.y, vec![0, 0, 1, 1, 0, 0, 1, 1, 0, 0]);
    }

    #[test]
    fn test_plot_series_without_sound() {
        let series = PlotSeries::from_intervals(&[], 1200);
        assert_eq!(series.points().collect::<Vec<_>>(), vec![(0, 0), (1200, 0)]);
    }

    #[test]
    fn test_vec_sink_collects() {
        let mut sink: Vec<PlotSeries> = Vec::new();
        let series = PlotSeries::from_intervals(&[], 10);
        sink.render(&series).unwrap();
        assert_eq!(sink, vec![series]);
    }
}
