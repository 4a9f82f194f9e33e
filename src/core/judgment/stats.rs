//! Per-file frame statistics

use serde::Serialize;
use std::collections::BTreeMap;

/// Fraction `count / total`, 0 when `total` is 0
pub fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Statistics gathered for one file: loudness counts from the aggregator plus
/// the strategy's own counters and ratios.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsBundle {
    pub total_frames: usize,
    pub skip_frames: usize,
    pub chord_frames: usize,
    pub melody_frames: usize,
    /// Loudest frame in dB; None when the waveform is shorter than one frame
    pub max_volume_db: Option<f32>,
    /// Strategy-specific values keyed by name (e.g. `low_chord_ratio`)
    pub metrics: BTreeMap<String, f64>,
}

impl StatsBundle {
    /// Frames that passed the loudness filter
    pub fn analyzed_frames(&self) -> usize {
        self.total_frames.saturating_sub(self.skip_frames)
    }

    /// Named strategy metric, 0 if the strategy did not record it
    pub fn metric(&self, key: &str) -> f64 {
        self.metrics.get(key).copied().unwrap_or(0.0)
    }

    /// Named metric interpreted as a frame count
    pub fn count(&self, key: &str) -> usize {
        self.metric(key).max(0.0) as usize
    }

    /// Percentage of total frames
    pub fn percent_of_total(&self, count: usize) -> f64 {
        ratio(count, self.total_frames) * 100.0
    }
}
