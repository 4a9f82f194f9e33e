//! Judgment strategy interface
//!
//! A strategy classifies each loudness-valid frame as chord or melody, records
//! its own counters, and turns the merged statistics into a file verdict.

use serde::Serialize;
use std::collections::BTreeMap;

use super::stats::StatsBundle;
use crate::config::JudgmentConfig;
use crate::core::pitch::MultiPitchMatrix;
use crate::detection::Verdict;

/// Classification of a single valid frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameClass {
    Chord,
    Melody,
}

/// Output of a strategy's frame pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameAnalysis {
    /// One class per valid frame, in the order the frames were given
    pub classes: Vec<FrameClass>,
    pub chord_frames: usize,
    pub melody_frames: usize,
    /// Strategy-specific counters and ratios
    pub metrics: BTreeMap<String, f64>,
}

impl FrameAnalysis {
    pub fn with_capacity(frames: usize) -> Self {
        Self {
            classes: Vec::with_capacity(frames),
            ..Default::default()
        }
    }

    pub fn push(&mut self, class: FrameClass) {
        match class {
            FrameClass::Chord => self.chord_frames += 1,
            FrameClass::Melody => self.melody_frames += 1,
        }
        self.classes.push(class);
    }

    pub fn set_metric(&mut self, key: &str, value: f64) {
        self.metrics.insert(key.to_string(), value);
    }
}

/// Pluggable chord/melody judgment
pub trait JudgmentStrategy: Send + Sync {
    /// Registry name (the `judgment_method` config value)
    fn name(&self) -> &'static str;

    /// Classify every valid frame and gather strategy counters
    fn analyze_frames(
        &self,
        valid_frames: &[usize],
        pitches: &MultiPitchMatrix,
        config: &JudgmentConfig,
    ) -> FrameAnalysis;

    /// File-level verdict from merged statistics.
    ///
    /// Must return melody when `analyzed_frames` is 0.
    fn make_judgment(
        &self,
        stats: &StatsBundle,
        analyzed_frames: usize,
        config: &JudgmentConfig,
    ) -> Verdict;

    /// Human-readable report; strategies append their own lines
    fn format_stats(&self, stats: &StatsBundle) -> String {
        format_base_stats(stats)
    }
}

/// Report lines shared by every strategy
pub fn format_base_stats(stats: &StatsBundle) -> String {
    let analyzed = stats.analyzed_frames();
    let max_volume = match stats.max_volume_db {
        Some(db) => format!("{:.1}dB", db),
        None => "n/a".to_string(),
    };

    [
        format!("Max Frame Volume: {}", max_volume),
        format!(
            "Analyzed Frames: {} ({:.1}% of total)",
            analyzed,
            stats.percent_of_total(analyzed)
        ),
        format!(
            "- Skipped: {:3} ({:5.1}%)",
            stats.skip_frames,
            stats.percent_of_total(stats.skip_frames)
        ),
        format!(
            "- Chord:   {:3} ({:5.1}%)",
            stats.chord_frames,
            stats.percent_of_total(stats.chord_frames)
        ),
        format!(
            "- Melody:  {:3} ({:5.1}%)",
            stats.melody_frames,
            stats.percent_of_total(stats.melody_frames)
        ),
    ]
    .join("\n")
}
