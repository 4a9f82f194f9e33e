// src/core/judgment/pitch_distribution.rs
//
// Pitch-distribution judgment: active pitches are split into low, mid and
// high registers. Chords tend to spread across registers or stack several
// notes in the middle; melodies stay in one register.

use super::stats::{ratio, StatsBundle};
use super::strategy::{format_base_stats, FrameAnalysis, FrameClass, JudgmentStrategy};
use crate::config::JudgmentConfig;
use crate::core::pitch::MultiPitchMatrix;
use crate::detection::Verdict;

pub const LOW_RANGE_FRAMES: &str = "low_range_frames";
pub const MID_RANGE_FRAMES: &str = "mid_range_frames";
pub const HIGH_RANGE_FRAMES: &str = "high_range_frames";
pub const WIDE_RANGE_FRAMES: &str = "wide_range_frames";
pub const WIDE_RANGE_RATIO: &str = "wide_range_ratio";
pub const LOW_RANGE_RATIO: &str = "low_range_ratio";

/// Note counts per register for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BandCounts {
    pub low: usize,
    pub mid: usize,
    pub high: usize,
}

impl BandCounts {
    /// Split MIDI pitches: low <= `low_threshold` < mid <= `high_threshold` < high
    pub fn from_pitches(active: &[f32], low_threshold: f32, high_threshold: f32) -> Self {
        let mut counts = Self::default();
        for &p in active {
            if p <= low_threshold {
                counts.low += 1;
            } else if p <= high_threshold {
                counts.mid += 1;
            } else {
                counts.high += 1;
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.low + self.mid + self.high
    }

    /// Number of registers with at least one note
    pub fn used_bands(&self) -> usize {
        [self.low, self.mid, self.high].iter().filter(|&&n| n > 0).count()
    }

    pub fn is_wide(&self) -> bool {
        self.used_bands() >= 2
    }

    pub fn is_chord(&self) -> bool {
        let low_with_other = self.low > 0 && (self.mid > 0 || self.high > 0);
        let mid_cluster = self.total() >= 3 && self.mid >= 2;
        low_with_other || mid_cluster || self.is_wide()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PitchDistributionStrategy;

impl PitchDistributionStrategy {
    pub const NAME: &'static str = "pitch_distribution";
}

impl JudgmentStrategy for PitchDistributionStrategy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn analyze_frames(
        &self,
        valid_frames: &[usize],
        pitches: &MultiPitchMatrix,
        config: &JudgmentConfig,
    ) -> FrameAnalysis {
        let mut analysis = FrameAnalysis::with_capacity(valid_frames.len());
        let (mut low, mut mid, mut high, mut wide) = (0usize, 0usize, 0usize, 0usize);

        for &frame in valid_frames {
            let active = pitches.active_pitches(frame);
            if active.is_empty() {
                analysis.push(FrameClass::Melody);
                continue;
            }

            let bands = BandCounts::from_pitches(
                &active,
                config.low_pitch_threshold,
                config.high_pitch_threshold,
            );
            low += usize::from(bands.low > 0);
            mid += usize::from(bands.mid > 0);
            high += usize::from(bands.high > 0);
            wide += usize::from(bands.is_wide());

            analysis.push(if bands.is_chord() {
                FrameClass::Chord
            } else {
                FrameClass::Melody
            });
        }

        let analyzed = valid_frames.len();
        analysis.set_metric(LOW_RANGE_FRAMES, low as f64);
        analysis.set_metric(MID_RANGE_FRAMES, mid as f64);
        analysis.set_metric(HIGH_RANGE_FRAMES, high as f64);
        analysis.set_metric(WIDE_RANGE_FRAMES, wide as f64);
        analysis.set_metric(WIDE_RANGE_RATIO, ratio(wide, analyzed));
        analysis.set_metric(LOW_RANGE_RATIO, ratio(low, analyzed));
        analysis
    }

    fn make_judgment(
        &self,
        stats: &StatsBundle,
        analyzed_frames: usize,
        config: &JudgmentConfig,
    ) -> Verdict {
        if analyzed_frames == 0 {
            return Verdict::Melody;
        }

        let wide_range_ratio = ratio(stats.count(WIDE_RANGE_FRAMES), analyzed_frames);
        let low_range_ratio = ratio(stats.count(LOW_RANGE_FRAMES), analyzed_frames);

        let is_chord = wide_range_ratio >= config.wide_range_threshold
            || low_range_ratio >= config.low_range_threshold;

        Verdict::from_is_chord(is_chord)
    }

    fn format_stats(&self, stats: &StatsBundle) -> String {
        format!(
            "{}\nRange Frames: low {} / mid {} / high {}\nWide Range Ratio: {:.1}%\nLow Range Ratio: {:.1}%",
            format_base_stats(stats),
            stats.count(LOW_RANGE_FRAMES),
            stats.count(MID_RANGE_FRAMES),
            stats.count(HIGH_RANGE_FRAMES),
            stats.metric(WIDE_RANGE_RATIO) * 100.0,
            stats.metric(LOW_RANGE_RATIO) * 100.0
        )
    }
}
