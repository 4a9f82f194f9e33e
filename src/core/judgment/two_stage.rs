// src/core/judgment/two_stage.rs
//
// Two-stage judgment: a frame is a chord when enough pitches sound at once;
// chord frames that reach down to the low register are counted separately,
// since a small share of low chords is already strong evidence.

use super::stats::{ratio, StatsBundle};
use super::strategy::{format_base_stats, FrameAnalysis, FrameClass, JudgmentStrategy};
use crate::config::JudgmentConfig;
use crate::core::pitch::MultiPitchMatrix;
use crate::detection::Verdict;

pub const LOW_CHORD_FRAMES: &str = "low_chord_frames";
pub const LOW_CHORD_RATIO: &str = "low_chord_ratio";
pub const NORMAL_CHORD_RATIO: &str = "normal_chord_ratio";

#[derive(Debug, Clone, Copy, Default)]
pub struct TwoStageStrategy;

impl TwoStageStrategy {
    pub const NAME: &'static str = "two_stage";

    /// Classify one frame's active pitches (MIDI); returns the class and
    /// whether it is a low chord
    pub fn classify(active: &[f32], config: &JudgmentConfig) -> (FrameClass, bool) {
        if active.len() >= config.simultaneous_pitch_threshold {
            let low = active.iter().any(|&p| p <= config.low_note_threshold);
            (FrameClass::Chord, low)
        } else {
            (FrameClass::Melody, false)
        }
    }
}

impl JudgmentStrategy for TwoStageStrategy {
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
        let mut low_chord_frames = 0usize;

        for &frame in valid_frames {
            let active = pitches.active_pitches(frame);
            let (class, low) = Self::classify(&active, config);
            if low {
                low_chord_frames += 1;
            }
            analysis.push(class);
        }

        let analyzed = valid_frames.len();
        analysis.set_metric(LOW_CHORD_FRAMES, low_chord_frames as f64);
        analysis.set_metric(LOW_CHORD_RATIO, ratio(low_chord_frames, analyzed));
        analysis.set_metric(NORMAL_CHORD_RATIO, ratio(analysis.chord_frames, analyzed));
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

        let low_chord_ratio = ratio(stats.count(LOW_CHORD_FRAMES), analyzed_frames);
        let normal_chord_ratio = ratio(stats.chord_frames, analyzed_frames);

        let is_chord = low_chord_ratio >= config.low_chord_ratio_threshold
            || normal_chord_ratio >= config.chord_ratio_threshold;

        Verdict::from_is_chord(is_chord)
    }

    fn format_stats(&self, stats: &StatsBundle) -> String {
        format!(
            "{}\nLow Chord Ratio: {:.1}%\nNormal Chord Ratio: {:.1}%",
            format_base_stats(stats),
            stats.metric(LOW_CHORD_RATIO) * 100.0,
            stats.metric(NORMAL_CHORD_RATIO) * 100.0
        )
    }
}
