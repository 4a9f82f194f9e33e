// src/core/judgment/loudness.rs
//
// Frame loudness filter.
//
// The waveform is cut into non-overlapping hop-sized frames (a trailing
// partial frame is dropped). A frame is valid when its RMS level is above
// `min_db` and, if an upper bound is configured, below `max_db`.

use crate::config::JudgmentConfig;
use crate::core::dsp::rms_db;

/// Loudness measurements for one waveform
#[derive(Debug, Clone, PartialEq)]
pub struct LoudnessProfile {
    /// RMS level of every frame in dB
    pub frame_db: Vec<f32>,
    /// Indices of frames inside the accepted loudness range, ascending
    pub valid_frames: Vec<usize>,
    /// Loudest frame, None when there are no frames
    pub max_db: Option<f32>,
}

impl LoudnessProfile {
    pub fn total_frames(&self) -> usize {
        self.frame_db.len()
    }

    pub fn skipped_frames(&self) -> usize {
        self.total_frames() - self.valid_frames.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoudnessFilter {
    hop_size: usize,
    min_db: f32,
    max_db: Option<f32>,
}

impl LoudnessFilter {
    pub fn new(hop_size: usize, min_db: f32, max_db: Option<f32>) -> Self {
        Self {
            hop_size: hop_size.max(1),
            min_db,
            max_db,
        }
    }

    pub fn from_config(config: &JudgmentConfig) -> Self {
        Self::new(
            config.hop_size,
            config.min_volume_threshold_db,
            config.max_volume_threshold_db,
        )
    }

    /// Number of whole frames in `sample_count` samples
    pub fn frame_count(&self, sample_count: usize) -> usize {
        sample_count / self.hop_size
    }

    pub fn accepts(&self, db: f32) -> bool {
        db > self.min_db && self.max_db.map_or(true, |max| db < max)
    }

    pub fn analyze(&self, samples: &[f32]) -> LoudnessProfile {
        let frame_db: Vec<f32> = samples.chunks_exact(self.hop_size).map(rms_db).collect();

        let valid_frames = frame_db
            .iter()
            .enumerate()
            .filter(|(_, &db)| self.accepts(db))
            .map(|(i, _)| i)
            .collect();

        let max_db = frame_db.iter().copied().reduce(f32::max);

        LoudnessProfile {
            frame_db,
            valid_frames,
            max_db,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Frames of constant amplitude; a constant signal of amplitude `a` has
    /// RMS `a`, so its level is exactly 20*log10(a)
    fn frames(amplitudes: &[f32], hop: usize) -> Vec<f32> {
        amplitudes
            .iter()
            .flat_map(|&a| std::iter::repeat(a).take(hop))
            .collect()
    }

    #[test]
    fn test_one_sided_filter() {
        // 0 dB, -20 dB, -40 dB, silence
        let samples = frames(&[1.0, 0.1, 0.01, 0.0], 64);
        let profile = LoudnessFilter::new(64, -24.0, None).analyze(&samples);

        assert_eq!(profile.total_frames(), 4);
        assert_eq!(profile.valid_frames, vec![0, 1]);
        assert_eq!(profile.skipped_frames(), 2);
        assert!((profile.max_db.unwrap() - 0.0).abs() < 1e-3);
        assert!((profile.frame_db[1] + 20.0).abs() < 1e-3);
        assert!(profile.frame_db[3].is_finite());
    }

    #[test]
    fn test_two_sided_band() {
        let samples = frames(&[1.0, 0.1, 0.01], 64);
        let profile = LoudnessFilter::new(64, -24.0, Some(-3.0)).analyze(&samples);
        assert_eq!(profile.valid_frames, vec![1]);
    }

    #[test]
    fn test_bounds_are_strict() {
        let filter = LoudnessFilter::new(64, -24.0, Some(-3.0));
        assert!(!filter.accepts(-24.0));
        assert!(!filter.accepts(-3.0));
        assert!(filter.accepts(-23.9));
    }

    #[test]
    fn test_trailing_partial_frame_dropped() {
        let samples = vec![0.5; 64 * 3 + 63];
        let filter = LoudnessFilter::new(64, -24.0, None);
        assert_eq!(filter.frame_count(samples.len()), 3);
        assert_eq!(filter.analyze(&samples).total_frames(), 3);
    }

    #[test]
    fn test_short_waveform_has_no_frames() {
        let profile = LoudnessFilter::new(512, -24.0, None).analyze(&[0.5; 100]);
        assert_eq!(profile.total_frames(), 0);
        assert!(profile.valid_frames.is_empty());
        assert!(profile.max_db.is_none());
    }
}
