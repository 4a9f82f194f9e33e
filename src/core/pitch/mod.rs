//! Multi-pitch estimation
//!
//! A `PitchTracker` turns a waveform into a `MultiPitchMatrix`: one entry per
//! hop-sized frame, each holding the fundamentals (Hz) detected in that frame.
//! Frame `i` of the matrix describes samples `[i * hop, (i + 1) * hop)`, the
//! same window the loudness filter measures.

mod salience;

pub use salience::SalienceTracker;

use serde::{Deserialize, Serialize};

use super::decoder::Waveform;
use super::dsp::hz_to_midi;
use crate::config::JudgmentConfig;
use crate::error::Result;

/// Parameters shared by all pitch trackers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchParams {
    pub hop_size: usize,
    pub min_frequency: f32,
    pub max_frequency: f32,
}

impl PitchParams {
    pub fn from_config(config: &JudgmentConfig) -> Self {
        Self {
            hop_size: config.hop_size,
            min_frequency: config.min_frequency,
            max_frequency: config.max_frequency,
        }
    }
}

/// Multi-pitch estimation backend
pub trait PitchTracker: Send + Sync {
    /// Estimate the fundamentals present in each hop-sized frame
    fn estimate(&self, waveform: &Waveform, params: &PitchParams) -> Result<MultiPitchMatrix>;

    /// Get the name of this tracker (for logging)
    fn name(&self) -> &'static str;
}

/// Per-frame detected fundamentals in Hz.
///
/// Entries that are zero or negative mean "no detection" and are padding,
/// not pitches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiPitchMatrix {
    hop_size: usize,
    frames: Vec<Vec<f32>>,
}

impl MultiPitchMatrix {
    pub fn new(hop_size: usize, frames: Vec<Vec<f32>>) -> Self {
        Self { hop_size, frames }
    }

    /// Build a matrix from MIDI note numbers, mostly for tests and fixtures.
    ///
    /// Non-positive entries are kept as zero padding.
    pub fn from_midi(hop_size: usize, frames: Vec<Vec<f32>>) -> Self {
        let frames = frames
            .into_iter()
            .map(|frame| {
                frame
                    .into_iter()
                    .map(|m| if m > 0.0 { super::dsp::midi_to_hz(m) } else { 0.0 })
                    .collect()
            })
            .collect();
        Self { hop_size, frames }
    }

    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Raw entry for a frame (Hz, possibly zero-padded)
    pub fn frame(&self, index: usize) -> &[f32] {
        self.frames.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Active pitches of a frame as MIDI note numbers.
    ///
    /// Only strictly positive detections count; frames past the end of the
    /// matrix have no active pitches.
    pub fn active_pitches(&self, index: usize) -> Vec<f32> {
        self.frame(index)
            .iter()
            .filter(|&&hz| hz > 0.0)
            .map(|&hz| hz_to_midi(hz))
            .collect()
    }
}
