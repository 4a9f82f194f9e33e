//! Error types for chordcheckr
//!
//! Per-file errors (decode, pitch tracking, frame alignment, rename I/O) are
//! contained at the file boundary: the batch logs them and moves on.
//! Configuration errors (unknown strategy, bad values) stop the run before
//! any file is touched.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChordcheckrError {
    // Recoverable: skip file, continue batch
    #[error("Failed to decode '{path}': {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Pitch tracking failed: {0}")]
    PitchTracking(String),

    #[error("Hop size mismatch: loudness frames use {expected} samples, pitch matrix was built with {actual}")]
    HopSizeMismatch { expected: usize, actual: usize },

    #[error("Frame count mismatch: waveform has {loudness_frames} frames, pitch matrix has {pitch_frames}")]
    FrameCountMismatch {
        loudness_frames: usize,
        pitch_frames: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Fatal: abort the run
    #[error("Unknown judgment method: '{name}' (available: {})", available.join(", "))]
    UnknownStrategy {
        name: String,
        available: Vec<&'static str>,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Cannot parse configuration file '{path}': {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    #[error("Input path does not exist: '{0}'")]
    InputNotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, ChordcheckrError>;

impl ChordcheckrError {
    /// True if the batch should log this error and continue with the next file
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ChordcheckrError::Decode { .. }
                | ChordcheckrError::PitchTracking(_)
                | ChordcheckrError::HopSizeMismatch { .. }
                | ChordcheckrError::FrameCountMismatch { .. }
                | ChordcheckrError::Io(_)
        )
    }

    pub fn decode(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ChordcheckrError::Decode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
