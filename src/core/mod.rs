//! Core analysis modules

pub mod analyzer;
pub mod decoder;
pub mod dsp;
pub mod judgment;
pub mod pitch;

pub use analyzer::{AnalyzerBuilder, FileAnalyzer};
pub use decoder::{load_waveform, Waveform};
pub use judgment::{judge, Judge, JudgmentStrategy, StatsBundle};
pub use pitch::{MultiPitchMatrix, PitchParams, PitchTracker, SalienceTracker};
