//! Chord/melody judgment
//!
//! The loudness filter picks the frames worth looking at, a pluggable
//! strategy classifies them, and the aggregator turns the merged statistics
//! into a verdict and a report.

mod aggregator;
mod factory;
pub mod loudness;
pub mod pitch_distribution;
mod stats;
pub mod strategy;
pub mod two_stage;

pub use aggregator::{judge, Judge};
pub use factory::{available_strategies, create_strategy};
pub use loudness::{LoudnessFilter, LoudnessProfile};
pub use pitch_distribution::PitchDistributionStrategy;
pub use stats::{ratio, StatsBundle};
pub use strategy::{format_base_stats, FrameAnalysis, FrameClass, JudgmentStrategy};
pub use two_stage::TwoStageStrategy;
