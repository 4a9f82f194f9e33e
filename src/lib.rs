//! chordcheckr - Tell chord takes from melody takes
//!
//! Classifies short audio recordings as **chord** (several simultaneous
//! notes) or **melody** (a single-note line) and relabels the chord files.
//!
//! ## Pipeline
//!
//! For every file whose name carries the source marker (default `_MLD`):
//!
//! 1. decode to a mono waveform (optionally resampled and peak-normalized)
//! 2. estimate the fundamentals present in each hop-sized frame
//! 3. drop frames that are too quiet (RMS in dB)
//! 4. classify each remaining frame with the selected judgment strategy
//! 5. turn the frame statistics into a file verdict and a report
//! 6. swap the marker for the chord marker (default `_CHP`) on chord files
//!
//! ## Module Structure
//!
//! - `core` - Decoding, DSP helpers, pitch tracking and judgment
//! - `config` - Judgment configuration (TOML, defaults, validation)
//! - `detection` - Verdict, judgment and reporting sink types
//! - `batch` - File discovery, renaming and batch orchestration
//! - `cli` - Command-line interface
//! - `testgen` - Synthetic chord and melody takes
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chordcheckr::config::ConfigBuilder;
//! use chordcheckr::core::FileAnalyzer;
//!
//! let config = ConfigBuilder::new().method("pitch_distribution").build()?;
//! let analyzer = FileAnalyzer::new(config)?;
//! let judgment = analyzer.analyze(path)?;
//!
//! println!("{}\n{}", judgment.verdict, judgment.report);
//! ```
//!
//! ## Judgment Methods
//!
//! | Method               | Frame rule                                  | File rule                                   |
//! |----------------------|---------------------------------------------|---------------------------------------------|
//! | `two_stage`          | >= 2 simultaneous pitches                   | low-chord ratio >= 0.1 or chord ratio >= 0.2 |
//! | `pitch_distribution` | notes spread over low/mid/high registers    | wide-range ratio >= 0.15 or low ratio >= 0.1 |

// Core analysis functionality
pub mod core;

// Batch processing
pub mod batch;

// Command-line interface
pub mod cli;

// Configuration
pub mod config;

// Result types and reporting
pub mod detection;

pub mod error;

// Synthetic test audio
pub mod testgen;

// Re-export commonly used types at crate root for convenience
pub use config::{ConfigBuilder, JudgmentConfig};
pub use self::core::{judge, FileAnalyzer, Judge, MultiPitchMatrix, PitchTracker, Waveform};
pub use detection::{Judgment, ReportSink, Verdict};
pub use error::{ChordcheckrError, Result};
