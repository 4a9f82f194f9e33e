// src/core/analyzer.rs
//
// Per-file analysis with builder pattern: load -> pitch tracking -> judgment.

use std::path::Path;

use super::decoder::load_waveform;
use super::judgment::Judge;
use super::pitch::{PitchParams, PitchTracker, SalienceTracker};
use crate::config::JudgmentConfig;
use crate::detection::Judgment;
use crate::error::Result;

/// Builder for FileAnalyzer configuration
pub struct AnalyzerBuilder {
    config: JudgmentConfig,
    tracker: Box<dyn PitchTracker>,
}

impl AnalyzerBuilder {
    pub fn new(config: JudgmentConfig) -> Self {
        Self {
            config,
            tracker: Box::new(SalienceTracker::new()),
        }
    }

    /// Swap the multi-pitch backend
    pub fn tracker(mut self, tracker: Box<dyn PitchTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn build(self) -> Result<FileAnalyzer> {
        let judge = Judge::new(self.config)?;
        Ok(FileAnalyzer {
            params: PitchParams::from_config(judge.config()),
            judge,
            tracker: self.tracker,
        })
    }
}

/// Analyzes audio files with one configuration, shared across workers
pub struct FileAnalyzer {
    judge: Judge,
    params: PitchParams,
    tracker: Box<dyn PitchTracker>,
}

impl FileAnalyzer {
    /// Analyzer with the default pitch tracker
    pub fn new(config: JudgmentConfig) -> Result<Self> {
        AnalyzerBuilder::new(config).build()
    }

    pub fn builder(config: JudgmentConfig) -> AnalyzerBuilder {
        AnalyzerBuilder::new(config)
    }

    pub fn config(&self) -> &JudgmentConfig {
        self.judge.config()
    }

    pub fn method(&self) -> &'static str {
        self.judge.method()
    }

    pub fn tracker_name(&self) -> &'static str {
        self.tracker.name()
    }

    /// Decode, track and judge one file
    pub fn analyze(&self, path: &Path) -> Result<Judgment> {
        let config = self.judge.config();
        let waveform = load_waveform(path, config.sample_rate, config.normalize)?;
        log::debug!(
            "Loaded {} ({} samples @ {} Hz)",
            path.display(),
            waveform.samples.len(),
            waveform.sample_rate
        );

        let pitches = self.tracker.estimate(&waveform, &self.params)?;
        self.judge.judge(&waveform, &pitches)
    }
}
