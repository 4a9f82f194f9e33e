// src/config/settings.rs
//
// Run-wide judgment configuration: thresholds, pitch tracking parameters,
// strategy selection and file naming markers.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::judgment::available_strategies;
use crate::error::{ChordcheckrError, Result};

/// File name looked up in the working directory when no `--config` is given
pub const LOCAL_CONFIG_FILE: &str = "chordcheckr.toml";

/// Judgment configuration, loaded once per run and shared read-only.
///
/// Every recognized key has an explicit default; unknown keys in a config
/// file are rejected so typos never silently fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JudgmentConfig {
    // Audio loading
    /// Resample to this rate before analysis (None keeps the native rate)
    pub sample_rate: Option<u32>,
    /// Peak-normalize the waveform to 1.0
    pub normalize: bool,

    // Framing and pitch tracking
    /// Samples per analysis frame, shared by loudness filter and pitch tracker
    pub hop_size: usize,
    pub min_frequency: f32,
    pub max_frequency: f32,

    // Loudness filter
    pub min_volume_threshold_db: f32,
    /// Upper loudness bound; None keeps the filter one-sided
    pub max_volume_threshold_db: Option<f32>,

    // Strategy selection
    pub judgment_method: String,

    // Two-stage strategy
    pub simultaneous_pitch_threshold: usize,
    /// MIDI note at or below which a chord counts as a low chord (48 = C3)
    pub low_note_threshold: f32,
    pub low_chord_ratio_threshold: f64,
    pub chord_ratio_threshold: f64,

    // Pitch-distribution strategy
    /// Upper MIDI bound of the low band (inclusive)
    pub low_pitch_threshold: f32,
    /// Upper MIDI bound of the mid band (inclusive)
    pub high_pitch_threshold: f32,
    pub wide_range_threshold: f64,
    pub low_range_threshold: f64,

    // Files
    /// Tag that marks a file as eligible for analysis
    pub source_marker: String,
    /// Tag that replaces `source_marker` once a file is judged a chord
    pub chord_marker: String,
    /// Audio file extensions to scan for (case-insensitive)
    pub extensions: Vec<String>,

    // Logging
    pub logging_level: String,
    /// Append log output to this file instead of stderr
    pub log_file: Option<PathBuf>,
}

impl Default for JudgmentConfig {
    fn default() -> Self {
        Self {
            sample_rate: None,
            normalize: true,
            hop_size: 512,
            min_frequency: 50.0,
            max_frequency: 5000.0,
            min_volume_threshold_db: -24.0,
            max_volume_threshold_db: None,
            judgment_method: "two_stage".to_string(),
            simultaneous_pitch_threshold: 2,
            low_note_threshold: 48.0,
            low_chord_ratio_threshold: 0.1,
            chord_ratio_threshold: 0.2,
            low_pitch_threshold: 48.0,
            high_pitch_threshold: 72.0,
            wide_range_threshold: 0.15,
            low_range_threshold: 0.1,
            source_marker: "_MLD".to_string(),
            chord_marker: "_CHP".to_string(),
            extensions: vec!["wav".to_string()],
            logging_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl JudgmentConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ChordcheckrError::ConfigParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content).map_err(|e| ChordcheckrError::ConfigParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load configuration: explicit path, then `./chordcheckr.toml`, then the
    /// platform config directory, then built-in defaults.
    ///
    /// An explicit path that does not exist is an error; the implicit
    /// locations are only used when present.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match discover_config_file() {
            Some(path) => {
                log::debug!("Using configuration file {}", path.display());
                Self::from_file(&path)
            }
            None => {
                log::debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Check value ranges and the strategy name.
    ///
    /// Called once at startup; any failure here aborts the run.
    pub fn validate(&self) -> Result<()> {
        let known = available_strategies();
        if !known.contains(&self.judgment_method.as_str()) {
            return Err(ChordcheckrError::UnknownStrategy {
                name: self.judgment_method.clone(),
                available: known,
            });
        }

        if self.hop_size == 0 {
            return Err(invalid("hop_size must be greater than 0"));
        }
        if self.sample_rate == Some(0) {
            return Err(invalid("sample_rate must be greater than 0"));
        }
        if !(self.min_frequency > 0.0 && self.min_frequency < self.max_frequency) {
            return Err(invalid(format!(
                "min_frequency ({}) must be positive and below max_frequency ({})",
                self.min_frequency, self.max_frequency
            )));
        }
        if let Some(max_db) = self.max_volume_threshold_db {
            if max_db <= self.min_volume_threshold_db {
                return Err(invalid(format!(
                    "max_volume_threshold_db ({}) must be above min_volume_threshold_db ({})",
                    max_db, self.min_volume_threshold_db
                )));
            }
        }
        if self.simultaneous_pitch_threshold == 0 {
            return Err(invalid("simultaneous_pitch_threshold must be at least 1"));
        }
        if self.low_pitch_threshold >= self.high_pitch_threshold {
            return Err(invalid(format!(
                "low_pitch_threshold ({}) must be below high_pitch_threshold ({})",
                self.low_pitch_threshold, self.high_pitch_threshold
            )));
        }

        for (key, value) in [
            ("low_chord_ratio_threshold", self.low_chord_ratio_threshold),
            ("chord_ratio_threshold", self.chord_ratio_threshold),
            ("wide_range_threshold", self.wide_range_threshold),
            ("low_range_threshold", self.low_range_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(format!("{} must be within [0, 1], got {}", key, value)));
            }
        }

        if self.source_marker.is_empty() || self.chord_marker.is_empty() {
            return Err(invalid("source_marker and chord_marker must not be empty"));
        }
        if self.source_marker == self.chord_marker {
            return Err(invalid("source_marker and chord_marker must differ"));
        }
        if self.extensions.is_empty() {
            return Err(invalid("extensions must list at least one file extension"));
        }

        Ok(())
    }

    /// `log::LevelFilter` parsed from `logging_level`, defaulting to Info
    pub fn level_filter(&self) -> log::LevelFilter {
        self.logging_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

fn invalid(msg: impl Into<String>) -> ChordcheckrError {
    ChordcheckrError::Config(msg.into())
}

fn discover_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }
    let platform = dirs::config_dir()?.join("chordcheckr").join("config.toml");
    platform.exists().then_some(platform)
}

/// Builder for programmatic configuration (tests, library callers)
pub struct ConfigBuilder {
    config: JudgmentConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: JudgmentConfig::default(),
        }
    }

    pub fn from_config(config: JudgmentConfig) -> Self {
        Self { config }
    }

    pub fn method(mut self, name: impl Into<String>) -> Self {
        self.config.judgment_method = name.into();
        self
    }

    pub fn hop_size(mut self, hop_size: usize) -> Self {
        self.config.hop_size = hop_size;
        self
    }

    pub fn volume_range(mut self, min_db: f32, max_db: Option<f32>) -> Self {
        self.config.min_volume_threshold_db = min_db;
        self.config.max_volume_threshold_db = max_db;
        self
    }

    pub fn simultaneous_pitch_threshold(mut self, count: usize) -> Self {
        self.config.simultaneous_pitch_threshold = count;
        self
    }

    pub fn chord_ratio_threshold(mut self, ratio: f64) -> Self {
        self.config.chord_ratio_threshold = ratio;
        self
    }

    pub fn low_chord_ratio_threshold(mut self, ratio: f64) -> Self {
        self.config.low_chord_ratio_threshold = ratio;
        self
    }

    pub fn pitch_bands(mut self, low: f32, high: f32) -> Self {
        self.config.low_pitch_threshold = low;
        self.config.high_pitch_threshold = high;
        self
    }

    pub fn markers(mut self, source: impl Into<String>, chord: impl Into<String>) -> Self {
        self.config.source_marker = source.into();
        self.config.chord_marker = chord.into();
        self
    }

    pub fn sample_rate(mut self, rate: Option<u32>) -> Self {
        self.config.sample_rate = rate;
        self
    }

    /// Validate and return the configuration
    pub fn build(self) -> Result<JudgmentConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
