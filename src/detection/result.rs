//! Verdict and judgment result types

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::judgment::StatsBundle;

/// File-level classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Multiple simultaneous notes
    Chord,
    /// Single-note line
    Melody,
}

impl Verdict {
    pub fn from_is_chord(is_chord: bool) -> Self {
        if is_chord {
            Verdict::Chord
        } else {
            Verdict::Melody
        }
    }

    pub fn is_chord(&self) -> bool {
        matches!(self, Verdict::Chord)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Chord => "chord",
            Verdict::Melody => "melody",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Verdict::Chord => "♫",
            Verdict::Melody => "♪",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of judging one waveform
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Judgment {
    pub verdict: Verdict,
    /// Strategy that produced the verdict
    pub method: &'static str,
    pub stats: StatsBundle,
    /// Human-readable statistics report
    pub report: String,
}

/// Per-file record for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: PathBuf,
    #[serde(flatten)]
    pub judgment: Judgment,
    /// New path when the file was (or would be) renamed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renamed_to: Option<PathBuf>,
}

impl FileReport {
    pub fn new(file: &Path, judgment: Judgment) -> Self {
        Self {
            file: file.to_path_buf(),
            judgment,
            renamed_to: None,
        }
    }
}
