// src/batch/renamer.rs
//
// Marker swap for files judged as chords: `take_MLD.wav` -> `take_CHP.wav`.
// Only the file stem is touched; existing destinations are never overwritten.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::JudgmentConfig;
use crate::detection::Verdict;
use crate::error::Result;

/// What the renamer did with one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RenameOutcome {
    Renamed { to: PathBuf },
    /// Dry run: the rename that would have happened
    WouldRename { to: PathBuf },
    /// Melody verdict, nothing to do
    Unchanged,
    /// Destination already exists; source left as is
    Conflict { dest: PathBuf },
    /// Stem does not carry the source marker
    MissingMarker,
}

impl RenameOutcome {
    /// Destination path for completed or planned renames
    pub fn destination(&self) -> Option<&Path> {
        match self {
            RenameOutcome::Renamed { to } | RenameOutcome::WouldRename { to } => Some(to),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Renamer {
    source_marker: String,
    chord_marker: String,
    dry_run: bool,
}

impl Renamer {
    pub fn new(source_marker: impl Into<String>, chord_marker: impl Into<String>, dry_run: bool) -> Self {
        Self {
            source_marker: source_marker.into(),
            chord_marker: chord_marker.into(),
            dry_run,
        }
    }

    pub fn from_config(config: &JudgmentConfig, dry_run: bool) -> Self {
        Self::new(config.source_marker.clone(), config.chord_marker.clone(), dry_run)
    }

    /// Path with every marker occurrence in the stem replaced, or None when
    /// the stem does not contain the marker
    pub fn chord_path(&self, path: &Path) -> Option<PathBuf> {
        let stem = path.file_stem()?.to_str()?;
        if !stem.contains(&self.source_marker) {
            return None;
        }

        let mut name = stem.replace(&self.source_marker, &self.chord_marker);
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            name.push('.');
            name.push_str(ext);
        }
        Some(path.with_file_name(name))
    }

    /// Apply the verdict to `path`
    pub fn apply(&self, path: &Path, verdict: Verdict) -> Result<RenameOutcome> {
        if verdict == Verdict::Melody {
            log::info!("No action taken for {}", path.display());
            return Ok(RenameOutcome::Unchanged);
        }

        let Some(dest) = self.chord_path(path) else {
            log::warn!(
                "{} does not contain marker '{}'",
                path.display(),
                self.source_marker
            );
            return Ok(RenameOutcome::MissingMarker);
        };

        if dest.exists() {
            log::warn!(
                "Cannot rename {}: {} already exists",
                path.display(),
                dest.display()
            );
            return Ok(RenameOutcome::Conflict { dest });
        }

        if self.dry_run {
            log::info!("Would rename {} -> {}", path.display(), dest.display());
            return Ok(RenameOutcome::WouldRename { to: dest });
        }

        std::fs::rename(path, &dest)?;
        log::info!("Renamed {} -> {}", path.display(), dest.display());
        Ok(RenameOutcome::Renamed { to: dest })
    }
}
