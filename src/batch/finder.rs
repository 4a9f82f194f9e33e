// src/batch/finder.rs
//
// Marked audio file discovery.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{ChordcheckrError, Result};

/// True if `path` has one of `extensions` (case-insensitive) and its stem
/// contains `marker`
pub fn is_marked_audio(path: &Path, marker: &str, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    if !extensions.iter().any(|known| known.eq_ignore_ascii_case(ext)) {
        return false;
    }
    path.file_stem()
        .and_then(|s| s.to_str())
        .map_or(false, |stem| stem.contains(marker))
}

/// Find marked audio files under `root`, sorted by directory then file name.
///
/// `root` may also be a single file, which is returned when it matches.
pub fn find_marked_files(root: &Path, marker: &str, extensions: &[String]) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(ChordcheckrError::InputNotFound(root.to_path_buf()));
    }

    let mut files = Vec::new();

    if root.is_file() {
        if is_marked_audio(root, marker, extensions) {
            files.push(root.to_path_buf());
        } else {
            log::warn!(
                "{} is not a marked audio file (marker '{}')",
                root.display(),
                marker
            );
        }
        return Ok(files);
    }

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        let path = entry.path();
        if entry.file_type().is_file() && is_marked_audio(path, marker, extensions) {
            log::trace!("Found {}", path.display());
            files.push(path.to_path_buf());
        }
    }

    files.sort_by(|a, b| {
        a.parent()
            .cmp(&b.parent())
            .then_with(|| a.file_name().cmp(&b.file_name()))
    });

    log::debug!("Found {} marked files under {}", files.len(), root.display());
    Ok(files)
}
