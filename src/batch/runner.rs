// src/batch/runner.rs
//
// Batch orchestration: discovery, parallel analysis, then a sequential
// report-and-rename pass in sorted path order.

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::finder::find_marked_files;
use super::renamer::{RenameOutcome, Renamer};
use crate::config::JudgmentConfig;
use crate::core::FileAnalyzer;
use crate::detection::{Judgment, ReportSink, Verdict};
use crate::error::{ChordcheckrError, Result};

/// Per-run options that are not part of the judgment configuration
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Analyze and report only, never rename
    pub dry_run: bool,
    /// Worker threads for analysis; 1 runs sequentially
    pub jobs: usize,
    pub show_progress: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            dry_run: false,
            jobs: 1,
            show_progress: false,
        }
    }
}

/// Counts for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub files: usize,
    pub chord: usize,
    pub melody: usize,
    /// Renamed, or planned renames in a dry run
    pub renamed: usize,
    pub conflicts: usize,
    pub missing_marker: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    fn record_outcome(&mut self, outcome: &RenameOutcome) {
        match outcome {
            RenameOutcome::Renamed { .. } | RenameOutcome::WouldRename { .. } => self.renamed += 1,
            RenameOutcome::Conflict { .. } => self.conflicts += 1,
            RenameOutcome::MissingMarker => self.missing_marker += 1,
            RenameOutcome::Unchanged => {}
        }
    }
}

/// Judge every marked file under `root` and relabel the chords.
///
/// Configuration problems (unknown strategy, bad thresholds, missing root)
/// abort before any file is touched; per-file failures are reported to the
/// sink and counted, and the batch moves on.
pub fn run(
    root: &Path,
    settings: &RunSettings,
    config: &JudgmentConfig,
    sink: &dyn ReportSink,
) -> Result<BatchSummary> {
    let started = Instant::now();

    config.validate()?;
    let analyzer = FileAnalyzer::new(config.clone())?;
    let renamer = Renamer::from_config(config, settings.dry_run);

    let files = find_marked_files(root, &config.source_marker, &config.extensions)?;
    if files.is_empty() {
        log::warn!(
            "No files containing '{}' found in {}",
            config.source_marker,
            root.display()
        );
    } else {
        log::info!(
            "Found {} file(s) to analyze with {} ({})",
            files.len(),
            analyzer.method(),
            analyzer.tracker_name()
        );
    }

    let results = analyze_all(&analyzer, &files, settings)?;

    let mut summary = BatchSummary {
        files: files.len(),
        ..Default::default()
    };

    for (path, result) in files.iter().zip(results) {
        match result.and_then(|judgment| apply_judgment(path, &judgment, &renamer, sink)) {
            Ok((verdict, outcome)) => {
                match verdict {
                    Verdict::Chord => summary.chord += 1,
                    Verdict::Melody => summary.melody += 1,
                }
                summary.record_outcome(&outcome);
            }
            Err(e) => {
                log::error!("Failed to process {}: {}", path.display(), e);
                sink.failed(path, &e);
                summary.failed += 1;
            }
        }
    }

    log::info!(
        "Processed {} file(s) in {:.2}s: {} chord, {} melody, {} renamed, {} failed",
        summary.files,
        started.elapsed().as_secs_f64(),
        summary.chord,
        summary.melody,
        summary.renamed,
        summary.failed
    );
    sink.finished(&summary);

    Ok(summary)
}

fn apply_judgment(
    path: &Path,
    judgment: &Judgment,
    renamer: &Renamer,
    sink: &dyn ReportSink,
) -> Result<(Verdict, RenameOutcome)> {
    sink.judged(path, judgment);
    let outcome = renamer.apply(path, judgment.verdict)?;
    if outcome != RenameOutcome::Unchanged {
        sink.renamed(path, &outcome);
    }
    Ok((judgment.verdict, outcome))
}

/// Analyze files on a dedicated pool; results keep the input order
fn analyze_all(
    analyzer: &FileAnalyzer,
    files: &[PathBuf],
    settings: &RunSettings,
) -> Result<Vec<Result<Judgment>>> {
    let progress = settings.show_progress.then(|| progress_bar(files.len()));

    let analyze_one = |path: &PathBuf| {
        let result = analyzer.analyze(path);
        if let Some(ref pb) = progress {
            pb.inc(1);
            pb.set_message(
                path.file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .to_string(),
            );
        }
        result
    };

    let results: Vec<Result<Judgment>> = if settings.jobs <= 1 {
        files.iter().map(analyze_one).collect()
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(settings.jobs)
            .build()
            .map_err(|e| {
                ChordcheckrError::Config(format!("Failed to build thread pool: {}", e))
            })?;
        log::debug!("Analyzing on {} threads", settings.jobs);
        pool.install(|| files.par_iter().map(analyze_one).collect())
    };

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    Ok(results)
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    pb
}
