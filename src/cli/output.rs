//! Output formatting for CLI results

use colorful::Colorful;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::batch::{BatchSummary, RenameOutcome};
use crate::detection::{FileReport, Judgment, ReportSink, Verdict};
use crate::error::ChordcheckrError;

/// Path relative to the scanned root, for display
fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .ok()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(path)
        .display()
        .to_string()
}

fn verdict_label(verdict: Verdict) -> String {
    let label = format!("{} {}", verdict.symbol(), verdict.as_str().to_uppercase());
    match verdict {
        Verdict::Chord => label.green().bold().to_string(),
        Verdict::Melody => label.cyan().to_string(),
    }
}

/// Format one judgment for the terminal: `path | VERDICT` and the report
pub fn format_judgment(root: &Path, path: &Path, judgment: &Judgment) -> String {
    let mut output = format!(
        "{} | {} [{}]\n",
        display_path(root, path),
        verdict_label(judgment.verdict),
        judgment.method
    );
    for line in judgment.report.lines() {
        output.push_str("  ");
        output.push_str(line);
        output.push('\n');
    }
    output
}

/// Format a summary for the whole run
pub fn format_summary(summary: &BatchSummary, dry_run: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n{}\n", "Summary:".bold()));
    output.push_str(&format!("  {} files analyzed\n", summary.files));
    output.push_str(&format!("  {} chord, {} melody\n", summary.chord, summary.melody));

    let renamed = if dry_run { "would be renamed" } else { "renamed" };
    output.push_str(&format!("  {} {}\n", summary.renamed, renamed));

    if summary.conflicts > 0 {
        output.push_str(&format!(
            "  {}\n",
            format!("{} rename conflicts", summary.conflicts).yellow()
        ));
    }
    if summary.missing_marker > 0 {
        output.push_str(&format!(
            "  {}\n",
            format!("{} without marker", summary.missing_marker).yellow()
        ));
    }
    if summary.failed > 0 {
        output.push_str(&format!(
            "  {}\n",
            format!("✗ {} failed", summary.failed).red()
        ));
    }

    output
}

/// Human-readable sink printing to stdout
pub struct ConsoleSink {
    root: PathBuf,
    dry_run: bool,
}

impl ConsoleSink {
    pub fn new(root: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            root: root.into(),
            dry_run,
        }
    }
}

impl ReportSink for ConsoleSink {
    fn judged(&self, path: &Path, judgment: &Judgment) {
        println!("{}", format_judgment(&self.root, path, judgment));
    }

    fn renamed(&self, path: &Path, outcome: &RenameOutcome) {
        let name = display_path(&self.root, path);
        match outcome {
            RenameOutcome::Renamed { to } => {
                println!("  → {}", display_path(&self.root, to).green());
            }
            RenameOutcome::WouldRename { to } => {
                println!("  → {} (test mode)", display_path(&self.root, to));
            }
            RenameOutcome::Conflict { dest } => {
                println!(
                    "  {}",
                    format!("{} exists, {} left as is", display_path(&self.root, dest), name).yellow()
                );
            }
            RenameOutcome::MissingMarker => {
                println!("  {}", format!("{} has no marker", name).yellow());
            }
            RenameOutcome::Unchanged => {}
        }
    }

    fn failed(&self, path: &Path, error: &ChordcheckrError) {
        println!(
            "{} | {}\n  {}\n",
            display_path(&self.root, path),
            "✗ ERROR".red(),
            error
        );
    }

    fn finished(&self, summary: &BatchSummary) {
        print!("{}", format_summary(summary, self.dry_run));
    }
}

#[derive(Debug, Serialize)]
struct FailedFile {
    file: PathBuf,
    error: String,
}

#[derive(Debug, Default, Serialize)]
struct JsonDocument {
    files: Vec<FileReport>,
    failed: Vec<FailedFile>,
    summary: Option<BatchSummary>,
}

/// Collects every result and prints one JSON document when the run ends
#[derive(Default)]
pub struct JsonSink {
    document: Mutex<JsonDocument>,
}

impl JsonSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current document as pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        match self.document.lock() {
            Ok(doc) => serde_json::to_string_pretty(&*doc),
            Err(poisoned) => serde_json::to_string_pretty(&*poisoned.into_inner()),
        }
    }

    fn with_document(&self, f: impl FnOnce(&mut JsonDocument)) {
        match self.document.lock() {
            Ok(mut doc) => f(&mut doc),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }
}

impl ReportSink for JsonSink {
    fn judged(&self, path: &Path, judgment: &Judgment) {
        self.with_document(|doc| doc.files.push(FileReport::new(path, judgment.clone())));
    }

    fn renamed(&self, path: &Path, outcome: &RenameOutcome) {
        let Some(dest) = outcome.destination() else {
            return;
        };
        self.with_document(|doc| {
            if let Some(report) = doc.files.iter_mut().rev().find(|r| r.file == path) {
                report.renamed_to = Some(dest.to_path_buf());
            }
        });
    }

    fn failed(&self, path: &Path, error: &ChordcheckrError) {
        self.with_document(|doc| {
            doc.failed.push(FailedFile {
                file: path.to_path_buf(),
                error: error.to_string(),
            })
        });
    }

    fn finished(&self, summary: &BatchSummary) {
        self.with_document(|doc| doc.summary = Some(summary.clone()));
        match self.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to serialize results: {}", e),
        }
    }
}
