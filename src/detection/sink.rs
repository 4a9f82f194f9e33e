//! Reporting sink interface
//!
//! Constructed once per run and passed explicitly to the judge and the batch
//! runner. Calls arrive from one thread at a time, in file order.

use std::path::Path;

use super::Judgment;
use crate::batch::{BatchSummary, RenameOutcome};
use crate::error::ChordcheckrError;

pub trait ReportSink: Send + Sync {
    /// A file was judged
    fn judged(&self, path: &Path, judgment: &Judgment);

    /// The renamer acted on a judged file
    fn renamed(&self, _path: &Path, _outcome: &RenameOutcome) {}

    /// A file could not be processed
    fn failed(&self, _path: &Path, _error: &ChordcheckrError) {}

    /// The run is over
    fn finished(&self, _summary: &BatchSummary) {}
}
