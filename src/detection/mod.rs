//! Detection result types for chordcheckr

mod result;
mod sink;

pub use result::{FileReport, Judgment, Verdict};
pub use sink::ReportSink;
