//! Directory batch processing: discovery, judgment and relabeling

mod finder;
mod renamer;
mod runner;

pub use finder::{find_marked_files, is_marked_audio};
pub use renamer::{RenameOutcome, Renamer};
pub use runner::{run, BatchSummary, RunSettings};
