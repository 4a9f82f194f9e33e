#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;

use chordcheckr::batch::{BatchSummary, RenameOutcome};
use chordcheckr::testgen::{chord_take, melody_take, write_chord_take, write_melody_take, write_wav};
use chordcheckr::{ChordcheckrError, Judgment, ReportSink, Verdict};

pub fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_chordcheckr"))
}

pub fn run_chordcheckr<P: AsRef<std::ffi::OsStr>>(input: P) -> Command {
    let mut cmd = Command::new(binary_path());
    cmd.arg(input);
    // keep the user's config out of the tests
    cmd.env_remove("CHORDCHECKR_CONFIG");
    cmd
}

/// Session layout used by the batch tests:
///
/// ```text
/// root/
///   session1/chord_MLD.wav    C major triad
///   session1/line_MLD.wav     C D E F line
///   session2/wide_MLD.wav     B2 F4 G5 spread chord
///   session2/untagged.wav     triad without marker
///   notes.txt
/// ```
pub struct Takes {
    pub root: PathBuf,
    pub chord: PathBuf,
    pub melody: PathBuf,
    pub wide: PathBuf,
    pub untagged: PathBuf,
}

pub fn write_takes(root: &Path) -> Takes {
    let session1 = root.join("session1");
    let session2 = root.join("session2");
    fs::create_dir_all(&session1).unwrap();
    fs::create_dir_all(&session2).unwrap();

    let takes = Takes {
        root: root.to_path_buf(),
        chord: session1.join("chord_MLD.wav"),
        melody: session1.join("line_MLD.wav"),
        wide: session2.join("wide_MLD.wav"),
        untagged: session2.join("untagged.wav"),
    };

    write_chord_take(&takes.chord, 1.0).unwrap();
    write_melody_take(&takes.melody, 0.5).unwrap();
    write_wav(&takes.wide, &wide_chord()).unwrap();
    write_chord_take(&takes.untagged, 0.5).unwrap();
    fs::write(root.join("notes.txt"), "take notes _MLD").unwrap();
    takes
}

/// Low, mid and high register notes chosen off each other's harmonic series
pub fn wide_chord() -> Vec<f32> {
    chord_take(&[47.0, 65.0, 79.0], 1.0)
}

pub fn short_melody() -> Vec<f32> {
    melody_take(&[62.0, 64.0], 0.5)
}

/// Path with the first `from` marker in the file name swapped for `to`
pub fn swapped(path: &Path, from: &str, to: &str) -> PathBuf {
    let name = path.file_name().unwrap().to_string_lossy().replacen(from, to, 1);
    path.with_file_name(name)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Judged(PathBuf, Verdict),
    Renamed(PathBuf, RenameOutcome),
    Failed(PathBuf),
    Finished(BatchSummary),
}

/// Sink recording every call, for ordering and content checks
#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<Event>>,
    pub reports: Mutex<Vec<Judgment>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn verdict_of(&self, path: &Path) -> Option<Verdict> {
        self.events().into_iter().find_map(|e| match e {
            Event::Judged(p, v) if p == path => Some(v),
            _ => None,
        })
    }

    pub fn judged_paths(&self) -> Vec<PathBuf> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Judged(p, _) | Event::Failed(p) => Some(p),
                _ => None,
            })
            .collect()
    }
}

impl ReportSink for RecordingSink {
    fn judged(&self, path: &Path, judgment: &Judgment) {
        self.events
            .lock()
            .unwrap()
            .push(Event::Judged(path.to_path_buf(), judgment.verdict));
        self.reports.lock().unwrap().push(judgment.clone());
    }

    fn renamed(&self, path: &Path, outcome: &RenameOutcome) {
        self.events
            .lock()
            .unwrap()
            .push(Event::Renamed(path.to_path_buf(), outcome.clone()));
    }

    fn failed(&self, path: &Path, _error: &ChordcheckrError) {
        self.events.lock().unwrap().push(Event::Failed(path.to_path_buf()));
    }

    fn finished(&self, summary: &BatchSummary) {
        self.events.lock().unwrap().push(Event::Finished(summary.clone()));
    }
}
