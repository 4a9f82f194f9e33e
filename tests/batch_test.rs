// tests/batch_test.rs
//
// End-to-end batch runs over synthetic takes written into a temp directory.

mod test_utils;

use std::fs;

use chordcheckr::batch::{self, RenameOutcome, RunSettings};
use chordcheckr::{ChordcheckrError, ConfigBuilder, JudgmentConfig, Verdict};
use tempfile::TempDir;
use test_utils::{run_chordcheckr, swapped, write_takes, Event, RecordingSink};

fn settings(dry_run: bool, jobs: usize) -> RunSettings {
    RunSettings {
        dry_run,
        jobs,
        show_progress: false,
    }
}

#[test]
fn test_chords_relabeled_melody_untouched() {
    let dir = TempDir::new().unwrap();
    let takes = write_takes(dir.path());
    let sink = RecordingSink::default();

    let summary = batch::run(dir.path(), &settings(false, 1), &JudgmentConfig::default(), &sink).unwrap();

    assert_eq!(summary.files, 3);
    assert_eq!(summary.chord, 2);
    assert_eq!(summary.melody, 1);
    assert_eq!(summary.renamed, 2);
    assert_eq!(summary.failed, 0);

    assert!(!takes.chord.exists());
    assert!(swapped(&takes.chord, "_MLD", "_CHP").exists());
    assert!(!takes.wide.exists());
    assert!(swapped(&takes.wide, "_MLD", "_CHP").exists());
    assert!(takes.melody.exists());
    assert!(takes.untagged.exists());

    assert_eq!(sink.verdict_of(&takes.chord), Some(Verdict::Chord));
    assert_eq!(sink.verdict_of(&takes.melody), Some(Verdict::Melody));
}

#[test]
fn test_files_reported_in_sorted_order_then_summary() {
    let dir = TempDir::new().unwrap();
    let takes = write_takes(dir.path());
    let sink = RecordingSink::default();

    batch::run(dir.path(), &settings(true, 1), &JudgmentConfig::default(), &sink).unwrap();

    assert_eq!(
        sink.judged_paths(),
        vec![takes.chord.clone(), takes.melody.clone(), takes.wide.clone()]
    );
    let events = sink.events();
    assert_eq!(
        events[1],
        Event::Renamed(
            takes.chord.clone(),
            RenameOutcome::WouldRename {
                to: swapped(&takes.chord, "_MLD", "_CHP")
            }
        )
    );
    assert!(matches!(events.last(), Some(Event::Finished(s)) if s.files == 3));
}

#[test]
fn test_parallel_run_matches_sequential() {
    let sequential_dir = TempDir::new().unwrap();
    write_takes(sequential_dir.path());
    let sequential = RecordingSink::default();
    batch::run(sequential_dir.path(), &settings(true, 1), &JudgmentConfig::default(), &sequential).unwrap();

    let parallel_dir = TempDir::new().unwrap();
    write_takes(parallel_dir.path());
    let parallel = RecordingSink::default();
    batch::run(parallel_dir.path(), &settings(true, 3), &JudgmentConfig::default(), &parallel).unwrap();

    let verdicts = |sink: &RecordingSink| -> Vec<Verdict> {
        sink.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Judged(_, v) => Some(v),
                _ => None,
            })
            .collect()
    };
    assert_eq!(verdicts(&sequential), verdicts(&parallel));
    assert_eq!(
        *sequential.reports.lock().unwrap(),
        *parallel.reports.lock().unwrap()
    );
}

#[test]
fn test_dry_run_renames_nothing() {
    let dir = TempDir::new().unwrap();
    let takes = write_takes(dir.path());
    let sink = RecordingSink::default();

    let summary = batch::run(dir.path(), &settings(true, 1), &JudgmentConfig::default(), &sink).unwrap();

    assert_eq!(summary.renamed, 2);
    assert!(takes.chord.exists());
    assert!(takes.wide.exists());
    assert!(!swapped(&takes.chord, "_MLD", "_CHP").exists());
}

#[test]
fn test_second_run_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let takes = write_takes(dir.path());
    let config = JudgmentConfig::default();

    batch::run(dir.path(), &settings(false, 1), &config, &RecordingSink::default()).unwrap();
    let sink = RecordingSink::default();
    let summary = batch::run(dir.path(), &settings(false, 1), &config, &sink).unwrap();

    // only the melody still carries the source marker
    assert_eq!(summary.files, 1);
    assert_eq!(summary.renamed, 0);
    assert_eq!(sink.judged_paths(), vec![takes.melody.clone()]);
    assert!(swapped(&takes.chord, "_MLD", "_CHP").exists());
}

#[test]
fn test_existing_destination_is_a_conflict() {
    let dir = TempDir::new().unwrap();
    let takes = write_takes(dir.path());
    let dest = swapped(&takes.chord, "_MLD", "_CHP");
    fs::write(&dest, b"keep me").unwrap();
    let sink = RecordingSink::default();

    let summary = batch::run(dir.path(), &settings(false, 1), &JudgmentConfig::default(), &sink).unwrap();

    assert_eq!(summary.conflicts, 1);
    assert_eq!(summary.renamed, 1);
    assert!(takes.chord.exists());
    assert_eq!(fs::read(&dest).unwrap(), b"keep me");
    assert!(sink
        .events()
        .contains(&Event::Renamed(takes.chord.clone(), RenameOutcome::Conflict { dest })));
}

#[test]
fn test_bad_file_does_not_stop_the_batch() {
    let dir = TempDir::new().unwrap();
    let takes = write_takes(dir.path());
    let junk = takes.root.join("session1").join("broken_MLD.wav");
    fs::write(&junk, b"RIFF but not really").unwrap();
    let sink = RecordingSink::default();

    let summary = batch::run(dir.path(), &settings(false, 1), &JudgmentConfig::default(), &sink).unwrap();

    assert_eq!(summary.files, 4);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.renamed, 2);
    assert!(sink.events().contains(&Event::Failed(junk.clone())));
    assert!(junk.exists());
}

#[test]
fn test_pitch_distribution_needs_register_spread() {
    let dir = TempDir::new().unwrap();
    let takes = write_takes(dir.path());
    let config = ConfigBuilder::new().method("pitch_distribution").build().unwrap();
    let sink = RecordingSink::default();

    batch::run(dir.path(), &settings(true, 1), &config, &sink).unwrap();

    // a close mid-register triad is not spread out enough
    assert_eq!(sink.verdict_of(&takes.chord), Some(Verdict::Melody));
    assert_eq!(sink.verdict_of(&takes.wide), Some(Verdict::Chord));
    assert_eq!(sink.verdict_of(&takes.melody), Some(Verdict::Melody));
}

#[test]
fn test_custom_markers() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("riff-mel.wav");
    chordcheckr::testgen::write_chord_take(&path, 0.5).unwrap();
    let config = ConfigBuilder::new().markers("-mel", "-chd").build().unwrap();

    let summary = batch::run(dir.path(), &settings(false, 1), &config, &RecordingSink::default()).unwrap();

    assert_eq!(summary.renamed, 1);
    assert!(dir.path().join("riff-chd.wav").exists());
}

#[test]
fn test_missing_root_is_fatal() {
    let err = batch::run(
        std::path::Path::new("/nonexistent/takes"),
        &settings(false, 1),
        &JudgmentConfig::default(),
        &RecordingSink::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ChordcheckrError::InputNotFound(_)));
}

#[test]
fn test_cli_test_mode_json() {
    let dir = TempDir::new().unwrap();
    let takes = write_takes(dir.path());

    let output = run_chordcheckr(dir.path())
        .current_dir(dir.path())
        .args(["--test", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["summary"]["files"], 3);
    assert_eq!(json["summary"]["chord"], 2);
    assert_eq!(json["files"][0]["verdict"], "chord");
    assert_eq!(json["files"][0]["method"], "two_stage");
    assert!(json["files"][0]["renamed_to"].is_string());
    assert!(takes.chord.exists());
}

#[test]
fn test_cli_unknown_method_exit_code() {
    let dir = TempDir::new().unwrap();
    write_takes(dir.path());

    let output = run_chordcheckr(dir.path())
        .current_dir(dir.path())
        .args(["--method", "nonexistent_method"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nonexistent_method"));
    assert!(stderr.contains("two_stage"));
}

#[test]
fn test_cli_config_file_and_failure_exit_code() {
    let dir = TempDir::new().unwrap();
    let takes = write_takes(dir.path());
    fs::write(takes.root.join("session2").join("junk_MLD.wav"), b"nope").unwrap();
    let config_path = dir.path().join("custom.toml");
    fs::write(&config_path, "judgment_method = \"pitch_distribution\"\nlogging_level = \"error\"\n").unwrap();

    let output = run_chordcheckr(dir.path())
        .current_dir(dir.path())
        .arg("--config")
        .arg(&config_path)
        .args(["--test", "--no-progress"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[pitch_distribution]"));
    assert!(stdout.contains("1 failed"));
}

#[test]
fn test_cli_rejects_unknown_config_key() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("typo.toml");
    fs::write(&config_path, "chord_ratio_treshold = 0.3\n").unwrap();

    let output = run_chordcheckr(dir.path())
        .current_dir(dir.path())
        .arg("--config")
        .arg(&config_path)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("chord_ratio_treshold"));
}
