// src/testgen/mod.rs
//
// Synthetic take generation for tests and manual checks.
// Writes mono 16-bit WAV files of sustained chords and single-note lines.

use anyhow::{Context, Result};
use std::f32::consts::PI;
use std::path::Path;

use crate::core::dsp::midi_to_hz;

/// Sample rate of generated takes
pub const SAMPLE_RATE: u32 = 44100;

/// Fade applied at both ends of every note, in seconds
const FADE_SECS: f32 = 0.01;

/// Silence between melody notes, longer than half the tracker window so no
/// analysis frame hears two notes at once
const NOTE_GAP_SECS: f32 = 0.12;

fn seconds_to_samples(seconds: f32) -> usize {
    (seconds * SAMPLE_RATE as f32) as usize
}

/// Sine tones at the given MIDI notes, summed and scaled to `amplitude` peak
/// per note, with short linear fades
pub fn tone(notes: &[f32], seconds: f32, amplitude: f32) -> Vec<f32> {
    let len = seconds_to_samples(seconds);
    let fade = seconds_to_samples(FADE_SECS).max(1);
    let freqs: Vec<f32> = notes.iter().map(|&m| midi_to_hz(m)).collect();

    (0..len)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            let envelope = (i.min(len - 1 - i) as f32 / fade as f32).min(1.0);
            let sum: f32 = freqs.iter().map(|f| (2.0 * PI * f * t).sin()).sum();
            sum * amplitude * envelope
        })
        .collect()
}

/// A sustained chord: all notes sound together for `seconds`
pub fn chord_take(notes: &[f32], seconds: f32) -> Vec<f32> {
    let amplitude = 0.9 / notes.len().max(1) as f32;
    tone(notes, seconds, amplitude)
}

/// A single-note line: each note for `note_seconds`, separated by short gaps
pub fn melody_take(notes: &[f32], note_seconds: f32) -> Vec<f32> {
    let gap = vec![0.0f32; seconds_to_samples(NOTE_GAP_SECS)];
    let mut samples = Vec::new();
    for (i, &note) in notes.iter().enumerate() {
        if i > 0 {
            samples.extend_from_slice(&gap);
        }
        samples.extend(tone(&[note], note_seconds, 0.5));
    }
    samples
}

/// Write mono samples as a 16-bit WAV at `SAMPLE_RATE`
pub fn write_wav(path: &Path, samples: &[f32]) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for &sample in samples {
        let value = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
        writer
            .write_sample(value)
            .with_context(|| format!("Failed to write sample to {}", path.display()))?;
    }
    writer
        .finalize()
        .with_context(|| format!("Failed to finalize {}", path.display()))?;
    Ok(())
}

/// Write a C major triad (C4 E4 G4) take
pub fn write_chord_take(path: &Path, seconds: f32) -> Result<()> {
    write_wav(path, &chord_take(&[60.0, 64.0, 67.0], seconds))
}

/// Write a stepwise C major line (C4 D4 E4 F4) take
pub fn write_melody_take(path: &Path, note_seconds: f32) -> Result<()> {
    write_wav(path, &melody_take(&[60.0, 62.0, 64.0, 65.0], note_seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_melody_take_layout() {
        let samples = melody_take(&[60.0, 62.0], 0.5);
        let note = seconds_to_samples(0.5);
        let gap = seconds_to_samples(NOTE_GAP_SECS);
        assert_eq!(samples.len(), 2 * note + gap);
        assert!(samples[note..note + gap].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_chord_take_stays_in_range() {
        let samples = chord_take(&[60.0, 64.0, 67.0], 0.25);
        assert!(samples.iter().all(|s| s.abs() <= 0.9 + 1e-4));
        assert_eq!(samples[0], 0.0);
    }

    #[test]
    fn test_written_wav_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take_MLD.wav");
        write_chord_take(&path, 0.2).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, SAMPLE_RATE);
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.len() as usize, seconds_to_samples(0.2));
    }
}
