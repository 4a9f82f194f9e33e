// src/core/pitch/salience.rs
//
// Harmonic-sum multi-pitch tracker.
//
// Each hop frame is analyzed with a Hann-windowed spectrum centered on the
// frame. Spectral peaks are candidate fundamentals; a candidate's salience is
// the weighted magnitude of the peaks sitting on its harmonic series. The most
// salient candidate is accepted, its harmonics are consumed, and the search
// repeats until the remaining salience drops below a fraction of the first
// pick or the polyphony limit is reached.

use super::{MultiPitchMatrix, PitchParams, PitchTracker};
use crate::core::decoder::Waveform;
use crate::core::dsp::{SpectrumAnalyzer, WindowFunction};
use crate::error::{ChordcheckrError, Result};

#[derive(Debug, Clone, Copy)]
struct Peak {
    freq: f32,
    magnitude: f32,
}

/// Harmonic-sum multi-pitch tracker
#[derive(Debug, Clone)]
pub struct SalienceTracker {
    /// FFT size of the analysis window
    frame_size: usize,
    /// Maximum number of fundamentals reported per frame
    max_polyphony: usize,
    /// Peaks weaker than this (dB below the frame maximum) are ignored
    peak_floor_db: f32,
    /// Candidates below this fraction of the strongest salience are rejected
    salience_ratio: f32,
    /// Harmonics summed per candidate
    harmonics: usize,
    /// Weight decay per harmonic
    harmonic_decay: f32,
    /// Relative frequency tolerance when matching harmonics
    tolerance: f32,
}

impl Default for SalienceTracker {
    fn default() -> Self {
        Self {
            frame_size: 4096,
            max_polyphony: 6,
            peak_floor_db: -20.0,
            salience_ratio: 0.3,
            harmonics: 8,
            harmonic_decay: 0.8,
            tolerance: 0.03,
        }
    }
}

impl SalienceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_frame_size(mut self, frame_size: usize) -> Self {
        self.frame_size = frame_size.max(64);
        self
    }

    pub fn with_max_polyphony(mut self, max: usize) -> Self {
        self.max_polyphony = max.max(1);
        self
    }

    pub fn with_salience_ratio(mut self, ratio: f32) -> Self {
        self.salience_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Magnitude below which a frame is treated as silent
    fn silence_magnitude(&self) -> f32 {
        1e-4 * self.frame_size as f32
    }

    fn pick_peaks(&self, spectrum: &[f32], analyzer: &SpectrumAnalyzer, sample_rate: u32) -> Vec<Peak> {
        if spectrum.len() < 3 {
            return Vec::new();
        }

        let max_mag = spectrum[1..spectrum.len() - 1]
            .iter()
            .copied()
            .fold(0.0f32, f32::max);
        if max_mag < self.silence_magnitude() {
            return Vec::new();
        }
        let threshold = max_mag * 10.0_f32.powf(self.peak_floor_db / 20.0);

        let mut peaks = Vec::new();
        for k in 1..spectrum.len() - 1 {
            let (alpha, beta, gamma) = (spectrum[k - 1], spectrum[k], spectrum[k + 1]);
            if beta < threshold || beta <= alpha || beta < gamma {
                continue;
            }

            // Parabolic interpolation around the local maximum
            let denom = alpha - 2.0 * beta + gamma;
            let offset = if denom.abs() > f32::EPSILON {
                (0.5 * (alpha - gamma) / denom).clamp(-0.5, 0.5)
            } else {
                0.0
            };

            peaks.push(Peak {
                freq: analyzer.bin_to_hz(k as f32 + offset, sample_rate),
                magnitude: beta - 0.25 * (alpha - gamma) * offset,
            });
        }
        peaks
    }

    /// Harmonic number of `freq` relative to `f0`, if it lies on the series
    fn harmonic_number(&self, freq: f32, f0: f32) -> Option<usize> {
        let h = (freq / f0).round();
        if h < 1.0 || h > self.harmonics as f32 {
            return None;
        }
        let target = h * f0;
        ((freq - target).abs() <= self.tolerance * target).then_some(h as usize)
    }

    fn salience(&self, f0: f32, peaks: &[Peak], consumed: &[bool]) -> f32 {
        let mut best = vec![0.0f32; self.harmonics];
        for (peak, _) in peaks.iter().zip(consumed).filter(|(_, &used)| !used) {
            if let Some(h) = self.harmonic_number(peak.freq, f0) {
                best[h - 1] = best[h - 1].max(peak.magnitude);
            }
        }

        best.iter()
            .enumerate()
            .map(|(i, &mag)| self.harmonic_decay.powi(i as i32) * mag)
            .sum()
    }

    fn frame_pitches(&self, peaks: &[Peak], params: &PitchParams, max_frequency: f32) -> Vec<f32> {
        let mut consumed = vec![false; peaks.len()];
        let mut selected: Vec<f32> = Vec::new();
        let mut strongest: Option<f32> = None;

        while selected.len() < self.max_polyphony {
            let best = peaks
                .iter()
                .enumerate()
                .filter(|(i, p)| {
                    !consumed[*i] && p.freq >= params.min_frequency && p.freq <= max_frequency
                })
                .map(|(i, p)| (i, self.salience(p.freq, peaks, &consumed)))
                .max_by(|a, b| a.1.total_cmp(&b.1));

            let Some((index, salience)) = best else {
                break;
            };
            let reference = *strongest.get_or_insert(salience);
            if salience <= 0.0 || salience < reference * self.salience_ratio {
                break;
            }

            let f0 = peaks[index].freq;
            selected.push(f0);
            for (i, peak) in peaks.iter().enumerate() {
                if self.harmonic_number(peak.freq, f0).is_some() {
                    consumed[i] = true;
                }
            }
            consumed[index] = true;
        }

        selected.sort_by(|a, b| a.total_cmp(b));
        selected
    }
}

impl PitchTracker for SalienceTracker {
    fn estimate(&self, waveform: &Waveform, params: &PitchParams) -> Result<MultiPitchMatrix> {
        if params.hop_size == 0 {
            return Err(ChordcheckrError::PitchTracking("hop size must be greater than 0".into()));
        }
        if waveform.sample_rate == 0 {
            return Err(ChordcheckrError::PitchTracking("sample rate is 0".into()));
        }

        let nyquist = waveform.sample_rate as f32 / 2.0;
        let max_frequency = params.max_frequency.min(nyquist);
        if params.min_frequency <= 0.0 || params.min_frequency >= max_frequency {
            return Err(ChordcheckrError::PitchTracking(format!(
                "frequency range {}..{} Hz is empty at {} Hz sample rate",
                params.min_frequency, params.max_frequency, waveform.sample_rate
            )));
        }
        if max_frequency < params.max_frequency {
            log::debug!(
                "max_frequency {} Hz clamped to Nyquist ({} Hz)",
                params.max_frequency,
                nyquist
            );
        }

        let samples = &waveform.samples;
        let frame_count = samples.len() / params.hop_size;
        let mut analyzer = SpectrumAnalyzer::new(self.frame_size, WindowFunction::Hann);
        let mut buffer = vec![0.0f32; self.frame_size];
        let mut frames = Vec::with_capacity(frame_count);

        for i in 0..frame_count {
            let center = i * params.hop_size + params.hop_size / 2;
            let start = center as isize - (self.frame_size / 2) as isize;

            for (j, slot) in buffer.iter_mut().enumerate() {
                let idx = start + j as isize;
                *slot = if idx >= 0 && (idx as usize) < samples.len() {
                    samples[idx as usize]
                } else {
                    0.0
                };
            }

            let spectrum = analyzer.magnitude(&buffer)?;
            let peaks = self.pick_peaks(&spectrum, &analyzer, waveform.sample_rate);
            frames.push(self.frame_pitches(&peaks, params, max_frequency));
        }

        Ok(MultiPitchMatrix::new(params.hop_size, frames))
    }

    fn name(&self) -> &'static str {
        "harmonic-salience"
    }
}
