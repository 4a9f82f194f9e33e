//! Digital Signal Processing utilities

pub mod stats;

use num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};
use std::f32::consts::PI;
use std::sync::Arc;

use crate::error::{ChordcheckrError, Result};

pub use stats::{hz_to_midi, midi_to_hz, normalize_peak, peak_amplitude, rms, rms_db};

/// Window functions for spectral analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowFunction {
    Rectangular,
    #[default]
    Hann,
}

impl WindowFunction {
    /// Generate window coefficients
    pub fn generate(&self, size: usize) -> Vec<f32> {
        if size < 2 {
            return vec![1.0; size];
        }
        let denom = (size - 1) as f32;
        match self {
            WindowFunction::Rectangular => vec![1.0; size],
            WindowFunction::Hann => (0..size)
                .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / denom).cos()))
                .collect(),
        }
    }
}

/// Windowed magnitude spectrum of fixed-size frames
pub struct SpectrumAnalyzer {
    fft_size: usize,
    window: Vec<f32>,
    fft: Arc<dyn RealToComplex<f32>>,
    input: Vec<f32>,
    output: Vec<Complex<f32>>,
}

impl SpectrumAnalyzer {
    pub fn new(fft_size: usize, window_fn: WindowFunction) -> Self {
        let mut planner = RealFftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(fft_size);
        let input = fft.make_input_vec();
        let output = fft.make_output_vec();
        Self {
            fft_size,
            window: window_fn.generate(fft_size),
            fft,
            input,
            output,
        }
    }

    /// Magnitude spectrum (fft_size / 2 + 1 bins) of `samples`.
    ///
    /// Shorter input is zero-padded, longer input truncated.
    pub fn magnitude(&mut self, samples: &[f32]) -> Result<Vec<f32>> {
        self.input.iter_mut().for_each(|x| *x = 0.0);
        for ((dst, &s), &w) in self.input.iter_mut().zip(samples).zip(&self.window) {
            *dst = s * w;
        }

        self.fft
            .process(&mut self.input, &mut self.output)
            .map_err(|e| ChordcheckrError::PitchTracking(e.to_string()))?;

        Ok(self.output.iter().map(|c| c.norm()).collect())
    }

    /// Frequency of a (possibly fractional) bin
    pub fn bin_to_hz(&self, bin: f32, sample_rate: u32) -> f32 {
        bin * sample_rate as f32 / self.fft_size as f32
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_generation() {
        let hann = WindowFunction::Hann.generate(1025);
        assert_eq!(hann.len(), 1025);
        assert!(hann[0].abs() < 1e-6);
        assert!((hann[512] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_spectrum_peak_at_sine_frequency() {
        let sample_rate = 44100;
        let mut analyzer = SpectrumAnalyzer::new(4096, WindowFunction::Hann);
        let samples: Vec<f32> = (0..4096)
            .map(|i| (2.0 * PI * 1000.0 * i as f32 / sample_rate as f32).sin())
            .collect();

        let spectrum = analyzer.magnitude(&samples).unwrap();
        assert_eq!(spectrum.len(), 2049);

        let peak_bin = spectrum
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        let peak_hz = analyzer.bin_to_hz(peak_bin as f32, sample_rate);
        assert!((peak_hz - 1000.0).abs() < 11.0);
    }
}
