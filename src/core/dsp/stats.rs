//! Level and amplitude helpers

/// Floor added to RMS before taking the logarithm, so silence maps to -200 dB
/// instead of -infinity
pub const DB_EPSILON: f32 = 1e-10;

/// Compute RMS (Root Mean Square)
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_sq: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_sq / samples.len() as f64).sqrt() as f32
}

/// RMS level in dB relative to full scale, floored by `DB_EPSILON`
pub fn rms_db(samples: &[f32]) -> f32 {
    20.0 * (rms(samples) + DB_EPSILON).log10()
}

/// Compute peak amplitude
pub fn peak_amplitude(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
}

/// Scale samples in place so the absolute peak is 1.0.
///
/// Silent input is left untouched.
pub fn normalize_peak(samples: &mut [f32]) {
    let peak = peak_amplitude(samples);
    if peak > DB_EPSILON {
        let gain = 1.0 / peak;
        samples.iter_mut().for_each(|s| *s *= gain);
    }
}

/// Convert a frequency in Hz to a (fractional) MIDI note number
pub fn hz_to_midi(freq_hz: f32) -> f32 {
    69.0 + 12.0 * (freq_hz / 440.0).log2()
}

/// Convert a MIDI note number to Hz
pub fn midi_to_hz(midi: f32) -> f32 {
    440.0 * 2.0_f32.powf((midi - 69.0) / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rms_db_of_full_scale_square() {
        let samples = vec![1.0, -1.0, 1.0, -1.0];
        assert!((rms(&samples) - 1.0).abs() < 1e-6);
        assert!(rms_db(&samples).abs() < 1e-3);
    }

    #[test]
    fn test_rms_db_of_silence_is_finite() {
        let samples = vec![0.0; 512];
        let db = rms_db(&samples);
        assert!(db.is_finite());
        assert!((db + 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_normalize_peak() {
        let mut samples = vec![0.25, -0.5, 0.1];
        normalize_peak(&mut samples);
        assert!((samples[1] + 1.0).abs() < 1e-6);
        assert!((samples[0] - 0.5).abs() < 1e-6);

        let mut silent = vec![0.0; 4];
        normalize_peak(&mut silent);
        assert!(silent.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_midi_conversion() {
        assert!((hz_to_midi(440.0) - 69.0).abs() < 1e-4);
        assert!((hz_to_midi(130.81) - 48.0).abs() < 0.01);
        assert!((midi_to_hz(60.0) - 261.63).abs() < 0.01);
    }
}
