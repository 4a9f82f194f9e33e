// src/core/decoder.rs
//
// Audio loading: Symphonia decode, mono downmix, optional resampling and
// peak normalization.

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::dsp::normalize_peak;
use crate::error::{ChordcheckrError, Result};

/// Mono waveform ready for analysis
#[derive(Debug, Clone)]
pub struct Waveform {
    /// Mono samples, nominally in [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Interleaved decoder output before downmixing
struct DecodedAudio {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: usize,
}

/// Load an audio file as a mono waveform.
///
/// When `target_sample_rate` differs from the file's rate the signal is
/// resampled; when `normalize` is set the absolute peak is scaled to 1.0.
pub fn load_waveform(
    path: &Path,
    target_sample_rate: Option<u32>,
    normalize: bool,
) -> Result<Waveform> {
    let decoded = decode_audio(path)?;
    let mut samples = downmix_to_mono(&decoded.samples, decoded.channels);
    let mut sample_rate = decoded.sample_rate;

    if let Some(target) = target_sample_rate {
        if target != sample_rate {
            log::debug!(
                "Resampling {} from {} Hz to {} Hz",
                path.display(),
                sample_rate,
                target
            );
            samples = resample(&samples, sample_rate, target)
                .map_err(|reason| ChordcheckrError::decode(path, reason))?;
            sample_rate = target;
        }
    }

    if normalize {
        normalize_peak(&mut samples);
    }

    Ok(Waveform::new(samples, sample_rate))
}

fn decode_audio(path: &Path) -> Result<DecodedAudio> {
    let file = File::open(path).map_err(|e| ChordcheckrError::decode(path, e))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let mut probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| {
            ChordcheckrError::decode(path, format!("unsupported or corrupted file ({})", e))
        })?;

    let track = probed
        .format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| ChordcheckrError::decode(path, "no supported audio track"))?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| ChordcheckrError::decode(path, "file does not specify sample rate"))?;
    let channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(1);
    if channels == 0 {
        return Err(ChordcheckrError::decode(path, "file reports 0 audio channels"));
    }

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| ChordcheckrError::decode(path, e))?;

    let mut samples: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match probed.format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(e) => return Err(ChordcheckrError::decode(path, e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(buf) => buf,
            Err(SymphoniaError::DecodeError(msg)) => {
                log::debug!("Skipping undecodable packet in {}: {}", path.display(), msg);
                continue;
            }
            Err(e) => return Err(ChordcheckrError::decode(path, e)),
        };

        if sample_buf.is_none() {
            let spec = *decoded.spec();
            let duration = decoded.capacity() as u64;
            sample_buf = Some(SampleBuffer::new(duration, spec));
        }

        if let Some(ref mut buf) = sample_buf {
            buf.copy_interleaved_ref(decoded);
            samples.extend_from_slice(buf.samples());
        }
    }

    if samples.is_empty() {
        return Err(ChordcheckrError::decode(path, "no audio samples decoded"));
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}

/// Average interleaved channels into one
pub fn downmix_to_mono(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }

    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Band-limited resampling of a mono signal
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> std::result::Result<Vec<f32>, String> {
    if samples.is_empty() || from_rate == to_rate {
        return Ok(samples.to_vec());
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let ratio = to_rate as f64 / from_rate as f64;

    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, samples.len(), 1)
        .map_err(|e| e.to_string())?;
    let mut output = resampler
        .process(&[samples.to_vec()], None)
        .map_err(|e| e.to_string())?;

    Ok(output.pop().unwrap_or_default())
}
