// src/core/judgment/aggregator.rs
//
// Judgment aggregator: loudness filter -> strategy frame pass -> merged
// statistics -> verdict -> report. One report per waveform, always.

use std::path::Path;

use super::factory::create_strategy;
use super::loudness::LoudnessFilter;
use super::stats::StatsBundle;
use super::strategy::JudgmentStrategy;
use crate::config::JudgmentConfig;
use crate::core::decoder::Waveform;
use crate::core::pitch::MultiPitchMatrix;
use crate::detection::{Judgment, ReportSink, Verdict};
use crate::error::{ChordcheckrError, Result};

/// Judges waveforms with one configured strategy.
///
/// Holds no per-file state, so one `Judge` is shared by every worker.
pub struct Judge {
    config: JudgmentConfig,
    filter: LoudnessFilter,
    strategy: Box<dyn JudgmentStrategy>,
}

impl Judge {
    /// Build a judge for `config.judgment_method`; unknown names fail here
    pub fn new(config: JudgmentConfig) -> Result<Self> {
        let strategy = create_strategy(&config.judgment_method)?;
        Ok(Self {
            filter: LoudnessFilter::from_config(&config),
            config,
            strategy,
        })
    }

    pub fn config(&self) -> &JudgmentConfig {
        &self.config
    }

    pub fn method(&self) -> &'static str {
        self.strategy.name()
    }

    /// Judge a loaded waveform against its pitch matrix
    pub fn judge(&self, waveform: &Waveform, pitches: &MultiPitchMatrix) -> Result<Judgment> {
        log::debug!(
            "Judging {:.2}s at {} Hz with {}",
            waveform.duration_secs(),
            waveform.sample_rate,
            self.method()
        );
        self.judge_samples(&waveform.samples, pitches)
    }

    /// Judge and emit the result to `sink`
    pub fn judge_and_report(
        &self,
        path: &Path,
        waveform: &Waveform,
        pitches: &MultiPitchMatrix,
        sink: &dyn ReportSink,
    ) -> Result<Judgment> {
        let judgment = self.judge(waveform, pitches)?;
        sink.judged(path, &judgment);
        Ok(judgment)
    }

    fn judge_samples(&self, samples: &[f32], pitches: &MultiPitchMatrix) -> Result<Judgment> {
        self.check_alignment(samples.len(), pitches)?;

        let loudness = self.filter.analyze(samples);
        let analysis =
            self.strategy
                .analyze_frames(&loudness.valid_frames, pitches, &self.config);

        let stats = StatsBundle {
            total_frames: loudness.total_frames(),
            skip_frames: loudness.skipped_frames(),
            chord_frames: analysis.chord_frames,
            melody_frames: analysis.melody_frames,
            max_volume_db: loudness.max_db,
            metrics: analysis.metrics,
        };

        let analyzed = stats.analyzed_frames();
        let verdict = self.strategy.make_judgment(&stats, analyzed, &self.config);
        let report = self.strategy.format_stats(&stats);

        log::debug!(
            "{} frames, {} skipped, {} chord, {} melody -> {}",
            stats.total_frames,
            stats.skip_frames,
            stats.chord_frames,
            stats.melody_frames,
            verdict
        );

        Ok(Judgment {
            verdict,
            method: self.strategy.name(),
            stats,
            report,
        })
    }

    /// The pitch matrix must come from the same hop size, and cover every
    /// loudness frame (one trailing extra frame is tolerated and ignored).
    fn check_alignment(&self, sample_count: usize, pitches: &MultiPitchMatrix) -> Result<()> {
        if pitches.hop_size() != self.config.hop_size {
            return Err(ChordcheckrError::HopSizeMismatch {
                expected: self.config.hop_size,
                actual: pitches.hop_size(),
            });
        }

        let loudness_frames = self.filter.frame_count(sample_count);
        let pitch_frames = pitches.len();
        if pitch_frames != loudness_frames && pitch_frames != loudness_frames + 1 {
            return Err(ChordcheckrError::FrameCountMismatch {
                loudness_frames,
                pitch_frames,
            });
        }
        Ok(())
    }
}

/// Core entry point: judge raw mono samples with a one-off `Judge`.
///
/// Returns the verdict and the formatted report.
pub fn judge(
    samples: &[f32],
    sample_rate: u32,
    pitches: &MultiPitchMatrix,
    config: &JudgmentConfig,
) -> Result<(Verdict, String)> {
    let judge = Judge::new(config.clone())?;
    log::trace!("Judging {} samples at {} Hz", samples.len(), sample_rate);
    let judgment = judge.judge_samples(samples, pitches)?;
    Ok((judgment.verdict, judgment.report))
}
