// src/analysis.rs
//! Whole-recording analysis: timing, conditioning and summary in one call

use crate::config::ConditioningConfig;
use crate::processing::{summarize, ConditionedSignals, ConditioningPipeline, SignalSummary};
use crate::timing::{analyze_timing, TimingAnalysis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A single-channel recording as handed over by the input parser
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Recording {
    #[serde(default)]
    pub timestamps: Vec<f64>,
    #[serde(default)]
    pub samples: Vec<f64>,
}

impl Recording {
    pub fn new(timestamps: Vec<f64>, samples: Vec<f64>) -> Self {
        Self { timestamps, samples }
    }

    /// Build a recording from `(sample, timestamp)` rows
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let (samples, timestamps) = rows.into_iter().unzip();
        Self { timestamps, samples }
    }
}

/// Everything the report layer needs for one recording
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordingAnalysis {
    pub timing: TimingAnalysis,
    pub signals: ConditionedSignals,
    pub summary: SignalSummary,
}

/// Analyze one recording.
///
/// Timestamps and samples may differ in length; timing is inferred from the
/// timestamps alone and conditioning runs over all samples.
pub fn analyze(recording: &Recording, config: &ConditioningConfig) -> RecordingAnalysis {
    if recording.timestamps.len() != recording.samples.len() {
        warn!(
            timestamps = recording.timestamps.len(),
            samples = recording.samples.len(),
            "timestamp and sample counts differ"
        );
    }

    let timing = analyze_timing(&recording.timestamps, config);
    let signals = ConditioningPipeline::new(config.clone())
        .condition(&recording.samples, timing.sample_rate_hz);
    let summary = summarize(
        &recording.timestamps,
        &recording.samples,
        timing.sample_rate_hz,
        timing.scale,
    );

    debug!(
        samples = recording.samples.len(),
        highpass = ?signals.highpass,
        lowpass = ?signals.lowpass,
        "recording analyzed"
    );

    RecordingAnalysis {
        timing,
        signals,
        summary,
    }
}

/// Analyze independent recordings in parallel; results keep input order
pub fn analyze_batch(recordings: &[Recording], config: &ConditioningConfig) -> Vec<RecordingAnalysis> {
    recordings
        .par_iter()
        .map(|recording| analyze(recording, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::FilterOutcome;
    use crate::timing::TimingIssue;

    fn ms_recording(len: usize) -> Recording {
        Recording::from_rows((0..len).map(|i| ((i as f64 * 0.7).sin(), i as f64)))
    }

    #[test]
    fn test_analyze_millisecond_recording() {
        let recording = ms_recording(100);
        let analysis = analyze(&recording, &ConditioningConfig::default());

        let rate = analysis.timing.sample_rate_hz.unwrap();
        assert!((rate - 1000.0).abs() < 1e-6);
        assert_eq!(analysis.timing.scale, 1e-3);
        assert_eq!(analysis.signals.highpass, FilterOutcome::Applied);
        assert!((analysis.summary.duration_s.unwrap() - 0.099).abs() < 1e-9);
    }

    #[test]
    fn test_missing_timestamps() {
        let recording = Recording::new(Vec::new(), vec![1.0, 2.0, 3.0]);
        let analysis = analyze(&recording, &ConditioningConfig::default());

        assert_eq!(analysis.timing.issue, Some(TimingIssue::TooFewSamples));
        assert_eq!(analysis.signals.len(), 3);
        assert_eq!(analysis.signals.highpass, FilterOutcome::SkippedNoSampleRate);
        assert_eq!(analysis.summary.duration_s, None);
    }

    #[test]
    fn test_from_rows_splits_columns() {
        let recording = Recording::from_rows(vec![(0.5, 0.0), (0.7, 1.0)]);
        assert_eq!(recording.samples, vec![0.5, 0.7]);
        assert_eq!(recording.timestamps, vec![0.0, 1.0]);
    }

    #[test]
    fn test_batch_matches_sequential() {
        let recordings: Vec<Recording> = (1..6).map(|k| ms_recording(20 * k)).collect();
        let config = ConditioningConfig::default();

        let batch = analyze_batch(&recordings, &config);
        let sequential: Vec<RecordingAnalysis> =
            recordings.iter().map(|r| analyze(r, &config)).collect();

        assert_eq!(batch, sequential);
    }
}
