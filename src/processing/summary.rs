//! Recording statistics for reports

use crate::config::constants::report::{DEFAULT_PRECISION, MISSING_VALUE};
use crate::utils::stats::{nan_max, nan_min, nan_rms};
use serde::Serialize;

/// Headline statistics of a recording; `None` marks an undefined value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalSummary {
    pub duration_s: Option<f64>,
    pub sample_rate_hz: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub rms: Option<f64>,
}

impl SignalSummary {
    /// Label/value rows in report order, values formatted with `precision` decimals
    pub fn rows(&self, precision: usize) -> Vec<(&'static str, String)> {
        vec![
            ("Duration (s)", format_value(self.duration_s, precision)),
            ("Sample rate (Hz)", format_value(self.sample_rate_hz, precision)),
            ("Min", format_value(self.min, precision)),
            ("Max", format_value(self.max, precision)),
            ("RMS", format_value(self.rms, precision)),
        ]
    }
}

impl std::fmt::Display for SignalSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (label, value) in self.rows(DEFAULT_PRECISION) {
            writeln!(f, "{}: {}", label, value)?;
        }
        Ok(())
    }
}

/// Summarize a recording.
///
/// Duration comes from the timestamp span converted by `scale` when there
/// are at least two timestamps, otherwise from `samples.len() / sample_rate`.
pub fn summarize(
    timestamps: &[f64],
    samples: &[f64],
    sample_rate: Option<f64>,
    scale: f64,
) -> SignalSummary {
    SignalSummary {
        duration_s: duration_seconds(timestamps, samples.len(), sample_rate, scale),
        sample_rate_hz: sample_rate,
        min: nan_min(samples),
        max: nan_max(samples),
        rms: nan_rms(samples),
    }
}

pub fn duration_seconds(
    timestamps: &[f64],
    sample_count: usize,
    sample_rate: Option<f64>,
    scale: f64,
) -> Option<f64> {
    match (timestamps.first(), timestamps.last()) {
        (Some(first), Some(last)) if timestamps.len() >= 2 => Some((last - first) * scale),
        _ => sample_rate
            .filter(|fs| *fs > 0.0)
            .map(|fs| sample_count as f64 / fs),
    }
}

/// Format a statistic for display; `"n/a"` when missing or NaN
pub fn format_value(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) if !v.is_nan() => format!("{:.*}", precision, v),
        _ => MISSING_VALUE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_from_millisecond_timestamps() {
        let timestamps = [0.0, 10.0, 20.0, 30.0, 40.0];
        let summary = summarize(&timestamps, &[1.0, -2.0, 3.0, 0.0, 1.0], Some(100.0), 1e-3);

        assert!((summary.duration_s.unwrap() - 0.04).abs() < 1e-12);
        assert_eq!(summary.sample_rate_hz, Some(100.0));
        assert_eq!(summary.min, Some(-2.0));
        assert_eq!(summary.max, Some(3.0));
    }

    #[test]
    fn test_duration_falls_back_to_sample_rate() {
        assert_eq!(duration_seconds(&[5.0], 200, Some(100.0), 1.0), Some(2.0));
        assert_eq!(duration_seconds(&[], 200, None, 1.0), None);
        assert_eq!(duration_seconds(&[], 200, Some(0.0), 1.0), None);
    }

    #[test]
    fn test_empty_recording() {
        let summary = summarize(&[], &[], None, 1.0);
        assert_eq!(summary.duration_s, None);
        assert_eq!(summary.min, None);
        assert_eq!(summary.max, None);
        assert_eq!(summary.rms, None);
    }

    #[test]
    fn test_rms_ignores_nan() {
        let summary = summarize(&[], &[3.0, f64::NAN, 4.0], None, 1.0);
        assert!((summary.rms.unwrap() - 12.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(None, 2), "n/a");
        assert_eq!(format_value(Some(f64::NAN), 2), "n/a");
        assert_eq!(format_value(Some(3.14159), 2), "3.14");
        assert_eq!(format_value(Some(100.0), 0), "100");
    }

    #[test]
    fn test_summary_display() {
        let summary = summarize(&[0.0, 1.0], &[1.0, 1.0], None, 1.0);
        let text = summary.to_string();
        assert!(text.contains("Duration (s): 1.00"));
        assert!(text.contains("Sample rate (Hz): n/a"));
        assert!(text.contains("RMS: 1.00"));
    }
}
