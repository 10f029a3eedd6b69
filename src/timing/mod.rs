//! Timing analysis: timestamp unit and sample rate inference
//!
//! Timestamps arrive in whatever unit the acquisition device used. The unit
//! is inferred from the median interval, and a sample rate is reported only
//! when the intervals are strictly positive and consistent enough for a
//! fixed-cutoff digital filter design. Anything else is "unknown", which is
//! an expected outcome rather than an error.

use crate::config::constants::timing::*;
use crate::config::ConditioningConfig;
use crate::utils::stats::{finite_diffs, median, population_std};
use serde::Serialize;
use tracing::debug;

/// Unit of a timestamp sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Microseconds,
    Milliseconds,
    Seconds,
}

impl TimeUnit {
    /// Factor converting one unit to seconds
    pub fn scale(self) -> f64 {
        match self {
            TimeUnit::Microseconds => MICROSECONDS_TO_SECONDS,
            TimeUnit::Milliseconds => MILLISECONDS_TO_SECONDS,
            TimeUnit::Seconds => SECONDS_TO_SECONDS,
        }
    }

    /// Classify a positive median interval
    fn from_median_interval(median_dt: f64) -> Self {
        if median_dt >= MICROSECOND_INTERVAL_THRESHOLD {
            TimeUnit::Microseconds
        } else if median_dt >= MILLISECOND_INTERVAL_THRESHOLD {
            TimeUnit::Milliseconds
        } else {
            TimeUnit::Seconds
        }
    }
}

/// Why no sample rate could be assigned
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimingIssue {
    /// Fewer than two timestamps
    TooFewSamples,
    /// Every successive difference was non-finite
    NoFiniteIntervals,
    /// At least one interval was zero or negative
    NonMonotonic,
    /// The median interval was not positive
    NonPositiveMedian,
    /// Intervals varied by more than the tolerated fraction of the median
    IrregularSpacing { relative_spread: f64 },
}

impl std::fmt::Display for TimingIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimingIssue::TooFewSamples => write!(f, "fewer than {} timestamps", MIN_TIMESTAMPS),
            TimingIssue::NoFiniteIntervals => write!(f, "no finite timestamp intervals"),
            TimingIssue::NonMonotonic => write!(f, "timestamps are not strictly increasing"),
            TimingIssue::NonPositiveMedian => write!(f, "median interval is not positive"),
            TimingIssue::IrregularSpacing { relative_spread } => {
                write!(f, "irregular spacing (relative spread {:.3})", relative_spread)
            }
        }
    }
}

/// Full result of timing inference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingAnalysis {
    pub unit: TimeUnit,
    /// Seconds per timestamp unit
    pub scale: f64,
    /// `None` when the rate is unknown; see `issue`
    pub sample_rate_hz: Option<f64>,
    /// Median interval in timestamp units, when one could be measured
    pub median_interval: Option<f64>,
    /// Population std-dev of intervals over the median interval
    pub relative_spread: Option<f64>,
    pub issue: Option<TimingIssue>,
}

impl TimingAnalysis {
    pub fn is_known(&self) -> bool {
        self.sample_rate_hz.is_some()
    }

    fn unknown(unit: TimeUnit, issue: TimingIssue) -> Self {
        Self {
            unit,
            scale: unit.scale(),
            sample_rate_hz: None,
            median_interval: None,
            relative_spread: None,
            issue: Some(issue),
        }
    }
}

/// Infer the unit of a timestamp sequence from its median absolute interval.
///
/// Sequences too short or degenerate to measure default to seconds.
pub fn infer_time_unit(timestamps: &[f64]) -> TimeUnit {
    if timestamps.len() < MIN_TIMESTAMPS {
        return TimeUnit::Seconds;
    }

    let abs_diffs: Vec<f64> = finite_diffs(timestamps).into_iter().map(f64::abs).collect();
    match median(&abs_diffs) {
        Some(median_dt) if median_dt > 0.0 => TimeUnit::from_median_interval(median_dt),
        _ => TimeUnit::Seconds,
    }
}

/// Factor converting timestamp units to seconds: 1e-6, 1e-3 or 1.0
pub fn infer_scale(timestamps: &[f64]) -> f64 {
    infer_time_unit(timestamps).scale()
}

/// Sample rate in Hz, or `None` when timing is too short, non-monotonic or irregular
pub fn infer_sample_rate(timestamps: &[f64]) -> Option<f64> {
    analyze_timing(timestamps, &ConditioningConfig::default()).sample_rate_hz
}

/// Infer unit and sample rate, reporting why the rate is unknown when it is
pub fn analyze_timing(timestamps: &[f64], config: &ConditioningConfig) -> TimingAnalysis {
    let unit = infer_time_unit(timestamps);
    let analysis = analyze_intervals(timestamps, unit, config.max_relative_spread);

    if let Some(issue) = &analysis.issue {
        debug!(len = timestamps.len(), %issue, "sample rate unknown");
    } else {
        debug!(
            unit = ?analysis.unit,
            sample_rate_hz = ?analysis.sample_rate_hz,
            "sample rate inferred"
        );
    }
    analysis
}

fn analyze_intervals(timestamps: &[f64], unit: TimeUnit, max_relative_spread: f64) -> TimingAnalysis {
    if timestamps.len() < MIN_TIMESTAMPS {
        return TimingAnalysis::unknown(unit, TimingIssue::TooFewSamples);
    }

    let diffs = finite_diffs(timestamps);
    if diffs.is_empty() {
        return TimingAnalysis::unknown(unit, TimingIssue::NoFiniteIntervals);
    }

    if diffs.iter().any(|&d| d <= 0.0) {
        return TimingAnalysis::unknown(unit, TimingIssue::NonMonotonic);
    }

    let median_dt = match median(&diffs) {
        Some(m) if m > 0.0 => m,
        _ => return TimingAnalysis::unknown(unit, TimingIssue::NonPositiveMedian),
    };

    let spread = population_std(&diffs).unwrap_or(0.0);
    let relative_spread = spread / median_dt;

    let mut analysis = TimingAnalysis {
        unit,
        scale: unit.scale(),
        sample_rate_hz: None,
        median_interval: Some(median_dt),
        relative_spread: Some(relative_spread),
        issue: None,
    };

    if relative_spread > max_relative_spread {
        analysis.issue = Some(TimingIssue::IrregularSpacing { relative_spread });
        return analysis;
    }

    let dt_seconds = median_dt * analysis.scale;
    if dt_seconds <= 0.0 {
        analysis.issue = Some(TimingIssue::NonPositiveMedian);
        return analysis;
    }

    analysis.sample_rate_hz = Some(1.0 / dt_seconds);
    analysis
}
