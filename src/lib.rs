//! EMG-Conditioning: timing inference and signal conditioning for EMG review
//!
//! This library turns a single-channel recording (amplitude samples plus
//! timestamps) into the signal variants and statistics used for visual and
//! clinical review. It features:
//!
//! - Timestamp unit inference (microseconds, milliseconds, seconds)
//! - Sample rate inference that refuses irregular or non-monotonic timing
//! - Demean, 20 Hz high-pass, rectify and 5 Hz envelope stages
//! - Zero-phase Butterworth filtering that degrades to a pass-through on
//!   short or numerically degenerate signals
//! - Recording summaries (duration, sample rate, min, max, RMS)
//!
//! # Quick Start
//!
//! ```rust
//! use emg_conditioning::{condition, infer_sample_rate, infer_scale};
//!
//! let timestamps: Vec<f64> = (0..200).map(|i| i as f64).collect(); // ms
//! let samples: Vec<f64> = (0..200).map(|i| (i as f64 * 0.3).sin()).collect();
//!
//! assert_eq!(infer_scale(&timestamps), 1e-3);
//! let fs = infer_sample_rate(&timestamps);
//! let signals = condition(&samples, fs);
//!
//! assert_eq!(signals.envelope.len(), samples.len());
//! ```

#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod processing;
pub mod timing;
pub mod utils;

// Re-export commonly used types for convenience
pub use analysis::{analyze, analyze_batch, Recording, RecordingAnalysis};
pub use config::{ConditioningConfig, ConfigError, ConfigLoader};
pub use error::{EmgError, EmgResult, ProcessingStage};
pub use processing::{
    condition, condition_with, summarize, ConditionedSignals, ConditioningPipeline,
    FilterOutcome, SignalSummary, SignalVariant,
};
pub use processing::filters::{apply_zero_phase, butterworth, BandType, FilterError, IirCoefficients};
pub use timing::{analyze_timing, infer_sample_rate, infer_scale, TimeUnit, TimingAnalysis, TimingIssue};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
