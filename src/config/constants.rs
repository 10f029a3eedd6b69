// src/config/constants.rs
//! Domain constants for timing inference and signal conditioning
//!
//! Every threshold the pipeline applies lives here so nothing downstream
//! carries a magic number. `ConditioningConfig` defaults are built from these.

/// Timestamp unit inference
pub mod timing {
    /// Median interval at or above which timestamps are taken as microseconds
    pub const MICROSECOND_INTERVAL_THRESHOLD: f64 = 1000.0;
    /// Median interval at or above which timestamps are taken as milliseconds
    pub const MILLISECOND_INTERVAL_THRESHOLD: f64 = 1.0;

    pub const MICROSECONDS_TO_SECONDS: f64 = 1e-6;
    pub const MILLISECONDS_TO_SECONDS: f64 = 1e-3;
    pub const SECONDS_TO_SECONDS: f64 = 1.0;

    /// Maximum population std-dev of intervals, relative to the median interval
    pub const MAX_RELATIVE_SPREAD: f64 = 0.10;

    /// Fewest timestamps from which an interval can be measured
    pub const MIN_TIMESTAMPS: usize = 2;
}

/// Filter design and application
pub mod filters {
    /// Baseline-wander removal cutoff
    pub const HIGHPASS_CUTOFF_HZ: f64 = 20.0;
    /// Envelope smoothing cutoff
    pub const LOWPASS_CUTOFF_HZ: f64 = 5.0;
    pub const FILTER_ORDER: usize = 4;
    pub const MIN_FILTER_ORDER: usize = 1;
    pub const MAX_FILTER_ORDER: usize = 8;

    /// Signals at or below this length are never zero-phase filtered
    pub const MIN_FILTER_LEN: usize = 21;

    /// Edge-effect guard is this many multiples of the filter's state length
    pub const EDGE_GUARD_FACTOR: usize = 3;
}

/// Report formatting
pub mod report {
    pub const DEFAULT_PRECISION: usize = 2;
    pub const MISSING_VALUE: &str = "n/a";
}
