//! Common numeric utilities
//!
//! Small statistics helpers shared by the timing analyzer, the conditioning
//! pipeline and the recording summary. They follow NumPy's `nan*`
//! conventions: non-finite or NaN values are skipped where noted, and empty
//! inputs produce `None` rather than panicking.

pub mod stats;

pub use stats::{
    finite_diffs,
    finite_mean,
    median,
    nan_max,
    nan_min,
    nan_rms,
    population_std,
};
