// src/processing/filters/mod.rs
//! Digital filters for EMG signal conditioning

pub mod butterworth;
pub mod iir;
pub mod zero_phase;

pub use butterworth::*;
pub use iir::*;
pub use zero_phase::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandType {
    Lowpass,
    Highpass,
}

/// Transfer-function coefficients of an IIR filter
#[derive(Debug, Clone, PartialEq)]
pub struct IirCoefficients {
    pub b: Vec<f64>, // Numerator coefficients
    pub a: Vec<f64>, // Denominator coefficients
}

impl IirCoefficients {
    /// Number of taps, `max(len(a), len(b))`
    pub fn taps(&self) -> usize {
        self.a.len().max(self.b.len())
    }

    /// Pad to equal length and scale so that `a[0] == 1`
    pub fn normalized(&self) -> Result<Self, FilterError> {
        if self.a.is_empty() || self.b.is_empty() {
            return Err(FilterError::InvalidCoefficients("empty coefficient vector".to_string()));
        }
        if self.a.iter().chain(self.b.iter()).any(|c| !c.is_finite()) {
            return Err(FilterError::InvalidCoefficients("non-finite coefficient".to_string()));
        }
        let a0 = self.a[0];
        if a0 == 0.0 {
            return Err(FilterError::InvalidCoefficients("a[0] must be non-zero".to_string()));
        }

        let taps = self.taps();
        let mut b: Vec<f64> = self.b.iter().map(|c| c / a0).collect();
        let mut a: Vec<f64> = self.a.iter().map(|c| c / a0).collect();
        b.resize(taps, 0.0);
        a.resize(taps, 0.0);

        Ok(Self { b, a })
    }
}

/// Filter error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Invalid coefficients: {0}")]
    InvalidCoefficients(String),

    #[error("Signal of {len} samples is too short, need more than {required}")]
    SignalTooShort { len: usize, required: usize },

    #[error("Numerical failure: {0}")]
    NumericalFailure(String),
}

/// What a guarded filter stage actually did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOutcome {
    /// The filter ran and its output replaced the input
    Applied,
    /// No usable sample rate, so no filter could be designed
    SkippedNoSampleRate,
    /// Nyquist frequency does not exceed the cutoff
    SkippedBelowNyquist,
    /// Signal too short for forward-backward edge handling
    SkippedTooShort,
    /// Design or application failed numerically; input passed through
    Failed,
}

impl FilterOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, FilterOutcome::Applied)
    }
}
