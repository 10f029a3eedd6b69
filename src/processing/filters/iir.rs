// src/processing/filters/iir.rs
//! IIR (Infinite Impulse Response) filter evaluation

use super::{FilterError, IirCoefficients};

/// IIR filter in transposed Direct Form II with explicit state
pub struct IirFilter {
    coefficients: IirCoefficients,
    state: Vec<f64>,
    order: usize,
}

impl IirFilter {
    /// Create filter from coefficients with zero initial state
    pub fn new(coefficients: &IirCoefficients) -> Result<Self, FilterError> {
        let coefficients = coefficients.normalized()?;
        let order = coefficients.taps() - 1;
        Ok(Self {
            coefficients,
            state: vec![0.0; order],
            order,
        })
    }

    /// Create filter with a given initial state, one value per delay
    pub fn with_state(coefficients: &IirCoefficients, state: Vec<f64>) -> Result<Self, FilterError> {
        let mut filter = Self::new(coefficients)?;
        if state.len() != filter.order {
            return Err(FilterError::InvalidParameters(format!(
                "Initial state has {} values, filter needs {}",
                state.len(),
                filter.order
            )));
        }
        filter.state = state;
        Ok(filter)
    }

    /// Process single sample
    pub fn process_sample(&mut self, input: f64) -> f64 {
        let b = &self.coefficients.b;
        let a = &self.coefficients.a;

        if self.order == 0 {
            return b[0] * input;
        }

        let output = b[0] * input + self.state[0];

        for i in 0..self.order - 1 {
            self.state[i] = self.state[i + 1] + b[i + 1] * input - a[i + 1] * output;
        }
        self.state[self.order - 1] = b[self.order] * input - a[self.order] * output;

        output
    }

    /// Process a whole signal, carrying state across samples
    pub fn process(&mut self, input: &[f64]) -> Vec<f64> {
        input.iter().map(|&x| self.process_sample(x)).collect()
    }

    /// Reset filter state
    pub fn reset(&mut self) {
        self.state.fill(0.0);
    }

    /// Get filter order
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn coefficients(&self) -> &IirCoefficients {
        &self.coefficients
    }
}
