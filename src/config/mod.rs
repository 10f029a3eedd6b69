// src/config/mod.rs
//! Conditioning configuration
//!
//! The pipeline's cutoffs, filter order and timing tolerance are fixed domain
//! constants. `ConditioningConfig` surfaces them for acquisition regimes that
//! need different values; its defaults reproduce the fixed behavior exactly.

pub mod constants;
pub mod loader;

pub use constants::*;
pub use loader::{ConfigError, ConfigLoader};

use serde::{Deserialize, Serialize};

/// Tunable parameters of timing inference and conditioning
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConditioningConfig {
    #[serde(default = "defaults::highpass_cutoff_hz")]
    pub highpass_cutoff_hz: f64,

    #[serde(default = "defaults::lowpass_cutoff_hz")]
    pub lowpass_cutoff_hz: f64,

    #[serde(default = "defaults::filter_order")]
    pub filter_order: usize,

    #[serde(default = "defaults::max_relative_spread")]
    pub max_relative_spread: f64,

    #[serde(default = "defaults::min_filter_len")]
    pub min_filter_len: usize,
}

/// Default value providers using constants
mod defaults {
    use crate::config::constants::*;

    pub fn highpass_cutoff_hz() -> f64 { filters::HIGHPASS_CUTOFF_HZ }
    pub fn lowpass_cutoff_hz() -> f64 { filters::LOWPASS_CUTOFF_HZ }
    pub fn filter_order() -> usize { filters::FILTER_ORDER }
    pub fn max_relative_spread() -> f64 { timing::MAX_RELATIVE_SPREAD }
    pub fn min_filter_len() -> usize { filters::MIN_FILTER_LEN }
}

impl Default for ConditioningConfig {
    fn default() -> Self {
        Self {
            highpass_cutoff_hz: defaults::highpass_cutoff_hz(),
            lowpass_cutoff_hz: defaults::lowpass_cutoff_hz(),
            filter_order: defaults::filter_order(),
            max_relative_spread: defaults::max_relative_spread(),
            min_filter_len: defaults::min_filter_len(),
        }
    }
}

impl ConditioningConfig {
    /// Check every field, collecting all problems rather than stopping at the first
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if !self.highpass_cutoff_hz.is_finite() || self.highpass_cutoff_hz <= 0.0 {
            errors.push(format!(
                "highpass_cutoff_hz must be positive, got {}",
                self.highpass_cutoff_hz
            ));
        }
        if !self.lowpass_cutoff_hz.is_finite() || self.lowpass_cutoff_hz <= 0.0 {
            errors.push(format!(
                "lowpass_cutoff_hz must be positive, got {}",
                self.lowpass_cutoff_hz
            ));
        }
        if self.filter_order < filters::MIN_FILTER_ORDER || self.filter_order > filters::MAX_FILTER_ORDER {
            errors.push(format!(
                "filter_order must be {}-{}, got {}",
                filters::MIN_FILTER_ORDER,
                filters::MAX_FILTER_ORDER,
                self.filter_order
            ));
        }
        if !self.max_relative_spread.is_finite() || self.max_relative_spread < 0.0 {
            errors.push(format!(
                "max_relative_spread must be non-negative, got {}",
                self.max_relative_spread
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}
