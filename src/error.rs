// src/error.rs
//! Unified error handling for EMG conditioning
//!
//! The conditioning core never fails on numeric input: unknown timing is an
//! `Option`, an unfilterable signal passes through unchanged. Errors only
//! surface from configuration handling and from the explicit, unguarded
//! filter APIs. This module gathers those into one crate-level type.

use crate::config::loader::ConfigError;
use crate::processing::filters::FilterError;
use thiserror::Error;

/// Filtering stages of the pipeline, used to attribute errors and skipped work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessingStage {
    /// High-pass over the demeaned signal
    HighPass,
    /// Low-pass over the rectified signal
    Envelope,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProcessingStage::HighPass => "high-pass",
            ProcessingStage::Envelope => "envelope",
        };
        f.write_str(name)
    }
}

/// Unified error type for the crate
#[derive(Debug, Error)]
pub enum EmgError {
    /// Configuration loading or validation failed
    #[error("[CONFIG] {0}")]
    Configuration(#[from] ConfigError),

    /// Filter design or application failed
    #[error("[PROCESSING] {stage} stage error: {source}")]
    Processing {
        stage: ProcessingStage,
        #[source]
        source: FilterError,
    },
}

impl EmgError {
    pub fn processing(stage: ProcessingStage, source: FilterError) -> Self {
        EmgError::Processing { stage, source }
    }
}

/// Result type alias for EMG operations
pub type EmgResult<T> = Result<T, EmgError>;
