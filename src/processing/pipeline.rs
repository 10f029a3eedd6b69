//! Batch conditioning pipeline: demean, high-pass, rectify, low-pass envelope

use crate::config::ConditioningConfig;
use crate::error::{EmgError, EmgResult, ProcessingStage};
use crate::processing::filters::{
    apply_zero_phase_with_min_len, butterworth_hz, BandType, FilterOutcome, FilteredSignal,
    IirCoefficients,
};
use crate::utils::stats::finite_mean;
use serde::Serialize;
use tracing::{debug, warn};

/// The five named variants of a conditioned signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalVariant {
    Raw,
    Demeaned,
    Filtered,
    Rectified,
    Envelope,
}

impl SignalVariant {
    pub const ALL: [SignalVariant; 5] = [
        SignalVariant::Raw,
        SignalVariant::Demeaned,
        SignalVariant::Filtered,
        SignalVariant::Rectified,
        SignalVariant::Envelope,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SignalVariant::Raw => "raw",
            SignalVariant::Demeaned => "demeaned",
            SignalVariant::Filtered => "filtered",
            SignalVariant::Rectified => "rectified",
            SignalVariant::Envelope => "envelope",
        }
    }
}

impl std::fmt::Display for SignalVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conditioned signal set; every vector has the input's length
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionedSignals {
    pub raw: Vec<f64>,
    pub demeaned: Vec<f64>,
    pub filtered: Vec<f64>,
    pub rectified: Vec<f64>,
    pub envelope: Vec<f64>,
    /// What the high-pass stage did to produce `filtered`
    pub highpass: FilterOutcome,
    /// What the low-pass stage did to produce `envelope`
    pub lowpass: FilterOutcome,
}

impl ConditionedSignals {
    pub fn get(&self, variant: SignalVariant) -> &[f64] {
        match variant {
            SignalVariant::Raw => &self.raw,
            SignalVariant::Demeaned => &self.demeaned,
            SignalVariant::Filtered => &self.filtered,
            SignalVariant::Rectified => &self.rectified,
            SignalVariant::Envelope => &self.envelope,
        }
    }

    /// Variants in pipeline order
    pub fn iter(&self) -> impl Iterator<Item = (SignalVariant, &[f64])> + '_ {
        SignalVariant::ALL.into_iter().map(move |v| (v, self.get(v)))
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// Stateless conditioning pipeline over a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct ConditioningPipeline {
    config: ConditioningConfig,
}

impl ConditioningPipeline {
    pub fn new(config: ConditioningConfig) -> Self {
        Self { config }
    }

    /// Pipeline over a validated configuration
    pub fn try_new(config: ConditioningConfig) -> EmgResult<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &ConditioningConfig {
        &self.config
    }

    /// Cutoff and band of the filter a stage applies
    pub fn stage_filter(&self, stage: ProcessingStage) -> (f64, BandType) {
        match stage {
            ProcessingStage::HighPass => (self.config.highpass_cutoff_hz, BandType::Highpass),
            ProcessingStage::Envelope => (self.config.lowpass_cutoff_hz, BandType::Lowpass),
        }
    }

    /// Coefficients a filtering stage designs at `sample_rate`
    pub fn stage_coefficients(
        &self,
        stage: ProcessingStage,
        sample_rate: f64,
    ) -> EmgResult<IirCoefficients> {
        let (cutoff_hz, band_type) = self.stage_filter(stage);
        butterworth_hz(self.config.filter_order, cutoff_hz, sample_rate, band_type)
            .map_err(|e| EmgError::processing(stage, e))
    }

    /// Run every stage over `samples`.
    ///
    /// Without a finite, positive `sample_rate` both filters are skipped and
    /// `filtered == demeaned`, `envelope == rectified`.
    pub fn condition(&self, samples: &[f64], sample_rate: Option<f64>) -> ConditionedSignals {
        let raw = samples.to_vec();

        let mean = finite_mean(&raw);
        let demeaned: Vec<f64> = raw.iter().map(|x| x - mean).collect();

        let FilteredSignal { data: filtered, outcome: highpass } =
            self.filter_stage(ProcessingStage::HighPass, &demeaned, sample_rate);

        let rectified: Vec<f64> = filtered.iter().map(|x| x.abs()).collect();

        let FilteredSignal { data: envelope, outcome: lowpass } =
            self.filter_stage(ProcessingStage::Envelope, &rectified, sample_rate);

        ConditionedSignals {
            raw,
            demeaned,
            filtered,
            rectified,
            envelope,
            highpass,
            lowpass,
        }
    }

    fn filter_stage(
        &self,
        stage: ProcessingStage,
        input: &[f64],
        sample_rate: Option<f64>,
    ) -> FilteredSignal {
        let Some(sample_rate) = sample_rate.filter(|fs| fs.is_finite() && *fs > 0.0) else {
            debug!(%stage, "no usable sample rate, skipping filter");
            return FilteredSignal::passthrough(input, FilterOutcome::SkippedNoSampleRate);
        };

        let (cutoff_hz, _) = self.stage_filter(stage);
        let nyquist = sample_rate / 2.0;
        if nyquist <= cutoff_hz {
            debug!(%stage, nyquist, cutoff_hz, "cutoff not below Nyquist, skipping filter");
            return FilteredSignal::passthrough(input, FilterOutcome::SkippedBelowNyquist);
        }

        match self.stage_coefficients(stage, sample_rate) {
            Ok(coefficients) => {
                apply_zero_phase_with_min_len(input, &coefficients, self.config.min_filter_len)
            }
            Err(e) => {
                warn!(%stage, error = %e, "filter design failed, passing signal through");
                FilteredSignal::passthrough(input, FilterOutcome::Failed)
            }
        }
    }
}

/// Condition `samples` with the default cutoffs (20 Hz high-pass, 5 Hz envelope)
pub fn condition(samples: &[f64], sample_rate: Option<f64>) -> ConditionedSignals {
    ConditioningPipeline::default().condition(samples, sample_rate)
}

/// Condition `samples` with an explicit configuration
pub fn condition_with(
    samples: &[f64],
    sample_rate: Option<f64>,
    config: &ConditioningConfig,
) -> ConditionedSignals {
    ConditioningPipeline::new(config.clone()).condition(samples, sample_rate)
}
