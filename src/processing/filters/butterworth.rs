//! Butterworth IIR coefficient design
//!
//! Designs are built from the analog prototype as cascaded first- and
//! second-order sections, each mapped to the z-plane by the bilinear
//! transform with frequency pre-warping, then multiplied into a single
//! transfer function. Cutoffs are normalized so that 1.0 is Nyquist.

use super::{BandType, FilterError, IirCoefficients};
use crate::config::constants::filters::{MAX_FILTER_ORDER, MIN_FILTER_ORDER};
use std::f64::consts::PI;

/// Design a Butterworth filter of `order` with cutoff `normalized_cutoff` (fraction of Nyquist)
pub fn butterworth(
    order: usize,
    normalized_cutoff: f64,
    band_type: BandType,
) -> Result<IirCoefficients, FilterError> {
    if order < MIN_FILTER_ORDER || order > MAX_FILTER_ORDER {
        return Err(FilterError::InvalidParameters(format!(
            "Order must be {}-{}, got {}",
            MIN_FILTER_ORDER, MAX_FILTER_ORDER, order
        )));
    }
    if !(normalized_cutoff > 0.0 && normalized_cutoff < 1.0) {
        return Err(FilterError::InvalidParameters(format!(
            "Normalized cutoff must lie in (0, 1), got {}",
            normalized_cutoff
        )));
    }

    // Pre-warp frequency for bilinear transform
    let k = (PI * normalized_cutoff / 2.0).tan();

    let mut result = IirCoefficients { b: vec![1.0], a: vec![1.0] };

    for section in 0..order / 2 {
        let theta = PI * (2 * section + 1) as f64 / (2 * order) as f64;
        let damping = 2.0 * theta.sin();
        let biquad = second_order_section(k, damping, band_type);
        result = cascade_sections(&result, &biquad);
    }

    if order % 2 == 1 {
        result = cascade_sections(&result, &first_order_section(k, band_type));
    }

    Ok(result)
}

/// Design from a cutoff in Hz and a sample rate, as used by the pipeline
pub fn butterworth_hz(
    order: usize,
    cutoff_hz: f64,
    sample_rate_hz: f64,
    band_type: BandType,
) -> Result<IirCoefficients, FilterError> {
    if !sample_rate_hz.is_finite() || sample_rate_hz <= 0.0 {
        return Err(FilterError::InvalidParameters(format!(
            "Invalid sample rate: {} Hz",
            sample_rate_hz
        )));
    }
    let nyquist = sample_rate_hz / 2.0;
    butterworth(order, cutoff_hz / nyquist, band_type)
}

fn first_order_section(k: f64, band_type: BandType) -> IirCoefficients {
    let norm = 1.0 + k;
    let b = match band_type {
        BandType::Lowpass => vec![k / norm, k / norm],
        BandType::Highpass => vec![1.0 / norm, -1.0 / norm],
    };

    IirCoefficients {
        b,
        a: vec![1.0, (k - 1.0) / norm],
    }
}

/// Section with analog denominator `s^2 + damping*s + 1`
fn second_order_section(k: f64, damping: f64, band_type: BandType) -> IirCoefficients {
    let k2 = k * k;
    let norm = 1.0 + damping * k + k2;
    let b = match band_type {
        BandType::Lowpass => vec![k2 / norm, 2.0 * k2 / norm, k2 / norm],
        BandType::Highpass => vec![1.0 / norm, -2.0 / norm, 1.0 / norm],
    };

    IirCoefficients {
        b,
        a: vec![1.0, (2.0 * k2 - 2.0) / norm, (1.0 - damping * k + k2) / norm],
    }
}

/// Multiply transfer functions: H1(z) * H2(z)
fn cascade_sections(section1: &IirCoefficients, section2: &IirCoefficients) -> IirCoefficients {
    IirCoefficients {
        b: convolve(&section1.b, &section2.b),
        a: convolve(&section1.a, &section2.a),
    }
}

fn convolve(x: &[f64], y: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; x.len() + y.len() - 1];
    for (i, &xi) in x.iter().enumerate() {
        for (j, &yj) in y.iter().enumerate() {
            out[i + j] += xi * yj;
        }
    }
    out
}

/// Magnitude of the frequency response at `normalized_freq` (fraction of Nyquist)
pub fn magnitude_response(coefficients: &IirCoefficients, normalized_freq: f64) -> f64 {
    let omega = PI * normalized_freq;
    let eval = |poly: &[f64]| {
        poly.iter().enumerate().fold((0.0, 0.0), |(re, im), (n, &c)| {
            let phase = -omega * n as f64;
            (re + c * phase.cos(), im + c * phase.sin())
        })
    };

    let (b_re, b_im) = eval(&coefficients.b);
    let (a_re, a_im) = eval(&coefficients.a);
    (b_re.hypot(b_im)) / (a_re.hypot(a_im))
}
