//! Zero-phase (forward-backward) filtering with a length guard
//!
//! The signal is extended at both ends by odd reflection, filtered forward
//! from steady-state initial conditions, then filtered again in reverse, so
//! the phase responses cancel. Edge handling needs a minimum signal length;
//! the guarded entry point returns the input unchanged when that is not met
//! or when the numerics fail, and reports which happened.

use super::{FilterError, FilterOutcome, IirCoefficients, IirFilter};
use crate::config::constants::filters::{EDGE_GUARD_FACTOR, MIN_FILTER_LEN};
use ndarray::{Array1, Array2};
use tracing::{debug, warn};

/// Output of a guarded filter stage
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredSignal {
    pub data: Vec<f64>,
    pub outcome: FilterOutcome,
}

impl FilteredSignal {
    /// Input copied through unchanged
    pub fn passthrough(data: &[f64], outcome: FilterOutcome) -> Self {
        Self {
            data: data.to_vec(),
            outcome,
        }
    }
}

/// Length at or below which a signal is not filtered: `3 * (taps - 1)`
pub fn edge_guard_len(coefficients: &IirCoefficients) -> usize {
    EDGE_GUARD_FACTOR * coefficients.taps().saturating_sub(1)
}

/// Guarded zero-phase filtering with the default minimum length
pub fn apply_zero_phase(data: &[f64], coefficients: &IirCoefficients) -> FilteredSignal {
    apply_zero_phase_with_min_len(data, coefficients, MIN_FILTER_LEN)
}

/// Guarded zero-phase filtering.
///
/// Signals no longer than `max(3 * (taps - 1), min_len)` pass through with
/// `SkippedTooShort`. Any numerical failure passes the input through with
/// `Failed`. This never returns an error.
pub fn apply_zero_phase_with_min_len(
    data: &[f64],
    coefficients: &IirCoefficients,
    min_len: usize,
) -> FilteredSignal {
    let threshold = edge_guard_len(coefficients).max(min_len);
    if data.len() <= threshold {
        debug!(len = data.len(), threshold, "signal too short for zero-phase filtering");
        return FilteredSignal::passthrough(data, FilterOutcome::SkippedTooShort);
    }

    match filtfilt(data, coefficients) {
        Ok(filtered) => FilteredSignal {
            data: filtered,
            outcome: FilterOutcome::Applied,
        },
        Err(FilterError::SignalTooShort { len, required }) => {
            debug!(len, required, "signal too short for edge padding");
            FilteredSignal::passthrough(data, FilterOutcome::SkippedTooShort)
        }
        Err(e) => {
            warn!(error = %e, "zero-phase filtering failed, passing signal through");
            FilteredSignal::passthrough(data, FilterOutcome::Failed)
        }
    }
}

/// Unguarded zero-phase filtering.
///
/// Requires more than `3 * taps` samples for the odd-reflection padding.
pub fn filtfilt(data: &[f64], coefficients: &IirCoefficients) -> Result<Vec<f64>, FilterError> {
    let coefficients = coefficients.normalized()?;
    let pad_len = EDGE_GUARD_FACTOR * coefficients.taps();
    if data.len() <= pad_len {
        return Err(FilterError::SignalTooShort {
            len: data.len(),
            required: pad_len,
        });
    }

    let zi = steady_state_initial_conditions(&coefficients)?;
    let extended = odd_extension(data, pad_len);

    let forward_state: Vec<f64> = zi.iter().map(|z| z * extended[0]).collect();
    let mut forward = IirFilter::with_state(&coefficients, forward_state)?.process(&extended);

    forward.reverse();
    let backward_state: Vec<f64> = zi.iter().map(|z| z * forward[0]).collect();
    let mut backward = IirFilter::with_state(&coefficients, backward_state)?.process(&forward);
    backward.reverse();

    let output = backward[pad_len..pad_len + data.len()].to_vec();
    if output.iter().any(|y| !y.is_finite()) {
        return Err(FilterError::NumericalFailure(
            "filter produced non-finite output".to_string(),
        ));
    }

    Ok(output)
}

/// Odd reflection about each endpoint, `pad_len` samples on both sides
fn odd_extension(data: &[f64], pad_len: usize) -> Vec<f64> {
    let n = data.len();
    let first = data[0];
    let last = data[n - 1];

    let mut extended = Vec::with_capacity(n + 2 * pad_len);
    extended.extend((1..=pad_len).rev().map(|i| 2.0 * first - data[i]));
    extended.extend_from_slice(data);
    extended.extend((1..=pad_len).map(|i| 2.0 * last - data[n - 1 - i]));
    extended
}

/// Initial state for a unit step response already in steady state.
///
/// Solves `(I - A^T) zi = b[1..] - a[1..] * b[0]` where `A` is the companion
/// matrix of the normalized denominator.
fn steady_state_initial_conditions(coefficients: &IirCoefficients) -> Result<Vec<f64>, FilterError> {
    let b = &coefficients.b;
    let a = &coefficients.a;
    let n = coefficients.taps() - 1;
    if n == 0 {
        return Ok(Vec::new());
    }

    let mut system = Array2::<f64>::eye(n);
    for row in 0..n {
        system[[row, 0]] += a[row + 1];
        if row + 1 < n {
            system[[row, row + 1]] -= 1.0;
        }
    }
    let rhs = Array1::from_iter((0..n).map(|i| b[i + 1] - a[i + 1] * b[0]));

    solve_linear_system(system, rhs).map(|zi| zi.to_vec())
}

/// Gaussian elimination with partial pivoting
fn solve_linear_system(mut m: Array2<f64>, mut rhs: Array1<f64>) -> Result<Array1<f64>, FilterError> {
    let n = rhs.len();

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&i, &j| m[[i, col]].abs().total_cmp(&m[[j, col]].abs()))
            .unwrap_or(col);
        let pivot = m[[pivot_row, col]];
        if !pivot.is_finite() || pivot.abs() < f64::MIN_POSITIVE {
            return Err(FilterError::NumericalFailure(
                "singular initial-condition system".to_string(),
            ));
        }

        if pivot_row != col {
            for k in 0..n {
                m.swap([col, k], [pivot_row, k]);
            }
            rhs.swap(col, pivot_row);
        }

        for row in col + 1..n {
            let factor = m[[row, col]] / m[[col, col]];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                m[[row, k]] -= factor * m[[col, k]];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut solution = Array1::<f64>::zeros(n);
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| m[[row, k]] * solution[k]).sum();
        solution[row] = (rhs[row] - tail) / m[[row, row]];
    }

    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::filters::{butterworth, BandType};
    use std::f64::consts::PI;

    fn sine(freq_hz: f64, sample_rate: f64, len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| (2.0 * PI * freq_hz * i as f64 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_fourth_order_guard_is_twelve() {
        let coefficients = butterworth(4, 0.2, BandType::Lowpass).unwrap();
        assert_eq!(edge_guard_len(&coefficients), 12);
    }

    #[test]
    fn test_short_signal_is_skipped() {
        let coefficients = butterworth(4, 0.2, BandType::Lowpass).unwrap();
        let data: Vec<f64> = (0..21).map(|i| i as f64).collect();

        let result = apply_zero_phase(&data, &coefficients);
        assert_eq!(result.outcome, FilterOutcome::SkippedTooShort);
        assert_eq!(result.data, data);
    }

    #[test]
    fn test_signal_above_guard_is_filtered() {
        let coefficients = butterworth(4, 0.2, BandType::Lowpass).unwrap();
        let data = sine(5.0, 100.0, 22);

        let result = apply_zero_phase(&data, &coefficients);
        assert_eq!(result.outcome, FilterOutcome::Applied);
        assert_eq!(result.data.len(), data.len());
    }

    #[test]
    fn test_padding_shortfall_is_skipped_not_failed() {
        let coefficients = butterworth(8, 0.2, BandType::Lowpass).unwrap();
        // Guard is 24, padding needs more than 27
        let data = sine(5.0, 100.0, 26);

        let result = apply_zero_phase(&data, &coefficients);
        assert_eq!(result.outcome, FilterOutcome::SkippedTooShort);
        assert_eq!(result.data, data);
    }

    #[test]
    fn test_degenerate_coefficients_fail_silently() {
        let coefficients = IirCoefficients { b: vec![1.0, 0.0], a: vec![0.0, 1.0] };
        let data = sine(5.0, 100.0, 64);

        let result = apply_zero_phase(&data, &coefficients);
        assert_eq!(result.outcome, FilterOutcome::Failed);
        assert_eq!(result.data, data);
    }

    #[test]
    fn test_unstable_filter_fails_silently() {
        // Pole at z = 2 blows up over a long signal
        let coefficients = IirCoefficients { b: vec![1.0, 0.0], a: vec![1.0, -2.0] };
        let data = sine(5.0, 100.0, 5000);

        let result = apply_zero_phase(&data, &coefficients);
        assert_eq!(result.outcome, FilterOutcome::Failed);
        assert_eq!(result.data, data);
    }

    #[test]
    fn test_lowpass_preserves_constant() {
        let coefficients = butterworth(4, 0.1, BandType::Lowpass).unwrap();
        let data = vec![2.5; 200];

        let filtered = filtfilt(&data, &coefficients).unwrap();
        for y in filtered {
            assert!((y - 2.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_highpass_removes_constant() {
        let coefficients = butterworth(4, 0.04, BandType::Highpass).unwrap();
        let data = vec![3.0; 300];

        let filtered = filtfilt(&data, &coefficients).unwrap();
        for y in filtered {
            assert!(y.abs() < 1e-6);
        }
    }

    #[test]
    fn test_passband_sine_is_unchanged_and_in_phase() {
        // 100 Hz at 1 kHz through a 20 Hz high-pass
        let coefficients = butterworth(4, 20.0 / 500.0, BandType::Highpass).unwrap();
        let data = sine(100.0, 1000.0, 2000);

        let filtered = filtfilt(&data, &coefficients).unwrap();
        for i in 500..1500 {
            assert!((filtered[i] - data[i]).abs() < 1e-2, "sample {}", i);
        }
    }

    #[test]
    fn test_stopband_sine_is_attenuated() {
        // 50 Hz at 1 kHz through a 5 Hz low-pass
        let coefficients = butterworth(4, 5.0 / 500.0, BandType::Lowpass).unwrap();
        let data = sine(50.0, 1000.0, 4000);

        let filtered = filtfilt(&data, &coefficients).unwrap();
        let peak = filtered[1000..3000].iter().fold(0.0f64, |m, y| m.max(y.abs()));
        assert!(peak < 1e-3);
    }

    #[test]
    fn test_filtfilt_too_short_is_error() {
        let coefficients = butterworth(4, 0.2, BandType::Lowpass).unwrap();
        assert!(matches!(
            filtfilt(&[1.0; 15], &coefficients),
            Err(FilterError::SignalTooShort { len: 15, required: 15 })
        ));
    }

    #[test]
    fn test_odd_extension() {
        let extended = odd_extension(&[1.0, 2.0, 4.0, 7.0], 2);
        assert_eq!(extended, vec![-2.0, 0.0, 1.0, 2.0, 4.0, 7.0, 10.0, 12.0]);
    }

    #[test]
    fn test_steady_state_matches_step_response() {
        let coefficients = butterworth(4, 0.3, BandType::Lowpass).unwrap();
        let zi = steady_state_initial_conditions(&coefficients).unwrap();

        let mut filter = IirFilter::with_state(&coefficients, zi).unwrap();
        for y in filter.process(&[1.0; 20]) {
            assert!((y - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_highpass_matches_reference_output() {
        // butter(4, 0.4, 'highpass') then filtfilt, reference values from the
        // zpk design path with odd padding of 15 and lfilter_zi initial state
        let expected_b = [
            0.1671792686084899, -0.6687170744339596, 1.0030756116509394,
            -0.6687170744339596, 0.1671792686084899,
        ];
        let expected_a = [
            1.0, -0.7820951980233375, 0.6799785269162993,
            -0.18267569775303233, 0.030118875043169246,
        ];
        let expected = [
            7.712071489412997e-05, 0.4813280520541571, -0.7632039643295336,
            0.753878432173298, -0.4338317611582837, -0.05446244609632214,
            0.5166937324082923, -0.7844728709389597, 0.7277950361418638,
            -0.3896633808785684, -0.10322355132706515, 0.5633781682859462,
            -0.7869596702230963, 0.708385634965222, -0.34402106372089547,
            -0.16180748981157206, 0.5921056670136382, -0.7993487314141945,
            0.6809012639054536, -0.29110790150783616, -0.20597513510095036,
            0.633441177552009, -0.7985222961563231, 0.6501356788544028,
            -0.24720849161148584, -0.26508002772279216, 0.6580373247522598,
            -0.798873252620311, 0.6240751246801786, -0.1868933825114546,
            -0.3097661848450595, 0.6841492477622481, -0.7970921517784336,
            0.5948305801301629, -0.13009173143212022, -0.37719306131173547,
            0.6687463439322932, -0.7922037599564385, 0.6469666178376688,
            -0.0008784641073618926,
        ];

        let coefficients = butterworth(4, 0.4, BandType::Highpass).unwrap();
        for (got, want) in coefficients.b.iter().zip(expected_b.iter()) {
            assert!((got - want).abs() < 1e-12, "b: {} vs {}", got, want);
        }
        for (got, want) in coefficients.a.iter().zip(expected_a.iter()) {
            assert!((got - want).abs() < 1e-12, "a: {} vs {}", got, want);
        }

        let data: Vec<f64> = (0..40)
            .map(|i| {
                let t = i as f64;
                (0.7 * t).sin() + 0.8 * (2.5 * t).sin() + 0.05 * t
            })
            .collect();

        let filtered = filtfilt(&data, &coefficients).unwrap();
        assert_eq!(filtered.len(), expected.len());
        for (i, (got, want)) in filtered.iter().zip(expected.iter()).enumerate() {
            assert!((got - want).abs() < 1e-9, "sample {}: {} vs {}", i, got, want);
        }
    }
}
