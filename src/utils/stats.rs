//! NaN-aware descriptive statistics over `f64` slices

/// Successive differences `x[i+1] - x[i]`, keeping only finite results
pub fn finite_diffs(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .filter(|d| d.is_finite())
        .collect()
}

/// Median of the values; the mean of the two middle values for even counts.
///
/// Returns `None` for an empty slice. Callers are expected to have removed
/// NaN already.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Population (ddof = 0) standard deviation
pub fn population_std(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    Some(variance.sqrt())
}

/// Arithmetic mean over the finite values only; 0.0 when there are none
pub fn finite_mean(values: &[f64]) -> f64 {
    let (sum, count) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Minimum ignoring NaN; `None` if empty or all NaN
pub fn nan_min(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .reduce(f64::min)
}

/// Maximum ignoring NaN; `None` if empty or all NaN
pub fn nan_max(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .reduce(f64::max)
}

/// Root mean square ignoring NaN; `None` if empty or all NaN
pub fn nan_rms(values: &[f64]) -> Option<f64> {
    let squares: Vec<f64> = values
        .iter()
        .map(|v| v * v)
        .filter(|v| !v.is_nan())
        .collect();

    if squares.is_empty() {
        return None;
    }
    Some((squares.iter().sum::<f64>() / squares.len() as f64).sqrt())
}
