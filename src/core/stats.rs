use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Tukey fence multiplier used when none is configured.
pub const DEFAULT_WHISKER_FACTOR: f64 = 1.5;

/// Pluggable whisker rule: receives an ascending slice and returns the
/// inclusive index span of non-outlier points, or `None` when every point
/// should be treated as an outlier.
pub type WhiskerFn = Arc<dyn Fn(&[f64]) -> Option<(usize, usize)> + Send + Sync + 'static>;

/// Linear-interpolation percentile over an ascending slice.
///
/// `p` is a fraction in `[0, 1]`; position `p * (n - 1)` is interpolated
/// between its two bracketing elements.
pub fn percentile(values: &[f64], p: f64) -> ChartResult<f64> {
    if values.is_empty() {
        return Err(ChartError::InvalidInput(
            "percentile of an empty sequence is undefined".to_owned(),
        ));
    }
    if !p.is_finite() || !(0.0..=1.0).contains(&p) {
        return Err(ChartError::InvalidInput(format!(
            "percentile fraction must be within [0, 1], got {p}"
        )));
    }

    let position = p * (values.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    Ok(interpolate(values[lower], values[upper], weight))
}

fn interpolate(low: f64, high: f64, weight: f64) -> f64 {
    if weight == 0.0 {
        return low;
    }
    let delta = high - low;
    if delta.is_finite() {
        low + delta * weight
    } else {
        // `high - low` overflowed; blend without forming the difference.
        low * (1.0 - weight) + high * weight
    }
}

/// Returns `[Q1, median, Q3]` of an ascending slice.
pub fn quartiles(values: &[f64]) -> ChartResult<[f64; 3]> {
    Ok([
        percentile(values, 0.25)?,
        percentile(values, 0.50)?,
        percentile(values, 0.75)?,
    ])
}

/// Tukey whisker span with fences `Q1 - k*IQR` and `Q3 + k*IQR`.
///
/// The span is found by scanning inward from both ends. Empty input and
/// fences that exclude every point both yield `None`.
#[must_use]
pub fn whisker_range(values: &[f64], k: f64) -> Option<(usize, usize)> {
    let [q1, _, q3] = quartiles(values).ok()?;
    let reach = if k == 0.0 { 0.0 } else { k * (q3 - q1) };
    let lower_fence = q1 - reach;
    let upper_fence = q3 + reach;

    let mut low = 0;
    while low < values.len() && values[low] < lower_fence {
        low += 1;
    }
    let mut high = values.len() - 1;
    while high > 0 && values[high] > upper_fence {
        high -= 1;
    }

    if low > high || values[high] > upper_fence {
        return None;
    }
    Some((low, high))
}

/// Builds the default whisker rule for multiplier `k`.
#[must_use]
pub fn tukey_whiskers(k: f64) -> WhiskerFn {
    Arc::new(move |values: &[f64]| whisker_range(values, k))
}

/// Indices in `[0, n)` outside the inclusive whisker span.
#[must_use]
pub fn outliers(n: usize, whisker_range: Option<(usize, usize)>) -> Vec<usize> {
    match whisker_range {
        Some((low, high)) => (0..n).filter(|&i| i < low || i > high).collect(),
        None => (0..n).collect(),
    }
}

/// Five-number summary plus whisker/outlier classification of one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSummary {
    pub min: f64,
    pub max: f64,
    pub quartiles: [f64; 3],
    pub whisker_range: Option<(usize, usize)>,
    pub outlier_indices: Vec<usize>,
}

impl BoxSummary {
    /// Summarizes an ascending slice with the Tukey rule for `k`.
    pub fn compute(sorted: &[f64], k: f64) -> ChartResult<Self> {
        Self::compute_with(sorted, &tukey_whiskers(k))
    }

    /// Summarizes an ascending slice with a custom whisker rule.
    pub fn compute_with(sorted: &[f64], whiskers: &WhiskerFn) -> ChartResult<Self> {
        let quartiles = quartiles(sorted)?;
        let whisker_range =
            whiskers(sorted).filter(|(low, high)| low <= high && *high < sorted.len());
        Ok(Self {
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            quartiles,
            whisker_range,
            outlier_indices: outliers(sorted.len(), whisker_range),
        })
    }

    #[must_use]
    pub fn median(&self) -> f64 {
        self.quartiles[1]
    }

    #[must_use]
    pub fn iqr(&self) -> f64 {
        self.quartiles[2] - self.quartiles[0]
    }

    /// Values at the whisker ends, low first.
    #[must_use]
    pub fn whisker_values(&self, sorted: &[f64]) -> Option<(f64, f64)> {
        self.whisker_range.map(|(low, high)| (sorted[low], sorted[high]))
    }
}

#[cfg(test)]
mod tests {
    use super::{BoxSummary, outliers, quartiles, whisker_range};

    #[test]
    fn single_value_collapses_every_statistic() {
        let summary = BoxSummary::compute(&[3.5], 1.5).expect("summary");
        assert_eq!(summary.quartiles, [3.5, 3.5, 3.5]);
        assert_eq!(summary.whisker_range, Some((0, 0)));
        assert!(summary.outlier_indices.is_empty());
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(quartiles(&[]).is_err());
        assert!(BoxSummary::compute(&[], 1.5).is_err());
        assert_eq!(whisker_range(&[], 1.5), None);
    }

    #[test]
    fn zero_factor_can_exclude_every_point() {
        assert_eq!(whisker_range(&[0.0, 10.0], 0.0), None);
        assert_eq!(outliers(2, None), vec![0, 1]);
    }
}
