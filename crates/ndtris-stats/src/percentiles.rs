/// Precomputed percentile values for a dataset.
///
/// # Examples
///
/// ```
/// use ndtris_stats::percentiles::Percentiles;
///
/// let values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
/// let percentiles = Percentiles::new(&values, &[50.0, 95.0]);
///
/// assert_eq!(percentiles.get(50.0), Some(6.0));
/// assert_eq!(percentiles.get(95.0), Some(10.0));
/// ```
#[derive(Debug, Clone)]
pub struct Percentiles {
    /// `(percentile, value)` pairs in the order they were requested.
    values: Vec<(f64, f64)>,
}

impl Percentiles {
    /// Computes percentiles from values sorted in ascending order.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], percentile_points: &[f64]) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );
        let values = percentile_points
            .iter()
            .map(|&p| (p, compute_percentile(sorted_values, p)))
            .collect();
        Self { values }
    }

    #[must_use]
    pub fn new(values: &[f64], percentile_points: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, percentile_points)
    }

    /// Value at a precomputed percentile, `None` if it was not requested.
    #[must_use]
    pub fn get(&self, percentile: f64) -> Option<f64> {
        self.values
            .iter()
            .find_map(|&(p, value)| ((p - percentile).abs() < f64::EPSILON).then_some(value))
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values.iter().copied()
    }
}

/// Computes a single percentile from sorted data with the nearest-rank method.
///
/// For `n` values the k-th percentile is the value at index `floor(n * k / 100)`,
/// capped to the last element. Returns `NaN` for empty input.
///
/// # Examples
///
/// ```
/// use ndtris_stats::percentiles::compute_percentile;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(compute_percentile(&values, 50.0), 3.0);
/// assert_eq!(compute_percentile(&values, 25.0), 2.0);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn compute_percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return f64::NAN;
    }
    let idx = ((sorted_values.len() as f64 * percentile) / 100.0) as usize;
    let idx = idx.min(sorted_values.len() - 1);
    sorted_values[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_nan() {
        assert!(compute_percentile(&[], 50.0).is_nan());
    }

    #[test]
    fn test_upper_percentiles_cap_to_last() {
        let values = [1.0, 2.0, 3.0];
        assert_eq!(compute_percentile(&values, 100.0), 3.0);
        assert_eq!(compute_percentile(&values, 95.0), 3.0);
        assert_eq!(compute_percentile(&values, 0.0), 1.0);
    }

    #[test]
    fn test_new_sorts_input() {
        let percentiles = Percentiles::new(&[9.0, 1.0, 5.0], &[0.0, 50.0]);
        assert_eq!(percentiles.iter().collect::<Vec<_>>(), vec![(0.0, 1.0), (50.0, 5.0)]);
        assert_eq!(percentiles.get(75.0), None);
    }

    #[test]
    #[should_panic(expected = "sorted")]
    fn test_from_sorted_rejects_unsorted() {
        let _ = Percentiles::from_sorted(&[2.0, 1.0], &[50.0]);
    }
}
