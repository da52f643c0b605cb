use crate::percentiles::compute_percentile;

/// Summary of a set of latency samples (milliseconds).
#[derive(Debug, Clone, PartialEq)]
pub struct LatencySummary {
    pub count: usize,
    pub p50: f64,
    pub p95: f64,
    pub max: f64,
    pub mean: f64,
}

impl LatencySummary {
    /// Summarizes unsorted samples; `None` when there are none.
    ///
    /// Non-finite samples are ignored.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(samples: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = samples
            .into_iter()
            .filter(|v| v.is_finite())
            .collect::<Vec<_>>();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);
        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        Some(Self {
            count,
            p50: compute_percentile(&sorted, 50.0),
            p95: compute_percentile(&sorted, 95.0),
            max: sorted[count - 1],
            mean,
        })
    }

    /// Checks the p95 latency against `limit_ms`.
    #[must_use]
    pub fn p95_within(&self, limit_ms: f64) -> bool {
        self.p95 <= limit_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_samples() {
        assert_eq!(LatencySummary::new(Vec::<f64>::new()), None);
        assert_eq!(LatencySummary::new([f64::NAN]), None);
    }

    #[test]
    fn test_summary_of_twenty_samples() {
        let summary = LatencySummary::new((1..=20).rev().map(f64::from)).unwrap();
        assert_eq!(summary.count, 20);
        assert_eq!(summary.p50, 11.0);
        assert_eq!(summary.p95, 20.0);
        assert_eq!(summary.max, 20.0);
        assert!((summary.mean - 10.5).abs() < 1e-9);
        assert!(summary.p95_within(20.0));
        assert!(!summary.p95_within(19.5));
    }
}
