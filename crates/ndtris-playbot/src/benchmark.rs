//! Planning latency benchmark.
//!
//! Plays seeded games on one fixed board per dimension bucket, planning every
//! piece under the real deadline and placing it where the plan says. Latencies
//! are summarized with nearest-rank percentiles; a bucket fails when its p95
//! exceeds `budget_ms × safety_multiplier`.

use std::collections::BTreeMap;

use ndtris_engine::{ActivePiece, GameConfig, GameSession, GeometryError};
use ndtris_stats::latency::LatencySummary;
use serde::{Deserialize, Serialize};

use crate::{
    config::PlaybotConfig,
    host::BotHost as _,
    planner::{PlanRequest, PlanTiming, Planner},
    policy::{DimensionBucket, PlannerAlgorithm, PlannerProfile},
};

/// Board the benchmark plays for a bucket.
#[must_use]
pub fn benchmark_game(bucket: DimensionBucket, seed: u64) -> GameConfig {
    let dims = match bucket {
        DimensionBucket::D2 => vec![10, 20],
        DimensionBucket::D3 => vec![5, 12, 5],
        DimensionBucket::D4Plus => vec![4, 10, 4, 4],
    };
    GameConfig {
        dims,
        gravity_axis: 1,
        seed,
        ..GameConfig::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkOptions {
    pub profile: PlannerProfile,
    pub algorithm: PlannerAlgorithm,
    /// Plans per bucket; the configured count when `None`.
    pub runs: Option<usize>,
    pub seed: u64,
    pub buckets: Vec<DimensionBucket>,
}

impl Default for BenchmarkOptions {
    fn default() -> Self {
        Self {
            profile: PlannerProfile::default(),
            algorithm: PlannerAlgorithm::default(),
            runs: None,
            seed: 0,
            buckets: DimensionBucket::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionResult {
    pub runs: usize,
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub max_ms: f64,
    pub avg_candidates: f64,
    pub budget_ms: f64,
    pub threshold_ms: f64,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub algorithm: PlannerAlgorithm,
    pub profile: PlannerProfile,
    pub results: BTreeMap<DimensionBucket, DimensionResult>,
}

impl BenchmarkReport {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.results.values().all(|r| r.passed)
    }
}

/// Runs the benchmark on every requested bucket.
pub fn run_benchmark(
    config: &PlaybotConfig,
    options: &BenchmarkOptions,
) -> Result<BenchmarkReport, GeometryError> {
    let runs = options.runs.unwrap_or(config.benchmark.runs).max(1);
    let mut results = BTreeMap::new();
    for &bucket in &options.buckets {
        let result = bench_bucket(config, options, bucket, runs)?;
        log::info!(
            "{bucket}: p50 {:.3} ms, p95 {:.3} ms (limit {:.3} ms) {}",
            result.p50_ms,
            result.p95_ms,
            result.threshold_ms,
            if result.passed { "ok" } else { "SLOW" }
        );
        results.insert(bucket, result);
    }
    Ok(BenchmarkReport {
        algorithm: options.algorithm,
        profile: options.profile,
        results,
    })
}

fn bench_bucket(
    config: &PlaybotConfig,
    options: &BenchmarkOptions,
    bucket: DimensionBucket,
    runs: usize,
) -> Result<DimensionResult, GeometryError> {
    let mut planner = Planner::new(config.clone());
    let mut seed = options.seed;
    let mut session = GameSession::new(&benchmark_game(bucket, seed))?;
    let mut latencies = Vec::with_capacity(runs);
    let mut candidates = 0;
    let mut budget_ms = 0.0;

    for _ in 0..runs {
        if !session.is_active() {
            seed += 1;
            session = GameSession::new(&benchmark_game(bucket, seed))?;
        }
        let piece = session.falling_piece().clone();
        let req = PlanRequest {
            board: session.board(),
            orientation: piece.orientation(),
            next_orientation: session.next_orientation(),
            lines_cleared: session.stats().total_cleared_layers(),
            profile: options.profile,
            algorithm: options.algorithm,
            budget_override_ms: None,
            timing: PlanTiming::Deadline,
        };
        budget_ms = planner.resolve_policy(&req).budget_ms;
        let result = planner.plan(&req);
        if let Some(result) = result {
            latencies.push(result.stats.elapsed.as_secs_f64() * 1000.0);
            candidates += result.stats.candidates;
            let target = ActivePiece::new(
                piece.shape_id(),
                result.placement.orientation().clone(),
                result.placement.pivot().clone(),
            );
            if session.set_falling_piece(target).is_err() {
                log::warn!("planned placement collides, locking in place");
            }
        }
        session.lock_and_spawn();
    }

    let threshold_ms = budget_ms * config.benchmark.safety_multiplier;
    let summary = LatencySummary::new(latencies.iter().copied());
    #[expect(clippy::cast_precision_loss)]
    let avg_candidates = candidates as f64 / latencies.len().max(1) as f64;
    Ok(match summary {
        Some(summary) => DimensionResult {
            runs: summary.count,
            p50_ms: summary.p50,
            p95_ms: summary.p95,
            max_ms: summary.max,
            avg_candidates,
            budget_ms,
            threshold_ms,
            passed: summary.p95_within(threshold_ms),
        },
        None => DimensionResult {
            runs: 0,
            p50_ms: 0.0,
            p95_ms: 0.0,
            max_ms: 0.0,
            avg_candidates,
            budget_ms,
            threshold_ms,
            passed: false,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_covers_requested_buckets() {
        let options = BenchmarkOptions {
            runs: Some(4),
            buckets: vec![DimensionBucket::D2, DimensionBucket::D3],
            ..BenchmarkOptions::default()
        };
        let report = run_benchmark(&PlaybotConfig::default(), &options).unwrap();
        assert_eq!(report.results.len(), 2);
        for result in report.results.values() {
            assert_eq!(result.runs, 4);
            assert!(result.avg_candidates > 0.0);
            assert!(result.p50_ms <= result.p95_ms && result.p95_ms <= result.max_ms);
            assert!(result.threshold_ms > result.budget_ms);
        }
    }

    #[test]
    fn test_threshold_decides_pass() {
        let options = BenchmarkOptions {
            runs: Some(3),
            buckets: vec![DimensionBucket::D2],
            ..BenchmarkOptions::default()
        };
        let mut config = PlaybotConfig::default();

        config.benchmark.safety_multiplier = 1e-12;
        let report = run_benchmark(&config, &options).unwrap();
        let result = &report.results[&DimensionBucket::D2];
        assert!(result.p95_ms > result.threshold_ms);
        assert!(!result.passed);
        assert!(!report.passed());

        config.benchmark.safety_multiplier = 1e12;
        let report = run_benchmark(&config, &options).unwrap();
        for result in report.results.values() {
            assert!(result.passed);
            assert!(result.p95_ms <= result.threshold_ms);
        }
        assert!(report.passed());
    }

    #[test]
    fn test_report_json_shape() {
        let mut results = BTreeMap::new();
        results.insert(
            DimensionBucket::D4Plus,
            DimensionResult {
                runs: 1,
                p50_ms: 1.0,
                p95_ms: 1.0,
                max_ms: 1.0,
                avg_candidates: 10.0,
                budget_ms: 24.0,
                threshold_ms: 72.0,
                passed: true,
            },
        );
        let report = BenchmarkReport {
            algorithm: PlannerAlgorithm::GreedyLayer,
            profile: PlannerProfile::Fast,
            results,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["algorithm"], "greedy_layer");
        assert_eq!(json["profile"], "fast");
        assert_eq!(json["results"]["4d"]["runs"], 1);
        assert!(report.passed());
    }
}
