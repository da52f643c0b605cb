use std::path::{Path, PathBuf};

use anyhow::Context;
use ndtris_playbot::{
    benchmark::{self, BenchmarkOptions},
    policy::{DimensionBucket, PlannerAlgorithm, PlannerProfile},
};

use crate::{
    schema::Recorded,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BenchArg {
    /// Plans per board; the configured count when omitted
    #[arg(long)]
    runs: Option<usize>,
    #[arg(long, default_value = "balanced")]
    profile: PlannerProfile,
    #[arg(long, default_value = "auto", value_parser = util::parse_json_name::<PlannerAlgorithm>)]
    algorithm: PlannerAlgorithm,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Boards to measure (`2d`, `3d`, `4d`); all when omitted
    #[arg(long = "bucket", value_parser = util::parse_json_name::<DimensionBucket>)]
    buckets: Vec<DimensionBucket>,
    /// Exit with an error when a board exceeds its latency threshold
    #[arg(long)]
    strict: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &BenchArg, config_path: Option<&Path>) -> anyhow::Result<()> {
    let BenchArg {
        runs,
        profile,
        algorithm,
        seed,
        buckets,
        strict,
        output,
    } = arg;

    let config = util::load_playbot_config(config_path)?;
    let options = BenchmarkOptions {
        profile: *profile,
        algorithm: *algorithm,
        runs: *runs,
        seed: *seed,
        buckets: if buckets.is_empty() {
            DimensionBucket::ALL.to_vec()
        } else {
            buckets.clone()
        },
    };

    eprintln!(
        "Benchmarking {} / {} on {} boards...",
        options.profile,
        options.algorithm,
        options.buckets.len()
    );
    let report = benchmark::run_benchmark(&config, &options)
        .context("Failed to start a benchmark session")?;

    for (bucket, result) in &report.results {
        eprintln!(
            "  {bucket}: {} runs, p50 {:.3} ms, p95 {:.3} ms, max {:.3} ms, {:.1} candidates",
            result.runs, result.p50_ms, result.p95_ms, result.max_ms, result.avg_candidates
        );
        if !result.passed {
            eprintln!(
                "  {bucket}: p95 exceeds the {:.3} ms threshold",
                result.threshold_ms
            );
        }
    }

    Output::save_json(&Recorded::now(&report), output.clone())?;
    anyhow::ensure!(
        !*strict || report.passed(),
        "Planning latency exceeds the threshold"
    );
    Ok(())
}
