use std::path::{Path, PathBuf};

use anyhow::Context;
use ndtris_engine::{GameConfig, ShapeSet};
use ndtris_playbot::{
    dry_run::{DryRunConfig, DryRunHarness},
    policy::{PlannerAlgorithm, PlannerProfile},
};

use crate::{
    schema::Recorded,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DryRunArg {
    /// Scenario file (JSON); replaces every game and run flag below
    #[arg(long)]
    scenario: Option<PathBuf>,
    /// Extent of every axis, comma separated
    #[arg(long, value_delimiter = ',', default_values_t = [6, 12])]
    dims: Vec<usize>,
    #[arg(long, default_value_t = 1)]
    gravity_axis: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, default_value = "debug")]
    shape_set: ShapeSet,
    /// Stop once this many pieces have locked
    #[arg(long, default_value_t = 40)]
    target_pieces: usize,
    #[arg(long, default_value_t = 5000)]
    max_ticks: usize,
    /// Pass even if no layer was cleared
    #[arg(long)]
    allow_no_clears: bool,
    #[arg(long, default_value = "balanced")]
    profile: PlannerProfile,
    #[arg(long, default_value = "auto", value_parser = util::parse_json_name::<PlannerAlgorithm>)]
    algorithm: PlannerAlgorithm,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

impl DryRunArg {
    fn to_config(&self) -> anyhow::Result<DryRunConfig> {
        if let Some(path) = &self.scenario {
            return util::read_json_file("dry-run scenario", path);
        }
        Ok(DryRunConfig {
            game: GameConfig {
                dims: self.dims.clone(),
                gravity_axis: self.gravity_axis,
                seed: self.seed,
                shape_set: self.shape_set,
                ..GameConfig::default()
            },
            max_ticks: self.max_ticks,
            target_pieces: self.target_pieces,
            require_clears: !self.allow_no_clears,
            profile: self.profile,
            algorithm: self.algorithm,
        })
    }
}

pub(crate) fn run(arg: &DryRunArg, config_path: Option<&Path>) -> anyhow::Result<()> {
    let playbot = util::load_playbot_config(config_path)?;
    let config = arg.to_config()?;

    eprintln!(
        "Dry run on {:?} ({} pieces, at most {} ticks)...",
        config.game.dims, config.target_pieces, config.max_ticks
    );
    let report = DryRunHarness::new(playbot, config)
        .run()
        .context("Failed to start the dry-run session")?;
    eprintln!(
        "  {} pieces, {} layers cleared, {} ticks",
        report.pieces_dropped, report.clears_observed, report.ticks
    );

    Output::save_json(&Recorded::now(&report), arg.output.clone())?;
    anyhow::ensure!(report.passed, "Dry run failed: {}", report.reason);
    eprintln!("Dry run passed");
    Ok(())
}
