use std::path::PathBuf;

use clap::{Parser, Subcommand};

use self::{
    auto_play::AutoPlayArg, bench::BenchArg, default_config::DefaultConfigArg,
    dry_run::DryRunArg,
};

mod auto_play;
mod bench;
mod default_config;
mod dry_run;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Playbot configuration file (JSON); built-in defaults when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play one headless game in auto mode and check it makes progress
    DryRun(#[clap(flatten)] DryRunArg),
    /// Measure planning latency on the 2D, 3D and 4D benchmark boards
    Bench(#[clap(flatten)] BenchArg),
    /// Run the bot against a headless session and print its status
    #[command(name = "auto-play")]
    AutoPlay(#[clap(flatten)] AutoPlayArg),
    /// Write the effective playbot configuration as JSON
    DefaultConfig(#[clap(flatten)] DefaultConfigArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let config = args.config.as_deref();
    match args.mode {
        Mode::DryRun(arg) => dry_run::run(&arg, config)?,
        Mode::Bench(arg) => bench::run(&arg, config)?,
        Mode::AutoPlay(arg) => auto_play::run(&arg, config)?,
        Mode::DefaultConfig(arg) => default_config::run(&arg, config)?,
    }
    Ok(())
}
