use std::path::{Path, PathBuf};

use crate::util::{self, Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DefaultConfigArg {
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Writes the built-in tuning, or the validated `--config` file when given.
pub(crate) fn run(arg: &DefaultConfigArg, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = util::load_playbot_config(config_path)?;
    Output::save_json(&config, arg.output.clone())
}
