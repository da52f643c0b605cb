use std::path::{Path, PathBuf};

use anyhow::Context;
use ndtris_engine::{GameConfig, GameSession, ShapeSet};
use ndtris_playbot::{
    controller::BotController,
    host::BotHost as _,
    policy::{BotMode, PlannerAlgorithm, PlannerProfile},
};

use crate::{
    schema::{AutoPlaySession, PlanRecord, Recorded},
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Bot mode: `auto`, `step` (one action per tick) or `assist` (plan only)
    #[arg(long, default_value = "auto")]
    mode: BotMode,
    /// Extent of every axis, comma separated
    #[arg(long, value_delimiter = ',', default_values_t = [10, 20])]
    dims: Vec<usize>,
    #[arg(long, default_value_t = 1)]
    gravity_axis: usize,
    /// Base gravity level of the session
    #[arg(long, default_value_t = 0)]
    level: usize,
    #[arg(long, default_value = "standard")]
    shape_set: ShapeSet,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Stop once this many pieces have locked
    #[arg(long, default_value_t = 20)]
    pieces: usize,
    #[arg(long, default_value_t = 20_000)]
    max_ticks: usize,
    /// Bot speed multiplier (1-10)
    #[arg(long, default_value_t = 1)]
    speed: i64,
    #[arg(long, default_value = "balanced")]
    profile: PlannerProfile,
    #[arg(long, default_value = "auto", value_parser = util::parse_json_name::<PlannerAlgorithm>)]
    algorithm: PlannerAlgorithm,
    /// Fixed planning budget in milliseconds, replacing the computed one
    #[arg(long)]
    budget_ms: Option<f64>,
    /// Print the board after every locked piece (2D boards only)
    #[arg(long)]
    show_board: bool,
    /// Save a session summary to a file when the session ends
    #[arg(long)]
    save_recording: bool,
    /// Directory to save recording files
    #[arg(long, default_value = "./data/recordings/")]
    record_dir: PathBuf,
}

pub(crate) fn run(arg: &AutoPlayArg, config_path: Option<&Path>) -> anyhow::Result<()> {
    let playbot = util::load_playbot_config(config_path)?;
    let game = GameConfig {
        dims: arg.dims.clone(),
        gravity_axis: arg.gravity_axis,
        speed_level: arg.level,
        shape_set: arg.shape_set,
        seed: arg.seed,
    };
    let mut session = GameSession::new(&game)
        .with_context(|| format!("Failed to create a board of {:?}", game.dims))?;

    let mut bot = BotController::new(playbot);
    bot.set_mode(arg.mode);
    bot.set_speed_level(arg.speed);
    bot.set_profile(arg.profile);
    bot.set_algorithm(arg.algorithm);
    bot.set_budget_override(arg.budget_ms);

    eprintln!(
        "Playing {} pieces on {:?} in {} mode...",
        arg.pieces, game.dims, arg.mode
    );
    let mut plans = Vec::new();
    let mut ticks = 0;
    let mut locked = 0;
    while ticks < arg.max_ticks && locked < arg.pieces && session.is_active() {
        if arg.mode.is_step() {
            bot.request_step();
        }
        let dt = bot.tick_interval_ms(&session);
        if let Some(action) = bot.tick(&mut session, dt) {
            log::trace!("tick {ticks}: {action}");
        }
        session.update(dt);
        ticks += 1;

        let completed = session.stats().completed_pieces();
        if completed == locked {
            continue;
        }
        if let Some(stats) = bot.last_stats() {
            plans.push(PlanRecord {
                piece: locked,
                candidates: stats.candidates,
                expected_clears: stats.expected_clears,
                elapsed_ms: stats.elapsed.as_secs_f64() * 1000.0,
                budget_ms: stats.budget_ms,
                strategy: stats.strategy,
                deadline_hit: stats.deadline_hit,
            });
        }
        locked = completed;
        print_piece(&bot, &session, arg.show_board);
    }

    let game_over = session.session_state().is_game_over();
    eprintln!(
        "{} pieces, {} layers cleared, {} ticks{}",
        locked,
        session.stats().total_cleared_layers(),
        ticks,
        if game_over { ", game over" } else { "" }
    );

    if arg.save_recording {
        let summary = Recorded::now(AutoPlaySession {
            game,
            mode: arg.mode,
            profile: arg.profile,
            algorithm: arg.algorithm,
            pieces: locked,
            cleared_layers: session.stats().total_cleared_layers(),
            game_over,
            ticks,
            plans,
        });
        let filename = format!(
            "{}_{}d_{}.json",
            arg.mode,
            arg.dims.len(),
            summary.recorded_at.format("%Y%m%d_%H%M%S")
        );
        let mut output = Output::open(arg.record_dir.join(filename))?;
        output.write_json(&summary)?;
        eprintln!("Saved session summary to {}", output.display_path());
    }
    Ok(())
}

fn print_piece(bot: &BotController, session: &GameSession, show_board: bool) {
    let stats = session.stats();
    eprintln!(
        "Piece #{}: {} layers cleared so far",
        stats.completed_pieces(),
        stats.total_cleared_layers()
    );
    for line in bot.status_lines() {
        eprintln!("  {line}");
    }
    if show_board && let Some(ascii) = session.board().to_ascii() {
        eprintln!("{ascii}");
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::*;
    use crate::command::{CommandArgs, Mode};

    #[test]
    fn test_auto_play_flags() {
        let args = CommandArgs::try_parse_from([
            "ndtris",
            "auto-play",
            "--mode",
            "step",
            "--dims",
            "5,12,5",
            "--algorithm",
            "greedy_layer",
        ])
        .unwrap();
        let Mode::AutoPlay(arg) = args.mode else {
            panic!("expected auto-play");
        };
        assert_eq!(arg.mode, BotMode::Step);
        assert_eq!(arg.dims, [5, 12, 5]);
        assert_eq!(arg.algorithm, PlannerAlgorithm::GreedyLayer);
        assert_eq!(arg.pieces, 20);
        assert!(arg.budget_ms.is_none());
    }
}
