//! Headless regression runs.
//!
//! A [`DryRunHarness`] plays one seeded game with the controller in
//! [`BotMode::Auto`] and deterministic planning ([`PlanTiming::Unbounded`]),
//! advancing the session clock by one controller interval per tick. Identical
//! seed and configuration give identical reports.

use ndtris_engine::{GameConfig, GameSession, GeometryError, ShapeSet};
use serde::{Deserialize, Serialize};

use crate::{
    config::PlaybotConfig,
    controller::BotController,
    host::BotHost as _,
    planner::PlanTiming,
    policy::{BotMode, PlannerAlgorithm, PlannerProfile},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DryRunConfig {
    pub game: GameConfig,
    pub max_ticks: usize,
    /// The run stops once this many pieces have locked.
    pub target_pieces: usize,
    /// Fail unless at least one layer was cleared.
    pub require_clears: bool,
    pub profile: PlannerProfile,
    pub algorithm: PlannerAlgorithm,
}

impl Default for DryRunConfig {
    fn default() -> Self {
        Self {
            game: GameConfig {
                dims: vec![6, 12],
                shape_set: ShapeSet::Debug,
                ..GameConfig::default()
            },
            max_ticks: 5000,
            target_pieces: 40,
            require_clears: true,
            profile: PlannerProfile::Balanced,
            algorithm: PlannerAlgorithm::Auto,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DryRunReport {
    pub passed: bool,
    pub reason: String,
    pub pieces_dropped: usize,
    pub clears_observed: usize,
    pub game_over: bool,
    pub ticks: usize,
}

#[derive(Debug, Clone)]
pub struct DryRunHarness {
    playbot: PlaybotConfig,
    config: DryRunConfig,
}

impl DryRunHarness {
    #[must_use]
    pub fn new(playbot: PlaybotConfig, config: DryRunConfig) -> Self {
        Self { playbot, config }
    }

    #[must_use]
    pub fn config(&self) -> &DryRunConfig {
        &self.config
    }

    pub fn run(&self) -> Result<DryRunReport, GeometryError> {
        let config = &self.config;
        let mut session = GameSession::new(&config.game)?;
        let mut bot = BotController::new(self.playbot.clone());
        bot.set_mode(BotMode::Auto);
        bot.set_timing(PlanTiming::Unbounded);
        bot.set_profile(config.profile);
        bot.set_algorithm(config.algorithm);

        let mut ticks = 0;
        while ticks < config.max_ticks
            && session.stats().completed_pieces() < config.target_pieces
            && session.is_active()
        {
            let dt = bot.tick_interval_ms(&session);
            bot.tick(&mut session, dt);
            session.update(dt);
            ticks += 1;
        }

        let pieces_dropped = session.stats().completed_pieces();
        let clears_observed = session.stats().total_cleared_layers();
        let game_over = session.session_state().is_game_over();
        let failure = if game_over {
            Some(format!("game over after {pieces_dropped} pieces"))
        } else if pieces_dropped < config.target_pieces {
            Some(format!(
                "only {pieces_dropped} of {} pieces locked within {ticks} ticks",
                config.target_pieces
            ))
        } else if config.require_clears && clears_observed == 0 {
            Some("no layers cleared".to_owned())
        } else {
            None
        };
        let report = DryRunReport {
            passed: failure.is_none(),
            reason: failure.unwrap_or_else(|| "ok".to_owned()),
            pieces_dropped,
            clears_observed,
            game_over,
            ticks,
        };
        log::info!(
            "dry run on {:?}: {} ({} pieces, {} clears, {} ticks)",
            config.game.dims,
            report.reason,
            report.pieces_dropped,
            report.clears_observed,
            report.ticks
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use ndtris_engine::{Board, Orientation, coord};

    use super::*;
    use crate::{
        candidate::{ColumnIndex, settled_placements},
        planner::{PlanRequest, Planner},
    };

    #[test]
    fn test_debug_set_clears_layers() {
        let report = DryRunHarness::new(PlaybotConfig::default(), DryRunConfig::default())
            .run()
            .unwrap();
        assert!(report.passed, "{}", report.reason);
        assert!(report.clears_observed > 0);
        assert_eq!(report.pieces_dropped, 40);
        assert!(!report.game_over);
    }

    #[test]
    fn test_reports_are_deterministic() {
        let config = DryRunConfig {
            game: GameConfig {
                dims: vec![8, 16],
                seed: 7,
                ..GameConfig::default()
            },
            target_pieces: 12,
            require_clears: false,
            ..DryRunConfig::default()
        };
        let harness = DryRunHarness::new(PlaybotConfig::default(), config);
        let first = harness.run().unwrap();
        let second = harness.run().unwrap();
        assert_eq!(first, second);
        assert!(first.passed, "{}", first.reason);
    }

    #[test]
    fn test_three_dimensional_run() {
        let config = DryRunConfig {
            game: GameConfig {
                dims: vec![5, 12, 5],
                ..GameConfig::default()
            },
            target_pieces: 3,
            require_clears: false,
            ..DryRunConfig::default()
        };
        let report = DryRunHarness::new(PlaybotConfig::default(), config)
            .run()
            .unwrap();
        assert!(report.passed, "{}", report.reason);
    }

    #[test]
    fn test_tick_budget_exhausted() {
        let config = DryRunConfig {
            max_ticks: 5,
            ..DryRunConfig::default()
        };
        let report = DryRunHarness::new(PlaybotConfig::default(), config)
            .run()
            .unwrap();
        assert!(!report.passed);
        assert_eq!(report.ticks, 5);
        assert!(report.reason.starts_with("only 0 of 40 pieces"));
    }

    #[test]
    fn test_invalid_board_is_an_error() {
        let config = DryRunConfig {
            game: GameConfig {
                dims: vec![6],
                ..GameConfig::default()
            },
            ..DryRunConfig::default()
        };
        assert!(DryRunHarness::new(PlaybotConfig::default(), config).run().is_err());
    }

    #[test]
    fn test_single_gap_is_filled() {
        let board = Board::from_ascii(
            "
            ....
            ....
            ....
            .###
            ",
        );
        let mono = Orientation::new([coord(&[0, 0])]);
        let mut planner = Planner::new(PlaybotConfig::default());
        let result = planner
            .plan(&PlanRequest {
                board: &board,
                orientation: &mono,
                next_orientation: None,
                lines_cleared: 0,
                profile: PlannerProfile::Fast,
                algorithm: PlannerAlgorithm::Auto,
                budget_override_ms: None,
                timing: PlanTiming::Unbounded,
            })
            .unwrap();
        assert_eq!(result.stats.expected_clears, 1);

        // every candidate on that board is settled
        let index = ColumnIndex::new(&board);
        let orientations = [mono];
        for placement in settled_placements(&board, &index, &orientations, usize::MAX) {
            assert!(!board.is_colliding(placement.cells()));
            assert!(board.is_colliding(placement.translated(1, 1).cells()));
        }
    }
}
