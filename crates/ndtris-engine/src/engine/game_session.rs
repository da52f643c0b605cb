use std::time::Duration;

use crate::{
    GeometryError, PieceCollisionError,
    core::{ActivePiece, Board, RotationStep, Shape},
};

use super::{GameConfig, GameStats, game_field::GameField};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    Paused,
    GameOver,
}

/// Milliseconds between two gravity steps at `level`.
#[must_use]
pub fn gravity_interval_ms(level: usize) -> u64 {
    let level = u64::try_from(level).unwrap_or(u64::MAX);
    100 + u64::saturating_sub(900, level.saturating_mul(100))
}

/// A game driven by the host's per-frame update.
///
/// Gravity advances the falling piece one layer per interval; a piece that
/// cannot fall any further locks on the next gravity step.
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    field: GameField,
    stats: GameStats,
    session_state: SessionState,
    elapsed_ms: u64,
    gravity_elapsed_ms: u64,
}

impl GameSession {
    pub fn new(config: &GameConfig) -> Result<Self, GeometryError> {
        Ok(Self {
            config: config.clone(),
            field: GameField::new(config)?,
            stats: GameStats::new(),
            session_state: SessionState::Playing,
            elapsed_ms: 0,
            gravity_elapsed_ms: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn field(&self) -> &GameField {
        &self.field
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        self.field.board()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn session_state(&self) -> &SessionState {
        &self.session_state
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms)
    }

    /// Effective level: the configured speed level plus progress from clears.
    #[must_use]
    pub fn level(&self) -> usize {
        self.config.speed_level + self.stats.level()
    }

    #[must_use]
    pub fn gravity_interval_ms(&self) -> u64 {
        gravity_interval_ms(self.level())
    }

    pub fn toggle_pause(&mut self) {
        self.session_state = match self.session_state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            SessionState::GameOver => SessionState::GameOver,
        };
    }

    #[must_use]
    pub fn falling_piece(&self) -> &ActivePiece {
        self.field.falling_piece()
    }

    #[must_use]
    pub fn next_shape(&self) -> Option<&Shape> {
        self.field.next_shape()
    }

    #[must_use]
    pub fn simulate_drop_position(&self) -> ActivePiece {
        self.field.simulate_drop_position()
    }

    /// Advances the session clock by `dt_ms`, applying every gravity step
    /// that became due.
    pub fn update(&mut self, dt_ms: u64) {
        if !self.session_state.is_playing() {
            return;
        }
        self.elapsed_ms += dt_ms;
        self.gravity_elapsed_ms += dt_ms;
        while self.session_state.is_playing() {
            let interval = self.gravity_interval_ms();
            if self.gravity_elapsed_ms < interval {
                break;
            }
            self.gravity_elapsed_ms -= interval;
            self.auto_drop_and_complete();
        }
    }

    /// Replaces the falling piece, e.g. with a planned placement.
    pub fn set_falling_piece(&mut self, piece: ActivePiece) -> Result<(), PieceCollisionError> {
        self.field.set_falling_piece(piece)
    }

    pub fn try_move(&mut self, axis: usize, delta: i32) -> Result<(), PieceCollisionError> {
        self.field.try_move(axis, delta)
    }

    pub fn try_soft_drop(&mut self) -> Result<(), PieceCollisionError> {
        self.field.try_soft_drop()
    }

    pub fn try_rotate(&mut self, step: RotationStep) -> Result<(), PieceCollisionError> {
        self.field.try_rotate(step)
    }

    pub fn hard_drop_and_complete(&mut self) {
        while self.try_soft_drop().is_ok() {}
        self.complete_piece_drop();
    }

    pub fn auto_drop_and_complete(&mut self) {
        if self.try_soft_drop().is_ok() {
            return;
        }
        self.complete_piece_drop();
    }

    /// Locks the falling piece where it is and spawns the next one.
    pub fn lock_and_spawn(&mut self) {
        self.complete_piece_drop();
    }

    fn complete_piece_drop(&mut self) {
        if self.session_state.is_game_over() {
            return;
        }
        let (cleared_layers, result) = self.field.complete_piece_drop();
        self.stats.complete_piece_drop(cleared_layers);
        self.gravity_elapsed_ms = 0;
        if let Err(e) = result {
            log::debug!(
                "game over after {} pieces: {e}",
                self.stats.completed_pieces()
            );
            self.session_state = SessionState::GameOver;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ShapeSet;

    #[test]
    fn test_gravity_interval() {
        assert_eq!(gravity_interval_ms(0), 1000);
        assert_eq!(gravity_interval_ms(3), 700);
        assert_eq!(gravity_interval_ms(9), 100);
        assert_eq!(gravity_interval_ms(50), 100);
    }

    #[test]
    fn test_update_applies_gravity() {
        let mut session = GameSession::new(&GameConfig::default()).unwrap();
        let start = session.falling_piece().pivot()[1];
        session.update(999);
        assert_eq!(session.falling_piece().pivot()[1], start);
        session.update(1);
        assert_eq!(session.falling_piece().pivot()[1], start + 1);
        session.update(2500);
        assert_eq!(session.falling_piece().pivot()[1], start + 3);
        assert_eq!(session.duration(), Duration::from_millis(3500));
    }

    #[test]
    fn test_paused_session_does_not_fall() {
        let mut session = GameSession::new(&GameConfig::default()).unwrap();
        let start = session.falling_piece().clone();
        session.toggle_pause();
        session.update(5000);
        assert_eq!(session.falling_piece(), &start);
        session.toggle_pause();
        assert!(session.session_state().is_playing());
    }

    #[test]
    fn test_hard_drop_locks_on_floor() {
        let mut session = GameSession::new(&GameConfig::default()).unwrap();
        session.hard_drop_and_complete();
        assert_eq!(session.stats().completed_pieces(), 1);
        assert_eq!(session.field().locked_cell_count(), 4);
        assert!(session.board().layer_occupancy(19) > 0);
        assert!(session.session_state().is_playing());
    }

    #[test]
    fn test_game_over_when_stack_reaches_ceiling() {
        let config = GameConfig {
            dims: vec![3, 2],
            shape_set: ShapeSet::Debug,
            ..GameConfig::default()
        };
        let mut session = GameSession::new(&config).unwrap();
        session.lock_and_spawn();
        assert!(session.session_state().is_game_over());
        session.lock_and_spawn();
        assert_eq!(session.stats().completed_pieces(), 1);
    }
}
