use ndtris_engine::{
    ActivePiece, Board, GameSession, Orientation, PieceCollisionError, RotationStep, Shape,
};

/// The game surface a bot plays through.
///
/// Reads expose what a human player can see; actions are the same atomic
/// inputs manual control uses.
pub trait BotHost {
    fn board(&self) -> &Board;

    fn falling_piece(&self) -> &ActivePiece;

    /// Orientation the next piece will spawn in, if a preview exists.
    fn next_orientation(&self) -> Option<&Orientation>;

    /// Pieces drawn from the randomizer so far.
    fn pieces_drawn(&self) -> usize;

    /// Layers cleared so far.
    fn lines_cleared(&self) -> usize;

    fn gravity_interval_ms(&self) -> u64;

    /// `false` while paused or after game over.
    fn is_active(&self) -> bool;

    fn try_move(&mut self, axis: usize, delta: i32) -> Result<(), PieceCollisionError>;

    fn try_rotate(&mut self, step: RotationStep) -> Result<(), PieceCollisionError>;

    fn try_soft_drop(&mut self) -> Result<(), PieceCollisionError>;

    fn lock_and_spawn(&mut self);
}

impl BotHost for GameSession {
    fn board(&self) -> &Board {
        GameSession::board(self)
    }

    fn falling_piece(&self) -> &ActivePiece {
        GameSession::falling_piece(self)
    }

    fn next_orientation(&self) -> Option<&Orientation> {
        self.next_shape().map(Shape::blocks)
    }

    fn pieces_drawn(&self) -> usize {
        self.field().pieces_drawn()
    }

    fn lines_cleared(&self) -> usize {
        self.stats().total_cleared_layers()
    }

    fn gravity_interval_ms(&self) -> u64 {
        GameSession::gravity_interval_ms(self)
    }

    fn is_active(&self) -> bool {
        self.session_state().is_playing()
    }

    fn try_move(&mut self, axis: usize, delta: i32) -> Result<(), PieceCollisionError> {
        GameSession::try_move(self, axis, delta)
    }

    fn try_rotate(&mut self, step: RotationStep) -> Result<(), PieceCollisionError> {
        GameSession::try_rotate(self, step)
    }

    fn try_soft_drop(&mut self) -> Result<(), PieceCollisionError> {
        GameSession::try_soft_drop(self)
    }

    fn lock_and_spawn(&mut self) {
        GameSession::lock_and_spawn(self);
    }
}
