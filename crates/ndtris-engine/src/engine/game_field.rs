use crate::{
    CompletePieceDropError, GeometryError, PieceCollisionError,
    core::{ActivePiece, Board, RotationStep, Shape},
};

use super::{game_config::GameConfig, piece_buffer::PieceBuffer};

/// Single-turn game state: the locked board, the falling piece and the
/// upcoming pieces.
#[derive(Debug, Clone)]
pub struct GameField {
    board: Board,
    shapes: Vec<Shape>,
    falling_piece: ActivePiece,
    piece_buffer: PieceBuffer,
}

impl GameField {
    pub fn new(config: &GameConfig) -> Result<Self, GeometryError> {
        let geometry = config.geometry()?;
        let shapes = config.shapes(&geometry)?;
        let mut piece_buffer = PieceBuffer::with_seed(config.seed, shapes.len());
        let falling_piece = ActivePiece::spawn(&shapes[piece_buffer.pop_next()], &geometry);
        Ok(Self {
            board: Board::new(geometry),
            shapes,
            falling_piece,
            piece_buffer,
        })
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> &ActivePiece {
        &self.falling_piece
    }

    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Shape of the piece that spawns after the current one locks.
    #[must_use]
    pub fn next_shape(&self) -> Option<&Shape> {
        self.next_shapes().next()
    }

    pub fn next_shapes(&self) -> impl Iterator<Item = &Shape> + '_ {
        self.piece_buffer.next_pieces().map(|index| &self.shapes[index])
    }

    #[must_use]
    pub fn pieces_drawn(&self) -> usize {
        self.piece_buffer.pieces_drawn()
    }

    #[must_use]
    pub fn locked_cell_count(&self) -> usize {
        self.board.occupied_count()
    }

    pub fn set_falling_piece(&mut self, piece: ActivePiece) -> Result<(), PieceCollisionError> {
        if self.board.is_colliding(piece.cells()) {
            return Err(PieceCollisionError);
        }
        self.falling_piece = piece;
        Ok(())
    }

    pub fn set_falling_piece_unchecked(&mut self, piece: ActivePiece) {
        self.falling_piece = piece;
    }

    pub fn try_move(&mut self, axis: usize, delta: i32) -> Result<(), PieceCollisionError> {
        let piece = self.falling_piece.translated(axis, delta);
        self.set_falling_piece(piece)
    }

    pub fn try_soft_drop(&mut self) -> Result<(), PieceCollisionError> {
        let gravity = self.board.geometry().gravity_axis();
        self.try_move(gravity, 1)
    }

    /// Rotates the falling piece, trying simple kicks when the plain rotation
    /// collides.
    ///
    /// Kicks are tried in order: one then two layers up along gravity, then one
    /// step in each direction of every lateral axis.
    pub fn try_rotate(&mut self, step: RotationStep) -> Result<(), PieceCollisionError> {
        let rotated = self.falling_piece.rotated(step);
        let geometry = self.board.geometry();
        let kicks = std::iter::once(None)
            .chain((1..=2).map(|up| Some((geometry.gravity_axis(), -up))))
            .chain(
                geometry
                    .lateral_axes()
                    .iter()
                    .flat_map(|&axis| [Some((axis, -1)), Some((axis, 1))]),
            );
        let piece = kicks
            .map(|kick| match kick {
                None => rotated.clone(),
                Some((axis, delta)) => rotated.translated(axis, delta),
            })
            .find(|candidate| !self.board.is_colliding(candidate.cells()))
            .ok_or(PieceCollisionError)?;
        self.falling_piece = piece;
        Ok(())
    }

    #[must_use]
    pub fn simulate_drop_position(&self) -> ActivePiece {
        self.falling_piece.simulate_drop_position(&self.board)
    }

    /// Locks the falling piece, clears full layers and spawns the next piece.
    ///
    /// Returns the number of cleared layers together with the outcome; an
    /// error means the game is over.
    pub fn complete_piece_drop(&mut self) -> (usize, Result<(), CompletePieceDropError>) {
        let filled = self
            .board
            .fill_cells(self.falling_piece.cells(), self.falling_piece.shape_id());
        let cleared_layers = self.board.clear_full_layers();

        let next = &self.shapes[self.piece_buffer.pop_next()];
        self.falling_piece = ActivePiece::spawn(next, self.board.geometry());

        if filled.is_err() {
            return (cleared_layers, Err(CompletePieceDropError::AboveCeiling));
        }
        if self.board.is_colliding(self.falling_piece.cells()) {
            return (
                cleared_layers,
                Err(CompletePieceDropError::NewPieceCollision),
            );
        }
        (cleared_layers, Ok(()))
    }
}
