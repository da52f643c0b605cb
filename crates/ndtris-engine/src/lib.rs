//! Headless N-dimensional falling-block engine.
//!
//! The [`core`] module holds the data structures (geometry, board, shapes, the
//! falling piece) and [`engine`] holds the game logic built on top of them
//! (piece generation, the single-turn field, the per-frame session).

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding when setting falling piece")]
pub struct PieceCollisionError;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CompletePieceDropError {
    #[display("piece locked above the visible ceiling")]
    AboveCeiling,
    #[display("new piece colliding at spawn")]
    NewPieceCollision,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GeometryError {
    #[display("board must have between 2 and {max} axes, got {dimension}")]
    UnsupportedDimension { dimension: usize, max: usize },
    #[display("board axis {axis} has zero extent")]
    EmptyAxis { axis: usize },
    #[display("board axis {axis} extent {extent} is too large")]
    AxisTooLarge { axis: usize, extent: usize },
    #[display("board has more than {limit} cells")]
    TooManyCells { limit: usize },
    #[display("gravity axis {gravity_axis} out of range for a {dimension}-axis board")]
    GravityAxisOutOfRange {
        gravity_axis: usize,
        dimension: usize,
    },
    #[display("shape set {shape_set} has no shapes for a {dimension}-axis board")]
    NoShapes {
        shape_set: ShapeSet,
        dimension: usize,
    },
}
