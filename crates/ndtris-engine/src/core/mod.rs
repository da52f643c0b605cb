pub use self::{board::*, geometry::*, piece::*, shape::*};

pub(crate) mod board;
pub(crate) mod geometry;
pub(crate) mod piece;
pub(crate) mod shape;
