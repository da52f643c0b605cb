use super::{
    board::{Board, CellId},
    geometry::{BoardGeometry, Coord, Orientation, RotationStep},
    shape::Shape,
};

/// The falling piece: a shape in some orientation with its pivot on the board.
///
/// Pieces are immutable; moves and rotations return new `ActivePiece` values.
/// Rotations turn the blocks about the pivot, so the pivot never moves when
/// rotating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePiece {
    shape_id: CellId,
    orientation: Orientation,
    pivot: Coord,
}

impl ActivePiece {
    /// Spawns a shape above the visible ceiling.
    ///
    /// Each lateral pivot coordinate is centered and then clamped so the piece
    /// fits between the walls when possible. Along gravity, the lowest block
    /// sits one layer above the ceiling.
    #[must_use]
    pub fn spawn(shape: &Shape, geometry: &BoardGeometry) -> Self {
        let orientation = shape.blocks().clone();
        let mut pivot = (0..geometry.dimension()).map(|_| 0).collect::<Coord>();
        for &axis in geometry.lateral_axes() {
            let extent = i32::try_from(geometry.extent(axis)).unwrap_or(i32::MAX);
            let lo = -orientation.min_offset(axis);
            let hi = extent - 1 - orientation.max_offset(axis);
            pivot[axis] = if lo <= hi {
                (extent / 2).clamp(lo, hi)
            } else {
                extent / 2
            };
        }
        let gravity = geometry.gravity_axis();
        pivot[gravity] = -orientation.max_offset(gravity) - 1;
        Self {
            shape_id: shape.id(),
            orientation,
            pivot,
        }
    }

    #[must_use]
    pub fn new(shape_id: CellId, orientation: Orientation, pivot: Coord) -> Self {
        Self {
            shape_id,
            orientation,
            pivot,
        }
    }

    #[must_use]
    pub fn shape_id(&self) -> CellId {
        self.shape_id
    }

    #[must_use]
    pub fn orientation(&self) -> &Orientation {
        &self.orientation
    }

    #[must_use]
    pub fn pivot(&self) -> &Coord {
        &self.pivot
    }

    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.orientation.cells_at(&self.pivot)
    }

    #[must_use]
    pub fn translated(&self, axis: usize, delta: i32) -> Self {
        let mut pivot = self.pivot.clone();
        pivot[axis] += delta;
        Self {
            shape_id: self.shape_id,
            orientation: self.orientation.clone(),
            pivot,
        }
    }

    #[must_use]
    pub fn rotated(&self, step: RotationStep) -> Self {
        Self {
            shape_id: self.shape_id,
            orientation: self.orientation.rotated(step),
            pivot: self.pivot.clone(),
        }
    }

    /// Checks if any block is still above the visible ceiling.
    #[must_use]
    pub fn is_above_ceiling(&self, gravity_axis: usize) -> bool {
        self.cells().any(|c| c[gravity_axis] < 0)
    }

    /// Position reached by falling straight down until blocked.
    #[must_use]
    pub fn simulate_drop_position(&self, board: &Board) -> Self {
        let gravity = board.geometry().gravity_axis();
        let mut dropped = self.clone();
        loop {
            let next = dropped.translated(gravity, 1);
            if board.is_colliding(next.cells()) {
                return dropped;
            }
            dropped = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        geometry::{RotationDirection, coord},
        shape::ShapeSet,
    };

    fn shape(geometry: &BoardGeometry, name: &str) -> Shape {
        ShapeSet::Standard
            .shapes(geometry)
            .into_iter()
            .find(|s| s.name() == name)
            .unwrap()
    }

    #[test]
    fn test_spawn_is_centered_above_ceiling() {
        let geometry = BoardGeometry::new(&[10, 20], 1).unwrap();
        let piece = ActivePiece::spawn(&shape(&geometry, "I"), &geometry);
        assert_eq!(piece.pivot(), &coord(&[5, -1]));
        assert!(piece.is_above_ceiling(1));
        assert!(piece.cells().all(|c| (0..10).contains(&c[0])));

        let o = ActivePiece::spawn(&shape(&geometry, "O"), &geometry);
        assert!(o.cells().all(|c| c[1] < 0));
        assert_eq!(o.cells().map(|c| c[1]).max(), Some(-1));
    }

    #[test]
    fn test_spawn_clamps_to_walls() {
        let geometry = BoardGeometry::new(&[4, 6], 1).unwrap();
        let piece = ActivePiece::spawn(&shape(&geometry, "I"), &geometry);
        assert!(piece.cells().all(|c| (0..4).contains(&c[0])));
    }

    #[test]
    fn test_rotation_keeps_pivot() {
        let geometry = BoardGeometry::new(&[10, 20], 1).unwrap();
        let piece = ActivePiece::spawn(&shape(&geometry, "T"), &geometry).translated(1, 5);
        let rotated = piece.rotated(RotationStep::new(0, 1, RotationDirection::Positive));
        assert_eq!(rotated.pivot(), piece.pivot());
        assert_ne!(rotated.orientation(), piece.orientation());
    }

    #[test]
    fn test_simulate_drop_position() {
        let board = Board::from_ascii(
            r"
            ....
            ....
            ....
            ..#.
            ",
        );
        let geometry = board.geometry().clone();
        let piece = ActivePiece::spawn(&shape(&geometry, "O"), &geometry);
        let dropped = piece.simulate_drop_position(&board);
        assert!(!board.is_colliding(dropped.cells()));
        assert!(board.is_colliding(dropped.translated(1, 1).cells()));
        assert_eq!(dropped.cells().map(|c| c[1]).max(), Some(2));
    }
}
