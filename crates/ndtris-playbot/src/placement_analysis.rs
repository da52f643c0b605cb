//! Result of locking a piece at a candidate placement.
//!
//! The lock is simulated on a private copy of the board: fill the cells,
//! clear full layers, then measure the resulting board lazily through
//! [`BoardAnalysis`]. The live board is never touched.

use ndtris_engine::{Board, CellId};

use crate::{board_analysis::BoardAnalysis, candidate::Placement};

/// Cell id written by simulated locks.
const SIMULATED_CELL: CellId = CellId::MAX;

#[derive(Debug)]
pub struct PlacementAnalysis {
    placement: Placement,
    cleared_layers: usize,
    alive: bool,
    board_analysis: BoardAnalysis,
}

impl PlacementAnalysis {
    #[must_use]
    pub fn from_board(before_placement: &Board, placement: Placement) -> Self {
        let mut board = before_placement.clone();
        let alive = board.fill_cells(placement.cells(), SIMULATED_CELL).is_ok();
        let cleared_layers = board.clear_full_layers();

        Self {
            placement,
            cleared_layers,
            alive,
            board_analysis: BoardAnalysis::new(board),
        }
    }

    #[must_use]
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    #[must_use]
    pub fn into_placement(self) -> Placement {
        self.placement
    }

    #[must_use]
    pub fn cleared_layers(&self) -> usize {
        self.cleared_layers
    }

    /// `false` when a block locked above the visible ceiling.
    #[must_use]
    pub fn alive(&self) -> bool {
        self.alive
    }

    #[must_use]
    pub fn board_analysis(&self) -> &BoardAnalysis {
        &self.board_analysis
    }
}

#[cfg(test)]
mod tests {
    use ndtris_engine::{Orientation, coord};

    use super::*;

    #[test]
    fn test_lock_clears_full_layer() {
        let board = Board::from_ascii(
            "
            ....
            #...
            ###.
            ",
        );
        let placement = Placement::new(Orientation::new([coord(&[0, 0])]), coord(&[3, 2]));
        let analysis = PlacementAnalysis::from_board(&board, placement);
        assert!(analysis.alive());
        assert_eq!(analysis.cleared_layers(), 1);
        assert_eq!(analysis.board_analysis().board().occupied_count(), 1);
        assert_eq!(analysis.board_analysis().column_heights(), &[1, 0, 0, 0]);
        // the original board is untouched
        assert_eq!(board.occupied_count(), 4);
    }

    #[test]
    fn test_lock_above_ceiling_is_not_alive() {
        let board = Board::from_ascii(
            "
            #..
            #..
            ",
        );
        let bar = Orientation::new([coord(&[0, -1]), coord(&[0, 0])]);
        let placement = Placement::new(bar, coord(&[0, -1]));
        let analysis = PlacementAnalysis::from_board(&board, placement);
        assert!(!analysis.alive());
        assert_eq!(analysis.cleared_layers(), 0);
    }
}
