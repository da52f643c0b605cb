use std::{cell::OnceCell, iter};

use ndtris_engine::{Board, EMPTY_CELL};

/// Lazily computed surface and density metrics of a board.
///
/// Columns are the cells sharing every lateral coordinate. A column's height
/// is measured from the floor to its topmost occupied cell.
#[derive(Debug)]
pub struct BoardAnalysis {
    board: Board,
    column_heights: OnceCell<Vec<usize>>,
    column_occupied_cells: OnceCell<Vec<usize>>,
    aggregate_height: OnceCell<usize>,
    max_height: OnceCell<usize>,
    num_holes: OnceCell<usize>,
    roughness: OnceCell<usize>,
    layer_mass: OnceCell<usize>,
}

impl BoardAnalysis {
    #[must_use]
    pub fn from_board(board: &Board) -> Self {
        Self::new(board.clone())
    }

    #[must_use]
    pub fn new(board: Board) -> Self {
        Self {
            board,
            column_heights: OnceCell::new(),
            column_occupied_cells: OnceCell::new(),
            aggregate_height: OnceCell::new(),
            max_height: OnceCell::new(),
            num_holes: OnceCell::new(),
            roughness: OnceCell::new(),
            layer_mass: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn column_heights(&self) -> &[usize] {
        self.column_heights.get_or_init(|| {
            let geometry = self.board.geometry();
            let height = geometry.height();
            let mut heights = vec![0; geometry.column_count()];
            for (level, layer) in self.board.layers().enumerate() {
                for (h, &id) in iter::zip(&mut heights, layer) {
                    if *h == 0 && id != EMPTY_CELL {
                        *h = height - level;
                    }
                }
            }
            heights
        })
    }

    #[must_use]
    pub fn column_occupied_cells(&self) -> &[usize] {
        self.column_occupied_cells.get_or_init(|| {
            let mut occupied = vec![0; self.board.geometry().column_count()];
            for layer in self.board.layers() {
                for (o, &id) in iter::zip(&mut occupied, layer) {
                    *o += usize::from(id != EMPTY_CELL);
                }
            }
            occupied
        })
    }

    #[must_use]
    pub fn aggregate_height(&self) -> usize {
        *self
            .aggregate_height
            .get_or_init(|| self.column_heights().iter().sum())
    }

    #[must_use]
    pub fn max_height(&self) -> usize {
        *self
            .max_height
            .get_or_init(|| self.column_heights().iter().copied().max().unwrap_or(0))
    }

    /// Empty cells below the topmost occupied cell of their column.
    #[must_use]
    pub fn num_holes(&self) -> usize {
        *self.num_holes.get_or_init(|| {
            iter::zip(self.column_heights(), self.column_occupied_cells())
                .map(|(h, occ)| h - occ)
                .sum()
        })
    }

    /// Sum of height differences between columns adjacent along any lateral axis.
    #[must_use]
    pub fn roughness(&self) -> usize {
        *self.roughness.get_or_init(|| {
            let geometry = self.board.geometry();
            let heights = self.column_heights();
            (0..heights.len())
                .flat_map(|column| {
                    geometry
                        .forward_neighbors(column)
                        .map(move |neighbor| heights[column].abs_diff(heights[neighbor]))
                })
                .sum()
        })
    }

    /// Sum of squared layer occupancies; rewards dense, nearly full layers.
    #[must_use]
    pub fn layer_mass(&self) -> usize {
        *self.layer_mass.get_or_init(|| {
            (0..self.board.geometry().height())
                .map(|level| self.board.layer_occupancy(level).pow(2))
                .sum()
        })
    }
}

#[cfg(test)]
mod tests {
    use ndtris_engine::{BoardGeometry, coord};

    use super::*;

    #[test]
    fn test_surface_metrics() {
        let board = Board::from_ascii(
            "
            ....
            .#..
            .#.#
            #..#
            ",
        );
        let analysis = BoardAnalysis::from_board(&board);
        assert_eq!(analysis.column_heights(), &[1, 3, 0, 2]);
        assert_eq!(analysis.column_occupied_cells(), &[1, 2, 0, 2]);
        assert_eq!(analysis.aggregate_height(), 6);
        assert_eq!(analysis.max_height(), 3);
        assert_eq!(analysis.num_holes(), 1);
        assert_eq!(analysis.roughness(), 2 + 3 + 2);
        assert_eq!(analysis.layer_mass(), 1 + 4 + 4);
    }

    #[test]
    fn test_empty_board() {
        let analysis = BoardAnalysis::new(Board::new(BoardGeometry::new(&[3, 5, 3], 1).unwrap()));
        assert_eq!(analysis.column_heights().len(), 9);
        assert_eq!(analysis.max_height(), 0);
        assert_eq!(analysis.num_holes(), 0);
        assert_eq!(analysis.roughness(), 0);
        assert_eq!(analysis.layer_mass(), 0);
    }

    #[test]
    fn test_roughness_spans_every_lateral_axis() {
        let mut board = Board::new(BoardGeometry::new(&[3, 4, 3], 1).unwrap());
        // a single block in the middle column touches four neighbors
        board.fill_cells([coord(&[1, 3, 1])], 1).unwrap();
        let analysis = BoardAnalysis::from_board(&board);
        assert_eq!(analysis.aggregate_height(), 1);
        assert_eq!(analysis.roughness(), 4);
    }
}
