use crate::core::geometry::{BoardGeometry, Coord, coord};

/// Identifier stored in an occupied cell (shape id of the piece that locked there).
pub type CellId = u8;

/// Cell value of an unoccupied cell.
pub const EMPTY_CELL: CellId = 0;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("cell locked above the visible ceiling")]
pub struct AboveCeilingError;

/// Occupancy grid of an N-dimensional board.
///
/// Cells are stored layer-major (see [`BoardGeometry`]), so every layer is a
/// contiguous slice and clearing full layers is a sequence of slice copies.
///
/// # Collision rules
///
/// - A cell outside the lateral extents collides.
/// - A cell at or below the floor collides.
/// - A cell above the visible ceiling (negative gravity coordinate) never
///   collides; pieces enter the board from there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    geometry: BoardGeometry,
    cells: Vec<CellId>,
}

impl Board {
    #[must_use]
    pub fn new(geometry: BoardGeometry) -> Self {
        let cells = vec![EMPTY_CELL; geometry.cell_count()];
        Self { geometry, cells }
    }

    #[must_use]
    pub fn geometry(&self) -> &BoardGeometry {
        &self.geometry
    }

    /// Returns the identifier of an occupied in-bounds cell.
    #[must_use]
    pub fn get(&self, c: &Coord) -> Option<CellId> {
        let index = self.geometry.cell_index(c)?;
        let id = self.cells[index];
        (id != EMPTY_CELL).then_some(id)
    }

    #[must_use]
    pub fn is_occupied(&self, c: &Coord) -> bool {
        self.get(c).is_some()
    }

    #[must_use]
    pub fn is_cell_blocked(&self, c: &Coord) -> bool {
        if !self.geometry.is_lateral_in_bounds(c) {
            return true;
        }
        let level = c[self.geometry.gravity_axis()];
        if level < 0 {
            return false;
        }
        if usize::try_from(level).is_ok_and(|l| l >= self.geometry.height()) {
            return true;
        }
        self.is_occupied(c)
    }

    /// Checks if any of the given cells collides with the board.
    #[must_use]
    pub fn is_colliding<I>(&self, cells: I) -> bool
    where
        I: IntoIterator<Item = Coord>,
    {
        cells.into_iter().any(|c| self.is_cell_blocked(&c))
    }

    /// Marks cells as occupied by `id`.
    ///
    /// Cells above the visible ceiling cannot be stored; they are dropped and
    /// reported as [`AboveCeilingError`] after the in-bounds cells are filled.
    pub fn fill_cells<I>(&mut self, cells: I, id: CellId) -> Result<(), AboveCeilingError>
    where
        I: IntoIterator<Item = Coord>,
    {
        let mut above_ceiling = false;
        for c in cells {
            match self.geometry.cell_index(&c) {
                Some(index) => self.cells[index] = id,
                None => above_ceiling |= c[self.geometry.gravity_axis()] < 0,
            }
        }
        if above_ceiling {
            return Err(AboveCeilingError);
        }
        Ok(())
    }

    /// Returns the cells of one layer.
    #[must_use]
    pub fn layer(&self, level: usize) -> &[CellId] {
        let width = self.geometry.column_count();
        &self.cells[level * width..][..width]
    }

    /// Iterates layers from the top (`level == 0`) to the floor.
    pub fn layers(&self) -> impl Iterator<Item = &[CellId]> + '_ {
        self.cells.chunks(self.geometry.column_count())
    }

    #[must_use]
    pub fn layer_occupancy(&self, level: usize) -> usize {
        self.layer(level)
            .iter()
            .filter(|&&id| id != EMPTY_CELL)
            .count()
    }

    #[must_use]
    pub fn is_layer_full(&self, level: usize) -> bool {
        self.layer(level).iter().all(|&id| id != EMPTY_CELL)
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&id| id != EMPTY_CELL).count()
    }

    /// Iterates the flat indices (`level * column_count + column`) of occupied cells.
    pub fn occupied_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(index, &id)| (id != EMPTY_CELL).then_some(index))
    }

    /// Removes every full layer, shifting the layers above it toward the floor.
    ///
    /// Returns the number of layers removed.
    pub fn clear_full_layers(&mut self) -> usize {
        let width = self.geometry.column_count();
        let height = self.geometry.height();
        let mut write = height;
        for level in (0..height).rev() {
            if self.is_layer_full(level) {
                continue;
            }
            write -= 1;
            if write != level {
                self.cells
                    .copy_within(level * width..(level + 1) * width, write * width);
            }
        }
        // every full layer left one slot unwritten at the top
        let cleared = write;
        self.cells[..cleared * width].fill(EMPTY_CELL);
        cleared
    }

    /// Parses a 2D board (gravity along axis 1) from ASCII art.
    ///
    /// Rows are listed from the top; `.` is empty and any other character is
    /// an occupied cell. Blank lines are ignored.
    ///
    /// # Panics
    ///
    /// Panics if the rows are ragged or the art is empty.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let rows = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>();
        let width = rows.first().map_or(0, |row| row.chars().count());
        assert!(
            rows.iter().all(|row| row.chars().count() == width),
            "rows must have equal width"
        );
        let geometry = BoardGeometry::new(&[width, rows.len()], 1).expect("invalid board art");
        let mut board = Self::new(geometry);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch != '.' {
                    let c = coord(&[i32::try_from(x).unwrap(), i32::try_from(y).unwrap()]);
                    board.fill_cells([c], 1).unwrap();
                }
            }
        }
        board
    }

    /// Renders a 2D board with gravity along axis 1 as ASCII art.
    ///
    /// Returns `None` for any other geometry.
    #[must_use]
    pub fn to_ascii(&self) -> Option<String> {
        if self.geometry.dimension() != 2 || self.geometry.gravity_axis() != 1 {
            return None;
        }
        let mut out = String::with_capacity(self.cells.len() + self.geometry.height());
        for layer in self.layers() {
            out.extend(
                layer
                    .iter()
                    .map(|&id| if id == EMPTY_CELL { '.' } else { '#' }),
            );
            out.push('\n');
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collision_rules() {
        let board = Board::from_ascii(
            r"
            ....
            ....
            #...
            ",
        );
        assert!(!board.is_cell_blocked(&coord(&[0, 1])));
        assert!(board.is_cell_blocked(&coord(&[0, 2])));
        // above the ceiling is exempt, outside the walls is not
        assert!(!board.is_cell_blocked(&coord(&[1, -3])));
        assert!(board.is_cell_blocked(&coord(&[4, -3])));
        assert!(board.is_cell_blocked(&coord(&[-1, 0])));
        // floor
        assert!(board.is_cell_blocked(&coord(&[1, 3])));
    }

    #[test]
    fn test_fill_above_ceiling_reports_error() {
        let mut board = Board::new(BoardGeometry::new(&[4, 3], 1).unwrap());
        let result = board.fill_cells([coord(&[0, -1]), coord(&[0, 0])], 2);
        assert_eq!(result, Err(AboveCeilingError));
        assert_eq!(board.get(&coord(&[0, 0])), Some(2));
        assert_eq!(board.occupied_count(), 1);
    }

    #[test]
    fn test_clear_full_layers_shifts_down() {
        let mut board = Board::from_ascii(
            r"
            .#..
            ####
            #.#.
            ####
            ",
        );
        assert_eq!(board.clear_full_layers(), 2);
        assert_eq!(
            board.to_ascii().unwrap(),
            Board::from_ascii(
                r"
                ....
                ....
                .#..
                #.#.
                "
            )
            .to_ascii()
            .unwrap()
        );
    }

    #[test]
    fn test_clear_full_layers_in_3d() {
        let geometry = BoardGeometry::new(&[2, 3, 2], 1).unwrap();
        let mut board = Board::new(geometry);
        for x in 0..2 {
            for z in 0..2 {
                board.fill_cells([coord(&[x, 2, z])], 1).unwrap();
            }
        }
        board.fill_cells([coord(&[1, 1, 1])], 3).unwrap();
        assert!(board.is_layer_full(2));
        assert_eq!(board.layer_occupancy(1), 1);

        assert_eq!(board.clear_full_layers(), 1);
        assert_eq!(board.occupied_count(), 1);
        assert_eq!(board.get(&coord(&[1, 2, 1])), Some(3));
    }

    #[test]
    fn test_ascii_round_trip_shape() {
        let board = Board::from_ascii(
            r"
            ..#
            ###
            ",
        );
        assert_eq!(board.geometry().dims(), &[3, 2]);
        assert_eq!(board.to_ascii().unwrap(), "..#\n###\n");
    }
}
