//! Settled drop placements.
//!
//! For every orientation the generator walks the lateral pivot positions that
//! keep the piece between the walls, spawns the piece above the visible
//! ceiling and lets it fall straight down. Falls are resolved against a
//! per-column index of occupied levels instead of stepping layer by layer.

use std::iter;

use ndtris_engine::{Board, BoardGeometry, Coord, Orientation};

/// An orientation placed at an absolute pivot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Placement {
    orientation: Orientation,
    pivot: Coord,
}

impl Placement {
    #[must_use]
    pub fn new(orientation: Orientation, pivot: Coord) -> Self {
        Self { orientation, pivot }
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
            orientation: self.orientation.clone(),
            pivot,
        }
    }
}

/// Sorted occupied levels of every column.
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    levels: Vec<Vec<i32>>,
    height: i32,
    gravity_axis: usize,
}

impl ColumnIndex {
    #[must_use]
    pub fn new(board: &Board) -> Self {
        let geometry = board.geometry();
        let column_count = geometry.column_count();
        let mut levels = vec![vec![]; column_count];
        // layer-major order visits levels top to bottom, so every list stays sorted
        for index in board.occupied_cells() {
            let level = i32::try_from(index / column_count).unwrap_or(i32::MAX);
            levels[index % column_count].push(level);
        }
        Self {
            levels,
            height: i32::try_from(geometry.height()).unwrap_or(i32::MAX),
            gravity_axis: geometry.gravity_axis(),
        }
    }

    /// Topmost occupied level of a column, if any.
    #[must_use]
    pub fn top(&self, column: usize) -> Option<i32> {
        self.levels[column].first().copied()
    }

    /// Layers a single block at `level` can fall before it is blocked.
    #[must_use]
    pub fn fall_distance(&self, column: usize, level: i32) -> i32 {
        let levels = &self.levels[column];
        let below = levels.partition_point(|&l| l <= level);
        let obstruction = levels.get(below).copied().unwrap_or(self.height);
        obstruction - 1 - level
    }

    /// Distance the whole piece falls: the minimum over its blocks.
    pub fn drop_distance<I>(&self, geometry: &BoardGeometry, cells: I) -> i32
    where
        I: IntoIterator<Item = Coord>,
    {
        cells
            .into_iter()
            .map(|c| self.fall_distance(geometry.column_index(&c), c[self.gravity_axis]))
            .min()
            .unwrap_or(0)
    }
}

/// Valid pivot range `(axis, lo, hi)` on each lateral axis, or `None` when
/// the orientation does not fit between the walls.
fn lateral_ranges(
    geometry: &BoardGeometry,
    orientation: &Orientation,
) -> Option<Vec<(usize, i32, i32)>> {
    geometry
        .lateral_axes()
        .iter()
        .map(|&axis| {
            let extent = i32::try_from(geometry.extent(axis)).unwrap_or(i32::MAX);
            let lo = -orientation.min_offset(axis);
            let hi = extent - 1 - orientation.max_offset(axis);
            (lo <= hi).then_some((axis, lo, hi))
        })
        .collect()
}

/// Cartesian product of the lateral ranges, as full pivots.
///
/// The gravity component is set to `spawn_level` on every pivot.
fn lateral_pivots(
    geometry: &BoardGeometry,
    ranges: Vec<(usize, i32, i32)>,
    spawn_level: i32,
) -> impl Iterator<Item = Coord> {
    let mut first = (0..geometry.dimension()).map(|_| 0).collect::<Coord>();
    first[geometry.gravity_axis()] = spawn_level;
    for &(axis, lo, _) in &ranges {
        first[axis] = lo;
    }
    iter::successors(Some(first), move |current| {
        let mut next = current.clone();
        for &(axis, lo, hi) in &ranges {
            if next[axis] < hi {
                next[axis] += 1;
                return Some(next);
            }
            next[axis] = lo;
        }
        None
    })
}

/// Enumerates settled placements of every orientation, at most `cap` of them.
///
/// Each placement is legal on `board` and resting: moving it one more layer
/// along gravity would collide.
pub fn settled_placements<'a>(
    board: &'a Board,
    index: &'a ColumnIndex,
    orientations: &'a [Orientation],
    cap: usize,
) -> impl Iterator<Item = Placement> + 'a {
    let geometry = board.geometry();
    let gravity = geometry.gravity_axis();
    orientations
        .iter()
        .filter_map(move |orientation| {
            let ranges = lateral_ranges(geometry, orientation)?;
            let spawn_level = -orientation.max_offset(gravity) - 1;
            let pivots = lateral_pivots(geometry, ranges, spawn_level);
            Some(pivots.map(move |pivot| (orientation, pivot)))
        })
        .flatten()
        .filter_map(move |(orientation, mut pivot)| {
            if board.is_colliding(orientation.cells_at(&pivot)) {
                return None;
            }
            let distance = index.drop_distance(geometry, orientation.cells_at(&pivot));
            pivot[gravity] += distance;
            Some(Placement::new(orientation.clone(), pivot))
        })
        .take(cap)
}

#[cfg(test)]
mod tests {
    use ndtris_engine::{coord, rotation_steps};

    use super::*;

    fn mono() -> Orientation {
        Orientation::new([coord(&[0, 0])])
    }

    fn is_settled(board: &Board, placement: &Placement) -> bool {
        let gravity = board.geometry().gravity_axis();
        !board.is_colliding(placement.cells())
            && board.is_colliding(placement.translated(gravity, 1).cells())
    }

    #[test]
    fn test_fall_distance_uses_nearest_obstruction() {
        let board = Board::from_ascii(
            "
            ...
            ...
            #..
            ...
            #.#
            ",
        );
        let index = ColumnIndex::new(&board);
        assert_eq!(index.top(0), Some(2));
        assert_eq!(index.top(1), None);
        assert_eq!(index.fall_distance(0, -1), 2);
        assert_eq!(index.fall_distance(0, 3), 0);
        assert_eq!(index.fall_distance(1, -2), 6);
        assert_eq!(index.fall_distance(2, 0), 3);
    }

    #[test]
    fn test_mono_lands_on_every_column() {
        let board = Board::from_ascii(
            "
            ....
            ....
            .#..
            ##.#
            ",
        );
        let index = ColumnIndex::new(&board);
        let orientations = [mono()];
        let placements = settled_placements(&board, &index, &orientations, usize::MAX)
            .collect::<Vec<_>>();
        let landed = placements
            .iter()
            .map(|p| (p.pivot()[0], p.pivot()[1]))
            .collect::<Vec<_>>();
        assert_eq!(landed, vec![(0, 2), (1, 1), (2, 3), (3, 2)]);
    }

    #[test]
    fn test_every_candidate_is_settled() {
        let board = Board::from_ascii(
            "
            ......
            ......
            ......
            ..#...
            #.##..
            ##.###
            ",
        );
        let t = Orientation::new([
            coord(&[-1, 0]),
            coord(&[0, 0]),
            coord(&[1, 0]),
            coord(&[0, -1]),
        ]);
        let orientations = iter::successors(Some(t), |o| Some(o.rotated(rotation_steps(2, 1)[0])))
            .take(4)
            .collect::<Vec<_>>();
        let index = ColumnIndex::new(&board);
        let placements = settled_placements(&board, &index, &orientations, usize::MAX)
            .collect::<Vec<_>>();
        // 4 positions for each flat orientation, 5 for each upright one
        assert_eq!(placements.len(), 18);
        for placement in &placements {
            assert!(is_settled(&board, placement), "{placement:?}");
        }
    }

    #[test]
    fn test_too_wide_orientation_is_skipped() {
        let board = Board::from_ascii(
            "
            ...
            ...
            ",
        );
        let bar = Orientation::new((0..4).map(|x| coord(&[x, 0])));
        let orientations = [bar, mono()];
        let index = ColumnIndex::new(&board);
        let placements = settled_placements(&board, &index, &orientations, usize::MAX)
            .collect::<Vec<_>>();
        assert_eq!(placements.len(), 3);
        assert!(placements.iter().all(|p| p.orientation() == &mono()));
    }

    #[test]
    fn test_cap_stops_enumeration() {
        let geometry = BoardGeometry::new(&[4, 6, 4], 1).unwrap();
        let board = Board::new(geometry);
        let index = ColumnIndex::new(&board);
        let orientations = [Orientation::new([coord(&[0, 0, 0])])];
        assert_eq!(
            settled_placements(&board, &index, &orientations, usize::MAX).count(),
            16
        );
        assert_eq!(settled_placements(&board, &index, &orientations, 5).count(), 5);
        for placement in settled_placements(&board, &index, &orientations, usize::MAX) {
            assert_eq!(placement.pivot()[1], 5);
            assert!(is_settled(&board, &placement));
        }
    }
}
