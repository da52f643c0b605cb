use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::GeometryError;

/// Maximum number of board axes supported by the engine.
pub const MAX_DIMENSIONS: usize = 6;

/// Maximum extent of a single board axis.
const MAX_EXTENT: usize = 1 << 12;

/// Maximum number of cells of a whole board.
const MAX_CELLS: usize = 1 << 24;

/// An integer coordinate (or offset) with one component per board axis.
pub type Coord = ArrayVec<i32, MAX_DIMENSIONS>;

/// Builds a [`Coord`] from a slice.
///
/// # Panics
///
/// Panics if `values` has more than [`MAX_DIMENSIONS`] components.
#[must_use]
pub fn coord(values: &[i32]) -> Coord {
    values.iter().copied().collect()
}

/// Shape of a board: the extent of every axis and which axis gravity acts along.
///
/// Cells are indexed layer-major: all cells sharing a gravity coordinate are
/// contiguous, and the lateral coordinates form a mixed-radix "column index"
/// (first lateral axis varies fastest).
///
/// Gravity coordinate `0` is the topmost visible layer; coordinates increase in
/// the falling direction. Negative gravity coordinates are above the visible
/// ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoardGeometry {
    dims: ArrayVec<usize, MAX_DIMENSIONS>,
    gravity_axis: usize,
    lateral_axes: ArrayVec<usize, MAX_DIMENSIONS>,
    column_strides: ArrayVec<usize, MAX_DIMENSIONS>,
    column_count: usize,
}

impl BoardGeometry {
    pub fn new(dims: &[usize], gravity_axis: usize) -> Result<Self, GeometryError> {
        let dimension = dims.len();
        if !(2..=MAX_DIMENSIONS).contains(&dimension) {
            return Err(GeometryError::UnsupportedDimension {
                dimension,
                max: MAX_DIMENSIONS,
            });
        }
        if gravity_axis >= dimension {
            return Err(GeometryError::GravityAxisOutOfRange {
                gravity_axis,
                dimension,
            });
        }
        for (axis, &extent) in dims.iter().enumerate() {
            if extent == 0 {
                return Err(GeometryError::EmptyAxis { axis });
            }
            if extent > MAX_EXTENT {
                return Err(GeometryError::AxisTooLarge { axis, extent });
            }
        }

        let lateral_axes = (0..dimension)
            .filter(|&axis| axis != gravity_axis)
            .collect::<ArrayVec<_, MAX_DIMENSIONS>>();
        let mut column_strides = (0..dimension)
            .map(|_| 0)
            .collect::<ArrayVec<_, MAX_DIMENSIONS>>();
        let mut column_count: usize = 1;
        for &axis in &lateral_axes {
            column_strides[axis] = column_count;
            column_count = column_count
                .checked_mul(dims[axis])
                .filter(|&n| n <= MAX_CELLS)
                .ok_or(GeometryError::TooManyCells { limit: MAX_CELLS })?;
        }
        if column_count * dims[gravity_axis] > MAX_CELLS {
            return Err(GeometryError::TooManyCells { limit: MAX_CELLS });
        }

        Ok(Self {
            dims: dims.iter().copied().collect(),
            gravity_axis,
            lateral_axes,
            column_strides,
            column_count,
        })
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dims.len()
    }

    #[must_use]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[must_use]
    pub fn extent(&self, axis: usize) -> usize {
        self.dims[axis]
    }

    #[must_use]
    pub fn gravity_axis(&self) -> usize {
        self.gravity_axis
    }

    /// Extent along the gravity axis (number of layers).
    #[must_use]
    pub fn height(&self) -> usize {
        self.dims[self.gravity_axis]
    }

    /// All axes except the gravity axis, in ascending order.
    #[must_use]
    pub fn lateral_axes(&self) -> &[usize] {
        &self.lateral_axes
    }

    /// Number of lateral columns, which is also the number of cells in one layer.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.column_count * self.height()
    }

    #[must_use]
    pub fn is_lateral_in_bounds(&self, c: &Coord) -> bool {
        self.lateral_axes
            .iter()
            .all(|&axis| in_extent(c[axis], self.dims[axis]))
    }

    #[must_use]
    pub fn in_bounds(&self, c: &Coord) -> bool {
        c.len() == self.dimension()
            && in_extent(c[self.gravity_axis], self.height())
            && self.is_lateral_in_bounds(c)
    }

    /// Column index of a coordinate whose lateral components are in bounds.
    #[expect(clippy::cast_sign_loss)]
    #[must_use]
    pub fn column_index(&self, c: &Coord) -> usize {
        debug_assert!(self.is_lateral_in_bounds(c));
        self.lateral_axes
            .iter()
            .map(|&axis| c[axis] as usize * self.column_strides[axis])
            .sum()
    }

    /// Flat cell index of an in-bounds coordinate.
    #[expect(clippy::cast_sign_loss)]
    #[must_use]
    pub fn cell_index(&self, c: &Coord) -> Option<usize> {
        if !self.in_bounds(c) {
            return None;
        }
        let level = c[self.gravity_axis] as usize;
        Some(level * self.column_count + self.column_index(c))
    }

    /// Columns adjacent to `column` in the positive direction of each lateral axis.
    pub fn forward_neighbors(&self, column: usize) -> impl Iterator<Item = usize> + '_ {
        self.lateral_axes.iter().filter_map(move |&axis| {
            let stride = self.column_strides[axis];
            let position = (column / stride) % self.dims[axis];
            (position + 1 < self.dims[axis]).then_some(column + stride)
        })
    }
}

fn in_extent(value: i32, extent: usize) -> bool {
    usize::try_from(value).is_ok_and(|v| v < extent)
}

/// Direction of a quarter turn within a rotation plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RotationDirection {
    Positive,
    Negative,
}

impl RotationDirection {
    #[must_use]
    pub fn sign(self) -> i32 {
        match self {
            Self::Positive => 1,
            Self::Negative => -1,
        }
    }

    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Self::Positive => Self::Negative,
            Self::Negative => Self::Positive,
        }
    }
}

/// One atomic 90° rotation in the plane spanned by `axis_a` and `axis_b`.
///
/// A positive turn maps `(a, b)` to `(-b, a)`; a negative turn maps `(a, b)` to `(b, -a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RotationStep {
    pub axis_a: usize,
    pub axis_b: usize,
    pub direction: RotationDirection,
}

impl RotationStep {
    #[must_use]
    pub const fn new(axis_a: usize, axis_b: usize, direction: RotationDirection) -> Self {
        Self {
            axis_a,
            axis_b,
            direction,
        }
    }

    #[must_use]
    pub fn inverse(self) -> Self {
        Self {
            direction: self.direction.reversed(),
            ..self
        }
    }

    #[must_use]
    pub fn apply(self, c: &Coord) -> Coord {
        let mut rotated = c.clone();
        let (a, b) = (c[self.axis_a], c[self.axis_b]);
        match self.direction {
            RotationDirection::Positive => {
                rotated[self.axis_a] = -b;
                rotated[self.axis_b] = a;
            }
            RotationDirection::Negative => {
                rotated[self.axis_a] = b;
                rotated[self.axis_b] = -a;
            }
        }
        rotated
    }
}

impl fmt::Display for RotationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = match self.direction {
            RotationDirection::Positive => '+',
            RotationDirection::Negative => '-',
        };
        write!(f, "r{}{}{sign}", self.axis_a, self.axis_b)
    }
}

/// Rotation planes a piece may turn in.
///
/// A 3-axis board uses exactly three planes derived from the gravity axis: the
/// lateral plane first, then each lateral axis paired with gravity. Every other
/// dimensionality uses every unordered axis pair.
#[must_use]
pub fn rotation_planes(dimension: usize, gravity_axis: usize) -> Vec<(usize, usize)> {
    if dimension == 3 {
        let mut lateral = (0..3).filter(|&axis| axis != gravity_axis);
        if let (Some(l0), Some(l1)) = (lateral.next(), lateral.next()) {
            return vec![(l0, l1), (l0, gravity_axis), (l1, gravity_axis)];
        }
    }
    (0..dimension)
        .flat_map(|a| (a + 1..dimension).map(move |b| (a, b)))
        .collect()
}

/// Every atomic rotation step (both directions of every plane), in a stable order.
#[must_use]
pub fn rotation_steps(dimension: usize, gravity_axis: usize) -> Vec<RotationStep> {
    rotation_planes(dimension, gravity_axis)
        .into_iter()
        .flat_map(|(a, b)| {
            [RotationDirection::Positive, RotationDirection::Negative]
                .map(|direction| RotationStep::new(a, b, direction))
        })
        .collect()
}

/// A canonical set of block offsets relative to a pivot.
///
/// Offsets are kept sorted lexicographically and deduplicated, so two
/// orientations are equal exactly when they cover the same offsets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Orientation {
    blocks: Vec<Coord>,
}

impl Orientation {
    #[must_use]
    pub fn new<I>(blocks: I) -> Self
    where
        I: IntoIterator<Item = Coord>,
    {
        let mut blocks = blocks.into_iter().collect::<Vec<_>>();
        blocks.sort();
        blocks.dedup();
        Self { blocks }
    }

    #[must_use]
    pub fn blocks(&self) -> &[Coord] {
        &self.blocks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    #[must_use]
    pub fn rotated(&self, step: RotationStep) -> Self {
        Self::new(self.blocks.iter().map(|b| step.apply(b)))
    }

    #[must_use]
    pub fn min_offset(&self, axis: usize) -> i32 {
        self.blocks.iter().map(|b| b[axis]).min().unwrap_or(0)
    }

    #[must_use]
    pub fn max_offset(&self, axis: usize) -> i32 {
        self.blocks.iter().map(|b| b[axis]).max().unwrap_or(0)
    }

    /// Absolute cells covered when the pivot sits at `pivot`.
    pub fn cells_at<'a>(&'a self, pivot: &'a Coord) -> impl Iterator<Item = Coord> + 'a {
        self.blocks
            .iter()
            .map(move |b| b.iter().zip(pivot).map(|(o, p)| o + p).collect())
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "(")?;
            for (j, v) in block.iter().enumerate() {
                if j > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{v}")?;
            }
            write!(f, ")")?;
        }
        write!(f, "]")
    }
}
