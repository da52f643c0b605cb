use serde::{Deserialize, Serialize};

use super::{
    board::CellId,
    geometry::{BoardGeometry, Coord, Orientation},
};

/// Catalog a game draws its pieces from.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum ShapeSet {
    /// Tetrominoes, plus non-planar tetracubes on boards with 3 or more axes.
    #[default]
    #[display("standard")]
    Standard,
    /// Monocube and domino; clears layers quickly, used for regression runs.
    #[display("debug")]
    Debug,
}

/// Template blocks are written over the axes `[lateral0, gravity, lateral1, lateral2, ...]`,
/// so a 2D drawing (x right, y down) lands in the first lateral plane with y falling.
struct ShapeTemplate {
    name: &'static str,
    min_dimension: usize,
    blocks: &'static [[i32; 4]],
}

const STANDARD_TEMPLATES: &[ShapeTemplate] = &[
    ShapeTemplate {
        name: "I",
        min_dimension: 2,
        blocks: &[[-1, 0, 0, 0], [0, 0, 0, 0], [1, 0, 0, 0], [2, 0, 0, 0]],
    },
    ShapeTemplate {
        name: "O",
        min_dimension: 2,
        blocks: &[[0, 0, 0, 0], [1, 0, 0, 0], [0, 1, 0, 0], [1, 1, 0, 0]],
    },
    ShapeTemplate {
        name: "S",
        min_dimension: 2,
        blocks: &[[0, 0, 0, 0], [1, 0, 0, 0], [-1, 1, 0, 0], [0, 1, 0, 0]],
    },
    ShapeTemplate {
        name: "Z",
        min_dimension: 2,
        blocks: &[[-1, 0, 0, 0], [0, 0, 0, 0], [0, 1, 0, 0], [1, 1, 0, 0]],
    },
    ShapeTemplate {
        name: "J",
        min_dimension: 2,
        blocks: &[[-1, 0, 0, 0], [0, 0, 0, 0], [1, 0, 0, 0], [1, 1, 0, 0]],
    },
    ShapeTemplate {
        name: "L",
        min_dimension: 2,
        blocks: &[[-1, 0, 0, 0], [0, 0, 0, 0], [1, 0, 0, 0], [-1, 1, 0, 0]],
    },
    ShapeTemplate {
        name: "T",
        min_dimension: 2,
        blocks: &[[-1, 0, 0, 0], [0, 0, 0, 0], [1, 0, 0, 0], [0, 1, 0, 0]],
    },
    ShapeTemplate {
        name: "Branch",
        min_dimension: 3,
        blocks: &[[0, 0, 0, 0], [1, 0, 0, 0], [0, 0, 1, 0], [0, 1, 0, 0]],
    },
    ShapeTemplate {
        name: "ScrewL",
        min_dimension: 3,
        blocks: &[[0, 0, 0, 0], [1, 0, 0, 0], [0, 0, 1, 0], [0, 1, 1, 0]],
    },
    ShapeTemplate {
        name: "ScrewR",
        min_dimension: 3,
        blocks: &[[0, 0, 0, 0], [1, 0, 0, 0], [0, 0, 1, 0], [1, 1, 0, 0]],
    },
    ShapeTemplate {
        name: "Branch4",
        min_dimension: 4,
        blocks: &[[0, 0, 0, 0], [1, 0, 0, 0], [0, 0, 1, 0], [0, 0, 0, 1]],
    },
];

const DEBUG_TEMPLATES: &[ShapeTemplate] = &[
    ShapeTemplate {
        name: "Mono",
        min_dimension: 2,
        blocks: &[[0, 0, 0, 0]],
    },
    ShapeTemplate {
        name: "Domino",
        min_dimension: 2,
        blocks: &[[0, 0, 0, 0], [1, 0, 0, 0]],
    },
];

/// A piece shape in its spawn orientation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    id: CellId,
    name: &'static str,
    blocks: Orientation,
}

impl Shape {
    /// Identifier written into the board cells this shape locks into (never zero).
    #[must_use]
    pub fn id(&self) -> CellId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Spawn orientation of the shape.
    #[must_use]
    pub fn blocks(&self) -> &Orientation {
        &self.blocks
    }
}

impl ShapeSet {
    /// Shapes of this set that fit the dimensionality of `geometry`.
    #[must_use]
    pub fn shapes(self, geometry: &BoardGeometry) -> Vec<Shape> {
        let templates = match self {
            Self::Standard => STANDARD_TEMPLATES,
            Self::Debug => DEBUG_TEMPLATES,
        };
        templates
            .iter()
            .filter(|t| t.min_dimension <= geometry.dimension())
            .zip(1..)
            .map(|(template, id)| Shape {
                id,
                name: template.name,
                blocks: Orientation::new(
                    template
                        .blocks
                        .iter()
                        .map(|block| embed_template_block(block, geometry)),
                ),
            })
            .collect()
    }
}

fn embed_template_block(block: &[i32; 4], geometry: &BoardGeometry) -> Coord {
    let mut c = (0..geometry.dimension()).map(|_| 0).collect::<Coord>();
    let lateral = geometry.lateral_axes();
    for (k, &value) in block.iter().enumerate() {
        let axis = match k {
            0 => lateral.first().copied(),
            1 => Some(geometry.gravity_axis()),
            _ => lateral.get(k - 1).copied(),
        };
        if let Some(axis) = axis {
            c[axis] = value;
        }
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::coord;

    #[test]
    fn test_shape_counts_by_dimension() {
        let g2 = BoardGeometry::new(&[10, 20], 1).unwrap();
        let g3 = BoardGeometry::new(&[5, 12, 5], 1).unwrap();
        let g4 = BoardGeometry::new(&[4, 10, 4, 4], 1).unwrap();
        assert_eq!(ShapeSet::Standard.shapes(&g2).len(), 7);
        assert_eq!(ShapeSet::Standard.shapes(&g3).len(), 10);
        assert_eq!(ShapeSet::Standard.shapes(&g4).len(), 11);
        assert_eq!(ShapeSet::Debug.shapes(&g4).len(), 2);
    }

    #[test]
    fn test_shape_ids_are_nonzero_and_unique() {
        let g3 = BoardGeometry::new(&[5, 12, 5], 1).unwrap();
        let shapes = ShapeSet::Standard.shapes(&g3);
        for (i, shape) in shapes.iter().enumerate() {
            assert_eq!(usize::from(shape.id()), i + 1);
            assert_eq!(shape.blocks().len(), 4);
        }
    }

    #[test]
    fn test_template_embedding_follows_gravity_axis() {
        // gravity along axis 0: the template's "down" lands on axis 0
        let geometry = BoardGeometry::new(&[20, 10], 0).unwrap();
        let shapes = ShapeSet::Standard.shapes(&geometry);
        let t = shapes.iter().find(|s| s.name() == "T").unwrap();
        assert!(t.blocks().blocks().contains(&coord(&[1, 0])));
        assert!(t.blocks().blocks().contains(&coord(&[0, -1])));
    }

    #[test]
    fn test_shape_set_parses_case_insensitively() {
        assert_eq!("debug".parse::<ShapeSet>().unwrap(), ShapeSet::Debug);
        assert_eq!("Standard".parse::<ShapeSet>().unwrap(), ShapeSet::Standard);
        assert_eq!(ShapeSet::Debug.to_string(), "debug");
    }
}
