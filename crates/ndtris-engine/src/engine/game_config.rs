use serde::{Deserialize, Serialize};

use crate::{
    GeometryError,
    core::{BoardGeometry, Shape, ShapeSet},
};

/// Board shape, speed and piece set of one session.
///
/// The geometry is fixed for the lifetime of the session built from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameConfig {
    /// Extent of every axis.
    pub dims: Vec<usize>,
    pub gravity_axis: usize,
    /// Base gravity level; the session adds one level per 10 cleared layers.
    pub speed_level: usize,
    pub shape_set: ShapeSet,
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            dims: vec![10, 20],
            gravity_axis: 1,
            speed_level: 0,
            shape_set: ShapeSet::Standard,
            seed: 0,
        }
    }
}

impl GameConfig {
    pub fn geometry(&self) -> Result<BoardGeometry, GeometryError> {
        BoardGeometry::new(&self.dims, self.gravity_axis)
    }

    /// Shapes of the configured set that fit the board.
    pub fn shapes(&self, geometry: &BoardGeometry) -> Result<Vec<Shape>, GeometryError> {
        let shapes = self.shape_set.shapes(geometry);
        if shapes.is_empty() {
            return Err(GeometryError::NoShapes {
                shape_set: self.shape_set,
                dimension: geometry.dimension(),
            });
        }
        Ok(shapes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_config() {
        let json = r#"{
            "dims": [5, 12, 5],
            "gravity_axis": 1,
            "speed_level": 3,
            "shape_set": "debug",
            "seed": 11
        }"#;
        let config: GameConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.shape_set, ShapeSet::Debug);
        let geometry = config.geometry().unwrap();
        assert_eq!(geometry.column_count(), 25);
        assert_eq!(config.shapes(&geometry).unwrap().len(), 2);
    }

    #[test]
    fn test_rejects_unknown_fields_and_bad_geometry() {
        let json = r#"{"dims": [4, 4], "gravity_axis": 1, "speed_level": 0,
            "shape_set": "standard", "seed": 0, "hold": true}"#;
        assert!(serde_json::from_str::<GameConfig>(json).is_err());

        let config = GameConfig {
            gravity_axis: 2,
            ..GameConfig::default()
        };
        assert!(config.geometry().is_err());
    }
}
