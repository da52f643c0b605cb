use std::collections::{HashMap, VecDeque};

use ndtris_engine::{Orientation, RotationStep, rotation_steps};

use crate::config::SearchBounds;

/// Shortest sequence of atomic rotations between two orientations.
///
/// Searches the same rotation graph as
/// [`enumerate_orientations`](crate::orientation::enumerate_orientations),
/// with the same bounds.
#[derive(Debug, Clone, Copy)]
pub struct RotationPathFinder {
    bounds: SearchBounds,
}

impl RotationPathFinder {
    #[must_use]
    pub fn new(bounds: SearchBounds) -> Self {
        Self { bounds }
    }

    /// Steps turning `start` into `target`.
    ///
    /// Empty when the orientations are equal, and also when `target` is not
    /// reachable within the bounds.
    #[must_use]
    pub fn path(
        &self,
        start: &Orientation,
        target: &Orientation,
        dimension: usize,
        gravity_axis: usize,
    ) -> Vec<RotationStep> {
        if start == target {
            return vec![];
        }
        let steps = rotation_steps(dimension, gravity_axis);
        let mut parents = HashMap::<Orientation, Option<(Orientation, RotationStep)>>::new();
        parents.insert(start.clone(), None);
        let mut queue = VecDeque::from([(start.clone(), 0)]);

        while let Some((orientation, depth)) = queue.pop_front() {
            if depth >= self.bounds.max_depth {
                continue;
            }
            for &step in &steps {
                let next = orientation.rotated(step);
                if parents.contains_key(&next) {
                    continue;
                }
                if parents.len() >= self.bounds.max_states {
                    log::trace!("rotation search hit the state bound");
                    return vec![];
                }
                parents.insert(next.clone(), Some((orientation.clone(), step)));
                if &next == target {
                    return reconstruct(&parents, target);
                }
                queue.push_back((next, depth + 1));
            }
        }
        vec![]
    }
}

fn reconstruct(
    parents: &HashMap<Orientation, Option<(Orientation, RotationStep)>>,
    target: &Orientation,
) -> Vec<RotationStep> {
    let mut path = vec![];
    let mut current = target;
    while let Some(Some((parent, step))) = parents.get(current) {
        path.push(*step);
        current = parent;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use ndtris_engine::{BoardGeometry, ShapeSet, coord};

    use super::*;
    use crate::orientation::enumerate_orientations;

    const BOUNDS: SearchBounds = SearchBounds {
        max_depth: 8,
        max_states: 1000,
    };

    #[test]
    fn test_empty_for_same_orientation() {
        let l = Orientation::new([coord(&[0, 0]), coord(&[1, 0]), coord(&[0, 1])]);
        assert!(RotationPathFinder::new(BOUNDS).path(&l, &l, 2, 1).is_empty());
    }

    fn assert_paths_reach_targets(geometry: &BoardGeometry, names: &[&str]) {
        let dimension = geometry.dimension();
        let gravity = geometry.gravity_axis();
        let finder = RotationPathFinder::new(BOUNDS);
        for shape in ShapeSet::Standard.shapes(geometry) {
            if !names.contains(&shape.name()) {
                continue;
            }
            let start = shape.blocks();
            for target in enumerate_orientations(start, dimension, gravity, BOUNDS) {
                let path = finder.path(start, &target, dimension, gravity);
                let reached = path
                    .iter()
                    .fold(start.clone(), |orientation, &step| orientation.rotated(step));
                assert_eq!(reached, target, "{} -> {target}", shape.name());
            }
        }
    }

    #[test]
    fn test_path_reproduces_target() {
        let g3 = BoardGeometry::new(&[5, 12, 5], 1).unwrap();
        assert_paths_reach_targets(&g3, &["I", "T", "S", "Branch", "ScrewL", "ScrewR"]);
        let g4 = BoardGeometry::new(&[4, 10, 4, 4], 1).unwrap();
        assert_paths_reach_targets(&g4, &["Branch4"]);
    }

    #[test]
    fn test_half_turn_takes_two_steps() {
        let bar = Orientation::new([coord(&[-1, 0]), coord(&[0, 0]), coord(&[2, 0])]);
        let flipped = Orientation::new([coord(&[1, 0]), coord(&[0, 0]), coord(&[-2, 0])]);
        let path = RotationPathFinder::new(BOUNDS).path(&bar, &flipped, 2, 1);
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_unreachable_target_is_empty() {
        let bar = Orientation::new([coord(&[0, 0]), coord(&[1, 0])]);
        let longer = Orientation::new([coord(&[0, 0]), coord(&[2, 0])]);
        assert!(RotationPathFinder::new(BOUNDS).path(&bar, &longer, 2, 1).is_empty());

        let screw = Orientation::new([
            coord(&[0, 0, 0]),
            coord(&[1, 0, 0]),
            coord(&[0, 0, 1]),
            coord(&[0, 1, 1]),
        ]);
        let far = enumerate_orientations(&screw, 3, 1, BOUNDS)
            .pop()
            .unwrap();
        let shallow = RotationPathFinder::new(SearchBounds {
            max_depth: 1,
            max_states: 1000,
        });
        assert!(shallow.path(&screw, &far, 3, 1).is_empty());
    }
}
