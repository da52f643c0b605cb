//! Distinct reachable rotations of a piece.
//!
//! Orientations are the nodes of a graph whose edges are the atomic rotation
//! steps of the board (see [`rotation_steps`]). A bounded BFS from the current
//! orientation visits every distinct canonical orientation within the depth and
//! state limits of the dimension bucket.

use std::{
    collections::{HashMap, HashSet, VecDeque},
    rc::Rc,
};

use ndtris_engine::{Orientation, rotation_steps};

use crate::config::SearchBounds;

/// Enumerates the orientations reachable from `base` by rotation.
///
/// The result starts with `base` itself and contains no duplicates; it is in
/// BFS order, so every orientation is one step away from an earlier one.
#[must_use]
pub fn enumerate_orientations(
    base: &Orientation,
    dimension: usize,
    gravity_axis: usize,
    bounds: SearchBounds,
) -> Vec<Orientation> {
    let steps = rotation_steps(dimension, gravity_axis);
    let mut visited = HashSet::from([base.clone()]);
    let mut order = vec![base.clone()];
    let mut queue = VecDeque::from([(base.clone(), 0)]);

    'search: while let Some((orientation, depth)) = queue.pop_front() {
        if depth >= bounds.max_depth {
            continue;
        }
        for &step in &steps {
            if order.len() >= bounds.max_states {
                break 'search;
            }
            let next = orientation.rotated(step);
            if visited.insert(next.clone()) {
                order.push(next.clone());
                queue.push_back((next, depth + 1));
            }
        }
    }

    log::trace!(
        "enumerated {} orientations of {base} ({dimension} axes)",
        order.len()
    );
    order
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct OrientationKey {
    orientation: Orientation,
    dimension: usize,
    gravity_axis: usize,
    bounds: (usize, usize),
}

impl OrientationKey {
    fn with_orientation(&self, orientation: Orientation) -> Self {
        Self {
            orientation,
            ..self.clone()
        }
    }
}

/// Memoized orientation sets, flushed as a whole when full.
///
/// A set is stored once per shape, under its smallest orientation; every
/// member of the set is an alias of that entry, so any rotation of a cached
/// shape is a hit.
#[derive(Debug)]
pub struct OrientationCache {
    entries: HashMap<OrientationKey, Rc<[Orientation]>>,
    aliases: HashMap<OrientationKey, OrientationKey>,
    capacity: usize,
}

impl OrientationCache {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            aliases: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Number of cached shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.aliases.clear();
    }

    /// Returns the orientation set of the shape `orientation` belongs to,
    /// computing it on first use.
    ///
    /// A freshly computed set starts with `orientation`; a cached one starts
    /// with whichever rotation of the shape was seen first.
    pub fn get_or_compute(
        &mut self,
        orientation: &Orientation,
        dimension: usize,
        gravity_axis: usize,
        bounds: SearchBounds,
    ) -> Rc<[Orientation]> {
        let key = OrientationKey {
            orientation: orientation.clone(),
            dimension,
            gravity_axis,
            bounds: (bounds.max_depth, bounds.max_states),
        };
        if let Some(orientations) = self
            .aliases
            .get(&key)
            .and_then(|shape_key| self.entries.get(shape_key))
        {
            return Rc::clone(orientations);
        }
        if self.entries.len() >= self.capacity {
            log::debug!(
                "orientation cache full ({} shapes), flushing",
                self.entries.len()
            );
            self.clear();
        }
        let orientations: Rc<[Orientation]> =
            enumerate_orientations(orientation, dimension, gravity_axis, bounds).into();
        let canonical = orientations.iter().min().unwrap_or(orientation).clone();
        let shape_key = key.with_orientation(canonical);
        for member in &*orientations {
            self.aliases
                .insert(key.with_orientation(member.clone()), shape_key.clone());
        }
        self.entries.insert(shape_key, Rc::clone(&orientations));
        orientations
    }
}

#[cfg(test)]
mod tests {
    use ndtris_engine::{BoardGeometry, ShapeSet};

    use super::*;

    const WIDE: SearchBounds = SearchBounds {
        max_depth: 8,
        max_states: 1000,
    };

    fn shape(geometry: &BoardGeometry, name: &str) -> Orientation {
        ShapeSet::Standard
            .shapes(geometry)
            .into_iter()
            .find(|s| s.name() == name)
            .unwrap()
            .blocks()
            .clone()
    }

    #[test]
    fn test_identity_first_and_distinct() {
        let geometry = BoardGeometry::new(&[10, 20], 1).unwrap();
        let t = shape(&geometry, "T");
        let orientations = enumerate_orientations(&t, 2, 1, WIDE);
        assert_eq!(orientations[0], t);
        assert_eq!(orientations.len(), 4);
        let unique = orientations.iter().collect::<HashSet<_>>();
        assert_eq!(unique.len(), orientations.len());
    }

    #[test]
    fn test_every_orientation_links_back() {
        let geometry = BoardGeometry::new(&[5, 12, 5], 1).unwrap();
        let screw = shape(&geometry, "ScrewL");
        let orientations = enumerate_orientations(&screw, 3, 1, WIDE);
        assert_eq!(orientations.len(), 24);
        for (i, orientation) in orientations.iter().enumerate().skip(1) {
            let linked = rotation_steps(3, 1).into_iter().any(|step| {
                let back = orientation.rotated(step.inverse());
                orientations[..i].contains(&back)
            });
            assert!(linked, "orientation {i} is not reachable from earlier ones");
        }
    }

    #[test]
    fn test_bounds_limit_the_search() {
        let geometry = BoardGeometry::new(&[4, 10, 4, 4], 1).unwrap();
        let branch = shape(&geometry, "Branch4");
        let capped = enumerate_orientations(
            &branch,
            4,
            1,
            SearchBounds {
                max_depth: 8,
                max_states: 10,
            },
        );
        assert_eq!(capped.len(), 10);
        let shallow = enumerate_orientations(
            &branch,
            4,
            1,
            SearchBounds {
                max_depth: 0,
                max_states: 10,
            },
        );
        assert_eq!(shallow, vec![branch]);
    }

    #[test]
    fn test_orientation_counts_about_pivot() {
        let geometry = BoardGeometry::new(&[10, 20], 1).unwrap();
        let o = shape(&geometry, "O");
        // rotation is about the pivot, so the square still moves around it
        assert_eq!(enumerate_orientations(&o, 2, 1, WIDE).len(), 4);
        let mono = Orientation::new([ndtris_engine::coord(&[0, 0])]);
        assert_eq!(enumerate_orientations(&mono, 2, 1, WIDE).len(), 1);
    }

    #[test]
    fn test_cache_reuses_and_flushes() {
        let geometry = BoardGeometry::new(&[10, 20], 1).unwrap();
        let mut cache = OrientationCache::new(2);
        let t = shape(&geometry, "T");
        let first = cache.get_or_compute(&t, 2, 1, WIDE);
        let second = cache.get_or_compute(&t, 2, 1, WIDE);
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        cache.get_or_compute(&shape(&geometry, "I"), 2, 1, WIDE);
        assert_eq!(cache.len(), 2);
        cache.get_or_compute(&shape(&geometry, "S"), 2, 1, WIDE);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_rotations_share_one_entry() {
        let geometry = BoardGeometry::new(&[5, 12, 5], 1).unwrap();
        let mut cache = OrientationCache::new(4);
        let screw = shape(&geometry, "ScrewL");
        let first = cache.get_or_compute(&screw, 3, 1, WIDE);
        for rotated in first.iter() {
            let again = cache.get_or_compute(rotated, 3, 1, WIDE);
            assert!(Rc::ptr_eq(&first, &again));
        }
        assert_eq!(cache.len(), 1);

        // other bounds are another entry
        let narrow = SearchBounds {
            max_depth: 1,
            max_states: 4,
        };
        cache.get_or_compute(&first[1], 3, 1, narrow);
        assert_eq!(cache.len(), 2);
    }
}
