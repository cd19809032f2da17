//! Detector - sort and sweep broadphase feeding the SAT narrowphase
//!
//! Bodies are kept sorted by `bounds.min.x` between calls, so the sort is
//! nearly free when little moved. The sweep stops scanning for partners of a
//! body as soon as one starts beyond its right edge.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::ids::BodyHandle;
use crate::domain::body::Bodies;
use crate::systems::collision::{collides, Collision};
use crate::systems::pairs::Pairs;

#[derive(Clone, Debug, Default)]
pub struct Detector {
    bodies: Vec<BodyHandle>,
}

impl Detector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bodies(&self) -> &[BodyHandle] {
        &self.bodies
    }

    /// Replace the tracked bodies (top level bodies, not parts)
    pub fn set_bodies(&mut self, bodies: &[BodyHandle]) {
        self.bodies.clear();
        self.bodies.extend_from_slice(bodies);
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    /// Broadphase candidates as `(part_a, part_b)`, in sweep order
    pub fn candidates(&mut self, bodies: &Bodies) -> Vec<(BodyHandle, BodyHandle)> {
        self.bodies
            .sort_by(|a, b| bodies[*a].bounds.min.x.total_cmp(&bodies[*b].bounds.min.x));

        let mut candidates = Vec::new();
        let count = self.bodies.len();

        for i in 0..count {
            let body_a = &bodies[self.bodies[i]];
            let bounds_a = body_a.bounds;
            let a_frozen = body_a.is_frozen();
            let parts_a = body_a.parts.len();

            for j in (i + 1)..count {
                let body_b = &bodies[self.bodies[j]];
                let bounds_b = body_b.bounds;

                if bounds_b.min.x > bounds_a.max.x {
                    break;
                }
                if bounds_a.max.y < bounds_b.min.y || bounds_a.min.y > bounds_b.max.y {
                    continue;
                }
                if a_frozen && body_b.is_frozen() {
                    continue;
                }
                if !body_a.collision_filter.can_collide(&body_b.collision_filter) {
                    continue;
                }

                let parts_b = body_b.parts.len();
                if parts_a == 1 && parts_b == 1 {
                    candidates.push((body_a.handle, body_b.handle));
                    continue;
                }

                let start_a = if parts_a > 1 { 1 } else { 0 };
                let start_b = if parts_b > 1 { 1 } else { 0 };
                for &part_a in body_a.parts[start_a..].iter() {
                    let part_bounds_a = bodies[part_a].bounds;
                    for &part_b in body_b.parts[start_b..].iter() {
                        if part_bounds_a.overlaps(&bodies[part_b].bounds) {
                            candidates.push((part_a, part_b));
                        }
                    }
                }
            }
        }

        candidates
    }

    /// All colliding part pairs among the tracked bodies
    pub fn collisions(&mut self, bodies: &Bodies, pairs: Option<&Pairs>) -> Vec<Collision> {
        let candidates = self.candidates(bodies);

        #[cfg(feature = "parallel")]
        {
            candidates
                .par_iter()
                .filter_map(|&(a, b)| collides(bodies, a, b, pairs))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            candidates
                .iter()
                .filter_map(|&(a, b)| collides(bodies, a, b, pairs))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::IdAllocator;
    use crate::core::math::Vector;
    use crate::domain::body::{BodyOptions, CollisionFilter};

    fn row(xs: &[f64]) -> (Bodies, Vec<BodyHandle>) {
        let mut ids = IdAllocator::new();
        let mut bodies = Bodies::new();
        let handles = xs
            .iter()
            .map(|&x| {
                bodies
                    .create(
                        &mut ids,
                        &BodyOptions {
                            position: Vector::new(x, 0.0),
                            ..Default::default()
                        },
                    )
                    .unwrap()
            })
            .collect();
        (bodies, handles)
    }

    #[test]
    fn sweep_finds_only_overlapping_neighbours() {
        // registered out of order on purpose
        let (bodies, handles) = row(&[60.0, 0.0, 30.0, 500.0]);
        let mut detector = Detector::new();
        detector.set_bodies(&handles);

        let collisions = detector.collisions(&bodies, None);
        let found: Vec<(BodyHandle, BodyHandle)> = collisions.iter().map(|c| (c.body_a, c.body_b)).collect();
        // 0 overlaps 30, 30 overlaps 60, 0 and 60 are apart
        assert_eq!(found, vec![(handles[1], handles[2]), (handles[0], handles[2])]);
        assert_eq!(detector.bodies()[0], handles[1]);
    }

    #[test]
    fn static_pairs_and_filtered_pairs_are_skipped() {
        let (mut bodies, handles) = row(&[0.0, 30.0]);
        bodies.set_static(handles[0], true);
        bodies.set_static(handles[1], true);
        let mut detector = Detector::new();
        detector.set_bodies(&handles);
        assert!(detector.collisions(&bodies, None).is_empty());

        let (mut bodies, handles) = row(&[0.0, 30.0]);
        let filter = CollisionFilter {
            group: -3,
            ..Default::default()
        };
        bodies[handles[0]].collision_filter = filter;
        bodies[handles[1]].collision_filter = filter;
        detector.set_bodies(&handles);
        assert!(detector.collisions(&bodies, None).is_empty());
    }

    #[test]
    fn compound_bodies_test_their_parts() {
        let mut ids = IdAllocator::new();
        let mut bodies = Bodies::new();
        let dumbbell = bodies
            .create(
                &mut ids,
                &BodyOptions {
                    parts: vec![
                        BodyOptions::default(),
                        BodyOptions {
                            position: Vector::new(100.0, 0.0),
                            ..Default::default()
                        },
                    ],
                    ..Default::default()
                },
            )
            .unwrap();
        // sits in the gap between the two ends
        let middle = bodies
            .create(
                &mut ids,
                &BodyOptions {
                    position: Vector::new(50.0, 0.0),
                    vertices: Some(vec![
                        Vector::new(0.0, 0.0),
                        Vector::new(10.0, 0.0),
                        Vector::new(10.0, 10.0),
                        Vector::new(0.0, 10.0),
                    ]),
                    ..Default::default()
                },
            )
            .unwrap();
        let mut detector = Detector::new();
        detector.set_bodies(&[dumbbell, middle]);
        assert!(detector.collisions(&bodies, None).is_empty());

        // move onto the right end
        bodies.translate(middle, Vector::new(40.0, 0.0), false);
        let collisions = detector.collisions(&bodies, None);
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].parent_a, dumbbell);
        assert_eq!(collisions[0].parent_b, middle);
        assert_ne!(collisions[0].body_a, dumbbell);
    }
}
