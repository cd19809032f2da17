//! Shape and mass: keeps vertices, axes, area, mass and inertia consistent

use crate::core::error::EngineError;
use crate::core::ids::BodyHandle;
use crate::core::math::{axes, vertices, Vector};

use super::{Bodies, Body, OriginalProperties, INERTIA_SCALE};

/// Summed mass properties of a compound body's parts
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MassProperties {
    pub mass: f64,
    pub area: f64,
    pub inertia: f64,
    pub centre: Vector,
}

impl Body {
    /// Replace the hull. `points` give the outline; they are re-centred on
    /// their centroid and placed at `position`.
    pub fn set_vertices(&mut self, points: &[Vector]) -> Result<(), EngineError> {
        if points.len() < 3 {
            return Err(EngineError::DegenerateShape {
                reason: "a polygon needs at least 3 vertices",
            });
        }
        let area = vertices::area(points, false);
        if !(area > f64::EPSILON) {
            return Err(EngineError::DegenerateShape {
                reason: "polygon has zero area",
            });
        }

        self.vertices = vertices::create(points, self.handle);
        self.axes = axes::from_vertices(&self.vertices);
        self.area = area;

        // inertia is taken about the centroid, so centre first
        let centre = vertices::centre(&self.vertices);
        vertices::translate(&mut self.vertices, centre, -1.0);
        if !self.is_static {
            self.set_mass(self.density * self.area);
            let inertia = vertices::inertia(&self.vertices, self.mass);
            self.set_inertia(INERTIA_SCALE * inertia);
        }
        vertices::translate(&mut self.vertices, self.position, 1.0);

        self.bounds.update(&self.vertices, Some(self.velocity));
        Ok(())
    }

    /// Set mass, scaling inertia by the same ratio and deriving density
    pub fn set_mass(&mut self, mass: f64) {
        let moment = if self.mass > 0.0 && self.mass.is_finite() {
            self.inertia / (self.mass / 6.0)
        } else {
            0.0
        };
        self.inertia = moment * (mass / 6.0);
        self.inverse_inertia = 1.0 / self.inertia;
        self.mass = mass;
        self.inverse_mass = 1.0 / self.mass;
        self.density = self.mass / self.area;
    }

    pub fn set_density(&mut self, density: f64) {
        self.set_mass(density * self.area);
        self.density = density;
    }

    pub fn set_inertia(&mut self, inertia: f64) {
        self.inertia = inertia;
        self.inverse_inertia = 1.0 / self.inertia;
    }
}

impl Bodies {
    /// Make a body (and all of its parts) immovable, or restore it
    pub fn set_static(&mut self, handle: BodyHandle, is_static: bool) {
        for i in 0..self[handle].parts.len() {
            let part_handle = self[handle].parts[i];
            let part = &mut self[part_handle];

            if is_static {
                if !part.is_static {
                    part.original = Some(OriginalProperties {
                        restitution: part.restitution,
                        friction: part.friction,
                        mass: part.mass,
                        inertia: part.inertia,
                        density: part.density,
                        inverse_mass: part.inverse_mass,
                        inverse_inertia: part.inverse_inertia,
                    });
                }

                part.restitution = 0.0;
                part.friction = 1.0;
                part.mass = f64::INFINITY;
                part.inertia = f64::INFINITY;
                part.density = f64::INFINITY;
                part.inverse_mass = 0.0;
                part.inverse_inertia = 0.0;

                part.position_prev = part.position;
                part.angle_prev = part.angle;
                part.velocity = Vector::ZERO;
                part.angular_velocity = 0.0;
                part.speed = 0.0;
                part.angular_speed = 0.0;
                part.motion = 0.0;
            } else if let Some(original) = part.original.take() {
                part.restitution = original.restitution;
                part.friction = original.friction;
                part.mass = original.mass;
                part.inertia = original.inertia;
                part.density = original.density;
                part.inverse_mass = original.inverse_mass;
                part.inverse_inertia = original.inverse_inertia;
            }

            part.is_static = is_static;
        }
    }

    /// Rebuild a compound body from `parts`. The parent is always `parts[0]`.
    /// With `auto_hull` the parent's own outline becomes the convex hull of
    /// all part vertices.
    pub fn set_parts(&mut self, handle: BodyHandle, parts: &[BodyHandle], auto_hull: bool) -> Result<(), EngineError> {
        let mut list = Vec::with_capacity(parts.len() + 1);
        list.push(handle);
        for &part in parts.iter() {
            if part != handle {
                self[part].parent = handle;
                list.push(part);
            }
        }
        self[handle].parent = handle;
        self[handle].parts = list;

        if self[handle].parts.len() == 1 {
            return Ok(());
        }

        if auto_hull {
            let mut points: Vec<Vector> = Vec::new();
            for &part in parts.iter().filter(|p| **p != handle) {
                points.extend(self[part].vertices.iter().map(|v| v.point()));
            }
            vertices::clockwise_sort(&mut points);
            let hull = vertices::hull(&points);
            let hull_centre = vertices::centre(&hull);

            let body = &mut self[handle];
            body.set_vertices(&hull)?;
            vertices::translate(&mut body.vertices, hull_centre, 1.0);
        }

        let total = self.total_properties(handle);
        let body = &mut self[handle];
        body.area = total.area;
        body.parent = handle;
        body.position = total.centre;
        body.position_prev = total.centre;
        body.set_mass(total.mass);
        body.set_inertia(total.inertia);
        self.set_position(handle, total.centre, false);
        Ok(())
    }

    /// Sum mass, area and inertia over the parts, skipping the parent's own
    /// entry when there are real parts.
    pub fn total_properties(&self, handle: BodyHandle) -> MassProperties {
        let body = &self[handle];
        let start = if body.parts.len() == 1 { 0 } else { 1 };
        let mut total = MassProperties {
            mass: 0.0,
            area: 0.0,
            inertia: 0.0,
            centre: Vector::ZERO,
        };

        for &part_handle in body.parts[start..].iter() {
            let part = &self[part_handle];
            // a static part would drag an infinite weight into the centroid
            let mass = if part.mass.is_finite() { part.mass } else { 1.0 };
            total.mass += mass;
            total.area += part.area;
            total.inertia += part.inertia;
            total.centre += part.position * mass;
        }

        total.centre = total.centre.div(total.mass);
        total
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::square;
    use super::super::BodyOptions;
    use super::*;
    use crate::core::ids::IdAllocator;

    fn create(bodies: &mut Bodies, ids: &mut IdAllocator, options: BodyOptions) -> BodyHandle {
        bodies.create(ids, &options).unwrap()
    }

    fn assert_inverses(body: &Body) {
        if body.mass.is_finite() {
            assert!((body.inverse_mass - 1.0 / body.mass).abs() < 1e-12);
        } else {
            assert_eq!(body.inverse_mass, 0.0);
        }
        if body.inertia.is_finite() {
            assert!((body.inverse_inertia - 1.0 / body.inertia).abs() < 1e-12);
        } else {
            assert_eq!(body.inverse_inertia, 0.0);
        }
    }

    #[test]
    fn setters_keep_inverses_consistent() {
        let mut bodies = Bodies::new();
        let mut ids = IdAllocator::new();
        let h = create(&mut bodies, &mut ids, BodyOptions::default());

        let body = &mut bodies[h];
        let ratio = body.inertia / body.mass;
        body.set_mass(10.0);
        assert_inverses(body);
        assert!((body.inertia / body.mass - ratio).abs() < 1e-9);
        assert!((body.density - 10.0 / 1600.0).abs() < 1e-12);

        body.set_density(0.002);
        assert_inverses(body);
        assert!((body.mass - 3.2).abs() < 1e-12);

        body.set_inertia(123.0);
        assert_inverses(body);

        bodies.set_static(h, true);
        assert_inverses(&bodies[h]);
        bodies.set_static(h, false);
        assert_inverses(&bodies[h]);
        assert!((bodies[h].mass - 3.2).abs() < 1e-12);
        assert_eq!(bodies[h].friction, 0.1);
    }

    #[test]
    fn static_freezes_motion_and_coerces_material() {
        let mut bodies = Bodies::new();
        let mut ids = IdAllocator::new();
        let h = create(
            &mut bodies,
            &mut ids,
            BodyOptions {
                restitution: 0.5,
                ..Default::default()
            },
        );
        bodies[h].position_prev = Vector::new(-3.0, 0.0);

        bodies.set_static(h, true);
        let body = &bodies[h];
        assert!(body.is_static);
        assert_eq!(body.position_prev, body.position);
        assert_eq!(body.restitution, 0.0);
        assert_eq!(body.friction, 1.0);
        assert!(body.original.is_some());

        bodies.set_static(h, false);
        assert_eq!(bodies[h].restitution, 0.5);
        assert!(bodies[h].original.is_none());
    }

    #[test]
    fn set_vertices_with_own_hull_is_idempotent() {
        let mut bodies = Bodies::new();
        let mut ids = IdAllocator::new();
        let h = create(
            &mut bodies,
            &mut ids,
            BodyOptions {
                position: Vector::new(12.0, -7.0),
                vertices: Some(vec![Vector::new(0.0, 0.0), Vector::new(30.0, 5.0), Vector::new(10.0, 25.0)]),
                ..Default::default()
            },
        );

        let before = bodies[h].clone();
        let points: Vec<Vector> = before.vertices.iter().map(|v| v.point()).collect();
        bodies[h].set_vertices(&points).unwrap();
        let after = &bodies[h];

        assert!((after.area - before.area).abs() < 1e-9);
        assert!((after.mass - before.mass).abs() < 1e-9);
        assert!((after.inertia - before.inertia).abs() < 1e-6);
        for (a, b) in after.vertices.iter().zip(before.vertices.iter()) {
            let ra = a.point() - after.position;
            let rb = b.point() - before.position;
            assert!((ra - rb).magnitude() < 1e-9);
        }
    }

    #[test]
    fn compound_parts_sum_and_hull() {
        let mut bodies = Bodies::new();
        let mut ids = IdAllocator::new();
        let parent = create(
            &mut bodies,
            &mut ids,
            BodyOptions {
                parts: vec![
                    BodyOptions {
                        position: Vector::new(-5.0, 0.0),
                        vertices: Some(square(5.0)),
                        ..Default::default()
                    },
                    BodyOptions {
                        position: Vector::new(5.0, 0.0),
                        vertices: Some(square(5.0)),
                        ..Default::default()
                    },
                ],
                ..Default::default()
            },
        );

        let body = &bodies[parent];
        assert_eq!(body.parts.len(), 3);
        assert_eq!(body.parts[0], parent);
        assert!((body.area - 200.0).abs() < 1e-9);
        assert!((body.mass - 0.2).abs() < 1e-12);
        assert!(body.position.magnitude() < 1e-9);
        assert!((body.bounds.min.x + 10.0).abs() < 1e-9);
        assert!((body.bounds.max.x - 10.0).abs() < 1e-9);
        assert_inverses(body);
        for &part in body.parts[1..].iter() {
            assert_eq!(bodies[part].parent, parent);
            assert!(bodies[part].is_part());
        }
    }

    #[test]
    fn static_part_counts_as_unit_mass() {
        let mut bodies = Bodies::new();
        let mut ids = IdAllocator::new();
        let a = create(
            &mut bodies,
            &mut ids,
            BodyOptions {
                position: Vector::new(0.0, 0.0),
                vertices: Some(square(1.0)),
                ..Default::default()
            },
        );
        let b = create(
            &mut bodies,
            &mut ids,
            BodyOptions {
                position: Vector::new(10.0, 0.0),
                vertices: Some(square(1.0)),
                is_static: true,
                ..Default::default()
            },
        );
        let parent = create(&mut bodies, &mut ids, BodyOptions::default());
        bodies.set_parts(parent, &[a, b], false).unwrap();

        let total = bodies.total_properties(parent);
        // part a weighs 0.004, part b is counted as 1
        assert!((total.mass - 1.004).abs() < 1e-12);
        assert!((total.centre.x - 10.0 / 1.004).abs() < 1e-9);
    }
}
