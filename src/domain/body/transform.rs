//! Placement: moves a body and every part with it

use crate::core::ids::BodyHandle;
use crate::core::math::{axes, vertices, Vector};

use super::{refit, Bodies, Body, INERTIA_SCALE};

impl Body {
    /// Move the reference point without moving the vertices.
    /// `relative` treats `centre` as an offset.
    pub fn set_centre(&mut self, centre: Vector, relative: bool) {
        if relative {
            self.position_prev += centre;
            self.position += centre;
        } else {
            self.position_prev = centre - (self.position - self.position_prev);
            self.position = centre;
        }
    }
}

impl Bodies {
    /// Teleport. With `update_velocity` the jump becomes the new velocity,
    /// otherwise the current velocity is kept.
    pub fn set_position(&mut self, handle: BodyHandle, position: Vector, update_velocity: bool) {
        let body = &mut self[handle];
        let delta = position - body.position;

        if update_velocity {
            body.position_prev = body.position;
            body.velocity = delta;
            body.speed = delta.magnitude();
        } else {
            body.position_prev += delta;
        }

        let velocity = body.velocity;
        for i in 0..self[handle].parts.len() {
            let part_handle = self[handle].parts[i];
            let part = &mut self[part_handle];
            part.position += delta;
            vertices::translate(&mut part.vertices, delta, 1.0);
            part.bounds.update(&part.vertices, Some(velocity));
        }
    }

    pub fn set_angle(&mut self, handle: BodyHandle, angle: f64, update_velocity: bool) {
        let body = &mut self[handle];
        let delta = angle - body.angle;

        if update_velocity {
            body.angle_prev = body.angle;
            body.angular_velocity = delta;
            body.angular_speed = delta.abs();
        } else {
            body.angle_prev += delta;
        }

        let pivot = body.position;
        let velocity = body.velocity;
        for i in 0..self[handle].parts.len() {
            let part_handle = self[handle].parts[i];
            let part = &mut self[part_handle];
            part.angle += delta;
            vertices::rotate(&mut part.vertices, delta, pivot);
            refit(part, delta, velocity);
            if i > 0 {
                part.position = part.position.rotate_about(delta, pivot);
            }
        }
    }

    pub fn translate(&mut self, handle: BodyHandle, translation: Vector, update_velocity: bool) {
        let position = self[handle].position + translation;
        self.set_position(handle, position, update_velocity);
    }

    /// Rotate by `rotation`, about `point` if given, else about the body's position
    pub fn rotate(&mut self, handle: BodyHandle, rotation: f64, point: Option<Vector>, update_velocity: bool) {
        if let Some(point) = point {
            let position = self[handle].position.rotate_about(rotation, point);
            self.set_position(handle, position, update_velocity);
        }
        let angle = self[handle].angle + rotation;
        self.set_angle(handle, angle, update_velocity);
    }

    /// Scale every part about `point` (default: the body's position),
    /// recomputing area, mass and inertia from the new geometry.
    pub fn scale(&mut self, handle: BodyHandle, scale_x: f64, scale_y: f64, point: Option<Vector>) {
        let point = point.unwrap_or(self[handle].position);
        let density = self[handle].density;
        let velocity = self[handle].velocity;
        let mut total_area = 0.0;
        let mut total_inertia = 0.0;

        for i in 0..self[handle].parts.len() {
            let part_handle = self[handle].parts[i];
            let part = &mut self[part_handle];

            vertices::scale(&mut part.vertices, scale_x, scale_y, point);
            part.axes = axes::from_vertices(&part.vertices);
            part.area = vertices::area(&part.vertices, false);

            if !part.is_static {
                part.set_mass(density * part.area);
                let offset = part.position;
                vertices::translate(&mut part.vertices, offset, -1.0);
                let inertia = vertices::inertia(&part.vertices, part.mass);
                part.set_inertia(INERTIA_SCALE * inertia);
                vertices::translate(&mut part.vertices, offset, 1.0);
            }

            if i > 0 {
                total_area += part.area;
                total_inertia += part.inertia;
            }

            part.position = Vector::new(
                point.x + (part.position.x - point.x) * scale_x,
                point.y + (part.position.y - point.y) * scale_y,
            );
            part.bounds.update(&part.vertices, Some(velocity));
        }

        let body = &mut self[handle];
        if body.parts.len() > 1 {
            body.area = total_area;
            if !body.is_static {
                body.set_mass(density * total_area);
                body.set_inertia(total_inertia);
            }
        }

        if let Some(radius) = body.circle_radius {
            body.circle_radius = if scale_x == scale_y { Some(radius * scale_x) } else { None };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::square;
    use super::super::BodyOptions;
    use super::*;
    use crate::core::ids::IdAllocator;

    fn body_at(position: Vector) -> (Bodies, BodyHandle) {
        let mut bodies = Bodies::new();
        let mut ids = IdAllocator::new();
        let h = bodies
            .create(
                &mut ids,
                &BodyOptions {
                    position,
                    vertices: Some(square(10.0)),
                    circle_radius: Some(10.0),
                    ..Default::default()
                },
            )
            .unwrap();
        (bodies, h)
    }

    #[test]
    fn set_position_moves_geometry_and_keeps_velocity() {
        let (mut bodies, h) = body_at(Vector::ZERO);
        bodies[h].set_velocity(Vector::new(2.0, 0.0));

        bodies.set_position(h, Vector::new(100.0, 0.0), false);
        let body = &bodies[h];
        assert_eq!(body.position, Vector::new(100.0, 0.0));
        assert!((body.bounds.min.x - 90.0).abs() < 1e-9);
        assert!((bodies[h].get_velocity().x - 2.0).abs() < 1e-9);
    }

    #[test]
    fn set_position_with_velocity_update_throws_the_body() {
        let (mut bodies, h) = body_at(Vector::ZERO);
        bodies.set_position(h, Vector::new(3.0, 4.0), true);
        assert_eq!(bodies[h].speed, 5.0);
        assert_eq!(bodies[h].position_prev, Vector::ZERO);
    }

    #[test]
    fn rotate_about_point_moves_position_and_angle() {
        let (mut bodies, h) = body_at(Vector::new(10.0, 0.0));
        bodies.rotate(h, std::f64::consts::FRAC_PI_2, Some(Vector::ZERO), false);
        let body = &bodies[h];
        assert!((body.position.x).abs() < 1e-9);
        assert!((body.position.y - 10.0).abs() < 1e-9);
        assert!((body.angle - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert_eq!(body.angle_prev, body.angle);
    }

    #[test]
    fn scale_updates_mass_and_drops_radius_when_uneven() {
        let (mut bodies, h) = body_at(Vector::ZERO);
        let mass = bodies[h].mass;

        bodies.scale(h, 2.0, 2.0, None);
        assert!((bodies[h].mass - mass * 4.0).abs() < 1e-9);
        assert_eq!(bodies[h].circle_radius, Some(20.0));

        bodies.scale(h, 1.0, 0.5, None);
        assert!((bodies[h].area - 800.0).abs() < 1e-9);
        assert_eq!(bodies[h].circle_radius, None);
    }

    #[test]
    fn set_centre_moves_reference_point_only() {
        let (mut bodies, h) = body_at(Vector::ZERO);
        let verts = bodies[h].vertices.clone();
        bodies[h].set_centre(Vector::new(1.0, 1.0), true);
        assert_eq!(bodies[h].position, Vector::new(1.0, 1.0));
        assert_eq!(bodies[h].vertices, verts);
    }
}
