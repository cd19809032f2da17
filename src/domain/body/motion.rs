//! Integration and the velocity accessors
//!
//! Velocities read and written here are normalised to `BASE_DELTA`, so a
//! value means the same thing whatever step size produced it.

use crate::core::ids::BodyHandle;
use crate::core::math::{vertices, Vector};
use crate::core::BASE_DELTA;

use super::{refit, Bodies, Body};

impl Bodies {
    /// Position Verlet step of `delta` ms (scaled by the body's time scale).
    /// Velocity comes from the previous step's displacement, corrected for a
    /// change of step size, plus the accumulated force.
    pub fn update(&mut self, handle: BodyHandle, delta: f64) {
        let body = &mut self[handle];
        let delta_time = delta * body.time_scale;
        let delta_time_squared = delta_time * delta_time;
        let correction = if body.delta_time > 0.0 { delta_time / body.delta_time } else { 1.0 };
        let friction_air = 1.0 - body.friction_air * (delta_time / BASE_DELTA);

        let velocity_prev = (body.position - body.position_prev) * correction;
        body.velocity = velocity_prev * friction_air + (body.force.div(body.mass)) * delta_time_squared;
        body.position_prev = body.position;
        body.position += body.velocity;
        body.delta_time = delta_time;

        body.angular_velocity =
            (body.angle - body.angle_prev) * friction_air * correction + (body.torque / body.inertia) * delta_time_squared;
        body.angle_prev = body.angle;
        body.angle += body.angular_velocity;

        let velocity = body.velocity;
        let angular_velocity = body.angular_velocity;
        let pivot = body.position;

        for i in 0..self[handle].parts.len() {
            let part_handle = self[handle].parts[i];
            let part = &mut self[part_handle];
            vertices::translate(&mut part.vertices, velocity, 1.0);
            if i > 0 {
                part.position += velocity;
            }
            if angular_velocity != 0.0 {
                vertices::rotate(&mut part.vertices, angular_velocity, pivot);
                if i > 0 {
                    part.position = part.position.rotate_about(angular_velocity, pivot);
                }
            }
            refit(part, angular_velocity, velocity);
        }
    }

    /// Shift a body and its parts by the solver's position impulse, keeping
    /// the derived velocity unchanged
    pub(crate) fn shift(&mut self, handle: BodyHandle, offset: Vector) {
        let velocity = self[handle].velocity;
        for i in 0..self[handle].parts.len() {
            let part_handle = self[handle].parts[i];
            let part = &mut self[part_handle];
            vertices::translate(&mut part.vertices, offset, 1.0);
            part.bounds.update(&part.vertices, Some(velocity));
            part.position += offset;
        }
        self[handle].position_prev += offset;
    }
}

impl Body {
    /// Refresh `velocity`/`speed` and the angular pair from the position history
    pub fn update_velocities(&mut self) {
        let time_scale = BASE_DELTA / self.delta_time;
        self.velocity = (self.position - self.position_prev) * time_scale;
        self.speed = self.velocity.magnitude();
        self.angular_velocity = (self.angle - self.angle_prev) * time_scale;
        self.angular_speed = self.angular_velocity.abs();
    }

    /// Accumulate a force applied at a world point. Takes effect on the next update.
    pub fn apply_force(&mut self, position: Vector, force: Vector) {
        let offset = position - self.position;
        self.force += force;
        self.torque += offset.cross(force);
    }

    pub fn get_velocity(&self) -> Vector {
        (self.position - self.position_prev) * (BASE_DELTA / self.delta_time)
    }

    pub fn set_velocity(&mut self, velocity: Vector) {
        let time_scale = self.delta_time / BASE_DELTA;
        self.position_prev = self.position - velocity * time_scale;
        self.velocity = (self.position - self.position_prev).div(time_scale);
        self.speed = self.velocity.magnitude();
    }

    pub fn get_speed(&self) -> f64 {
        self.get_velocity().magnitude()
    }

    pub fn set_speed(&mut self, speed: f64) {
        let direction = self.get_velocity().normalise();
        self.set_velocity(direction * speed);
    }

    pub fn get_angular_velocity(&self) -> f64 {
        (self.angle - self.angle_prev) * (BASE_DELTA / self.delta_time)
    }

    pub fn set_angular_velocity(&mut self, velocity: f64) {
        let time_scale = self.delta_time / BASE_DELTA;
        self.angle_prev = self.angle - velocity * time_scale;
        self.angular_velocity = (self.angle - self.angle_prev) / time_scale;
        self.angular_speed = self.angular_velocity.abs();
    }

    pub fn get_angular_speed(&self) -> f64 {
        self.get_angular_velocity().abs()
    }

    pub fn set_angular_speed(&mut self, speed: f64) {
        let sign = self.get_angular_velocity().signum();
        self.set_angular_velocity(sign * speed);
    }
}
