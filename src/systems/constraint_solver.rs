//! Constraint solver - Gauss-Seidel relaxation of distance constraints
//!
//! Each solve moves bodies directly and records the move in
//! `constraint_impulse`. The post-solve brings vertices in line and keeps a
//! fraction of the impulse to warm start the next step.

use crate::core::ids::{BodyHandle, ConstraintHandle};
use crate::core::math::{axes, vertices, Vector};
use crate::core::clamp;
use crate::core::BASE_DELTA;
use crate::domain::body::Bodies;
use crate::domain::constraint::{Constraint, Constraints};
use crate::systems::sleeping::{self, SleepChange};

const MIN_LENGTH: f64 = 0.000_001;
const TORQUE_DAMPEN: f64 = 1.0;
const WARMING: f64 = 0.4;

#[inline]
fn has_impulse(impulse: Vector, angle: f64) -> bool {
    impulse.x != 0.0 || impulse.y != 0.0 || angle != 0.0
}

/// Re-apply the warm-start impulses kept from the previous step
pub fn pre_solve_all(bodies: &mut Bodies, handles: &[BodyHandle]) {
    for &handle in handles.iter() {
        let body = &mut bodies[handle];
        let (impulse, angle) = (body.constraint_impulse, body.constraint_angle_impulse);
        if body.is_static || !has_impulse(impulse, angle) {
            continue;
        }
        body.position += impulse;
        body.angle += angle;
    }
}

/// One pass over every constraint. Constraints with a fixed end go first.
pub fn solve_all(constraints: &mut Constraints, handles: &[ConstraintHandle], bodies: &mut Bodies, delta: f64) {
    let time_scale = clamp(delta / BASE_DELTA, 0.0, 1.0);

    for &handle in handles.iter() {
        if constraints[handle].is_fixed(bodies) {
            solve(&mut constraints[handle], bodies, time_scale);
        }
    }
    for &handle in handles.iter() {
        if !constraints[handle].is_fixed(bodies) {
            solve(&mut constraints[handle], bodies, time_scale);
        }
    }
}

pub fn solve(constraint: &mut Constraint, bodies: &mut Bodies, time_scale: f64) {
    if constraint.body_a.is_none() && constraint.body_b.is_none() {
        return;
    }

    // keep anchor offsets attached to the bodies as they turn
    if let Some(a) = constraint.body_a {
        if !bodies[a].is_static {
            constraint.point_a = constraint.point_a.rotate(bodies[a].angle - constraint.angle_a);
            constraint.angle_a = bodies[a].angle;
        }
    }
    if let Some(b) = constraint.body_b {
        if !bodies[b].is_static {
            constraint.point_b = constraint.point_b.rotate(bodies[b].angle - constraint.angle_b);
            constraint.angle_b = bodies[b].angle;
        }
    }

    let delta = constraint.point_a_world(bodies) - constraint.point_b_world(bodies);
    let current_length = delta.magnitude().max(MIN_LENGTH);

    let difference = (current_length - constraint.length) / current_length;
    let is_rigid = constraint.stiffness >= 1.0 || constraint.length == 0.0;
    let stiffness = if is_rigid {
        constraint.stiffness * time_scale
    } else {
        constraint.stiffness * time_scale * time_scale
    };
    let damping = constraint.damping * time_scale;
    let force = delta * (difference * stiffness);

    let inverse_mass = |h: Option<BodyHandle>| h.map_or(0.0, |h| bodies[h].inverse_mass);
    let inverse_inertia = |h: Option<BodyHandle>| h.map_or(0.0, |h| bodies[h].inverse_inertia);
    let mass_total = inverse_mass(constraint.body_a) + inverse_mass(constraint.body_b);
    let resistance_total = mass_total + inverse_inertia(constraint.body_a) + inverse_inertia(constraint.body_b);

    let mut normal = Vector::ZERO;
    let mut normal_velocity = 0.0;
    if damping > 0.0 {
        let velocity = |h: Option<BodyHandle>| h.map_or(Vector::ZERO, |h| bodies[h].position - bodies[h].position_prev);
        normal = delta.div(current_length);
        normal_velocity = normal.dot(velocity(constraint.body_b) - velocity(constraint.body_a));
    }

    if let Some(a) = constraint.body_a {
        let body = &mut bodies[a];
        if !body.is_static {
            let share = body.inverse_mass / mass_total;
            body.constraint_impulse -= force * share;
            body.position -= force * share;

            if damping > 0.0 {
                body.position_prev -= normal * (damping * normal_velocity * share);
            }

            let torque = (constraint.point_a.cross(force) / resistance_total)
                * TORQUE_DAMPEN
                * body.inverse_inertia
                * (1.0 - constraint.angular_stiffness);
            body.constraint_angle_impulse -= torque;
            body.angle -= torque;
        }
    }

    if let Some(b) = constraint.body_b {
        let body = &mut bodies[b];
        if !body.is_static {
            let share = body.inverse_mass / mass_total;
            body.constraint_impulse += force * share;
            body.position += force * share;

            if damping > 0.0 {
                body.position_prev += normal * (damping * normal_velocity * share);
            }

            let torque = (constraint.point_b.cross(force) / resistance_total)
                * TORQUE_DAMPEN
                * body.inverse_inertia
                * (1.0 - constraint.angular_stiffness);
            body.constraint_angle_impulse += torque;
            body.angle += torque;
        }
    }
}

/// Bring vertices, axes and bounds in line with the moves made by `solve`,
/// wake moved bodies, and decay the impulses for warm starting
pub fn post_solve_all(bodies: &mut Bodies, handles: &[BodyHandle], changes: &mut Vec<SleepChange>) {
    for &handle in handles.iter() {
        let body = &bodies[handle];
        let (impulse, angle) = (body.constraint_impulse, body.constraint_angle_impulse);
        if body.is_static || !has_impulse(impulse, angle) {
            continue;
        }

        if let Some(transition) = sleeping::set(&mut bodies[handle], false) {
            changes.push(SleepChange { body: handle, transition });
        }

        let pivot = bodies[handle].position;
        let velocity = bodies[handle].velocity;
        for i in 0..bodies[handle].parts.len() {
            let part_handle = bodies[handle].parts[i];
            let part = &mut bodies[part_handle];
            vertices::translate(&mut part.vertices, impulse, 1.0);
            if i > 0 {
                part.position += impulse;
            }
            if angle != 0.0 {
                vertices::rotate(&mut part.vertices, angle, pivot);
                axes::rotate(&mut part.axes, angle);
                if i > 0 {
                    part.position = part.position.rotate_about(angle, pivot);
                }
            }
            part.bounds.update(&part.vertices, Some(velocity));
        }

        let body = &mut bodies[handle];
        body.constraint_angle_impulse *= WARMING;
        body.constraint_impulse = body.constraint_impulse * WARMING;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::IdAllocator;
    use crate::domain::body::BodyOptions;
    use crate::domain::constraint::ConstraintOptions;

    fn pendulum(stiffness: Option<f64>) -> (Bodies, Constraints, BodyHandle, ConstraintHandle) {
        let mut ids = IdAllocator::new();
        let mut bodies = Bodies::new();
        let bob = bodies
            .create(
                &mut ids,
                &BodyOptions {
                    position: Vector::new(0.0, 100.0),
                    ..Default::default()
                },
            )
            .unwrap();
        let mut constraints = Constraints::new();
        let link = constraints
            .create(
                &mut ids,
                &bodies,
                &ConstraintOptions {
                    body_b: Some(bodies[bob].id),
                    point_a: Some(Vector::ZERO),
                    stiffness,
                    ..Default::default()
                },
            )
            .unwrap();
        (bodies, constraints, bob, link)
    }

    #[test]
    fn stretched_rigid_link_is_pulled_back_to_length() {
        let (mut bodies, mut constraints, bob, link) = pendulum(None);
        bodies.translate(bob, Vector::new(0.0, 20.0), false);
        let mut changes = Vec::new();

        pre_solve_all(&mut bodies, &[bob]);
        for _ in 0..2 {
            solve_all(&mut constraints, &[link], &mut bodies, BASE_DELTA);
        }
        post_solve_all(&mut bodies, &[bob], &mut changes);

        assert!((constraints[link].current_length(&bodies) - 100.0).abs() < 1e-6);
        // vertices follow the corrected position
        let centre = vertices::mean(&bodies[bob].vertices);
        assert!((centre - bodies[bob].position).magnitude() < 1e-9);
        assert!(bodies[bob].constraint_impulse.y < 0.0);
    }

    #[test]
    fn soft_link_only_moves_part_way() {
        let (mut bodies, mut constraints, bob, link) = pendulum(Some(0.1));
        bodies.translate(bob, Vector::new(0.0, 20.0), false);

        solve_all(&mut constraints, &[link], &mut bodies, BASE_DELTA);
        let length = constraints[link].current_length(&bodies);
        assert!(length < 120.0 && length > 100.0);
    }

    #[test]
    fn post_solve_wakes_a_sleeping_body_and_decays_the_impulse() {
        let (mut bodies, mut constraints, bob, link) = pendulum(None);
        sleeping::set(&mut bodies[bob], true);
        bodies.translate(bob, Vector::new(10.0, 0.0), false);
        let mut changes = Vec::new();

        solve_all(&mut constraints, &[link], &mut bodies, BASE_DELTA);
        let impulse = bodies[bob].constraint_impulse;
        post_solve_all(&mut bodies, &[bob], &mut changes);

        assert!(!bodies[bob].is_sleeping);
        assert_eq!(changes.len(), 1);
        assert!((bodies[bob].constraint_impulse - impulse * WARMING).magnitude() < 1e-12);
    }
}
