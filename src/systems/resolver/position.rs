use crate::core::ids::BodyHandle;
use crate::core::math::Vector;
use crate::core::{clamp, BASE_DELTA};
use crate::domain::body::Bodies;
use crate::systems::pairs::Pair;

use super::{POSITION_DAMPEN, POSITION_WARMING};

/// Count active contacts per parent body, used to share position corrections
pub fn pre_solve_position(pairs: &[Pair], bodies: &mut Bodies) {
    for pair in pairs.iter() {
        if !pair.is_active {
            continue;
        }
        let count = pair.active_contacts.len();
        bodies[pair.collision.parent_a].total_contacts += count;
        bodies[pair.collision.parent_b].total_contacts += count;
    }
}

/// One position iteration: push overlapping bodies apart along the
/// collision normal, less the allowed slop.
pub fn solve_position(pairs: &mut [Pair], bodies: &mut Bodies, delta: f64, damping: f64) {
    let position_dampen = POSITION_DAMPEN * damping;
    let slop_dampen = clamp(delta / BASE_DELTA, 0.0, 1.0);

    // current separation, including impulses from earlier iterations
    for pair in pairs.iter_mut() {
        if !pair.is_active || pair.is_sensor {
            continue;
        }
        let collision = &pair.collision;
        let impulse_a = bodies[collision.parent_a].position_impulse;
        let impulse_b = bodies[collision.parent_b].position_impulse;
        pair.separation = collision.depth + collision.normal.dot(impulse_b - impulse_a);
    }

    for pair in pairs.iter() {
        if !pair.is_active || pair.is_sensor {
            continue;
        }
        let collision = &pair.collision;
        let normal = collision.normal;
        let (parent_a, parent_b) = (collision.parent_a, collision.parent_b);

        let mut impulse = pair.separation - pair.slop * slop_dampen;
        if bodies[parent_a].is_static || bodies[parent_b].is_static {
            impulse *= 2.0;
        }

        let body_a = &mut bodies[parent_a];
        if !body_a.is_frozen() {
            let share = position_dampen / body_a.total_contacts as f64;
            body_a.position_impulse += normal * (impulse * share);
        }

        let body_b = &mut bodies[parent_b];
        if !body_b.is_frozen() {
            let share = position_dampen / body_b.total_contacts as f64;
            body_b.position_impulse -= normal * (impulse * share);
        }
    }
}

/// Apply the accumulated position impulses, then keep a warm-start fraction
/// unless it opposes the body's velocity.
pub fn post_solve_position(bodies: &mut Bodies, handles: &[BodyHandle]) {
    for &handle in handles.iter() {
        let body = &mut bodies[handle];
        body.total_contacts = 0;

        let impulse = body.position_impulse;
        if impulse.x == 0.0 && impulse.y == 0.0 {
            continue;
        }

        bodies.shift(handle, impulse);

        let body = &mut bodies[handle];
        if impulse.dot(body.velocity) < 0.0 {
            body.position_impulse = Vector::ZERO;
        } else {
            body.position_impulse = impulse * POSITION_WARMING;
        }
    }
}
