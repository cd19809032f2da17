use crate::core::BASE_DELTA;
use crate::domain::body::Bodies;
use crate::systems::pairs::Pair;

use super::{FRICTION_MAX_STATIC, FRICTION_NORMAL_MULTIPLIER, RESTING_THRESH, RESTING_THRESH_TANGENT};

/// Warm start: re-apply last step's cached contact impulses
pub fn pre_solve_velocity(pairs: &[Pair], bodies: &mut Bodies) {
    for pair in pairs.iter() {
        if !pair.is_active || pair.is_sensor {
            continue;
        }
        let collision = &pair.collision;
        let (normal, tangent) = (collision.normal, collision.tangent);

        for contact in pair.active_contacts() {
            if contact.normal_impulse == 0.0 && contact.tangent_impulse == 0.0 {
                continue;
            }
            let point = contact.point(bodies);
            let impulse = normal * contact.normal_impulse + tangent * contact.tangent_impulse;

            let body_a = &mut bodies[collision.parent_a];
            if !body_a.is_frozen() {
                body_a.position_prev += impulse * body_a.inverse_mass;
                body_a.angle_prev += body_a.inverse_inertia * (point - body_a.position).cross(impulse);
            }

            let body_b = &mut bodies[collision.parent_b];
            if !body_b.is_frozen() {
                body_b.position_prev -= impulse * body_b.inverse_mass;
                body_b.angle_prev -= body_b.inverse_inertia * (point - body_b.position).cross(impulse);
            }
        }
    }
}

/// One velocity iteration with restitution and Coulomb friction. Impulses
/// are accumulated per contact and clamped (normal never pulls, friction
/// stays within its limit), so only the change is applied each pass.
pub fn solve_velocity(pairs: &mut [Pair], bodies: &mut Bodies, delta: f64) {
    let time_scale = delta / BASE_DELTA;
    let time_scale_cubed = time_scale * time_scale * time_scale;
    let resting_thresh = -RESTING_THRESH * time_scale;
    let friction_normal_multiplier = FRICTION_NORMAL_MULTIPLIER * time_scale;

    for pair in pairs.iter_mut() {
        if !pair.is_active || pair.is_sensor || pair.active_contacts.is_empty() {
            continue;
        }
        let (parent_a, parent_b) = (pair.collision.parent_a, pair.collision.parent_b);
        let normal = pair.collision.normal;
        let tangent = pair.collision.tangent;
        let friction = pair.friction * pair.friction_static * friction_normal_multiplier;
        let contact_share = 1.0 / pair.active_contacts.len() as f64;

        let (a_velocity, a_angular) = {
            let a = &bodies[parent_a];
            (a.position - a.position_prev, a.angle - a.angle_prev)
        };
        let (b_velocity, b_angular) = {
            let b = &bodies[parent_b];
            (b.position - b.position_prev, b.angle - b.angle_prev)
        };

        for k in 0..pair.active_contacts.len() {
            let slot = pair.active_contacts[k];
            let point = pair.contacts[slot].point(bodies);

            let (a_position, a_inverse_inertia) = (bodies[parent_a].position, bodies[parent_a].inverse_inertia);
            let (b_position, b_inverse_inertia) = (bodies[parent_b].position, bodies[parent_b].inverse_inertia);
            let offset_a = point - a_position;
            let offset_b = point - b_position;

            let velocity_point_a = a_velocity + offset_a.perp(false) * a_angular;
            let velocity_point_b = b_velocity + offset_b.perp(false) * b_angular;
            let relative = velocity_point_a - velocity_point_b;

            let normal_velocity = normal.dot(relative);
            let tangent_velocity = tangent.dot(relative);

            // coulomb friction
            let normal_overlap = pair.separation + normal_velocity;
            let normal_force = if normal_overlap < 0.0 { 0.0 } else { normal_overlap.min(1.0) };
            let friction_limit = normal_force * friction;

            let mut tangent_impulse;
            let max_friction;
            if tangent_velocity.abs() > friction_limit {
                max_friction = tangent_velocity.abs();
                let sign = if tangent_velocity > 0.0 { 1.0 } else { -1.0 };
                tangent_impulse = (pair.friction * sign * time_scale_cubed).clamp(-max_friction, max_friction);
            } else {
                tangent_impulse = tangent_velocity;
                max_friction = FRICTION_MAX_STATIC;
            }

            let o_a_cross_n = offset_a.cross(normal);
            let o_b_cross_n = offset_b.cross(normal);
            let share = contact_share
                / (pair.inverse_mass
                    + a_inverse_inertia * o_a_cross_n * o_a_cross_n
                    + b_inverse_inertia * o_b_cross_n * o_b_cross_n);

            let mut normal_impulse = (1.0 + pair.restitution) * normal_velocity * share;
            tangent_impulse *= share;

            let contact = &mut pair.contacts[slot];
            if normal_velocity < resting_thresh {
                contact.normal_impulse = 0.0;
            } else {
                let previous = contact.normal_impulse;
                contact.normal_impulse = (contact.normal_impulse + normal_impulse).min(0.0);
                normal_impulse = contact.normal_impulse - previous;
            }

            if tangent_velocity.abs() > RESTING_THRESH_TANGENT {
                contact.tangent_impulse = 0.0;
            } else {
                let previous = contact.tangent_impulse;
                contact.tangent_impulse = (contact.tangent_impulse + tangent_impulse).clamp(-max_friction, max_friction);
                tangent_impulse = contact.tangent_impulse - previous;
            }

            let impulse = normal * normal_impulse + tangent * tangent_impulse;

            let body_a = &mut bodies[parent_a];
            if !body_a.is_frozen() {
                body_a.position_prev += impulse * body_a.inverse_mass;
                body_a.angle_prev += offset_a.cross(impulse) * body_a.inverse_inertia;
            }

            let body_b = &mut bodies[parent_b];
            if !body_b.is_frozen() {
                body_b.position_prev -= impulse * body_b.inverse_mass;
                body_b.angle_prev -= offset_b.cross(impulse) * body_b.inverse_inertia;
            }
        }
    }
}
