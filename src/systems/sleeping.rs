//! Sleeping - parks bodies that have stayed still long enough
//!
//! `motion` is a fast-rising, slow-falling filter over speed² + angular
//! speed². A body sleeps once it has been under the sleep threshold for
//! `sleep_threshold / time_scale` consecutive updates.

use serde::Serialize;

use crate::core::ids::BodyHandle;
use crate::core::BASE_DELTA;
use crate::domain::body::{Bodies, Body};
use crate::systems::pairs::Pairs;

const MOTION_WAKE_THRESHOLD: f64 = 0.18;
const MOTION_SLEEP_THRESHOLD: f64 = 0.08;
const MIN_BIAS: f64 = 0.9;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SleepTransition {
    Start,
    End,
}

/// A body that fell asleep or woke up during a step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SleepChange {
    pub body: BodyHandle,
    pub transition: SleepTransition,
}

/// Put a body to sleep or wake it. Returns the transition if the state changed.
pub fn set(body: &mut Body, is_sleeping: bool) -> Option<SleepTransition> {
    let was_sleeping = body.is_sleeping;

    if is_sleeping {
        body.is_sleeping = true;
        body.sleep_counter = body.sleep_threshold;

        body.position_impulse = crate::core::math::Vector::ZERO;
        body.position_prev = body.position;
        body.angle_prev = body.angle;
        body.speed = 0.0;
        body.angular_speed = 0.0;
        body.motion = 0.0;

        (!was_sleeping).then_some(SleepTransition::Start)
    } else {
        body.is_sleeping = false;
        body.sleep_counter = 0;

        was_sleeping.then_some(SleepTransition::End)
    }
}

fn set_and_record(bodies: &mut Bodies, handle: BodyHandle, is_sleeping: bool, changes: &mut Vec<SleepChange>) {
    if let Some(transition) = set(&mut bodies[handle], is_sleeping) {
        changes.push(SleepChange { body: handle, transition });
    }
}

/// Update motion estimates and sleep counters. Static bodies are skipped.
pub fn update(bodies: &mut Bodies, handles: &[BodyHandle], delta: f64, changes: &mut Vec<SleepChange>) {
    let time_scale = delta / BASE_DELTA;

    for &handle in handles.iter() {
        let body = &mut bodies[handle];
        if body.is_static {
            continue;
        }

        if body.force.x != 0.0 || body.force.y != 0.0 {
            set_and_record(bodies, handle, false, changes);
            continue;
        }

        let speed = body.get_speed();
        let angular_speed = body.get_angular_speed();
        let motion = speed * speed + angular_speed * angular_speed;

        let min_motion = body.motion.min(motion);
        let max_motion = body.motion.max(motion);
        body.motion = MIN_BIAS * min_motion + (1.0 - MIN_BIAS) * max_motion;

        if body.sleep_threshold > 0 && body.motion < MOTION_SLEEP_THRESHOLD {
            body.sleep_counter += 1;
            if body.sleep_counter as f64 >= body.sleep_threshold as f64 / time_scale {
                set_and_record(bodies, handle, true, changes);
            }
        } else if body.sleep_counter > 0 {
            body.sleep_counter -= 1;
        }
    }
}

/// Wake sleeping bodies hit by a moving, non-static partner
pub fn after_collisions(pairs: &Pairs, bodies: &mut Bodies, changes: &mut Vec<SleepChange>) {
    for pair in pairs.list() {
        if !pair.is_active {
            continue;
        }

        let parent_a = pair.collision.parent_a;
        let parent_b = pair.collision.parent_b;
        let (a, b) = (&bodies[parent_a], &bodies[parent_b]);

        if (a.is_sleeping && b.is_sleeping) || a.is_static || b.is_static {
            continue;
        }

        if a.is_sleeping || b.is_sleeping {
            let (sleeping, moving) = if a.is_sleeping { (parent_a, parent_b) } else { (parent_b, parent_a) };
            if bodies[moving].motion > MOTION_WAKE_THRESHOLD {
                set_and_record(bodies, sleeping, false, changes);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::IdAllocator;
    use crate::core::math::Vector;
    use crate::domain::body::BodyOptions;

    fn resting_body(sleep_threshold: u32) -> (Bodies, BodyHandle) {
        let mut bodies = Bodies::new();
        let mut ids = IdAllocator::new();
        let h = bodies
            .create(
                &mut ids,
                &BodyOptions {
                    sleep_threshold,
                    ..Default::default()
                },
            )
            .unwrap();
        (bodies, h)
    }

    #[test]
    fn still_body_sleeps_after_threshold_updates() {
        let (mut bodies, h) = resting_body(3);
        let mut changes = Vec::new();

        update(&mut bodies, &[h], BASE_DELTA, &mut changes);
        update(&mut bodies, &[h], BASE_DELTA, &mut changes);
        assert!(!bodies[h].is_sleeping);
        update(&mut bodies, &[h], BASE_DELTA, &mut changes);

        assert!(bodies[h].is_sleeping);
        assert_eq!(
            changes,
            vec![SleepChange {
                body: h,
                transition: SleepTransition::Start
            }]
        );
    }

    #[test]
    fn force_wakes_a_sleeping_body() {
        let (mut bodies, h) = resting_body(60);
        assert_eq!(set(&mut bodies[h], true), Some(SleepTransition::Start));
        assert_eq!(set(&mut bodies[h], true), None);
        assert_eq!(bodies[h].sleep_counter, 60);

        bodies[h].force = Vector::new(0.0, 1.0);
        let mut changes = Vec::new();
        update(&mut bodies, &[h], BASE_DELTA, &mut changes);

        assert!(!bodies[h].is_sleeping);
        assert_eq!(bodies[h].sleep_counter, 0);
        assert_eq!(changes[0].transition, SleepTransition::End);
    }

    #[test]
    fn motion_rises_fast_and_keeps_body_awake() {
        let (mut bodies, h) = resting_body(2);
        bodies[h].set_velocity(Vector::new(3.0, 0.0));
        let mut changes = Vec::new();

        update(&mut bodies, &[h], BASE_DELTA, &mut changes);
        // 0.9 * min(0, 9) + 0.1 * max(0, 9)
        assert!((bodies[h].motion - 0.9).abs() < 1e-9);
        update(&mut bodies, &[h], BASE_DELTA, &mut changes);
        assert!(!bodies[h].is_sleeping);
        assert!(changes.is_empty());
    }

    #[test]
    fn zero_threshold_never_sleeps() {
        let (mut bodies, h) = resting_body(0);
        let mut changes = Vec::new();
        for _ in 0..10 {
            update(&mut bodies, &[h], BASE_DELTA, &mut changes);
        }
        assert!(!bodies[h].is_sleeping);
    }
}
