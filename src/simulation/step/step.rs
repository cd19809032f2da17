use crate::core::events::EventSource;
use crate::core::ids::{BodyHandle, ConstraintHandle};
use crate::core::{clamp, BASE_DELTA};
use crate::domain::body::Bodies;
use crate::systems::pairs::{PairId, Pairs};
use crate::systems::sleeping::{self, SleepTransition};
use crate::systems::{constraint_solver, resolver};

use super::options::Gravity;
use super::{CollisionEvent, Engine, PerfTimer, SleepEvent, StepEvent};

/// Largest delta (ms) that keeps the solver stable
const MAX_DELTA: f64 = BASE_DELTA;

pub(super) fn update(engine: &mut Engine, delta: f64) {
    let started = PerfTimer::start();
    let mut lap = started;
    let perf_on = engine.perf_enabled;
    if perf_on {
        engine.perf_stats.reset();
    }

    if delta > MAX_DELTA {
        engine
            .world
            .logger_mut()
            .warn_once("Engine::update: delta is recommended to be at most 16.667 ms");
    }

    let delta = delta * engine.timing.time_scale;
    engine.timing.timestamp += delta;
    engine.timing.last_delta = delta;

    let event = StepEvent {
        timestamp: engine.timing.timestamp,
        delta,
    };
    engine.events.before_update.trigger(EventSource::Engine, event);

    // === GATHER ===
    let root = engine.world.root();
    let all_bodies = engine.world.all_bodies(root);
    let all_constraints = engine.world.all_constraints(root);
    if engine.world.is_modified() {
        engine.detector.set_bodies(&all_bodies);
        engine.world.set_modified(root, false, false, true);
    }

    // === SLEEPING ===
    if perf_on {
        lap.lap_ms();
    }
    if engine.enable_sleeping {
        sleeping::update(&mut engine.world.bodies, &all_bodies, delta, &mut engine.sleep_changes);
    }
    if perf_on {
        engine.perf_stats.sleeping_ms = lap.lap_ms();
    }

    // === INTEGRATION ===
    apply_gravity(&mut engine.world.bodies, &all_bodies, engine.gravity);
    if delta > 0.0 {
        for &handle in all_bodies.iter() {
            if !engine.world.bodies[handle].is_frozen() {
                engine.world.bodies.update(handle, delta);
            }
        }
    }
    if perf_on {
        engine.perf_stats.integrate_ms = lap.lap_ms();
    }

    engine.events.before_solve.trigger(EventSource::Engine, event);

    // === CONSTRAINTS (first pass) ===
    solve_constraints(engine, &all_bodies, &all_constraints, delta);
    if perf_on {
        engine.perf_stats.constraints_ms = lap.lap_ms();
    }

    // === DETECTION ===
    let collisions = engine.detector.collisions(&engine.world.bodies, Some(&engine.pairs));
    if perf_on {
        engine.perf_stats.collision_count = collisions.len() as u32;
        engine.perf_stats.broadphase_ms = lap.lap_ms();
    }

    engine.pairs.update(collisions, &engine.world.bodies, engine.timing.timestamp);
    if engine.enable_sleeping {
        sleeping::after_collisions(&engine.pairs, &mut engine.world.bodies, &mut engine.sleep_changes);
    }
    if perf_on {
        engine.perf_stats.pairs_ms = lap.lap_ms();
    }

    if !engine.pairs.collision_start.is_empty() && !engine.events.collision_start.is_empty() {
        let data = collision_event(&engine.pairs, &engine.pairs.collision_start, event);
        engine.events.collision_start.trigger(EventSource::Engine, data);
    }

    // === POSITION SOLVE ===
    let position_damping = clamp(20.0 / engine.position_iterations as f64, 0.0, 1.0);
    resolver::pre_solve_position(engine.pairs.list(), &mut engine.world.bodies);
    for _ in 0..engine.position_iterations {
        resolver::solve_position(engine.pairs.list_mut(), &mut engine.world.bodies, delta, position_damping);
    }
    resolver::post_solve_position(&mut engine.world.bodies, &all_bodies);
    if perf_on {
        engine.perf_stats.position_ms = lap.lap_ms();
    }

    // === CONSTRAINTS (second pass) ===
    solve_constraints(engine, &all_bodies, &all_constraints, delta);
    if perf_on {
        engine.perf_stats.constraints_ms += lap.lap_ms();
    }

    // === VELOCITY SOLVE ===
    resolver::pre_solve_velocity(engine.pairs.list(), &mut engine.world.bodies);
    for _ in 0..engine.velocity_iterations {
        resolver::solve_velocity(engine.pairs.list_mut(), &mut engine.world.bodies, delta);
    }
    for &handle in all_bodies.iter() {
        engine.world.bodies[handle].update_velocities();
    }
    if perf_on {
        engine.perf_stats.velocity_ms = lap.lap_ms();
    }

    if !engine.pairs.collision_active.is_empty() && !engine.events.collision_active.is_empty() {
        let data = collision_event(&engine.pairs, &engine.pairs.collision_active, event);
        engine.events.collision_active.trigger(EventSource::Engine, data);
    }
    if !engine.pairs.collision_end.is_empty() && !engine.events.collision_end.is_empty() {
        let data = CollisionEvent {
            pairs: engine.pairs.collision_end.clone(),
            timestamp: event.timestamp,
            delta,
        };
        engine.events.collision_end.trigger(EventSource::Engine, data);
    }

    // clear force accumulators
    for &handle in all_bodies.iter() {
        let body = &mut engine.world.bodies[handle];
        body.force.x = 0.0;
        body.force.y = 0.0;
        body.torque = 0.0;
    }

    flush_sleep_changes(engine);
    engine.events.after_update.trigger(EventSource::Engine, event);

    engine.timing.last_elapsed = started.elapsed_ms();
    if perf_on {
        let stats = &mut engine.perf_stats;
        stats.step_ms = engine.timing.last_elapsed;
        stats.body_count = all_bodies.len() as u32;
        stats.constraint_count = all_constraints.len() as u32;
        stats.pair_count = engine.pairs.len() as u32;
        stats.active_contacts = engine.pairs.active_contact_count() as u32;
    }
}

fn apply_gravity(bodies: &mut Bodies, handles: &[BodyHandle], gravity: Gravity) {
    if (gravity.x == 0.0 && gravity.y == 0.0) || gravity.scale == 0.0 {
        return;
    }
    for &handle in handles.iter() {
        let body = &mut bodies[handle];
        if body.is_frozen() {
            continue;
        }
        body.force.x += body.mass * gravity.x * gravity.scale;
        body.force.y += body.mass * gravity.y * gravity.scale;
    }
}

fn solve_constraints(engine: &mut Engine, bodies: &[BodyHandle], constraints: &[ConstraintHandle], delta: f64) {
    let world = &mut engine.world;
    constraint_solver::pre_solve_all(&mut world.bodies, bodies);
    for _ in 0..engine.constraint_iterations {
        constraint_solver::solve_all(&mut world.constraints, constraints, &mut world.bodies, delta);
    }
    constraint_solver::post_solve_all(&mut world.bodies, bodies, &mut engine.sleep_changes);
}

fn collision_event(pairs: &Pairs, ids: &[PairId], step: StepEvent) -> CollisionEvent {
    CollisionEvent {
        pairs: ids.iter().filter_map(|id| pairs.get(*id).cloned()).collect(),
        timestamp: step.timestamp,
        delta: step.delta,
    }
}

/// Deliver the sleep transitions collected so far to the sleep observers
pub(super) fn flush_sleep_changes(engine: &mut Engine) {
    for change in std::mem::take(&mut engine.sleep_changes) {
        let data = SleepEvent {
            body: change.body,
            body_id: engine.world.bodies[change.body].id,
        };
        let source = EventSource::Body(change.body);
        match change.transition {
            SleepTransition::Start => engine.events.sleep_start.trigger(source, data),
            SleepTransition::End => engine.events.sleep_end.trigger(source, data),
        }
    }
}
