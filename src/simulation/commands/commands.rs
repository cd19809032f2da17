use crate::core::error::EngineError;
use crate::core::ids::{BodyHandle, ConstraintHandle, IdAllocator};
use crate::core::math::Vector;
use crate::domain::body::BodyOptions;
use crate::domain::composite::Member;
use crate::domain::constraint::ConstraintOptions;
use crate::systems::sleeping::{self, SleepChange};

use super::step::flush_sleep_changes;
use super::Engine;

pub(super) fn add_body(engine: &mut Engine, options: &BodyOptions) -> Result<BodyHandle, EngineError> {
    let handle = engine.world.create_body(options)?;
    let root = engine.world.root();
    engine.world.add(root, &[Member::Body(handle)]);
    Ok(handle)
}

pub(super) fn add_constraint(engine: &mut Engine, options: &ConstraintOptions) -> Result<ConstraintHandle, EngineError> {
    let handle = engine.world.create_constraint(options)?;
    let root = engine.world.root();
    engine.world.add(root, &[Member::Constraint(handle)]);
    Ok(handle)
}

/// Detach a body from the world tree. Returns false for an unknown id.
pub(super) fn remove_body(engine: &mut Engine, id: u32) -> bool {
    let Some(handle) = engine.world.bodies.find(id) else {
        return false;
    };
    let root = engine.world.root();
    engine.world.remove(root, &[Member::Body(handle)], true);
    true
}

pub(super) fn remove_constraint(engine: &mut Engine, id: u32) -> bool {
    let Some(handle) = engine.world.constraints.find(id) else {
        return false;
    };
    let root = engine.world.root();
    engine.world.remove(root, &[Member::Constraint(handle)], true);
    true
}

pub(super) fn set_sleeping(engine: &mut Engine, handle: BodyHandle, is_sleeping: bool) {
    if let Some(transition) = sleeping::set(&mut engine.world.bodies[handle], is_sleeping) {
        engine.sleep_changes.push(SleepChange { body: handle, transition });
    }
    flush_sleep_changes(engine);
}

pub(super) fn apply_force(engine: &mut Engine, handle: BodyHandle, position: Vector, force: Vector) {
    engine.world.bodies[handle].apply_force(position, force);
}

/// Forget all collision state. The detector is refilled on the next update.
pub(super) fn clear(engine: &mut Engine) {
    engine.pairs.clear();
    engine.detector.clear();
    let root = engine.world.root();
    engine.world.set_modified(root, true, false, false);
}

/// Adopt `other`'s world: collision state is reset, every body is woken and
/// given an id that cannot clash with either engine's ids.
pub(super) fn merge(engine: &mut Engine, other: Engine) {
    let mut world = other.world;
    let last = engine.world.ids_mut().peek().max(world.ids_mut().peek()).saturating_sub(1);
    world.replace_ids(IdAllocator::starting_after(last));
    engine.world = world;
    clear(engine);

    let root = engine.world.root();
    for handle in engine.world.all_bodies(root) {
        if let Some(transition) = sleeping::set(&mut engine.world.bodies[handle], false) {
            engine.sleep_changes.push(SleepChange { body: handle, transition });
        }
        let id = engine.world.ids_mut().next_id();
        engine.world.bodies.reassign_id(handle, id);
    }
    flush_sleep_changes(engine);
}
