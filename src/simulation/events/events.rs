use serde::Serialize;

use crate::core::events::Observers;
use crate::core::ids::BodyHandle;
use crate::systems::pairs::Pair;

/// Payload of `beforeUpdate`, `beforeSolve` and `afterUpdate`
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StepEvent {
    pub timestamp: f64,
    pub delta: f64,
}

/// Payload of the collision events. Pairs are snapshots taken when the event fired.
#[derive(Clone, Debug, Serialize)]
pub struct CollisionEvent {
    pub pairs: Vec<Pair>,
    pub timestamp: f64,
    pub delta: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepEvent {
    pub body: BodyHandle,
    pub body_id: u32,
}

#[derive(Debug)]
pub struct EngineEvents {
    pub before_update: Observers<StepEvent>,
    pub before_solve: Observers<StepEvent>,
    pub after_update: Observers<StepEvent>,
    pub collision_start: Observers<CollisionEvent>,
    pub collision_active: Observers<CollisionEvent>,
    pub collision_end: Observers<CollisionEvent>,
    pub sleep_start: Observers<SleepEvent>,
    pub sleep_end: Observers<SleepEvent>,
}

impl Default for EngineEvents {
    fn default() -> Self {
        Self {
            before_update: Observers::new("beforeUpdate"),
            before_solve: Observers::new("beforeSolve"),
            after_update: Observers::new("afterUpdate"),
            collision_start: Observers::new("collisionStart"),
            collision_active: Observers::new("collisionActive"),
            collision_end: Observers::new("collisionEnd"),
            sleep_start: Observers::new("sleepStart"),
            sleep_end: Observers::new("sleepEnd"),
        }
    }
}
