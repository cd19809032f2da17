//! Engine - owns a world and advances it one step at a time
//!
//! The step pipeline lives in `step/`, option parsing and setters in
//! `init/`, world edits in `commands/`, and the JS binding in `facade`.

use crate::core::error::EngineError;
use crate::core::ids::{BodyHandle, ConstraintHandle};
use crate::core::math::Vector;
use crate::domain::body::{Body, BodyOptions};
use crate::domain::constraint::ConstraintOptions;
use crate::domain::world::World;
use crate::spatial::Detector;
use crate::systems::pairs::Pairs;
use crate::systems::sleeping::SleepChange;

#[path = "perf/perf_timer.rs"]
mod perf_timer;
#[path = "perf/perf_stats.rs"]
mod perf_stats;
#[path = "init/options.rs"]
mod options;
#[path = "init/init.rs"]
mod init;
#[path = "init/settings.rs"]
mod settings;
#[path = "events/events.rs"]
mod events;
#[path = "step/step.rs"]
mod step;
#[path = "commands/commands.rs"]
mod commands;
mod facade;

pub use events::{CollisionEvent, EngineEvents, SleepEvent, StepEvent};
pub use facade::Simulation;
pub use options::{EngineOptions, Gravity, Timing};
pub use perf_stats::PerfStats;

use perf_timer::PerfTimer;

pub struct Engine {
    world: World,
    pairs: Pairs,
    detector: Detector,
    pub events: EngineEvents,

    // Settings
    gravity: Gravity,
    timing: Timing,
    position_iterations: u32,
    velocity_iterations: u32,
    constraint_iterations: u32,
    enable_sleeping: bool,

    // Sleep transitions waiting to be delivered
    sleep_changes: Vec<SleepChange>,

    // Perf metrics
    perf_enabled: bool,
    perf_stats: PerfStats,
}

impl Engine {
    pub fn new(options: EngineOptions) -> Self {
        init::create_engine(&options)
    }

    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let options = EngineOptions::from_json(json)?;
        Ok(Self::new(options))
    }

    pub fn world(&self) -> &World { &self.world }

    pub fn world_mut(&mut self) -> &mut World { &mut self.world }

    pub fn pairs(&self) -> &Pairs { &self.pairs }

    pub fn detector(&self) -> &Detector { &self.detector }

    pub fn timing(&self) -> Timing { self.timing }

    pub fn gravity(&self) -> Gravity { self.gravity }

    pub fn is_sleeping_enabled(&self) -> bool { self.enable_sleeping }

    pub fn position_iterations(&self) -> u32 { self.position_iterations }

    pub fn velocity_iterations(&self) -> u32 { self.velocity_iterations }

    pub fn constraint_iterations(&self) -> u32 { self.constraint_iterations }

    /// Enable or disable per-step perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        settings::enable_perf_metrics(self, enabled);
    }

    /// Get last step perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        settings::get_perf_stats(self)
    }

    pub fn set_gravity(&mut self, x: f64, y: f64, scale: f64) {
        settings::set_gravity(self, x, y, scale);
    }

    pub fn set_enable_sleeping(&mut self, enabled: bool) {
        settings::set_enable_sleeping(self, enabled);
    }

    pub fn set_time_scale(&mut self, time_scale: f64) {
        settings::set_time_scale(self, time_scale);
    }

    pub fn set_position_iterations(&mut self, iterations: u32) {
        settings::set_position_iterations(self, iterations);
    }

    pub fn set_velocity_iterations(&mut self, iterations: u32) {
        settings::set_velocity_iterations(self, iterations);
    }

    pub fn set_constraint_iterations(&mut self, iterations: u32) {
        settings::set_constraint_iterations(self, iterations);
    }

    /// Create a body and add it to the root composite
    pub fn add_body(&mut self, options: &BodyOptions) -> Result<BodyHandle, EngineError> {
        commands::add_body(self, options)
    }

    /// Create a constraint and add it to the root composite
    pub fn add_constraint(&mut self, options: &ConstraintOptions) -> Result<ConstraintHandle, EngineError> {
        commands::add_constraint(self, options)
    }

    pub fn remove_body(&mut self, id: u32) -> bool {
        commands::remove_body(self, id)
    }

    pub fn remove_constraint(&mut self, id: u32) -> bool {
        commands::remove_constraint(self, id)
    }

    pub fn body(&self, handle: BodyHandle) -> &Body {
        &self.world.bodies[handle]
    }

    pub fn body_by_id(&self, id: u32) -> Option<&Body> {
        self.world.bodies.find(id).map(|h| &self.world.bodies[h])
    }

    pub fn set_sleeping(&mut self, handle: BodyHandle, is_sleeping: bool) {
        commands::set_sleeping(self, handle, is_sleeping);
    }

    pub fn apply_force(&mut self, handle: BodyHandle, position: Vector, force: Vector) {
        commands::apply_force(self, handle, position, force);
    }

    /// Drop all pairs and broadphase state
    pub fn clear(&mut self) {
        commands::clear(self);
    }

    /// Take over `other`'s world, replacing this engine's
    pub fn merge(&mut self, other: Engine) {
        commands::merge(self, other);
    }

    /// Advance the simulation by `delta` ms (scaled by `timing.time_scale`)
    pub fn update(&mut self, delta: f64) {
        step::update(self, delta);
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(EngineOptions::default())
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
