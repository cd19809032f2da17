use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::core::error::EngineError;
use crate::core::ids::BodyHandle;
use crate::core::math::Vector;
use crate::domain::body::BodyOptions;
use crate::domain::constraint::ConstraintOptions;

use super::perf_stats::PerfStats;
use super::{CollisionEvent, Engine, EngineOptions, SleepEvent};

/// One queued event as the host sees it
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum HostEvent {
    #[serde(rename_all = "camelCase")]
    Collision { name: &'static str, timestamp: f64, pairs: Vec<[u32; 2]> },
    #[serde(rename_all = "camelCase")]
    Sleep { name: &'static str, body_id: u32 },
}

type EventQueue = Rc<RefCell<Vec<HostEvent>>>;

fn to_js(e: EngineError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn collision_listener(queue: &EventQueue) -> impl FnMut(&crate::core::events::Event<CollisionEvent>) + 'static {
    let queue = queue.clone();
    move |e| {
        queue.borrow_mut().push(HostEvent::Collision {
            name: e.name,
            timestamp: e.data.timestamp,
            pairs: e.data.pairs.iter().map(|p| [p.id.a, p.id.b]).collect(),
        });
    }
}

fn sleep_listener(queue: &EventQueue) -> impl FnMut(&crate::core::events::Event<SleepEvent>) + 'static {
    let queue = queue.clone();
    move |e| {
        queue.borrow_mut().push(HostEvent::Sleep {
            name: e.name,
            body_id: e.data.body_id,
        });
    }
}

#[wasm_bindgen]
pub struct Simulation {
    engine: Engine,
    queue: EventQueue,
}

impl Simulation {
    fn wrap(mut engine: Engine) -> Self {
        let queue: EventQueue = Rc::new(RefCell::new(Vec::new()));
        let events = &mut engine.events;
        events.collision_start.on(collision_listener(&queue));
        events.collision_end.on(collision_listener(&queue));
        events.sleep_start.on(sleep_listener(&queue));
        events.sleep_end.on(sleep_listener(&queue));
        Self { engine, queue }
    }

    fn handle(&self, id: u32) -> Result<BodyHandle, JsValue> {
        self.engine
            .world()
            .bodies
            .find(id)
            .ok_or_else(|| to_js(EngineError::UnknownBody { id }))
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }
}

#[wasm_bindgen]
impl Simulation {
    /// Create a simulation with default options
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::wrap(Engine::new(EngineOptions::default()))
    }

    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: String) -> Result<Simulation, JsValue> {
        let engine = Engine::from_json(&json).map_err(to_js)?;
        Ok(Self::wrap(engine))
    }

    #[wasm_bindgen(getter)]
    pub fn timestamp(&self) -> f64 { self.engine.timing().timestamp }

    #[wasm_bindgen(getter)]
    pub fn body_count(&self) -> usize { self.engine.world().bodies.len() }

    #[wasm_bindgen(getter)]
    pub fn pair_count(&self) -> usize { self.engine.pairs().len() }

    /// Enable or disable per-step perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.engine.enable_perf_metrics(enabled);
    }

    /// Get last step perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        self.engine.get_perf_stats()
    }

    pub fn set_gravity(&mut self, x: f64, y: f64, scale: f64) {
        self.engine.set_gravity(x, y, scale);
    }

    pub fn set_enable_sleeping(&mut self, enabled: bool) {
        self.engine.set_enable_sleeping(enabled);
    }

    pub fn set_time_scale(&mut self, time_scale: f64) {
        self.engine.set_time_scale(time_scale);
    }

    pub fn set_iterations(&mut self, position: u32, velocity: u32, constraint: u32) {
        self.engine.set_position_iterations(position);
        self.engine.set_velocity_iterations(velocity);
        self.engine.set_constraint_iterations(constraint);
    }

    // === BODIES & CONSTRAINTS ===

    /// Add a body described by JSON `BodyOptions`. Returns the body id.
    pub fn add_body(&mut self, json: String) -> Result<u32, JsValue> {
        let options = BodyOptions::from_json(&json).map_err(to_js)?;
        let handle = self.engine.add_body(&options).map_err(to_js)?;
        Ok(self.engine.body(handle).id)
    }

    /// Add a constraint described by JSON `ConstraintOptions`. Returns the constraint id.
    pub fn add_constraint(&mut self, json: String) -> Result<u32, JsValue> {
        let options = ConstraintOptions::from_json(&json).map_err(to_js)?;
        let handle = self.engine.add_constraint(&options).map_err(to_js)?;
        Ok(self.engine.world().constraints[handle].id)
    }

    pub fn remove_body(&mut self, id: u32) -> bool {
        self.engine.remove_body(id)
    }

    pub fn remove_constraint(&mut self, id: u32) -> bool {
        self.engine.remove_constraint(id)
    }

    pub fn set_sleeping(&mut self, id: u32, is_sleeping: bool) -> Result<(), JsValue> {
        let handle = self.handle(id)?;
        self.engine.set_sleeping(handle, is_sleeping);
        Ok(())
    }

    pub fn apply_force(&mut self, id: u32, x: f64, y: f64, force_x: f64, force_y: f64) -> Result<(), JsValue> {
        let handle = self.handle(id)?;
        self.engine
            .apply_force(handle, Vector::new(x, y), Vector::new(force_x, force_y));
        Ok(())
    }

    pub fn set_velocity(&mut self, id: u32, x: f64, y: f64) -> Result<(), JsValue> {
        let handle = self.handle(id)?;
        self.engine.world_mut().bodies[handle].set_velocity(Vector::new(x, y));
        Ok(())
    }

    /// Reset collision state (pairs and broadphase)
    pub fn clear(&mut self) {
        self.engine.clear();
    }

    /// Step the simulation forward by `delta` ms
    pub fn step(&mut self, delta: f64) {
        self.engine.update(delta);
    }

    // === RENDER READS ===

    /// Flat `[id, x, y, angle, ...]` for every body in the world
    pub fn positions(&mut self) -> Vec<f64> {
        let root = self.engine.world().root();
        let handles = self.engine.world_mut().all_bodies(root);
        let bodies = &self.engine.world().bodies;
        let mut out = Vec::with_capacity(handles.len() * 4);
        for handle in handles {
            let body = &bodies[handle];
            out.extend_from_slice(&[body.id as f64, body.position.x, body.position.y, body.angle]);
        }
        out
    }

    /// Flat `[x0, y0, x1, y1, ...]` outline of a body (the hull for compounds)
    pub fn body_vertices(&self, id: u32) -> Result<Vec<f64>, JsValue> {
        let handle = self.handle(id)?;
        let body = self.engine.body(handle);
        Ok(body.vertices.iter().flat_map(|v| [v.x, v.y]).collect())
    }

    /// `[min_x, min_y, max_x, max_y]`
    pub fn body_bounds(&self, id: u32) -> Result<Vec<f64>, JsValue> {
        let handle = self.handle(id)?;
        let bounds = self.engine.body(handle).bounds;
        Ok(vec![bounds.min.x, bounds.min.y, bounds.max.x, bounds.max.y])
    }

    pub fn is_sleeping(&self, id: u32) -> Result<bool, JsValue> {
        let handle = self.handle(id)?;
        Ok(self.engine.body(handle).is_sleeping)
    }

    /// Collision and sleep events since the last drain, as a JSON array
    pub fn drain_events_json(&mut self) -> String {
        let events = std::mem::take(&mut *self.queue.borrow_mut());
        serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn timing_json(&self) -> String {
        serde_json::to_string(&self.engine.timing()).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_json(x: f64, y: f64, is_static: bool) -> String {
        format!(
            r#"{{"position":{{"x":{x},"y":{y}}},"isStatic":{is_static},"vertices":[{{"x":-20,"y":-20}},{{"x":20,"y":-20}},{{"x":20,"y":20}},{{"x":-20,"y":20}}]}}"#
        )
    }

    #[test]
    fn events_are_queued_and_drained_as_json() {
        let mut sim = Simulation::new();
        let ground = sim.add_body(square_json(0.0, 0.0, true)).unwrap();
        let falling = sim.add_body(square_json(30.0, 0.0, false)).unwrap();
        assert_ne!(ground, falling);

        sim.step(1000.0 / 60.0);
        let json = sim.drain_events_json();
        assert!(json.contains("\"collisionStart\""), "{json}");
        assert_eq!(sim.drain_events_json(), "[]");
    }

    #[test]
    fn positions_are_flat_quads() {
        let mut sim = Simulation::new();
        let id = sim.add_body(square_json(100.0, 50.0, true)).unwrap();
        let flat = sim.positions();
        assert_eq!(flat, vec![id as f64, 100.0, 50.0, 0.0]);
        assert_eq!(sim.body_bounds(id).unwrap(), vec![80.0, 30.0, 120.0, 70.0]);
        assert_eq!(sim.body_vertices(id).unwrap().len(), 8);
    }
}
