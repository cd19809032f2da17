use wasm_bindgen::prelude::*;

#[wasm_bindgen]
#[derive(Clone, Debug)]
pub struct PerfStats {
    pub(super) step_ms: f64,
    pub(super) sleeping_ms: f64,
    pub(super) integrate_ms: f64,
    pub(super) constraints_ms: f64,
    pub(super) broadphase_ms: f64,
    pub(super) pairs_ms: f64,
    pub(super) position_ms: f64,
    pub(super) velocity_ms: f64,
    pub(super) body_count: u32,
    pub(super) constraint_count: u32,
    pub(super) collision_count: u32,
    pub(super) pair_count: u32,
    pub(super) active_contacts: u32,
}

impl PerfStats {
    pub(crate) fn reset(&mut self) {
        *self = PerfStats::default();
    }
}

impl Default for PerfStats {
    fn default() -> Self {
        PerfStats {
            step_ms: 0.0,
            sleeping_ms: 0.0,
            integrate_ms: 0.0,
            constraints_ms: 0.0,
            broadphase_ms: 0.0,
            pairs_ms: 0.0,
            position_ms: 0.0,
            velocity_ms: 0.0,
            body_count: 0,
            constraint_count: 0,
            collision_count: 0,
            pair_count: 0,
            active_contacts: 0,
        }
    }
}

#[wasm_bindgen]
impl PerfStats {
    #[wasm_bindgen(getter)]
    pub fn step_ms(&self) -> f64 { self.step_ms }
    #[wasm_bindgen(getter)]
    pub fn sleeping_ms(&self) -> f64 { self.sleeping_ms }
    #[wasm_bindgen(getter)]
    pub fn integrate_ms(&self) -> f64 { self.integrate_ms }
    /// Both constraint passes together
    #[wasm_bindgen(getter)]
    pub fn constraints_ms(&self) -> f64 { self.constraints_ms }
    /// Sort and sweep plus narrowphase
    #[wasm_bindgen(getter)]
    pub fn broadphase_ms(&self) -> f64 { self.broadphase_ms }
    #[wasm_bindgen(getter)]
    pub fn pairs_ms(&self) -> f64 { self.pairs_ms }
    #[wasm_bindgen(getter)]
    pub fn position_ms(&self) -> f64 { self.position_ms }
    #[wasm_bindgen(getter)]
    pub fn velocity_ms(&self) -> f64 { self.velocity_ms }
    #[wasm_bindgen(getter)]
    pub fn body_count(&self) -> u32 { self.body_count }
    #[wasm_bindgen(getter)]
    pub fn constraint_count(&self) -> u32 { self.constraint_count }
    #[wasm_bindgen(getter)]
    pub fn collision_count(&self) -> u32 { self.collision_count }
    #[wasm_bindgen(getter)]
    pub fn pair_count(&self) -> u32 { self.pair_count }
    #[wasm_bindgen(getter)]
    pub fn active_contacts(&self) -> u32 { self.active_contacts }
}
