//! Impulse2D Engine - 2D rigid body physics in WASM
//!
//! Convex bodies and distance constraints, sort-and-sweep broadphase, SAT
//! narrowphase, persistent contacts with warm starting and a sequential
//! impulse solver.
//!
//! Architecture:
//! - core/          - Math, ids, events, errors, logging
//! - domain/        - Bodies, constraints, composites, world
//! - spatial/       - Broadphase detector
//! - systems/       - Collision, pairs, resolver, constraints, sleeping
//! - simulation/    - Engine step pipeline and the JS facade

pub mod core;
pub mod domain;
pub mod spatial;
pub mod systems;
pub mod simulation;

use wasm_bindgen::prelude::*;

// Re-export wasm-bindgen-rayon for thread pool initialization
#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
pub use wasm_bindgen_rayon::init_thread_pool;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&"Impulse2D WASM engine initialized".into());
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Re-export main types
pub use crate::core::error::EngineError;
pub use crate::core::events::{Event, EventSource, ListenerId, Observers};
pub use crate::core::ids::{BodyHandle, CompositeHandle, ConstraintHandle};
pub use crate::core::log::{LogLevel, Logger};
pub use crate::core::math::{Bounds, Vector, Vertex};
pub use domain::body::{Body, BodyOptions};
pub use domain::composite::{Member, MemberKind};
pub use domain::constraint::{Constraint, ConstraintOptions};
pub use domain::world::World;
pub use simulation::{Engine, EngineOptions, PerfStats, Simulation};
