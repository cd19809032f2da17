//! Core: geometry, ids/handles, errors and logging shared by every layer

pub mod error;
pub mod events;
pub mod ids;
pub mod log;
pub mod math;

/// Baseline tick (ms) that velocities and tuning constants are normalised against
pub const BASE_DELTA: f64 = 1000.0 / 60.0;

#[inline]
pub(crate) fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
