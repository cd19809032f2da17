//! Resolver - sequential impulse contact solver
//!
//! Positions are corrected first by accumulating a per-body position
//! impulse, then velocities are corrected by nudging `position_prev` and
//! `angle_prev` (velocity is implicit in the position history).

mod position;
mod velocity;

pub use position::{post_solve_position, pre_solve_position, solve_position};
pub use velocity::{pre_solve_velocity, solve_velocity};

const RESTING_THRESH: f64 = 2.0;
const RESTING_THRESH_TANGENT: f64 = 2.449_489_742_783_178; // sqrt(6)
const POSITION_DAMPEN: f64 = 0.9;
const POSITION_WARMING: f64 = 0.8;
const FRICTION_NORMAL_MULTIPLIER: f64 = 5.0;
const FRICTION_MAX_STATIC: f64 = f64::MAX;
