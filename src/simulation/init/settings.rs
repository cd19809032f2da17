use super::options::Gravity;
use super::perf_stats::PerfStats;
use super::Engine;

pub(super) fn enable_perf_metrics(engine: &mut Engine, enabled: bool) {
    engine.perf_enabled = enabled;
    if !enabled {
        engine.perf_stats.reset();
    }
}

pub(super) fn get_perf_stats(engine: &Engine) -> PerfStats {
    engine.perf_stats.clone()
}

pub(super) fn set_gravity(engine: &mut Engine, x: f64, y: f64, scale: f64) {
    engine.gravity = Gravity { x, y, scale };
}

pub(super) fn set_enable_sleeping(engine: &mut Engine, enabled: bool) {
    engine.enable_sleeping = enabled;
}

pub(super) fn set_time_scale(engine: &mut Engine, time_scale: f64) {
    engine.timing.time_scale = time_scale.max(0.0);
}

pub(super) fn set_position_iterations(engine: &mut Engine, iterations: u32) {
    engine.position_iterations = iterations.max(1);
}

pub(super) fn set_velocity_iterations(engine: &mut Engine, iterations: u32) {
    engine.velocity_iterations = iterations.max(1);
}

pub(super) fn set_constraint_iterations(engine: &mut Engine, iterations: u32) {
    engine.constraint_iterations = iterations;
}
