use crate::core::log::Logger;
use crate::domain::world::World;
use crate::spatial::Detector;
use crate::systems::pairs::Pairs;

use super::options::{EngineOptions, Timing};
use super::perf_stats::PerfStats;
use super::{Engine, EngineEvents};

pub(super) fn create_engine(options: &EngineOptions) -> Engine {
    let logger = Logger::new(options.log_level);
    logger.debug(&format!(
        "engine created: {} position / {} velocity / {} constraint iterations",
        options.position_iterations, options.velocity_iterations, options.constraint_iterations
    ));

    Engine {
        world: World::new(logger),
        pairs: Pairs::new(),
        detector: Detector::new(),
        events: EngineEvents::default(),
        gravity: options.gravity,
        timing: Timing {
            time_scale: options.time_scale,
            ..Timing::default()
        },
        position_iterations: options.position_iterations,
        velocity_iterations: options.velocity_iterations,
        constraint_iterations: options.constraint_iterations,
        enable_sleeping: options.enable_sleeping,
        sleep_changes: Vec::new(),
        perf_enabled: false,
        perf_stats: PerfStats::default(),
    }
}
