use serde::{Deserialize, Serialize};

use crate::core::error::EngineError;
use crate::core::log::LogLevel;

/// Gravity applied as `force += mass * (x, y) * scale` every step
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Gravity {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Default for Gravity {
    fn default() -> Self {
        Self { x: 0.0, y: 1.0, scale: 0.001 }
    }
}

/// Engine clock. All values in ms.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timing {
    pub timestamp: f64,
    /// Multiplies every `delta` passed to `update`. 0 freezes the simulation.
    pub time_scale: f64,
    pub last_delta: f64,
    /// Wall time spent in the last `update`
    pub last_elapsed: f64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            timestamp: 0.0,
            time_scale: 1.0,
            last_delta: 0.0,
            last_elapsed: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineOptions {
    pub position_iterations: u32,
    pub velocity_iterations: u32,
    pub constraint_iterations: u32,
    pub enable_sleeping: bool,
    pub gravity: Gravity,
    pub time_scale: f64,
    pub log_level: LogLevel,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            position_iterations: 6,
            velocity_iterations: 4,
            constraint_iterations: 2,
            enable_sleeping: false,
            gravity: Gravity::default(),
            time_scale: 1.0,
            log_level: LogLevel::default(),
        }
    }
}

impl EngineOptions {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let options: EngineOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.position_iterations == 0 || self.velocity_iterations == 0 {
            return Err(EngineError::invalid_options(
                "positionIterations and velocityIterations must be at least 1",
            ));
        }
        if !self.time_scale.is_finite() || self.time_scale < 0.0 {
            return Err(EngineError::invalid_options("timeScale must be a non-negative number"));
        }
        if !(self.gravity.x.is_finite() && self.gravity.y.is_finite() && self.gravity.scale.is_finite()) {
            return Err(EngineError::invalid_options("gravity must be finite"));
        }
        Ok(())
    }
}
