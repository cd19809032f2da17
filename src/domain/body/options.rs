use serde::{Deserialize, Serialize};

use crate::core::error::EngineError;
use crate::core::math::Vector;

use super::{BodyRender, CollisionFilter};

/// Construction options for a body. Every field has a default, so JSON
/// input only needs the fields it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BodyOptions {
    pub label: String,
    pub position: Vector,
    pub angle: f64,
    /// Convex, clockwise outline. Defaults to a 40x40 square.
    pub vertices: Option<Vec<Vector>>,
    /// Child parts of a compound body, created before the parent
    pub parts: Vec<BodyOptions>,
    pub is_static: bool,
    pub is_sensor: bool,
    pub is_sleeping: bool,
    pub density: f64,
    pub restitution: f64,
    pub friction: f64,
    pub friction_static: f64,
    pub friction_air: f64,
    pub collision_filter: CollisionFilter,
    pub slop: f64,
    pub time_scale: f64,
    pub sleep_threshold: u32,
    pub circle_radius: Option<f64>,
    pub area: Option<f64>,
    pub mass: Option<f64>,
    pub inertia: Option<f64>,
    pub render: BodyRender,
}

impl Default for BodyOptions {
    fn default() -> Self {
        Self {
            label: "Body".to_string(),
            position: Vector::ZERO,
            angle: 0.0,
            vertices: None,
            parts: Vec::new(),
            is_static: false,
            is_sensor: false,
            is_sleeping: false,
            density: 0.001,
            restitution: 0.0,
            friction: 0.1,
            friction_static: 0.5,
            friction_air: 0.01,
            collision_filter: CollisionFilter::default(),
            slop: 0.05,
            time_scale: 1.0,
            sleep_threshold: 60,
            circle_radius: None,
            area: None,
            mass: None,
            inertia: None,
            render: BodyRender::default(),
        }
    }
}

impl BodyOptions {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let options: BodyOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    fn validate(&self) -> Result<(), EngineError> {
        if !(self.density > 0.0) {
            return Err(EngineError::invalid_options("density must be positive"));
        }
        if !(0.0..=1.0).contains(&self.friction_air) {
            return Err(EngineError::invalid_options("frictionAir must be within [0, 1]"));
        }
        if self.slop < 0.0 || self.friction_static < 0.0 {
            return Err(EngineError::invalid_options("slop and frictionStatic must not be negative"));
        }
        for part in self.parts.iter() {
            part.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let options = BodyOptions::from_json(
            r#"{"position":{"x":5,"y":6},"isStatic":true,"collisionFilter":{"group":-3}}"#,
        )
        .unwrap();
        assert_eq!(options.position, Vector::new(5.0, 6.0));
        assert!(options.is_static);
        assert_eq!(options.collision_filter.group, -3);
        assert_eq!(options.collision_filter.mask, 0xFFFF_FFFF);
        assert_eq!(options.friction, 0.1);
        assert_eq!(options.label, "Body");
    }

    #[test]
    fn bad_json_is_invalid_options() {
        assert!(matches!(
            BodyOptions::from_json("{\"density\": \"heavy\"}"),
            Err(EngineError::InvalidOptions { .. })
        ));
        assert!(matches!(
            BodyOptions::from_json("{\"density\": 0}"),
            Err(EngineError::InvalidOptions { .. })
        ));
    }
}
