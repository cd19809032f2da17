//! Constraint - a distance link between two anchors
//!
//! Each anchor is either a body plus a local offset, or a fixed world point
//! when the body is absent. Solving lives in `systems::constraint_solver`.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::core::error::EngineError;
use crate::core::ids::{BodyHandle, ConstraintHandle, IdAllocator};
use crate::core::math::Vector;
use crate::domain::body::Bodies;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConstraintRender {
    pub visible: bool,
    pub line_width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_style: Option<String>,
    pub anchors: bool,
}

impl Default for ConstraintRender {
    fn default() -> Self {
        Self {
            visible: true,
            line_width: 2.0,
            stroke_style: None,
            anchors: true,
        }
    }
}

/// Construction options. Bodies are referred to by id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConstraintOptions {
    pub label: Option<String>,
    pub body_a: Option<u32>,
    pub body_b: Option<u32>,
    /// Offset from body A, or a world point when there is no body A
    pub point_a: Option<Vector>,
    pub point_b: Option<Vector>,
    /// Rest length. Defaults to the initial anchor distance.
    pub length: Option<f64>,
    /// Defaults to 1 for links with a length, 0.7 for pins
    pub stiffness: Option<f64>,
    pub damping: f64,
    pub angular_stiffness: f64,
    pub render: ConstraintRender,
}

impl ConstraintOptions {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let options: ConstraintOptions = serde_json::from_str(json)?;
        if options.body_a.is_none() && options.body_b.is_none() {
            return Err(EngineError::invalid_options("a constraint needs bodyA or bodyB"));
        }
        if matches!(options.length, Some(length) if length < 0.0) {
            return Err(EngineError::invalid_options("length must not be negative"));
        }
        Ok(options)
    }
}

#[derive(Clone, Debug)]
pub struct Constraint {
    pub id: u32,
    pub label: String,
    pub body_a: Option<BodyHandle>,
    pub body_b: Option<BodyHandle>,
    pub point_a: Vector,
    pub point_b: Vector,
    pub length: f64,
    pub stiffness: f64,
    pub damping: f64,
    pub angular_stiffness: f64,
    /// Body angles the anchor offsets were last rotated to
    pub angle_a: f64,
    pub angle_b: f64,
    pub render: ConstraintRender,
}

impl Constraint {
    /// World position of anchor A
    pub fn point_a_world(&self, bodies: &Bodies) -> Vector {
        match self.body_a {
            Some(body) => bodies[body].position + self.point_a,
            None => self.point_a,
        }
    }

    pub fn point_b_world(&self, bodies: &Bodies) -> Vector {
        match self.body_b {
            Some(body) => bodies[body].position + self.point_b,
            None => self.point_b,
        }
    }

    pub fn current_length(&self, bodies: &Bodies) -> f64 {
        (self.point_a_world(bodies) - self.point_b_world(bodies)).magnitude()
    }

    /// At least one anchor cannot move
    pub fn is_fixed(&self, bodies: &Bodies) -> bool {
        let fixed = |body: Option<BodyHandle>| body.map_or(true, |h| bodies[h].is_static);
        fixed(self.body_a) || fixed(self.body_b)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Constraints {
    items: Vec<Constraint>,
}

impl Constraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, handle: ConstraintHandle) -> Option<&Constraint> {
        self.items.get(handle.0)
    }

    pub fn get_mut(&mut self, handle: ConstraintHandle) -> Option<&mut Constraint> {
        self.items.get_mut(handle.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.items.iter()
    }

    pub fn find(&self, id: u32) -> Option<ConstraintHandle> {
        self.items.iter().position(|c| c.id == id).map(ConstraintHandle)
    }

    pub fn create(
        &mut self,
        ids: &mut IdAllocator,
        bodies: &Bodies,
        options: &ConstraintOptions,
    ) -> Result<ConstraintHandle, EngineError> {
        let resolve = |id: Option<u32>| -> Result<Option<BodyHandle>, EngineError> {
            match id {
                Some(id) => bodies.find(id).map(Some).ok_or(EngineError::UnknownBody { id }),
                None => Ok(None),
            }
        };
        let body_a = resolve(options.body_a)?;
        let body_b = resolve(options.body_b)?;

        let point_a = options.point_a.unwrap_or(Vector::ZERO);
        let point_b = options.point_b.unwrap_or(Vector::ZERO);

        let world_a = body_a.map_or(point_a, |h| bodies[h].position + point_a);
        let world_b = body_b.map_or(point_b, |h| bodies[h].position + point_b);
        let length = options.length.unwrap_or_else(|| (world_a - world_b).magnitude());
        let stiffness = options
            .stiffness
            .unwrap_or(if length > 0.0 { 1.0 } else { 0.7 });

        let handle = ConstraintHandle(self.items.len());
        self.items.push(Constraint {
            id: ids.next_id(),
            label: options.label.clone().unwrap_or_else(|| "Constraint".to_string()),
            body_a,
            body_b,
            point_a,
            point_b,
            length,
            stiffness,
            damping: options.damping,
            angular_stiffness: options.angular_stiffness,
            angle_a: body_a.map_or(0.0, |h| bodies[h].angle),
            angle_b: body_b.map_or(0.0, |h| bodies[h].angle),
            render: options.render.clone(),
        });
        Ok(handle)
    }

    pub(crate) fn reassign_id(&mut self, handle: ConstraintHandle, id: u32) {
        self.items[handle.0].id = id;
    }
}

impl Index<ConstraintHandle> for Constraints {
    type Output = Constraint;

    fn index(&self, handle: ConstraintHandle) -> &Constraint {
        &self.items[handle.0]
    }
}

impl IndexMut<ConstraintHandle> for Constraints {
    fn index_mut(&mut self, handle: ConstraintHandle) -> &mut Constraint {
        &mut self.items[handle.0]
    }
}
