//! Body - a convex rigid body, or a compound of convex parts
//!
//! Bodies live in the `Bodies` arena and refer to each other by handle.
//! A simple body has `parent == handle` and `parts == [handle]`. A compound
//! body lists itself at `parts[0]`, followed by its child parts, each of
//! which points back through `parent`.
//!
//! Motion state is position based: `position_prev`/`angle_prev` carry the
//! velocity history and `velocity` is derived from them.

mod motion;
mod options;
mod properties;
mod transform;

use std::collections::HashMap;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::core::error::EngineError;
use crate::core::ids::{BodyHandle, IdAllocator};
use crate::core::math::{axes, Bounds, Vector, Vertex};
use crate::systems::sleeping;

pub use options::BodyOptions;
pub use properties::MassProperties;

/// Constant the polygon inertia is scaled by. Compensates for the
/// position-based integrator.
pub const INERTIA_SCALE: f64 = 4.0;

/// Collision filtering: bodies in the same non-zero group always (positive)
/// or never (negative) collide. Otherwise category/mask decide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollisionFilter {
    pub category: u32,
    pub mask: u32,
    pub group: i32,
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self {
            category: 0x0001,
            mask: 0xFFFF_FFFF,
            group: 0,
        }
    }
}

impl CollisionFilter {
    pub fn can_collide(&self, other: &CollisionFilter) -> bool {
        if self.group == other.group && self.group != 0 {
            return self.group > 0;
        }
        (self.mask & other.category) != 0 && (other.mask & self.category) != 0
    }
}

/// Rendering hints. Stored for the host, never read by the simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BodyRender {
    pub visible: bool,
    pub opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_style: Option<String>,
    pub line_width: f64,
}

impl Default for BodyRender {
    fn default() -> Self {
        Self {
            visible: true,
            opacity: 1.0,
            fill_style: None,
            stroke_style: None,
            line_width: 0.0,
        }
    }
}

/// Material and mass snapshot taken when a body is made static
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OriginalProperties {
    pub restitution: f64,
    pub friction: f64,
    pub mass: f64,
    pub inertia: f64,
    pub density: f64,
    pub inverse_mass: f64,
    pub inverse_inertia: f64,
}

#[derive(Clone, Debug)]
pub struct Body {
    pub id: u32,
    pub label: String,
    /// This body's own slot in the arena
    pub handle: BodyHandle,
    pub parent: BodyHandle,
    pub parts: Vec<BodyHandle>,

    // === Shape ===
    pub vertices: Vec<Vertex>,
    pub axes: Vec<Vector>,
    pub bounds: Bounds,
    pub circle_radius: Option<f64>,

    // === Motion ===
    pub position: Vector,
    pub position_prev: Vector,
    pub angle: f64,
    pub angle_prev: f64,
    pub velocity: Vector,
    pub angular_velocity: f64,
    pub speed: f64,
    pub angular_speed: f64,
    /// Step size (ms) of the last integration
    pub delta_time: f64,
    pub time_scale: f64,

    // === Accumulators ===
    pub force: Vector,
    pub torque: f64,
    pub position_impulse: Vector,
    pub constraint_impulse: Vector,
    pub constraint_angle_impulse: f64,
    pub total_contacts: usize,

    // === Mass ===
    pub area: f64,
    pub density: f64,
    pub mass: f64,
    pub inverse_mass: f64,
    pub inertia: f64,
    pub inverse_inertia: f64,

    // === Material ===
    pub restitution: f64,
    pub friction: f64,
    pub friction_static: f64,
    pub friction_air: f64,
    pub slop: f64,
    pub collision_filter: CollisionFilter,

    // === Flags ===
    pub is_static: bool,
    pub is_sensor: bool,
    pub is_sleeping: bool,
    pub motion: f64,
    pub sleep_threshold: u32,
    pub sleep_counter: u32,
    pub original: Option<OriginalProperties>,

    pub render: BodyRender,
}

impl Body {
    fn blank(id: u32, handle: BodyHandle, options: &BodyOptions) -> Self {
        Self {
            id,
            label: options.label.clone(),
            handle,
            parent: handle,
            parts: vec![handle],
            vertices: Vec::new(),
            axes: Vec::new(),
            bounds: Bounds {
                min: Vector::ZERO,
                max: Vector::ZERO,
            },
            circle_radius: options.circle_radius,
            position: options.position,
            position_prev: options.position,
            angle: 0.0,
            angle_prev: 0.0,
            velocity: Vector::ZERO,
            angular_velocity: 0.0,
            speed: 0.0,
            angular_speed: 0.0,
            delta_time: crate::core::BASE_DELTA,
            time_scale: options.time_scale,
            force: Vector::ZERO,
            torque: 0.0,
            position_impulse: Vector::ZERO,
            constraint_impulse: Vector::ZERO,
            constraint_angle_impulse: 0.0,
            total_contacts: 0,
            area: 0.0,
            density: options.density,
            mass: 0.0,
            inverse_mass: 0.0,
            inertia: 0.0,
            inverse_inertia: 0.0,
            restitution: options.restitution,
            friction: options.friction,
            friction_static: options.friction_static,
            friction_air: options.friction_air,
            slop: options.slop,
            collision_filter: options.collision_filter,
            is_static: false,
            is_sensor: options.is_sensor,
            is_sleeping: false,
            motion: 0.0,
            sleep_threshold: options.sleep_threshold,
            sleep_counter: 0,
            original: None,
            render: options.render.clone(),
        }
    }

    pub fn is_compound(&self) -> bool {
        self.parts.len() > 1
    }

    /// True for a child part of a compound body
    pub fn is_part(&self) -> bool {
        self.parent != self.handle
    }

    /// Static or sleeping: the solver leaves it where it is
    pub fn is_frozen(&self) -> bool {
        self.is_static || self.is_sleeping
    }
}

/// Arena owning every body of a world
#[derive(Clone, Debug, Default)]
pub struct Bodies {
    items: Vec<Body>,
    by_id: HashMap<u32, BodyHandle>,
}

impl Bodies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&Body> {
        self.items.get(handle.0)
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.items.get_mut(handle.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.items.iter()
    }

    pub fn find(&self, id: u32) -> Option<BodyHandle> {
        self.by_id.get(&id).copied()
    }

    pub(crate) fn reassign_id(&mut self, handle: BodyHandle, id: u32) {
        let body = &mut self.items[handle.0];
        self.by_id.remove(&body.id);
        body.id = id;
        self.by_id.insert(id, handle);
    }

    /// Parts first, then the parent with its outline and hull.
    fn build(&mut self, ids: &mut IdAllocator, options: &BodyOptions) -> Result<BodyHandle, EngineError> {
        let mut parts = Vec::with_capacity(options.parts.len());
        for part_options in options.parts.iter() {
            parts.push(self.create(ids, part_options)?);
        }

        let handle = BodyHandle(self.items.len());
        let id = ids.next_id();
        self.items.push(Body::blank(id, handle, options));
        self.by_id.insert(id, handle);

        let points = options.vertices.clone().unwrap_or_else(default_shape);
        self.items[handle.0].set_vertices(&points)?;
        if !parts.is_empty() {
            self.set_parts(handle, &parts, true)?;
        }
        Ok(handle)
    }

    /// Drop everything pushed since `start`, parts included.
    fn discard_from(&mut self, start: usize) {
        for body in self.items.drain(start..) {
            self.by_id.remove(&body.id);
        }
    }

    /// Create a body (and any nested parts) from options.
    ///
    /// Vertices describe the shape only: they are re-centred on their
    /// centroid and moved to `options.position`.
    pub fn create(&mut self, ids: &mut IdAllocator, options: &BodyOptions) -> Result<BodyHandle, EngineError> {
        let start = self.items.len();
        let handle = match self.build(ids, options) {
            Ok(handle) => handle,
            Err(e) => {
                self.discard_from(start);
                return Err(e);
            }
        };

        if options.angle != 0.0 {
            self.set_angle(handle, options.angle, false);
        }

        let body = &mut self.items[handle.0];
        if let Some(area) = options.area {
            body.area = area;
        }
        if let Some(mass) = options.mass {
            body.set_mass(mass);
        }
        if let Some(inertia) = options.inertia {
            body.set_inertia(inertia);
        }
        let velocity = body.velocity;
        body.bounds.update(&body.vertices, Some(velocity));

        if options.is_static {
            self.set_static(handle, true);
        }
        if options.is_sleeping {
            sleeping::set(&mut self.items[handle.0], true);
        }

        Ok(handle)
    }
}

fn default_shape() -> Vec<Vector> {
    vec![
        Vector::new(0.0, 0.0),
        Vector::new(40.0, 0.0),
        Vector::new(40.0, 40.0),
        Vector::new(0.0, 40.0),
    ]
}

impl Index<BodyHandle> for Bodies {
    type Output = Body;

    fn index(&self, handle: BodyHandle) -> &Body {
        &self.items[handle.0]
    }
}

impl IndexMut<BodyHandle> for Bodies {
    fn index_mut(&mut self, handle: BodyHandle) -> &mut Body {
        &mut self.items[handle.0]
    }
}

/// Rotate axes and refit bounds for a part after its vertices moved
#[inline]
pub(crate) fn refit(part: &mut Body, angle: f64, velocity: Vector) {
    if angle != 0.0 {
        axes::rotate(&mut part.axes, angle);
    }
    part.bounds.update(&part.vertices, Some(velocity));
}
