//! Collision record produced by the narrowphase

mod sat;

pub use sat::collides;

use serde::Serialize;

use crate::core::ids::BodyHandle;
use crate::core::math::{Vector, Vertex};
use crate::systems::pairs::PairId;

/// Overlap between two convex parts. `body_a` always has the lower id.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Collision {
    /// Pair this collision updates, when one already exists
    pub pair: Option<PairId>,
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    pub parent_a: BodyHandle,
    pub parent_b: BodyHandle,
    pub depth: f64,
    /// Minimum translation axis, pointing from B towards A
    pub normal: Vector,
    pub tangent: Vector,
    pub penetration: Vector,
    /// One or two contact vertices
    pub supports: Vec<Vertex>,
}

impl Collision {
    pub fn support_points(&self) -> Vec<Vector> {
        self.supports.iter().map(Vertex::point).collect()
    }
}
