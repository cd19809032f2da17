//! Geometry primitives: vectors, vertex sets, edge axes, bounding boxes

pub mod axes;
pub mod bounds;
pub mod vector;
pub mod vertices;

pub use bounds::Bounds;
pub use vector::Vector;
pub use vertices::Vertex;
