//! Separating axis test between two convex parts

use crate::core::ids::BodyHandle;
use crate::core::math::{vertices, Vector, Vertex};
use crate::domain::body::{Bodies, Body};
use crate::systems::pairs::{PairId, Pairs};

use super::Collision;

struct Overlap {
    overlap: f64,
    axis: Vector,
}

/// Smallest projected overlap of two vertex sets over `axes`. Stops at the
/// first separating axis.
fn overlap_axes(vertices_a: &[Vertex], vertices_b: &[Vertex], axes: &[Vector]) -> Overlap {
    let mut result = Overlap {
        overlap: f64::MAX,
        axis: Vector::ZERO,
    };

    for &axis in axes.iter() {
        let (min_a, max_a) = project(vertices_a, axis);
        let (min_b, max_b) = project(vertices_b, axis);

        let overlap = (max_a - min_b).min(max_b - min_a);
        if overlap < result.overlap {
            result.overlap = overlap;
            result.axis = axis;
            if overlap <= 0.0 {
                break;
            }
        }
    }

    result
}

#[inline]
fn project(vertices: &[Vertex], axis: Vector) -> (f64, f64) {
    let mut min = vertices[0].point().dot(axis);
    let mut max = min;
    for vertex in vertices.iter().skip(1) {
        let dot = vertex.point().dot(axis);
        if dot > max {
            max = dot;
        } else if dot < min {
            min = dot;
        }
    }
    (min, max)
}

/// The vertex of `body_b` deepest along `normal * direction` as seen from
/// `body_a`'s position, plus whichever neighbour of it is deeper.
fn find_supports(body_a: &Body, body_b: &Body, normal: Vector, direction: f64) -> [Vertex; 2] {
    let vertices = &body_b.vertices;
    let count = vertices.len();
    let position = body_a.position;
    let normal = normal * direction;
    let distance = |v: &Vertex| normal.x * (position.x - v.x) + normal.y * (position.y - v.y);

    let mut nearest = f64::MAX;
    let mut vertex_a = vertices[0];
    for vertex in vertices.iter() {
        let d = distance(vertex);
        if d < nearest {
            nearest = d;
            vertex_a = *vertex;
        }
    }

    let vertex_c = vertices[(count + vertex_a.index - 1) % count];
    let vertex_b = vertices[(vertex_a.index + 1) % count];
    if distance(&vertex_b) < distance(&vertex_c) {
        [vertex_a, vertex_b]
    } else {
        [vertex_a, vertex_c]
    }
}

/// Test two parts. Returns `None` when a separating axis exists.
///
/// When `pairs` is given and already tracks these parts, the collision is
/// tagged with that pair's id.
pub fn collides(bodies: &Bodies, a: BodyHandle, b: BodyHandle, pairs: Option<&Pairs>) -> Option<Collision> {
    let (part_a, part_b) = (&bodies[a], &bodies[b]);
    if part_a.vertices.is_empty() || part_b.vertices.is_empty() {
        return None;
    }

    let overlap_ab = overlap_axes(&part_a.vertices, &part_b.vertices, &part_a.axes);
    if overlap_ab.overlap <= 0.0 {
        return None;
    }
    let overlap_ba = overlap_axes(&part_b.vertices, &part_a.vertices, &part_b.axes);
    if overlap_ba.overlap <= 0.0 {
        return None;
    }

    let (body_a, body_b) = if part_a.id < part_b.id { (part_a, part_b) } else { (part_b, part_a) };
    let id = PairId::new(body_a.id, body_b.id);
    let pair = pairs.and_then(|p| p.get(id)).map(|_| id);

    let min = if overlap_ab.overlap < overlap_ba.overlap { overlap_ab } else { overlap_ba };

    let offset = body_b.position - body_a.position;
    let normal = if min.axis.dot(offset) < 0.0 { min.axis } else { -min.axis };
    let tangent = Vector::new(-normal.y, normal.x);
    let depth = min.overlap;

    let mut supports = Vec::with_capacity(2);
    let supports_b = find_supports(body_a, body_b, normal, 1.0);
    for vertex in supports_b.iter() {
        if vertices::contains(&body_a.vertices, vertex.point()) {
            supports.push(*vertex);
        }
    }

    if supports.len() < 2 {
        let supports_a = find_supports(body_b, body_a, normal, -1.0);
        for vertex in supports_a.iter() {
            if supports.len() < 2 && vertices::contains(&body_b.vertices, vertex.point()) {
                supports.push(*vertex);
            }
        }
    }

    if supports.is_empty() {
        supports.push(supports_b[0]);
    }

    Some(Collision {
        pair,
        body_a: body_a.handle,
        body_b: body_b.handle,
        parent_a: body_a.parent,
        parent_b: body_b.parent,
        depth,
        normal,
        tangent,
        penetration: normal * depth,
        supports,
    })
}
