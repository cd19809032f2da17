//! Vertex sets: convex hulls in world space with per-vertex indexing.
//!
//! All sets are expected to be convex and clockwise ordered (y axis down).

use std::cmp::Ordering;

use serde::Serialize;

use crate::core::ids::BodyHandle;

use super::vector::{self, Vector};

/// A polygon vertex, tagged with its slot in the owning hull
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    /// Position within the owning polygon
    pub index: usize,
    /// Body (or part) that owns this vertex
    pub body: BodyHandle,
    /// Edge is internal to a compound body. Only meaningful to renderers.
    pub is_internal: bool,
}

impl Vertex {
    #[inline]
    pub fn point(&self) -> Vector {
        Vector::new(self.x, self.y)
    }
}

/// Anything with a 2D position, so the hull helpers work on raw points and on vertices
pub trait Point {
    fn point(&self) -> Vector;
}

impl Point for Vector {
    #[inline]
    fn point(&self) -> Vector {
        *self
    }
}

impl Point for Vertex {
    #[inline]
    fn point(&self) -> Vector {
        Vertex::point(self)
    }
}

/// Build an indexed vertex set owned by `body`
pub fn create(points: &[Vector], body: BodyHandle) -> Vec<Vertex> {
    points
        .iter()
        .enumerate()
        .map(|(index, p)| Vertex {
            x: p.x,
            y: p.y,
            index,
            body,
            is_internal: false,
        })
        .collect()
}

/// Area weighted centroid
pub fn centre<P: Point>(vertices: &[P]) -> Vector {
    let area = area(vertices, true);
    let mut centre = Vector::ZERO;
    let n = vertices.len();
    for i in 0..n {
        let j = (i + 1) % n;
        let a = vertices[i].point();
        let b = vertices[j].point();
        let cross = a.cross(b);
        centre += (a + b) * cross;
    }
    centre.div(6.0 * area)
}

/// Arithmetic mean of the points
pub fn mean<P: Point>(vertices: &[P]) -> Vector {
    let mut sum = Vector::ZERO;
    for v in vertices {
        sum += v.point();
    }
    sum.div(vertices.len() as f64)
}

/// Polygon area, optionally signed
pub fn area<P: Point>(vertices: &[P], signed: bool) -> f64 {
    let mut area = 0.0;
    let n = vertices.len();
    if n == 0 {
        return 0.0;
    }
    let mut j = n - 1;
    for i in 0..n {
        let vj = vertices[j].point();
        let vi = vertices[i].point();
        area += (vj.x - vi.x) * (vj.y + vi.y);
        j = i;
    }
    if signed {
        area / 2.0
    } else {
        area.abs() / 2.0
    }
}

/// Moment of inertia of the polygon about the origin. Vertices must already
/// be centred on the centre of mass.
pub fn inertia<P: Point>(vertices: &[P], mass: f64) -> f64 {
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    let n = vertices.len();
    for i in 0..n {
        let j = (i + 1) % n;
        let vi = vertices[i].point();
        let vj = vertices[j].point();
        let cross = vj.cross(vi).abs();
        numerator += cross * (vj.dot(vj) + vj.dot(vi) + vi.dot(vi));
        denominator += cross;
    }
    (mass / 6.0) * (numerator / denominator)
}

pub fn translate(vertices: &mut [Vertex], offset: Vector, scalar: f64) {
    let dx = offset.x * scalar;
    let dy = offset.y * scalar;
    for v in vertices.iter_mut() {
        v.x += dx;
        v.y += dy;
    }
}

pub fn rotate(vertices: &mut [Vertex], angle: f64, point: Vector) {
    if angle == 0.0 {
        return;
    }
    let (sin, cos) = angle.sin_cos();
    for v in vertices.iter_mut() {
        let dx = v.x - point.x;
        let dy = v.y - point.y;
        v.x = point.x + (dx * cos - dy * sin);
        v.y = point.y + (dx * sin + dy * cos);
    }
}

/// Scale about `point`
pub fn scale(vertices: &mut [Vertex], scale_x: f64, scale_y: f64, point: Vector) {
    if scale_x == 1.0 && scale_y == 1.0 {
        return;
    }
    for v in vertices.iter_mut() {
        v.x = point.x + (v.x - point.x) * scale_x;
        v.y = point.y + (v.y - point.y) * scale_y;
    }
}

/// Point-in-convex-polygon test (points on an edge count as inside)
pub fn contains(vertices: &[Vertex], point: Vector) -> bool {
    let Some(last) = vertices.last() else {
        return false;
    };
    let mut vertex = last;
    for next in vertices.iter() {
        if (point.x - vertex.x) * (next.y - vertex.y) + (point.y - vertex.y) * (vertex.x - next.x) > 0.0 {
            return false;
        }
        vertex = next;
    }
    true
}

/// Sort points clockwise about their mean
pub fn clockwise_sort(points: &mut [Vector]) {
    if points.is_empty() {
        return;
    }
    let centre = mean(points);
    points.sort_by(|a, b| {
        vector::angle(centre, *a)
            .partial_cmp(&vector::angle(centre, *b))
            .unwrap_or(Ordering::Equal)
    });
}

/// Convex hull (monotone chain)
pub fn hull(points: &[Vector]) -> Vec<Vector> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| {
        let dx = a.x - b.x;
        let d = if dx != 0.0 { dx } else { a.y - b.y };
        d.partial_cmp(&0.0).unwrap_or(Ordering::Equal)
    });

    let mut lower: Vec<Vector> = Vec::with_capacity(sorted.len());
    for &p in sorted.iter() {
        while lower.len() >= 2 && vector::cross3(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Vector> = Vec::with_capacity(sorted.len());
    for &p in sorted.iter().rev() {
        while upper.len() >= 2 && vector::cross3(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }

    upper.pop();
    lower.pop();
    upper.extend(lower);
    upper
}
