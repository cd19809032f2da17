use serde::Serialize;

use super::vector::Vector;
use super::vertices::Point;

/// Axis aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Bounds {
    pub min: Vector,
    pub max: Vector,
}

impl Bounds {
    pub fn from_points<P: Point>(points: &[P]) -> Self {
        let mut bounds = Bounds {
            min: Vector::ZERO,
            max: Vector::ZERO,
        };
        bounds.update(points, None);
        bounds
    }

    /// Refit to `points`, then grow in the direction of `velocity` so fast
    /// bodies still reach the broadphase.
    pub fn update<P: Point>(&mut self, points: &[P], velocity: Option<Vector>) {
        self.min = Vector::new(f64::INFINITY, f64::INFINITY);
        self.max = Vector::new(f64::NEG_INFINITY, f64::NEG_INFINITY);

        for p in points {
            let p = p.point();
            if p.x > self.max.x {
                self.max.x = p.x;
            }
            if p.x < self.min.x {
                self.min.x = p.x;
            }
            if p.y > self.max.y {
                self.max.y = p.y;
            }
            if p.y < self.min.y {
                self.min.y = p.y;
            }
        }

        if let Some(velocity) = velocity {
            if velocity.x > 0.0 {
                self.max.x += velocity.x;
            } else {
                self.min.x += velocity.x;
            }
            if velocity.y > 0.0 {
                self.max.y += velocity.y;
            } else {
                self.min.y += velocity.y;
            }
        }
    }

    pub fn contains(&self, point: Vector) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x && self.max.y >= other.min.y && self.min.y <= other.max.y
    }

    pub fn translate(&mut self, offset: Vector) {
        self.min += offset;
        self.max += offset;
    }

    /// Move so that `min` lands on `position`
    pub fn shift(&mut self, position: Vector) {
        let delta_x = self.max.x - self.min.x;
        let delta_y = self.max.y - self.min.y;
        self.min = position;
        self.max = Vector::new(position.x + delta_x, position.y + delta_y);
    }
}
