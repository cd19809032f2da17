use serde::{Deserialize, Serialize};

/// 2D vector used for positions, directions, forces and impulses
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn magnitude(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    #[inline]
    pub fn magnitude_squared(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Rotate about the origin
    #[inline]
    pub fn rotate(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    /// Rotate about `point`
    #[inline]
    pub fn rotate_about(self, angle: f64, point: Vector) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: point.x + ((self.x - point.x) * cos - (self.y - point.y) * sin),
            y: point.y + ((self.x - point.x) * sin + (self.y - point.y) * cos),
        }
    }

    /// Unit vector in the same direction. A zero vector stays zero.
    #[inline]
    pub fn normalise(self) -> Self {
        let magnitude = self.magnitude();
        if magnitude == 0.0 {
            return Self::ZERO;
        }
        Self {
            x: self.x / magnitude,
            y: self.y / magnitude,
        }
    }

    #[inline]
    pub fn dot(self, other: Vector) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Scalar (z component) of the 2D cross product
    #[inline]
    pub fn cross(self, other: Vector) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Perpendicular vector, optionally negated
    #[inline]
    pub fn perp(self, negate: bool) -> Self {
        let sign = if negate { -1.0 } else { 1.0 };
        Self {
            x: sign * -self.y,
            y: sign * self.x,
        }
    }

    #[inline]
    pub fn div(self, scalar: f64) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

/// Cross product of the three points `(b - a) x (c - a)`
#[inline]
pub fn cross3(a: Vector, b: Vector, c: Vector) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Angle of the vector from `a` to `b` relative to the x axis
#[inline]
pub fn angle(a: Vector, b: Vector) -> f64 {
    (b.y - a.y).atan2(b.x - a.x)
}

impl std::ops::Add for Vector {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::AddAssign for Vector {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Vector {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::SubAssign for Vector {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl std::ops::Mul<f64> for Vector {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}

impl std::ops::Neg for Vector {
    type Output = Self;
    fn neg(self) -> Self {
        Self { x: -self.x, y: -self.y }
    }
}
