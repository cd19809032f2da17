use super::vector::Vector;
use super::vertices::Point;

/// Unique edge normals of a convex polygon. Parallel edges share one axis
/// (keyed by gradient rounded to 3 decimals), so a rectangle yields 2 axes.
pub fn from_vertices<P: Point>(vertices: &[P]) -> Vec<Vector> {
    let n = vertices.len();
    let mut keys: Vec<String> = Vec::with_capacity(n);
    let mut axes: Vec<Vector> = Vec::with_capacity(n);

    for i in 0..n {
        let j = (i + 1) % n;
        let a = vertices[i].point();
        let b = vertices[j].point();
        let normal = Vector::new(b.y - a.y, a.x - b.x).normalise();
        let gradient = if normal.y == 0.0 { f64::INFINITY } else { normal.x / normal.y };
        let key = gradient_key(gradient);

        match keys.iter().position(|k| *k == key) {
            Some(existing) => axes[existing] = normal,
            None => {
                keys.push(key);
                axes.push(normal);
            }
        }
    }

    axes
}

fn gradient_key(gradient: f64) -> String {
    if gradient.is_infinite() {
        return "inf".to_string();
    }
    let key = format!("{:.3}", gradient);
    // -0.000 and 0.000 describe the same axis
    if key == "-0.000" {
        "0.000".to_string()
    } else {
        key
    }
}

pub fn rotate(axes: &mut [Vector], angle: f64) {
    if angle == 0.0 {
        return;
    }
    let (sin, cos) = angle.sin_cos();
    for axis in axes.iter_mut() {
        let x = axis.x * cos - axis.y * sin;
        axis.y = axis.x * sin + axis.y * cos;
        axis.x = x;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_has_two_axes() {
        let pts = [
            Vector::new(0.0, 0.0),
            Vector::new(4.0, 0.0),
            Vector::new(4.0, 2.0),
            Vector::new(0.0, 2.0),
        ];
        let axes = from_vertices(&pts);
        assert_eq!(axes.len(), 2);
        for a in axes {
            assert!((a.magnitude() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn triangle_has_three_axes() {
        let pts = [Vector::new(0.0, 0.0), Vector::new(4.0, 0.0), Vector::new(2.0, 3.0)];
        assert_eq!(from_vertices(&pts).len(), 3);
    }
}
