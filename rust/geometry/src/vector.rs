// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vector helpers shared by rings, polygons and the tessellator

use crate::{Point2, Point3, Vector3};

/// Squared distance below which two points are considered the same
pub const DUPLICATE_EPSILON_SQ: f64 = 1e-8;

const ZERO_LENGTH: f64 = 1e-12;

/// Normalize a vector, returning the zero vector when it has no length
#[inline]
pub fn normalize_or_zero(v: Vector3<f64>) -> Vector3<f64> {
    let len = v.norm();
    if len > ZERO_LENGTH {
        v / len
    } else {
        Vector3::zeros()
    }
}

/// Check whether two points coincide within [`DUPLICATE_EPSILON_SQ`]
#[inline]
pub fn nearly_equal(a: &Point3<f64>, b: &Point3<f64>) -> bool {
    (a - b).norm_squared() < DUPLICATE_EPSILON_SQ
}

/// Unit normal of a closed loop using Newell's method
///
/// Works for concave and slightly non-planar loops. Returns the zero vector
/// for fewer than 3 points or a loop without area.
pub fn newell_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let n = points.len();
    if n < 3 {
        return Vector3::zeros();
    }

    let mut normal = Vector3::<f64>::zeros();
    for i in 0..n {
        let current = &points[i];
        let next = &points[(i + 1) % n];

        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }

    normalize_or_zero(normal)
}

/// Unit normal of a triangle from its two edge vectors
#[inline]
pub fn triangle_normal(p1: &Point3<f64>, p2: &Point3<f64>, p3: &Point3<f64>) -> Vector3<f64> {
    normalize_or_zero((p2 - p1).cross(&(p3 - p1)))
}

/// Orthonormal in-plane axes `(u, v)` for a plane with the given normal
///
/// `(u, v, normal)` is right-handed, so a counter-clockwise loop in `(u, v)`
/// winds counter-clockwise about the normal.
pub fn plane_basis(normal: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    // Find the axis least parallel to the normal for stable cross product
    let abs_x = normal.x.abs();
    let abs_y = normal.y.abs();
    let abs_z = normal.z.abs();

    let reference = if abs_x <= abs_y && abs_x <= abs_z {
        Vector3::new(1.0, 0.0, 0.0)
    } else if abs_y <= abs_z {
        Vector3::new(0.0, 1.0, 0.0)
    } else {
        Vector3::new(0.0, 0.0, 1.0)
    };

    let u_axis = normal.cross(&reference).normalize();
    let v_axis = normal.cross(&u_axis).normalize();
    (u_axis, v_axis)
}

/// Project a 3D point into the plane coordinate system
#[inline]
pub fn project_point(
    p: &Point3<f64>,
    u_axis: &Vector3<f64>,
    v_axis: &Vector3<f64>,
    origin: &Point3<f64>,
) -> Point2<f64> {
    let v = p - origin;
    Point2::new(v.dot(u_axis), v.dot(v_axis))
}

/// Signed area of a 2D loop, positive when counter-clockwise
pub fn signed_area(points: &[Point2<f64>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x * points[j].y;
        area -= points[j].x * points[i].y;
    }
    area * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_newell_right_hand_rule() {
        let normal = newell_normal(&unit_square());
        assert_relative_eq!(normal, Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_newell_reversed_negates() {
        let mut points = unit_square();
        let forward = newell_normal(&points);
        points.reverse();
        let backward = newell_normal(&points);
        assert_relative_eq!(forward, -backward, epsilon = 1e-12);
    }

    #[test]
    fn test_newell_concave() {
        // L-shape in the XZ plane, winding counter-clockwise about +Y
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(1.0, 0.0, 2.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(2.0, 0.0, 1.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        let normal = newell_normal(&points);
        assert_relative_eq!(normal, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_newell_degenerate() {
        assert_eq!(newell_normal(&unit_square()[..2]), Vector3::zeros());

        let collinear = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 2.0, 2.0),
        ];
        assert_eq!(newell_normal(&collinear), Vector3::zeros());
    }

    #[test]
    fn test_normalize_or_zero() {
        assert_eq!(normalize_or_zero(Vector3::zeros()), Vector3::zeros());
        assert_relative_eq!(
            normalize_or_zero(Vector3::new(0.0, 3.0, 4.0)),
            Vector3::new(0.0, 0.6, 0.8)
        );
    }

    #[test]
    fn test_plane_basis_right_handed() {
        for normal in [
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, -1.0, 0.0),
            Vector3::new(1.0, 1.0, 1.0).normalize(),
        ] {
            let (u, v) = plane_basis(&normal);
            assert_relative_eq!(u.dot(&normal), 0.0, epsilon = 1e-12);
            assert_relative_eq!(v.dot(&normal), 0.0, epsilon = 1e-12);
            assert_relative_eq!(u.cross(&v), normal, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_projected_square_is_ccw_about_normal() {
        let points = unit_square();
        let normal = newell_normal(&points);
        let (u, v) = plane_basis(&normal);
        let projected: Vec<_> = points
            .iter()
            .map(|p| project_point(p, &u, &v, &points[0]))
            .collect();
        assert_relative_eq!(signed_area(&projected), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_triangle_normal() {
        let n = triangle_normal(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(0.0, 1.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
        );
        assert_relative_eq!(n, Vector3::new(0.0, 0.0, -1.0));
    }
}
