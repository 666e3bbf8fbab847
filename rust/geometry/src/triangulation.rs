// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar triangulation utilities
//!
//! Wrapper around earcutr for 2D polygon triangulation, plus the contour
//! checks the tessellator uses to pick its path.

use crate::{Error, Point2, Result};

/// Cross products smaller than this count as collinear
const COLLINEAR_EPSILON: f64 = 1e-12;

/// Check if a polygon is convex (all cross products have same sign)
#[inline]
pub fn is_convex(points: &[Point2<f64>]) -> bool {
    if points.len() < 3 {
        return false;
    }

    let n = points.len();
    let mut sign = 0i8;

    for i in 0..n {
        let p0 = &points[i];
        let p1 = &points[(i + 1) % n];
        let p2 = &points[(i + 2) % n];

        // Cross product of edges
        let cross = (p1.x - p0.x) * (p2.y - p1.y) - (p1.y - p0.y) * (p2.x - p1.x);

        if cross.abs() > 1e-10 {
            let current_sign = if cross > 0.0 { 1i8 } else { -1i8 };
            if sign == 0 {
                sign = current_sign;
            } else if sign != current_sign {
                return false; // Sign changed - not convex
            }
        }
    }

    sign != 0
}

/// Triangulate a polygon with holes
///
/// Returns triangle indices into the combined vertex array (outer followed
/// by each hole in order). Holes with fewer than 3 points must be filtered
/// out by the caller.
pub fn triangulate_with_holes(outer: &[Point2<f64>], holes: &[&[Point2<f64>]]) -> Result<Vec<usize>> {
    if outer.len() < 3 {
        return Err(Error::DegenerateContour(outer.len()));
    }

    // FAST PATH: Triangle - no triangulation needed
    if outer.len() == 3 && holes.is_empty() {
        return Ok(vec![0, 1, 2]);
    }

    // Flatten vertices for earcutr
    let total_points: usize = outer.len() + holes.iter().map(|h| h.len()).sum::<usize>();
    let mut vertices = Vec::with_capacity(total_points * 2);

    for p in outer {
        vertices.push(p.x);
        vertices.push(p.y);
    }

    // Add holes and track their start indices
    let mut hole_indices = Vec::with_capacity(holes.len());
    for hole in holes {
        hole_indices.push(vertices.len() / 2);
        for p in hole.iter() {
            vertices.push(p.x);
            vertices.push(p.y);
        }
    }

    earcutr::earcut(&vertices, &hole_indices, 2)
        .map_err(|e| Error::TriangulationError(format!("{:?}", e)))
}

#[inline]
fn orientation(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Check if segments `ab` and `cd` cross at a single interior point
///
/// Touching endpoints and collinear overlaps do not count.
#[inline]
pub fn segments_cross(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>, d: &Point2<f64>) -> bool {
    let o1 = orientation(a, b, c);
    let o2 = orientation(a, b, d);
    let o3 = orientation(c, d, a);
    let o4 = orientation(c, d, b);

    if o1.abs() < COLLINEAR_EPSILON
        || o2.abs() < COLLINEAR_EPSILON
        || o3.abs() < COLLINEAR_EPSILON
        || o4.abs() < COLLINEAR_EPSILON
    {
        return false;
    }

    (o1 > 0.0) != (o2 > 0.0) && (o3 > 0.0) != (o4 > 0.0)
}

/// Check whether any two edges of the given closed contours cross
///
/// Edges sharing a vertex within one contour are skipped.
pub fn contours_cross(contours: &[&[Point2<f64>]]) -> bool {
    let edges: Vec<(usize, usize, &Point2<f64>, &Point2<f64>)> = contours
        .iter()
        .enumerate()
        .flat_map(|(ci, contour)| {
            let n = contour.len();
            (0..n).map(move |i| (ci, i, &contour[i], &contour[(i + 1) % n]))
        })
        .collect();

    for (k, &(ci, i, a, b)) in edges.iter().enumerate() {
        for &(cj, j, c, d) in &edges[k + 1..] {
            if ci == cj {
                let n = contours[ci].len();
                if j == i + 1 || (i == 0 && j == n - 1) {
                    continue;
                }
            }
            if segments_cross(a, b, c, d) {
                return true;
            }
        }
    }

    false
}

/// Distance from `p` to segment `ab` and the segment parameter of the
/// closest point, clamped to `[0, 1]`
#[inline]
pub fn closest_on_segment(p: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> (f64, f64) {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    let t = if len_sq > 0.0 {
        ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let closest = a + ab * t;
    ((p - closest).norm(), t)
}
