// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Closed boundary loops

use citymesh_geometry::{nearly_equal, newell_normal, Point3, Vector3};

/// Ordered, implicitly closed loop of points bounding a face or a hole
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRing {
    id: String,
    exterior: bool,
    vertices: Vec<Point3<f64>>,
}

impl LinearRing {
    pub fn new(id: impl Into<String>, exterior: bool) -> Self {
        Self {
            id: id.into(),
            exterior,
            vertices: Vec::new(),
        }
    }

    /// Build a ring from a point list
    pub fn with_vertices(id: impl Into<String>, exterior: bool, vertices: Vec<Point3<f64>>) -> Self {
        Self {
            id: id.into(),
            exterior,
            vertices,
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn is_exterior(&self) -> bool {
        self.exterior
    }

    #[inline]
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn add_vertex(&mut self, p: Point3<f64>) {
        self.vertices.push(p);
    }

    pub(crate) fn into_vertices(self) -> Vec<Point3<f64>> {
        self.vertices
    }

    /// Unit normal by Newell's method, zero for degenerate rings
    pub fn compute_normal(&self) -> Vector3<f64> {
        newell_normal(&self.vertices)
    }

    /// Remove cyclically adjacent near-duplicate points, chained ones included
    ///
    /// Idempotent: a ring without duplicate neighbours is left untouched.
    pub fn finish(&mut self) {
        // Each pass removes one point, so the ring length bounds the passes
        for _ in 0..self.vertices.len() {
            let n = self.vertices.len();
            if n < 2 {
                return;
            }
            let duplicate =
                (0..n).find(|&i| nearly_equal(&self.vertices[i], &self.vertices[(i + 1) % n]));
            match duplicate {
                Some(i) => {
                    self.vertices.remove(i);
                }
                None => return,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ring(points: &[(f64, f64, f64)]) -> LinearRing {
        LinearRing::with_vertices(
            "r",
            true,
            points.iter().map(|&(x, y, z)| Point3::new(x, y, z)).collect(),
        )
    }

    #[test]
    fn test_finish_is_noop_on_clean_ring() {
        let mut r = ring(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (1.0, 1.0, 0.0), (0.0, 1.0, 0.0)]);
        let before = r.clone();
        r.finish();
        assert_eq!(r, before);
        r.finish();
        assert_eq!(r, before);
    }

    #[test]
    fn test_finish_removes_chained_duplicates() {
        let mut r = ring(&[
            (0.0, 0.0, 0.0),
            (1.0, 0.0, 0.0),
            (1.0 + 5e-5, 0.0, 0.0),
            (1.0, 5e-5, 0.0),
            (1.0, 1.0, 0.0),
            (0.0, 1.0, 0.0),
        ]);
        r.finish();
        assert_eq!(r.len(), 4);
    }

    #[test]
    fn test_finish_removes_closing_point() {
        // Explicitly closed rings repeat the first point at the seam
        let mut r = ring(&[
            (0.0, 0.0, 0.0),
            (1.0, 0.0, 0.0),
            (1.0, 1.0, 0.0),
            (0.0, 0.0, 0.0),
        ]);
        r.finish();
        assert_eq!(r.len(), 3);
    }

    #[test]
    fn test_finish_collapses_to_single_point() {
        let mut r = ring(&[(2.0, 2.0, 2.0), (2.0, 2.0, 2.0), (2.0, 2.0, 2.0)]);
        r.finish();
        assert_eq!(r.len(), 1);
        assert_eq!(r.compute_normal(), Vector3::zeros());
    }

    #[test]
    fn test_normal_follows_winding() {
        let mut r = ring(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (1.0, 1.0, 0.0), (0.0, 1.0, 0.0)]);
        assert_relative_eq!(r.compute_normal(), Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-12);

        r.vertices.reverse();
        assert_relative_eq!(r.compute_normal(), Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-12);
    }
}
