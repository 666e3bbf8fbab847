// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar faces
//!
//! A polygon starts out as rings and ends up as flat render buffers. The
//! transition is one-way: [`Polygon::finish`] consumes the rings.

use citymesh_core::Envelope;
use citymesh_geometry::{triangle_normal, Mesh, Point3, Tessellator, Vector3};
use smallvec::SmallVec;

use crate::appearance::{AppearanceManager, TexCoords};
use crate::keys::AppearanceKey;
use crate::options::{FinishOptions, NormalSource};
use crate::ring::LinearRing;

/// One planar face of a geometry
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    id: String,
    negate_normal: bool,
    exterior_ring: Option<LinearRing>,
    interior_rings: SmallVec<[LinearRing; 2]>,
    vertices: Vec<Point3<f64>>,
    indices: Vec<u32>,
    normals: Vec<Vector3<f32>>,
    tex_coords: TexCoords,
    appearance: Option<AppearanceKey>,
    finalized: bool,
}

impl Polygon {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Flip the computed face normal, for faces described inside out
    pub fn set_negate_normal(&mut self, negate: bool) {
        self.negate_normal = negate;
    }

    #[inline]
    pub fn negate_normal(&self) -> bool {
        self.negate_normal
    }

    /// Take ownership of a ring, removing its duplicate neighbours
    ///
    /// A second exterior ring replaces the first.
    pub fn add_ring(&mut self, mut ring: LinearRing) {
        ring.finish();
        if ring.is_exterior() {
            if let Some(previous) = self.exterior_ring.replace(ring) {
                tracing::debug!(polygon = %self.id, ring = %previous.id(), "Replacing exterior ring");
            }
        } else {
            self.interior_rings.push(ring);
        }
    }

    #[inline]
    pub fn exterior_ring(&self) -> Option<&LinearRing> {
        self.exterior_ring.as_ref()
    }

    #[inline]
    pub fn interior_rings(&self) -> &[LinearRing] {
        &self.interior_rings
    }

    #[inline]
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// Triangle indices, three per triangle
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// One normal per vertex, all equal to the face normal
    #[inline]
    pub fn normals(&self) -> &[Vector3<f32>] {
        &self.normals
    }

    /// Texture coordinates, empty or one per vertex
    #[inline]
    pub fn tex_coords(&self) -> &[[f32; 2]] {
        &self.tex_coords
    }

    #[inline]
    pub fn appearance(&self) -> Option<AppearanceKey> {
        self.appearance
    }

    #[inline]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Face normal from the configured source, negated if requested
    ///
    /// Zero when the source is degenerate.
    pub fn compute_normal(&self, source: NormalSource) -> Vector3<f64> {
        let normal = match source {
            NormalSource::ExteriorRing => match &self.exterior_ring {
                Some(ring) => ring.compute_normal(),
                None => return Vector3::zeros(),
            },
            NormalSource::Triangulation => {
                if self.vertices.is_empty() || self.indices.len() < 3 {
                    return Vector3::zeros();
                }
                let [a, b, c] = [self.indices[0], self.indices[1], self.indices[2]]
                    .map(|i| &self.vertices[i as usize]);
                triangle_normal(a, b, c)
            }
        };

        if self.negate_normal {
            -normal
        } else {
            normal
        }
    }

    /// Triangulate the rings with `tess`, consuming them
    ///
    /// Without a usable exterior ring this falls back to [`merge_rings`](Self::merge_rings).
    pub fn tesselate(&mut self, normal: Vector3<f64>, tess: &mut Tessellator, options: &FinishOptions) {
        self.indices.clear();

        let exterior = match self.exterior_ring.as_ref() {
            Some(ring) if ring.len() >= 3 => ring,
            _ => {
                self.merge_rings();
                return;
            }
        };

        let expected = exterior.len() + self.interior_rings.iter().map(LinearRing::len).sum::<usize>();
        tess.init(expected, normal, options.winding_rule);
        tess.add_contour(exterior.vertices());
        for ring in &self.interior_rings {
            tess.add_contour(ring.vertices());
        }
        tess.compute();

        self.vertices = tess.vertices().to_vec();
        self.indices = tess.indices().to_vec();
        self.clear_rings();
    }

    /// Naive fan over all ring points, consuming the rings
    ///
    /// Concatenates the exterior and interior points and emits triangle `i`
    /// as `(i, i + 1, i + 2)`. Hole semantics are ignored, so the result is
    /// only correct for convex faces without holes.
    pub fn merge_rings(&mut self) {
        let rings = self.exterior_ring.take().into_iter().chain(self.interior_rings.drain(..));
        for ring in rings {
            self.vertices.extend(ring.into_vertices());
        }

        self.indices.clear();
        let n = self.vertices.len();
        if n < 3 {
            return;
        }
        self.indices.reserve(3 * (n - 2));
        for i in 0..(n - 2) as u32 {
            self.indices.extend_from_slice(&[i, i + 1, i + 2]);
        }
    }

    fn clear_rings(&mut self) {
        self.exterior_ring = None;
        self.interior_rings.clear();
    }

    /// Compute the normal, triangulate and fill the per-vertex normals
    ///
    /// Does nothing on an already finished polygon.
    pub fn finish(&mut self, tess: &mut Tessellator, options: &FinishOptions) {
        if self.finalized {
            return;
        }

        let normal = match options.normal_source {
            NormalSource::ExteriorRing => {
                let normal = self.compute_normal(NormalSource::ExteriorRing);
                if !options.tessellate {
                    self.merge_rings();
                } else if normal == Vector3::zeros() {
                    tracing::debug!(polygon = %self.id, "Degenerate polygon, using fan triangulation");
                    self.merge_rings();
                } else {
                    self.tesselate(normal, tess, options);
                }
                normal
            }
            NormalSource::Triangulation => {
                if options.tessellate {
                    self.tesselate(Vector3::zeros(), tess, options);
                } else {
                    self.merge_rings();
                }
                self.compute_normal(NormalSource::Triangulation)
            }
        };

        let flat = Vector3::new(normal.x as f32, normal.y as f32, normal.z as f32);
        self.normals.clear();
        self.normals.resize(self.vertices.len(), flat);
        self.finalized = true;
    }

    /// Bind texture coordinates and appearance
    ///
    /// Both are looked up by this polygon's id first; texture coordinates then
    /// fall back to `geometry_id` and the appearance to `default`. Found
    /// coordinates are padded or truncated to the vertex count.
    pub fn resolve_appearance(
        &mut self,
        manager: &AppearanceManager,
        geometry_id: &str,
        default: Option<AppearanceKey>,
    ) {
        let coords = manager
            .tex_coords_for(&self.id)
            .or_else(|| manager.tex_coords_for(geometry_id));

        self.tex_coords.clear();
        if let Some(coords) = coords {
            self.tex_coords.extend_from_slice(coords);
            self.tex_coords.resize(self.vertices.len(), [0.0, 0.0]);
        }

        self.appearance = manager.appearance_for(&self.id).or(default);
    }

    /// Absorb `other` into this polygon
    ///
    /// Fails without touching either side unless both share the same
    /// appearance. On success `other` is left empty.
    pub fn merge(&mut self, other: &mut Polygon) -> bool {
        if other.appearance != self.appearance {
            return false;
        }
        if other.vertices.is_empty() {
            return true;
        }

        let offset = self.vertices.len();
        let other_len = other.vertices.len();

        self.vertices.append(&mut other.vertices);
        self.indices
            .extend(other.indices.drain(..).map(|i| i + offset as u32));
        self.normals.append(&mut other.normals);

        self.tex_coords.truncate(offset);
        let take = other.tex_coords.len().min(other_len);
        self.tex_coords.extend_from_slice(&other.tex_coords[..take]);
        other.tex_coords.clear();

        self.id = format!("{}+{}", self.id, other.id);
        true
    }

    /// Grow `envelope` by every vertex, or by the ring points before finishing
    pub fn expand_envelope(&self, envelope: &mut Envelope) {
        let ring_points = self
            .exterior_ring
            .iter()
            .chain(self.interior_rings.iter())
            .flat_map(|r| r.vertices());
        for p in self.vertices.iter().chain(ring_points) {
            envelope.expand(p.x, p.y, p.z);
        }
    }

    /// Flatten into a render mesh
    pub fn to_mesh(&self) -> Mesh {
        let mut mesh = Mesh::with_capacity(self.vertices.len(), self.indices.len());
        for (i, p) in self.vertices.iter().enumerate() {
            let normal = self.normals.get(i).copied().unwrap_or_else(Vector3::zeros);
            mesh.add_vertex(*p, normal);
        }
        for tri in self.indices.chunks_exact(3) {
            mesh.add_triangle(tri[0], tri[1], tri[2]);
        }
        if !self.tex_coords.is_empty() {
            mesh.set_tex_coords(&self.tex_coords);
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appearance::{Appearance, Material};
    use approx::assert_relative_eq;

    fn ring(id: &str, exterior: bool, points: &[(f64, f64, f64)]) -> LinearRing {
        LinearRing::with_vertices(
            id,
            exterior,
            points.iter().map(|&(x, y, z)| Point3::new(x, y, z)).collect(),
        )
    }

    fn square(id: &str, z: f64) -> Polygon {
        let mut p = Polygon::new(id);
        p.add_ring(ring(
            "ext",
            true,
            &[(0.0, 0.0, z), (1.0, 0.0, z), (1.0, 1.0, z), (0.0, 1.0, z)],
        ));
        p
    }

    fn finished(id: &str, z: f64) -> Polygon {
        let mut p = square(id, z);
        p.finish(&mut Tessellator::new(), &FinishOptions::default());
        p
    }

    #[test]
    fn test_finish_buffers_are_consistent() {
        let mut p = square("p", 0.0);
        p.add_ring(ring(
            "hole",
            false,
            &[(0.25, 0.25, 0.0), (0.5, 0.75, 0.0), (0.75, 0.25, 0.0)],
        ));
        p.finish(&mut Tessellator::new(), &FinishOptions::default());

        assert!(p.is_finalized());
        assert!(p.exterior_ring().is_none());
        assert!(p.interior_rings().is_empty());
        assert_eq!(p.vertices().len(), 7);
        assert_eq!(p.indices().len() % 3, 0);
        assert!(p.indices().iter().all(|&i| (i as usize) < p.vertices().len()));
        assert_eq!(p.normals().len(), p.vertices().len());
        for n in p.normals() {
            assert_relative_eq!(*n, Vector3::new(0.0f32, 0.0, 1.0), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_negated_normal() {
        let mut p = square("p", 0.0);
        p.set_negate_normal(true);
        assert_relative_eq!(
            p.compute_normal(NormalSource::ExteriorRing),
            Vector3::new(0.0, 0.0, -1.0),
            epsilon = 1e-12
        );
        p.finish(&mut Tessellator::new(), &FinishOptions::default());
        assert_relative_eq!(p.normals()[0], Vector3::new(0.0f32, 0.0, -1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_normal_from_triangulation() {
        let mut p = square("p", 2.0);
        let options = FinishOptions {
            normal_source: NormalSource::Triangulation,
            ..Default::default()
        };
        p.finish(&mut Tessellator::new(), &options);
        assert_eq!(p.triangle_count(), 2);
        assert_relative_eq!(p.normals()[0], Vector3::new(0.0f32, 0.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_merge_rings_fan() {
        let mut p = Polygon::new("pentagon");
        p.add_ring(ring(
            "ext",
            true,
            &[
                (0.0, 0.0, 0.0),
                (2.0, 0.0, 0.0),
                (3.0, 1.0, 0.0),
                (1.0, 2.0, 0.0),
                (-1.0, 1.0, 0.0),
            ],
        ));
        let options = FinishOptions {
            tessellate: false,
            ..Default::default()
        };
        p.finish(&mut Tessellator::new(), &options);

        assert_eq!(p.vertices().len(), 5);
        assert_eq!(p.indices(), &[0, 1, 2, 1, 2, 3, 2, 3, 4]);
        assert_eq!(p.normals().len(), 5);
    }

    #[test]
    fn test_degenerate_polygon_falls_back() {
        let mut p = Polygon::new("line");
        p.add_ring(ring(
            "ext",
            true,
            &[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (2.0, 0.0, 0.0)],
        ));
        p.finish(&mut Tessellator::new(), &FinishOptions::default());
        assert_eq!(p.indices(), &[0, 1, 2]);
        assert_eq!(p.normals(), &[Vector3::zeros(); 3]);
    }

    #[test]
    fn test_missing_exterior_uses_interiors() {
        let mut p = Polygon::new("holes-only");
        p.add_ring(ring(
            "hole",
            false,
            &[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (0.0, 1.0, 0.0)],
        ));
        p.finish(&mut Tessellator::new(), &FinishOptions::default());
        assert_eq!(p.vertices().len(), 3);
        assert_eq!(p.indices(), &[0, 1, 2]);
    }

    #[test]
    fn test_finish_runs_once() {
        let mut p = finished("p", 0.0);
        let before = p.clone();
        p.finish(&mut Tessellator::new(), &FinishOptions::optimized());
        assert_eq!(p, before);
    }

    #[test]
    fn test_merge_moves_buffers() {
        let mut a = finished("a", 0.0);
        let mut b = finished("b", 1.0);
        let a_len = a.vertices().len();
        let b_len = b.vertices().len();
        let b_indices = b.indices().to_vec();

        assert!(a.merge(&mut b));
        assert_eq!(a.vertices().len(), a_len + b_len);
        assert_eq!(a.normals().len(), a.vertices().len());
        assert_eq!(a.id(), "a+b");
        let contributed = &a.indices()[a.indices().len() - b_indices.len()..];
        for (merged, original) in contributed.iter().zip(&b_indices) {
            assert_eq!(*merged, original + a_len as u32);
        }

        assert!(b.vertices().is_empty());
        assert!(b.indices().is_empty());
        assert!(b.normals().is_empty());
    }

    #[test]
    fn test_merge_rejects_other_appearance() {
        let mut manager = AppearanceManager::new();
        let red = manager.add_appearance(Appearance::material("red", Material::default()));

        let mut a = finished("a", 0.0);
        let mut b = finished("b", 1.0);
        b.appearance = Some(red);
        let (a_before, b_before) = (a.clone(), b.clone());

        assert!(!a.merge(&mut b));
        assert_eq!(a, a_before);
        assert_eq!(b, b_before);
    }

    #[test]
    fn test_merge_empty_is_noop_success() {
        let mut a = finished("a", 0.0);
        let mut empty = Polygon::new("empty");
        let before = a.clone();
        assert!(a.merge(&mut empty));
        assert_eq!(a, before);
    }

    #[test]
    fn test_merge_clips_tex_coords() {
        let mut a = finished("a", 0.0);
        let mut b = finished("b", 1.0);
        a.tex_coords = vec![[0.1, 0.1]; 6];
        b.tex_coords = vec![[0.9, 0.9]; 2];

        assert!(a.merge(&mut b));
        assert_eq!(a.tex_coords().len(), 4 + 2);
        assert_eq!(a.tex_coords()[4], [0.9, 0.9]);
        assert!(b.tex_coords().is_empty());
    }

    #[test]
    fn test_resolve_appearance() {
        let mut manager = AppearanceManager::new();
        let wall = manager.add_appearance(Appearance::material("wall", Material::default()));
        manager.assign_node("geom").unwrap();
        manager.attach_tex_coords(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.5, 0.5]]);

        let mut p = finished("p", 0.0);
        p.resolve_appearance(&manager, "geom", None);
        // Coordinates come from the geometry, appearance does not
        assert_eq!(p.tex_coords().len(), 4);
        assert_eq!(p.tex_coords()[3], [0.0, 1.0]);
        assert_eq!(p.appearance(), None);

        p.resolve_appearance(&manager, "geom", Some(wall));
        assert_eq!(p.appearance(), Some(wall));

        let mut other = finished("q", 0.0);
        other.resolve_appearance(&manager, "unknown", None);
        assert!(other.tex_coords().is_empty());
    }

    #[test]
    fn test_resolve_pads_short_coords() {
        let mut manager = AppearanceManager::new();
        let tex = manager.add_appearance(Appearance::material("m", Material::default()));
        manager.assign_node("p").unwrap();
        manager.attach_tex_coords(vec![[1.0, 1.0]]);

        let mut p = finished("p", 0.0);
        p.resolve_appearance(&manager, "geom", None);
        assert_eq!(p.appearance(), Some(tex));
        assert_eq!(p.tex_coords(), &[[1.0, 1.0], [0.0, 0.0], [0.0, 0.0], [0.0, 0.0]]);
    }

    #[test]
    fn test_to_mesh() {
        let p = finished("p", 3.0);
        let mesh = p.to_mesh();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.indices, p.indices());
        assert!(!mesh.has_tex_coords());
        let (min, max) = mesh.bounds();
        assert_eq!(min.z, 3.0);
        assert_eq!(max.z, 3.0);
    }
}
