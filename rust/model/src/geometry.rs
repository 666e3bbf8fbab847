// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon collections sharing a level of detail and a surface type

use std::fmt;

use citymesh_core::Envelope;
use citymesh_geometry::{Mesh, Tessellator};

use crate::appearance::AppearanceManager;
use crate::keys::AppearanceKey;
use crate::options::FinishOptions;
use crate::polygon::Polygon;

/// Semantic surface type of a geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GeometryType {
    #[default]
    Unknown,
    Roof,
    Wall,
    Ground,
    Closure,
    Floor,
    InteriorWall,
    Ceiling,
}

impl GeometryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryType::Unknown => "Unknown",
            GeometryType::Roof => "Roof",
            GeometryType::Wall => "Wall",
            GeometryType::Ground => "Ground",
            GeometryType::Closure => "Closure",
            GeometryType::Floor => "Floor",
            GeometryType::InteriorWall => "InteriorWall",
            GeometryType::Ceiling => "Ceiling",
        }
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered polygons of one city object at one level of detail
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    id: String,
    geometry_type: GeometryType,
    lod: u32,
    polygons: Vec<Polygon>,
}

impl Geometry {
    pub fn new(id: impl Into<String>, geometry_type: GeometryType, lod: u32) -> Self {
        Self {
            id: id.into(),
            geometry_type,
            lod,
            polygons: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn geometry_type(&self) -> GeometryType {
        self.geometry_type
    }

    #[inline]
    pub fn lod(&self) -> u32 {
        self.lod
    }

    #[inline]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn add_polygon(&mut self, polygon: Polygon) {
        self.polygons.push(polygon);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.polygons.iter().map(|p| p.vertices().len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.polygons.iter().map(Polygon::triangle_count).sum()
    }

    /// Finish every polygon, bind appearances and optionally merge polygons
    ///
    /// The geometry's own appearance, or `default`, becomes the fallback of
    /// each polygon.
    pub fn finish(
        &mut self,
        tess: &mut Tessellator,
        manager: &AppearanceManager,
        default: Option<AppearanceKey>,
        options: &FinishOptions,
    ) {
        let appearance = manager.appearance_for(&self.id).or(default);

        for polygon in &mut self.polygons {
            polygon.finish(tess, options);
            polygon.resolve_appearance(manager, &self.id, appearance);
        }

        if options.optimize {
            self.merge_polygons();
        }
    }

    /// Greedy pairwise merge of polygons sharing an appearance
    ///
    /// Scans pairs in container order and restarts after every successful
    /// merge. Returns the number of merges.
    pub fn merge_polygons(&mut self) -> usize {
        let mut merges = 0;
        while let Some(j) = self.merge_first_pair() {
            self.polygons.remove(j);
            merges += 1;
        }
        merges
    }

    /// Index of the absorbed polygon after the first successful merge
    fn merge_first_pair(&mut self) -> Option<usize> {
        let len = self.polygons.len();
        for i in 0..len {
            for j in (i + 1)..len {
                let (head, tail) = self.polygons.split_at_mut(j);
                if head[i].merge(&mut tail[0]) {
                    tracing::debug!(geometry = %self.id, polygon = %head[i].id(), "Merged polygons");
                    return Some(j);
                }
            }
        }
        None
    }

    /// Absorb the polygons of `other`
    ///
    /// Fails without touching either side unless level of detail and type
    /// match. On success `other` is left without polygons.
    pub fn merge(&mut self, other: &mut Geometry) -> bool {
        if other.lod != self.lod || other.geometry_type != self.geometry_type {
            return false;
        }

        self.polygons.append(&mut other.polygons);
        self.id = format!("{}+{}", self.id, other.id);
        true
    }

    pub fn expand_envelope(&self, envelope: &mut Envelope) {
        for polygon in &self.polygons {
            polygon.expand_envelope(envelope);
        }
    }

    /// Bounds of all polygon points, empty when there are none
    pub fn envelope(&self) -> Envelope {
        let mut envelope = Envelope::new();
        self.expand_envelope(&mut envelope);
        envelope
    }

    /// Flatten all polygons into one render mesh
    pub fn to_mesh(&self) -> Mesh {
        let mut mesh = Mesh::new();
        for polygon in &self.polygons {
            mesh.merge(&polygon.to_mesh());
        }
        mesh
    }
}

/// Polygon ids back to back, then `  @ <n> polys [<m> vertices]`
impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for polygon in &self.polygons {
            f.write_str(polygon.id())?;
        }
        write!(f, "  @ {} polys [{} vertices]", self.len(), self.vertex_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appearance::{Appearance, Material};
    use crate::ring::LinearRing;
    use citymesh_geometry::Point3;

    fn square(id: &str, z: f64) -> Polygon {
        let mut p = Polygon::new(id);
        p.add_ring(LinearRing::with_vertices(
            format!("{id}-ext"),
            true,
            vec![
                Point3::new(0.0, 0.0, z),
                Point3::new(1.0, 0.0, z),
                Point3::new(1.0, 1.0, z),
                Point3::new(0.0, 1.0, z),
            ],
        ));
        p
    }

    fn wall(id: &str, polygons: &[&str]) -> Geometry {
        let mut g = Geometry::new(id, GeometryType::Wall, 2);
        for (k, name) in polygons.iter().enumerate() {
            g.add_polygon(square(name, k as f64));
        }
        g
    }

    #[test]
    fn test_finish_without_optimize_keeps_polygons() {
        let mut g = wall("g", &["a", "b", "c"]);
        g.finish(&mut Tessellator::new(), &AppearanceManager::new(), None, &FinishOptions::default());
        assert_eq!(g.len(), 3);
        assert_eq!(g.vertex_count(), 12);
        assert_eq!(g.triangle_count(), 6);
    }

    #[test]
    fn test_optimize_merges_all_compatible_polygons() {
        let mut g = wall("g", &["a", "b", "c"]);
        g.finish(&mut Tessellator::new(), &AppearanceManager::new(), None, &FinishOptions::optimized());
        assert_eq!(g.len(), 1);
        assert_eq!(g.polygons()[0].id(), "a+b+c");
        assert_eq!(g.vertex_count(), 12);
        assert_eq!(g.triangle_count(), 6);
    }

    #[test]
    fn test_optimize_respects_appearance() {
        let mut manager = AppearanceManager::new();
        manager.add_appearance(Appearance::material("glass", Material::default()));
        manager.assign_node("b").unwrap();

        let mut g = wall("g", &["a", "b", "c"]);
        g.finish(&mut Tessellator::new(), &manager, None, &FinishOptions::optimized());

        let ids: Vec<&str> = g.polygons().iter().map(Polygon::id).collect();
        assert_eq!(ids, vec!["a+c", "b"]);
    }

    #[test]
    fn test_geometry_appearance_is_polygon_default() {
        let mut manager = AppearanceManager::new();
        let brick = manager.add_appearance(Appearance::material("brick", Material::default()));
        manager.assign_node("g").unwrap();

        let mut g = wall("g", &["a"]);
        g.finish(&mut Tessellator::new(), &manager, None, &FinishOptions::default());
        assert_eq!(g.polygons()[0].appearance(), Some(brick));
    }

    #[test]
    fn test_merge_geometries() {
        let mut a = wall("a", &["p1", "p2"]);
        let mut b = wall("b", &["p3"]);
        assert!(a.merge(&mut b));
        assert_eq!(a.id(), "a+b");
        let ids: Vec<&str> = a.polygons().iter().map(Polygon::id).collect();
        assert_eq!(ids, vec!["p1", "p2", "p3"]);
        assert!(b.is_empty());
    }

    #[test]
    fn test_merge_rejects_mismatch() {
        let mut a = wall("a", &["p1"]);
        let mut roof = Geometry::new("r", GeometryType::Roof, 2);
        roof.add_polygon(square("p2", 0.0));
        let mut lod3 = Geometry::new("l", GeometryType::Wall, 3);
        lod3.add_polygon(square("p3", 0.0));
        let (a_before, roof_before) = (a.clone(), roof.clone());

        assert!(!a.merge(&mut roof));
        assert!(!a.merge(&mut lod3));
        assert_eq!(a, a_before);
        assert_eq!(roof, roof_before);
        assert_eq!(lod3.len(), 1);
    }

    #[test]
    fn test_envelope_covers_polygons() {
        let g = wall("g", &["a", "b"]);
        let envelope = g.envelope();
        assert_eq!(envelope.lower, [0.0, 0.0, 0.0]);
        assert_eq!(envelope.upper, [1.0, 1.0, 1.0]);
        assert!(!Geometry::new("e", GeometryType::Wall, 2).envelope().is_valid());
    }

    #[test]
    fn test_display() {
        let mut g = wall("g", &["a", "b"]);
        g.finish(&mut Tessellator::new(), &AppearanceManager::new(), None, &FinishOptions::default());
        assert_eq!(g.to_string(), "ab  @ 2 polys [8 vertices]");
        assert_eq!(Geometry::new("e", GeometryType::Roof, 1).to_string(), "  @ 0 polys [0 vertices]");
        assert_eq!(GeometryType::InteriorWall.to_string(), "InteriorWall");
    }
}
