// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon tessellation engine
//!
//! Turns one exterior contour plus any number of hole contours into a vertex
//! buffer and a flat triangle index buffer. The contours are projected onto
//! the plane orthogonal to the polygon normal, then:
//!
//! - if no two edges cross, holes are kept or filled according to the winding
//!   rule and the polygon goes straight to earcut (convex hole-free contours
//!   are emitted as a fan);
//! - otherwise the contours are first resolved into simple shapes with
//!   i_overlay under the winding rule. Output points that match no input
//!   vertex become new vertices ("combine" vertices) lifted back to 3D along
//!   the nearest input edge.
//!
//! Each step emits a typed [`Primitive`] batch which is expanded to plain
//! triangles and oriented counter-clockwise about the normal. A batch that
//! fails is logged and dropped; the rest of the polygon survives.
//!
//! # Example
//!
//! ```
//! use citymesh_geometry::{Point3, Tessellator, Vector3, WindingRule};
//!
//! let square = [
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//!
//! let mut tess = Tessellator::new();
//! tess.init(4, Vector3::z(), WindingRule::NonZero);
//! tess.add_contour(&square);
//! tess.compute();
//!
//! assert_eq!(tess.vertices().len(), 4);
//! assert_eq!(tess.indices().len(), 6);
//! ```

use std::fmt;
use std::ops::Range;

use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;

use crate::triangulation::{closest_on_segment, contours_cross, is_convex, triangulate_with_holes};
use crate::vector::{newell_normal, normalize_or_zero, plane_basis, project_point, signed_area};
use crate::{Error, Point2, Point3, Result, Vector3};

/// Relative distance under which a resolved point is snapped to an existing vertex
const SNAP_TOLERANCE: f64 = 1e-6;

/// Convention deciding which regions of overlapping contours are inside
///
/// Winding numbers count counter-clockwise turns about the polygon normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindingRule {
    /// Odd winding numbers are inside
    Odd,
    /// Any non-zero winding number is inside
    #[default]
    NonZero,
    /// Positive winding numbers are inside
    Positive,
    /// Negative winding numbers are inside
    Negative,
}

impl WindingRule {
    /// Whether a region with this winding number is filled
    #[inline]
    pub fn is_filled(self, winding: i32) -> bool {
        match self {
            WindingRule::Odd => winding % 2 != 0,
            WindingRule::NonZero => winding != 0,
            WindingRule::Positive => winding > 0,
            WindingRule::Negative => winding < 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WindingRule::Odd => "odd",
            WindingRule::NonZero => "nonzero",
            WindingRule::Positive => "positive",
            WindingRule::Negative => "negative",
        }
    }

    /// Look up a rule by name, ignoring ASCII case and `-`/`_`
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "odd" | "evenodd" => Some(WindingRule::Odd),
            "nonzero" => Some(WindingRule::NonZero),
            "positive" => Some(WindingRule::Positive),
            "negative" => Some(WindingRule::Negative),
            _ => None,
        }
    }

    /// Overlay fill rule; i_overlay counts clockwise turns as positive
    fn fill_rule(self) -> FillRule {
        match self {
            WindingRule::Odd => FillRule::EvenOdd,
            WindingRule::NonZero => FillRule::NonZero,
            WindingRule::Positive => FillRule::Negative,
            WindingRule::Negative => FillRule::Positive,
        }
    }
}

impl fmt::Display for WindingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A batch of vertex indices produced by the sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primitive {
    /// Independent triangles, three indices each
    Triangles(Vec<u32>),
    /// First index is a corner of every triangle
    TriangleFan(Vec<u32>),
    /// Each new index forms a triangle with the previous two, alternating winding
    TriangleStrip(Vec<u32>),
}

impl Primitive {
    /// Append the batch to `out` as flat triangle triples
    pub fn expand_into(&self, out: &mut Vec<u32>) -> Result<()> {
        match self {
            Primitive::Triangles(idx) => {
                if idx.len() % 3 != 0 {
                    return Err(Error::InvalidPrimitive(format!(
                        "{} indices do not form whole triangles",
                        idx.len()
                    )));
                }
                out.extend_from_slice(idx);
            }
            Primitive::TriangleFan(idx) => {
                if idx.len() < 3 {
                    return Err(Error::InvalidPrimitive(format!(
                        "fan with {} indices",
                        idx.len()
                    )));
                }
                let first = idx[0];
                for pair in idx[1..].windows(2) {
                    out.extend_from_slice(&[first, pair[0], pair[1]]);
                }
            }
            Primitive::TriangleStrip(idx) => {
                if idx.len() < 3 {
                    return Err(Error::InvalidPrimitive(format!(
                        "strip with {} indices",
                        idx.len()
                    )));
                }
                for i in 2..idx.len() {
                    if i % 2 == 0 {
                        out.extend_from_slice(&[idx[i - 2], idx[i - 1], idx[i]]);
                    } else {
                        out.extend_from_slice(&[idx[i - 1], idx[i - 2], idx[i]]);
                    }
                }
            }
        }
        Ok(())
    }
}

#[inline]
fn winding_of(area: f64) -> i32 {
    if area > 0.0 {
        1
    } else if area < 0.0 {
        -1
    } else {
        0
    }
}

#[inline]
fn range_indices(range: &Range<usize>) -> impl Iterator<Item = u32> + '_ {
    range.clone().map(|i| i as u32)
}

/// Reusable polygon tessellator
///
/// Call [`init`](Self::init), then [`add_contour`](Self::add_contour) for the
/// exterior followed by each hole, then [`compute`](Self::compute). Scratch
/// buffers are kept between polygons.
#[derive(Debug, Default)]
pub struct Tessellator {
    normal: Vector3<f64>,
    winding_rule: WindingRule,
    vertices: Vec<Point3<f64>>,
    indices: Vec<u32>,
    /// Ranges into `vertices`, exterior first
    contours: Vec<Range<usize>>,
    /// Plane coordinates, parallel to `vertices`
    projected: Vec<Point2<f64>>,
}

impl Tessellator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new polygon
    ///
    /// `normal` orients the sweep plane; a zero normal is replaced by the
    /// Newell normal of the exterior contour.
    pub fn init(&mut self, expected_vertex_count: usize, normal: Vector3<f64>, winding_rule: WindingRule) {
        self.normal = normal;
        self.winding_rule = winding_rule;
        self.vertices.clear();
        self.vertices.reserve(expected_vertex_count);
        self.indices.clear();
        self.contours.clear();
        self.projected.clear();
    }

    /// Add a contour: the exterior first, then each hole
    ///
    /// Contours with fewer than 3 points are dropped.
    pub fn add_contour(&mut self, points: &[Point3<f64>]) {
        if points.len() < 3 {
            tracing::trace!(points = points.len(), "Skipping degenerate contour");
            return;
        }
        let start = self.vertices.len();
        self.vertices.extend_from_slice(points);
        self.contours.push(start..self.vertices.len());
    }

    /// Run the sweep and fill the output buffers
    pub fn compute(&mut self) {
        self.indices.clear();
        if self.contours.is_empty() {
            return;
        }

        if let Err(e) = self.sweep() {
            tracing::warn!(error = %e, "Tessellation failed, polygon has no triangles");
        }
    }

    /// All output vertices: input contour points in order, then combine vertices
    #[inline]
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// Flat triangle indices into [`vertices`](Self::vertices)
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    fn sweep(&mut self) -> Result<()> {
        let normal = self.sweep_normal()?;
        let (u_axis, v_axis) = plane_basis(&normal);
        let origin = self.vertices[self.contours[0].start];

        self.projected.clear();
        self.projected.extend(
            self.vertices
                .iter()
                .map(|p| project_point(p, &u_axis, &v_axis, &origin)),
        );

        let batches = if self.is_simple() {
            self.simple_batches()
        } else {
            self.resolved_batches(&u_axis, &v_axis, &origin)
        };

        for batch in batches {
            if let Err(e) = batch.and_then(|primitive| self.emit(&primitive)) {
                tracing::warn!(error = %e, "Dropped tessellation batch");
            }
        }

        Ok(())
    }

    fn sweep_normal(&self) -> Result<Vector3<f64>> {
        let normal = normalize_or_zero(self.normal);
        if normal != Vector3::zeros() {
            return Ok(normal);
        }

        let exterior = &self.vertices[self.contours[0].clone()];
        let derived = newell_normal(exterior);
        if derived == Vector3::zeros() {
            return Err(Error::DegeneratePlane);
        }
        Ok(derived)
    }

    #[inline]
    fn contour(&self, range: &Range<usize>) -> &[Point2<f64>] {
        &self.projected[range.clone()]
    }

    /// No crossing edges and a filled exterior
    fn is_simple(&self) -> bool {
        let contours: Vec<&[Point2<f64>]> = self.contours.iter().map(|r| self.contour(r)).collect();
        if contours_cross(&contours) {
            return false;
        }
        let exterior_winding = winding_of(signed_area(contours[0]));
        exterior_winding != 0 && self.winding_rule.is_filled(exterior_winding)
    }

    fn simple_batches(&self) -> Vec<Result<Primitive>> {
        let exterior_range = &self.contours[0];
        let exterior = self.contour(exterior_range);
        let exterior_winding = winding_of(signed_area(exterior));

        // A hole whose region is still filled under the rule is no hole at all
        let holes: Vec<&Range<usize>> = self.contours[1..]
            .iter()
            .filter(|r| {
                let winding = exterior_winding + winding_of(signed_area(self.contour(r)));
                !self.winding_rule.is_filled(winding)
            })
            .collect();

        if holes.is_empty() && is_convex(exterior) {
            return vec![Ok(Primitive::TriangleFan(
                range_indices(exterior_range).collect(),
            ))];
        }

        let global: Vec<u32> = range_indices(exterior_range)
            .chain(holes.iter().flat_map(|r| range_indices(r)))
            .collect();
        let hole_points: Vec<&[Point2<f64>]> = holes.iter().map(|r| self.contour(r)).collect();

        vec![triangulate_with_holes(exterior, &hole_points)
            .map(|local| Primitive::Triangles(local.into_iter().map(|i| global[i]).collect()))]
    }

    fn resolved_batches(
        &mut self,
        u_axis: &Vector3<f64>,
        v_axis: &Vector3<f64>,
        origin: &Point3<f64>,
    ) -> Vec<Result<Primitive>> {
        let subject: Vec<Vec<[f64; 2]>> = self
            .contours
            .iter()
            .map(|r| self.contour(r).iter().map(|p| [p.x, p.y]).collect())
            .collect();
        let clip: Vec<Vec<[f64; 2]>> = Vec::new();

        let shapes = subject.overlay(&clip, OverlayRule::Union, self.winding_rule.fill_rule());
        let tolerance = self.snap_tolerance();

        let mut batches = Vec::with_capacity(shapes.len());
        for shape in shapes {
            let mut rings: Vec<Vec<Point2<f64>>> = Vec::with_capacity(shape.len());
            let mut global: Vec<u32> = Vec::new();

            for (k, contour) in shape.iter().enumerate() {
                if contour.len() < 3 {
                    if k == 0 {
                        break;
                    }
                    continue;
                }
                let points: Vec<Point2<f64>> =
                    contour.iter().map(|p| Point2::new(p[0], p[1])).collect();
                for p in &points {
                    global.push(self.resolve_vertex(p, tolerance, u_axis, v_axis, origin));
                }
                rings.push(points);
            }

            if rings.is_empty() {
                continue;
            }

            let holes: Vec<&[Point2<f64>]> = rings[1..].iter().map(|r| r.as_slice()).collect();
            batches.push(
                triangulate_with_holes(&rings[0], &holes).map(|local| {
                    Primitive::Triangles(local.into_iter().map(|i| global[i]).collect())
                }),
            );
        }

        batches
    }

    fn snap_tolerance(&self) -> f64 {
        let (mut min, mut max) = (
            Point2::new(f64::MAX, f64::MAX),
            Point2::new(f64::MIN, f64::MIN),
        );
        for p in &self.projected {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        let extent = (max.x - min.x).max(max.y - min.y);
        extent.max(1e-9) * SNAP_TOLERANCE
    }

    /// Index of the vertex at `p`, creating a combine vertex if none is close
    fn resolve_vertex(
        &mut self,
        p: &Point2<f64>,
        tolerance: f64,
        u_axis: &Vector3<f64>,
        v_axis: &Vector3<f64>,
        origin: &Point3<f64>,
    ) -> u32 {
        if let Some(existing) = self
            .projected
            .iter()
            .position(|q| (q - p).norm() <= tolerance)
        {
            return existing as u32;
        }

        // Interpolate along the nearest input edge so the vertex stays on the
        // original (possibly non-planar) boundary
        let mut best: Option<(f64, usize, usize, f64)> = None;
        for range in &self.contours {
            let n = range.len();
            for k in 0..n {
                let a = range.start + k;
                let b = range.start + (k + 1) % n;
                let (dist, t) = closest_on_segment(p, &self.projected[a], &self.projected[b]);
                if best.map_or(true, |(d, ..)| dist < d) {
                    best = Some((dist, a, b, t));
                }
            }
        }

        let position = match best {
            Some((_, a, b, t)) => {
                let pa = self.vertices[a];
                let pb = self.vertices[b];
                pa + (pb - pa) * t
            }
            None => origin + u_axis * p.x + v_axis * p.y,
        };

        let index = self.vertices.len() as u32;
        tracing::trace!(index, x = position.x, y = position.y, z = position.z, "Combine vertex");
        self.vertices.push(position);
        self.projected.push(*p);
        index
    }

    /// Expand, validate and orient a batch, then append it to the output
    fn emit(&mut self, primitive: &Primitive) -> Result<()> {
        let mut triangles = Vec::new();
        primitive.expand_into(&mut triangles)?;

        let count = self.vertices.len() as u32;
        if let Some(bad) = triangles.iter().find(|&&i| i >= count) {
            return Err(Error::InvalidPrimitive(format!(
                "index {} out of range for {} vertices",
                bad, count
            )));
        }

        for tri in triangles.chunks_exact_mut(3) {
            let a = &self.projected[tri[0] as usize];
            let b = &self.projected[tri[1] as usize];
            let c = &self.projected[tri[2] as usize];
            let cross = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
            if cross < 0.0 {
                tri.swap(1, 2);
            }
        }

        self.indices.extend_from_slice(&triangles);
        Ok(())
    }
}
