// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CityMesh Geometry
//!
//! Planar polygon tessellation for 3D city models using earcutr
//! triangulation, i_overlay contour resolution and nalgebra math.

pub mod error;
pub mod mesh;
pub mod tessellator;
pub mod triangulation;
pub mod vector;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use error::{Error, Result};
pub use mesh::Mesh;
pub use tessellator::{Primitive, Tessellator, WindingRule};
pub use triangulation::{is_convex, triangulate_with_holes};
pub use vector::{nearly_equal, newell_normal, normalize_or_zero, triangle_normal, DUPLICATE_EPSILON_SQ};
