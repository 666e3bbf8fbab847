// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # CityMesh Model
//!
//! In-memory city model that turns boundary rings into render buffers.
//!
//! A document builder creates the tree bottom-up
//! (`CityModel` → `CityObject` → `Geometry` → `Polygon` → `LinearRing`),
//! registers appearances, then calls [`CityModel::finish`] once. Finishing
//! computes face normals, tessellates every polygon, binds appearances and
//! texture coordinates, and optionally merges compatible polygons and
//! geometries.
//!
//! ## Quick Start
//!
//! ```rust
//! use citymesh_core::CityObjectType;
//! use citymesh_geometry::Point3;
//! use citymesh_model::{CityModel, CityObject, Geometry, GeometryType, LinearRing, Polygon};
//!
//! let mut ring = LinearRing::new("ring", true);
//! for (x, y) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
//!     ring.add_vertex(Point3::new(x, y, 0.0));
//! }
//! let mut polygon = Polygon::new("poly");
//! polygon.add_ring(ring);
//!
//! let mut geometry = Geometry::new("geom", GeometryType::Roof, 2);
//! geometry.add_polygon(polygon);
//! let mut building = CityObject::new("house", CityObjectType::Building);
//! building.add_geometry(geometry);
//!
//! let mut model = CityModel::new();
//! model.add_city_object(building);
//! model.finish(false);
//!
//! let polygon = &model.city_objects(CityObjectType::Building)[0].geometries()[0].polygons()[0];
//! assert_eq!(polygon.indices().len(), 6);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for appearance and type records

pub mod appearance;
pub mod city_model;
pub mod city_object;
pub mod error;
pub mod geometry;
pub mod keys;
pub mod options;
pub mod polygon;
pub mod ring;

pub use appearance::{Appearance, AppearanceKind, AppearanceManager, Material, TexCoords, Texture, WrapMode};
pub use city_model::CityModel;
pub use city_object::CityObject;
pub use error::{Error, Result};
pub use geometry::{Geometry, GeometryType};
pub use keys::AppearanceKey;
pub use options::{FinishOptions, NormalSource};
pub use polygon::Polygon;
pub use ring::LinearRing;
