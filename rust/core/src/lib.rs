// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # CityMesh Core
//!
//! Shared vocabulary for 3D city models: the kinds of city objects, bit masks
//! selecting subsets of them, and bounding envelopes.
//!
//! ## Quick Start
//!
//! ```rust
//! use citymesh_core::{CityObjectType, TypeMask};
//!
//! let mask = TypeMask::parse("All, ~Road");
//! assert!(mask.contains(CityObjectType::Building));
//! assert!(!mask.contains(CityObjectType::Road));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for the core types

pub mod envelope;
pub mod error;
pub mod mask;
pub mod schema;

pub use envelope::Envelope;
pub use error::{Error, Result};
pub use mask::TypeMask;
pub use schema::CityObjectType;
