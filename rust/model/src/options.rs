// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Finalization settings, optionally loaded from environment variables.

use citymesh_geometry::WindingRule;

use crate::error::{Error, Result};

/// Where a polygon's face normal comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalSource {
    /// Newell normal of the exterior ring, before tessellation
    #[default]
    ExteriorRing,
    /// First triangle of the finished index buffer
    Triangulation,
}

impl NormalSource {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "ring" | "exterior" | "exteriorring" => Some(NormalSource::ExteriorRing),
            "triangles" | "triangulation" | "tess" => Some(NormalSource::Triangulation),
            _ => None,
        }
    }
}

/// Settings for [`CityModel::finish_with`](crate::CityModel::finish_with)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinishOptions {
    /// Run the pairwise polygon and geometry merge passes
    pub optimize: bool,
    /// Tessellate polygons; `false` uses the naive fan over ring points
    pub tessellate: bool,
    /// Fill convention for overlapping contours
    pub winding_rule: WindingRule,
    pub normal_source: NormalSource,
    /// Finish city objects on the rayon thread pool, one tessellator per worker
    pub parallel: bool,
}

impl Default for FinishOptions {
    fn default() -> Self {
        Self {
            optimize: false,
            tessellate: true,
            winding_rule: WindingRule::NonZero,
            normal_source: NormalSource::ExteriorRing,
            parallel: false,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl FinishOptions {
    pub fn optimized() -> Self {
        Self {
            optimize: true,
            ..Self::default()
        }
    }

    /// Load options from `CITYMESH_*` environment variables.
    ///
    /// Unset or unparsable variables keep their default.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load options through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();
        for name in [
            "CITYMESH_OPTIMIZE",
            "CITYMESH_TESSELLATE",
            "CITYMESH_WINDING_RULE",
            "CITYMESH_NORMALS",
            "CITYMESH_PARALLEL",
        ] {
            if let Some(value) = lookup(name) {
                if let Err(e) = options.set(name, &value) {
                    tracing::warn!(error = %e, "Ignoring finish option");
                }
            }
        }
        options
    }

    /// Set one option by its environment variable name
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        let invalid = || Error::InvalidOption {
            name: name.to_string(),
            value: value.to_string(),
        };

        match name {
            "CITYMESH_OPTIMIZE" => self.optimize = parse_bool(value).ok_or_else(invalid)?,
            "CITYMESH_TESSELLATE" => self.tessellate = parse_bool(value).ok_or_else(invalid)?,
            "CITYMESH_WINDING_RULE" => {
                self.winding_rule = WindingRule::from_name(value.trim()).ok_or_else(invalid)?
            }
            "CITYMESH_NORMALS" => {
                self.normal_source = NormalSource::from_name(value).ok_or_else(invalid)?
            }
            "CITYMESH_PARALLEL" => self.parallel = parse_bool(value).ok_or_else(invalid)?,
            _ => return Err(invalid()),
        }
        Ok(())
    }
}
