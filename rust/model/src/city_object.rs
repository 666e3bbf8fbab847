// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed city objects and their geometries

use std::collections::BTreeMap;
use std::fmt;

use citymesh_core::{CityObjectType, Envelope};
use citymesh_geometry::{Mesh, Tessellator};

use crate::appearance::AppearanceManager;
use crate::geometry::Geometry;
use crate::options::FinishOptions;

/// A building, road, bridge or other identified city entity
#[derive(Debug, Clone, PartialEq)]
pub struct CityObject {
    id: String,
    object_type: CityObjectType,
    envelope: Envelope,
    properties: BTreeMap<String, String>,
    geometries: Vec<Geometry>,
}

impl CityObject {
    pub fn new(id: impl Into<String>, object_type: CityObjectType) -> Self {
        Self {
            id: id.into(),
            object_type,
            envelope: Envelope::new(),
            properties: BTreeMap::new(),
            geometries: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn object_type(&self) -> CityObjectType {
        self.object_type
    }

    #[inline]
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn set_envelope(&mut self, envelope: Envelope) {
        self.envelope = envelope;
    }

    #[inline]
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    #[inline]
    pub fn geometries(&self) -> &[Geometry] {
        &self.geometries
    }

    pub fn add_geometry(&mut self, geometry: Geometry) {
        self.geometries.push(geometry);
    }

    /// Finish every geometry and optionally merge compatible ones
    ///
    /// An envelope the builder left empty is derived from the finished
    /// vertices.
    pub fn finish(&mut self, tess: &mut Tessellator, manager: &AppearanceManager, options: &FinishOptions) {
        let appearance = manager.appearance_for(&self.id);

        for geometry in &mut self.geometries {
            geometry.finish(tess, manager, appearance, options);
        }

        if options.optimize {
            self.merge_geometries();
        }

        if !self.envelope.is_valid() {
            for geometry in &self.geometries {
                self.envelope.union(&geometry.envelope());
            }
        }
    }

    /// Greedy pairwise merge of geometries sharing lod and type
    ///
    /// Same scan-and-restart order as
    /// [`Geometry::merge_polygons`]. Returns the number of merges.
    pub fn merge_geometries(&mut self) -> usize {
        let mut merges = 0;
        'scan: loop {
            let len = self.geometries.len();
            for i in 0..len {
                for j in (i + 1)..len {
                    let (head, tail) = self.geometries.split_at_mut(j);
                    if head[i].merge(&mut tail[0]) {
                        tracing::debug!(object = %self.id, geometry = %head[i].id(), "Merged geometries");
                        self.geometries.remove(j);
                        merges += 1;
                        continue 'scan;
                    }
                }
            }
            return merges;
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.geometries.iter().map(Geometry::vertex_count).sum()
    }

    /// Flatten all geometries into one render mesh
    pub fn to_mesh(&self) -> Mesh {
        let mut mesh = Mesh::new();
        for geometry in &self.geometries {
            mesh.merge(&geometry.to_mesh());
        }
        mesh
    }
}

impl fmt::Display for CityObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {}", self.object_type, self.id)?;
        writeln!(f, "  Envelope: {}", self.envelope)?;
        for (key, value) in &self.properties {
            writeln!(f, "  + {}: {}", key, value)?;
        }
        for geometry in &self.geometries {
            writeln!(f, "{}", geometry)?;
        }
        writeln!(f, "  * {} geometries.", self.geometries.len())
    }
}
