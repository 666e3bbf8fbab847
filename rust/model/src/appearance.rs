// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Appearances and their binding to model nodes
//!
//! Source documents describe an appearance first and then list the nodes it
//! targets, optionally followed by texture coordinates for the node just
//! listed. [`AppearanceManager`] replays that order:
//!
//! 1. [`add_appearance`](AppearanceManager::add_appearance) registers a record;
//! 2. [`assign_node`](AppearanceManager::assign_node) binds a node id to the
//!    most recent record, unless the id is already bound;
//! 3. [`attach_tex_coords`](AppearanceManager::attach_tex_coords) stores
//!    coordinates for the node assigned last. Coordinates that arrive before
//!    any assignment are held and attached by the next successful assignment.

use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::error::{Error, Result};
use crate::keys::AppearanceKey;

/// Per-vertex texture coordinates
pub type TexCoords = Vec<[f32; 2]>;

/// Surface material parameters
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Material {
    pub diffuse: [f32; 3],
    pub emissive: [f32; 3],
    pub specular: [f32; 3],
    pub ambient_intensity: f32,
    pub shininess: f32,
    pub transparency: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse: [0.8, 0.8, 0.8],
            emissive: [0.0; 3],
            specular: [1.0; 3],
            ambient_intensity: 0.2,
            shininess: 0.2,
            transparency: 0.0,
        }
    }
}

/// How texture coordinates outside `[0, 1]` are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WrapMode {
    #[default]
    None,
    Wrap,
    Mirror,
    Clamp,
    Border,
}

/// Image texture
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Texture {
    pub url: String,
    pub repeat: bool,
    pub wrap_mode: WrapMode,
    /// RGBA, used with [`WrapMode::Border`]
    pub border_color: [f32; 4],
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AppearanceKind {
    Material(Material),
    Texture(Texture),
}

/// A material or texture as identified in the source document
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Appearance {
    pub id: String,
    pub kind: AppearanceKind,
}

impl Appearance {
    pub fn material(id: impl Into<String>, material: Material) -> Self {
        Self {
            id: id.into(),
            kind: AppearanceKind::Material(material),
        }
    }

    pub fn texture(id: impl Into<String>, texture: Texture) -> Self {
        Self {
            id: id.into(),
            kind: AppearanceKind::Texture(texture),
        }
    }

    pub fn is_texture(&self) -> bool {
        matches!(self.kind, AppearanceKind::Texture(_))
    }
}

/// Owns every appearance of a document and resolves node ids to them
#[derive(Debug, Default)]
pub struct AppearanceManager {
    appearances: SlotMap<AppearanceKey, Appearance>,
    last_added: Option<AppearanceKey>,
    by_node: FxHashMap<String, AppearanceKey>,
    tex_coords: FxHashMap<String, TexCoords>,
    /// Node assigned last, still waiting for texture coordinates
    last_id: Option<String>,
    /// Texture coordinates waiting for a node assignment
    pending_coords: Option<TexCoords>,
}

impl AppearanceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an appearance; later assignments bind to it
    pub fn add_appearance(&mut self, appearance: Appearance) -> AppearanceKey {
        let key = self.appearances.insert(appearance);
        self.last_added = Some(key);
        key
    }

    /// Bind `node_id` to the most recently added appearance
    ///
    /// The first binding of an id wins; assigning an already bound id is
    /// ignored and leaves nothing waiting for texture coordinates.
    pub fn assign_node(&mut self, node_id: impl Into<String>) -> Result<()> {
        let node_id = node_id.into();
        let Some(current) = self.last_added else {
            return Err(Error::NoAppearance(node_id));
        };

        if self.by_node.contains_key(&node_id) {
            tracing::trace!(node = %node_id, "Node already has an appearance");
            self.last_id = None;
            return Ok(());
        }

        self.by_node.insert(node_id.clone(), current);
        self.last_id = Some(node_id);

        if let Some(coords) = self.pending_coords.take() {
            self.attach_tex_coords(coords);
            self.last_id = None;
        }
        Ok(())
    }

    /// Attach texture coordinates to the node assigned last
    ///
    /// Returns `false` if no assignment is waiting; the coordinates are then
    /// held for the next one.
    pub fn attach_tex_coords(&mut self, coords: TexCoords) -> bool {
        match self.last_id.take() {
            Some(node_id) => {
                self.tex_coords.insert(node_id, coords);
                self.pending_coords = None;
                true
            }
            None => {
                self.pending_coords = Some(coords);
                false
            }
        }
    }

    /// Appearance bound to exactly this node id
    #[inline]
    pub fn appearance_for(&self, node_id: &str) -> Option<AppearanceKey> {
        self.by_node.get(node_id).copied()
    }

    /// Texture coordinates attached to exactly this node id
    #[inline]
    pub fn tex_coords_for(&self, node_id: &str) -> Option<&[[f32; 2]]> {
        self.tex_coords.get(node_id).map(Vec::as_slice)
    }

    #[inline]
    pub fn get(&self, key: AppearanceKey) -> Option<&Appearance> {
        self.appearances.get(key)
    }

    pub fn len(&self) -> usize {
        self.appearances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appearances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AppearanceKey, &Appearance)> {
        self.appearances.iter()
    }

    /// End the assignment protocol, discarding anything still pending
    pub fn finish(&mut self) {
        if let Some(coords) = self.pending_coords.take() {
            tracing::debug!(
                count = coords.len(),
                "Discarding texture coordinates never attached to a node"
            );
        }
        self.last_id = None;
    }
}
