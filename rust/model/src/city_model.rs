// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Root container of a city document

use std::collections::BTreeMap;
use std::fmt;

use citymesh_core::{CityObjectType, TypeMask};
use citymesh_geometry::Tessellator;
#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

use crate::appearance::AppearanceManager;
use crate::city_object::CityObject;
use crate::options::FinishOptions;

/// City objects grouped by type, plus the document's appearances
#[derive(Debug, Default)]
pub struct CityModel {
    objects: BTreeMap<CityObjectType, Vec<CityObject>>,
    appearance_manager: AppearanceManager,
}

impl CityModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the bucket of its type, keeping insertion order
    pub fn add_city_object(&mut self, object: CityObject) {
        self.objects
            .entry(object.object_type())
            .or_default()
            .push(object);
    }

    #[inline]
    pub fn appearance_manager(&self) -> &AppearanceManager {
        &self.appearance_manager
    }

    #[inline]
    pub fn appearance_manager_mut(&mut self) -> &mut AppearanceManager {
        &mut self.appearance_manager
    }

    /// Objects of one type, in insertion order
    pub fn city_objects(&self, object_type: CityObjectType) -> &[CityObject] {
        self.objects
            .get(&object_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All objects, grouped by type
    pub fn iter(&self) -> impl Iterator<Item = &CityObject> {
        self.objects.values().flatten()
    }

    /// Objects whose type is selected by `mask`
    pub fn objects_matching<'a>(&'a self, mask: &TypeMask) -> impl Iterator<Item = &'a CityObject> + 'a {
        let mask = *mask;
        self.objects
            .iter()
            .filter(move |(ty, _)| mask.contains(**ty))
            .flat_map(|(_, objects)| objects.iter())
    }

    pub fn len(&self) -> usize {
        self.objects.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make the model render-ready with default options
    pub fn finish(&mut self, optimize: bool) {
        self.finish_with(&FinishOptions {
            optimize,
            ..Default::default()
        });
    }

    /// Finish every object, then close the appearance protocol
    ///
    /// Sequentially one tessellator serves the whole pass; in parallel each
    /// worker owns one. Either way they are dropped at the end.
    pub fn finish_with(&mut self, options: &FinishOptions) {
        let manager = &self.appearance_manager;

        // No threads on WASM
        #[cfg(not(target_arch = "wasm32"))]
        {
            if options.parallel {
                let objects: Vec<&mut CityObject> = self.objects.values_mut().flatten().collect();
                objects
                    .into_par_iter()
                    .for_each_init(Tessellator::new, |tess, object| {
                        object.finish(tess, manager, options)
                    });
            } else {
                finish_sequential(&mut self.objects, manager, options);
            }
        }

        #[cfg(target_arch = "wasm32")]
        finish_sequential(&mut self.objects, manager, options);

        self.appearance_manager.finish();

        tracing::debug!(
            objects = self.len(),
            optimize = options.optimize,
            tessellate = options.tessellate,
            "Finished city model"
        );
    }
}

fn finish_sequential(
    objects: &mut BTreeMap<CityObjectType, Vec<CityObject>>,
    manager: &AppearanceManager,
    options: &FinishOptions,
) {
    let mut tess = Tessellator::new();
    for object in objects.values_mut().flatten() {
        object.finish(&mut tess, manager, options);
    }
}

impl fmt::Display for CityModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for object in self.iter() {
            write!(f, "{}", object)?;
        }
        writeln!(f, "{} city objects.", self.len())
    }
}
