// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Key types for arena-based appearance storage.
//!
//! Appearances live in a `slotmap::SlotMap` owned by the appearance manager.
//! Polygons hold a copyable key instead of a pointer; two polygons share an
//! appearance exactly when their keys are equal.

use slotmap::new_key_type;

new_key_type! {
    /// Key for a registered appearance (material or texture).
    pub struct AppearanceKey;
}
