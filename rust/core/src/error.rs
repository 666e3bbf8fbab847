// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the core city-model types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A type name that matches no city object kind
    #[error("Unknown city object type: {0}")]
    UnknownObjectType(String),
}
