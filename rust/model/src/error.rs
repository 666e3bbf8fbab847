// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for model construction
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building a city model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Cannot assign node '{0}': no appearance has been added yet")]
    NoAppearance(String),

    #[error("Invalid value '{value}' for option {name}")]
    InvalidOption { name: String, value: String },
}
