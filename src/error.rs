// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for polygon set operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or transforming polygon sets
///
/// Only construction-time malformation and bad parameters are reported as
/// errors. Algorithmic degeneracies (zero-area polygons, self-intersections,
/// coincident edges) are resolved silently by the fill rule so that the
/// boolean algebra stays total over well-formed inputs.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Polygon index {index} out of range (set holds {len})")]
    IndexOutOfRange { index: usize, len: usize },
}
