// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integer polygon-set algebra for 2D layout geometry.
//!
//! A [`PolygonSet`] holds polygons over integer coordinates (winding order
//! encodes solid versus hole under the nonzero fill rule) and supports the
//! boolean set operations, decomposition into non-overlapping trapezoids,
//! and grow/shrink offsetting with miter or arc corners. All mutating
//! operations replace the set's contents with a freshly normalized
//! collection; malformed coordinate input fails fast while geometric
//! degeneracies are absorbed by the fill-rule semantics.

pub mod error;
pub mod polygon;
pub mod set;

mod offset;
mod stitch;
mod sweep;
mod trapezoid;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Vector2};

pub use error::{Error, Result};
pub use polygon::{Point, Polygon};
pub use set::PolygonSet;
