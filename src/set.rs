// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon set container and the public operation surface.
//!
//! A set owns its polygons outright; cross-set operations read the other
//! operand and rebuild geometry instead of sharing it. Every mutating
//! operation computes the full replacement collection before swapping it
//! in, so an error or panic mid-computation never leaves the set in a
//! partially mutated state.

use crate::error::{Error, Result};
use crate::polygon::{total_area, Polygon};
use crate::sweep::{boolean, BooleanOp};
use crate::{offset, trapezoid};
use tracing::debug;

/// An unordered, duplicate-tolerant collection of integer polygons
/// representing the union of their filled areas under the nonzero fill
/// rule.
#[derive(Debug, Clone, Default)]
pub struct PolygonSet {
    polygons: Vec<Polygon>,
}

impl PolygonSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one polygon from a flat `[x0, y0, x1, y1, ...]` slice.
    ///
    /// No normalization happens here; overlaps and self-intersections are
    /// resolved by the next boolean operation. Fails with
    /// [`Error::InvalidGeometry`] on an odd-length slice, leaving the set
    /// unchanged.
    pub fn add_polygon(&mut self, coords: &[i32]) -> Result<()> {
        let polygon = Polygon::from_flat(coords)?;
        self.polygons.push(polygon);
        Ok(())
    }

    /// Append an already constructed polygon
    pub fn push(&mut self, polygon: Polygon) {
        self.polygons.push(polygon);
    }

    /// Number of polygons currently stored (not an area-normalized count)
    #[inline]
    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Flat coordinates of the polygon at `index`, or an empty sequence
    /// when the index is out of range. This mirrors the permissive binding
    /// surface; [`PolygonSet::try_polygon`] is the strict alternative.
    pub fn polygon(&self, index: usize) -> Vec<i32> {
        self.polygons
            .get(index)
            .map(Polygon::flat_coords)
            .unwrap_or_default()
    }

    /// Polygon at `index`, failing with [`Error::IndexOutOfRange`]
    pub fn try_polygon(&self, index: usize) -> Result<&Polygon> {
        self.polygons.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.polygons.len(),
        })
    }

    /// Stored polygons in insertion order
    #[inline]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Remove all polygons
    pub fn clear(&mut self) {
        self.polygons.clear();
    }

    /// True when the normalized area is zero.
    ///
    /// Emptiness is an area property, not a count property: a collection
    /// of degenerate or mutually cancelling polygons is empty even though
    /// `polygon_count` is positive.
    pub fn is_empty(&self) -> bool {
        if self.polygons.iter().all(Polygon::is_degenerate) {
            return true;
        }
        let normalized = boolean(&self.polygons, &[], BooleanOp::Union);
        total_area(&normalized) == 0.0
    }

    /// Signed sum of each stored polygon's shoelace area. Winding order
    /// determines each contribution's sign, so holes subtract.
    pub fn area(&self) -> f64 {
        total_area(&self.polygons)
    }

    /// Replace this set with the area filled by `self` or `other`
    pub fn union_with(&mut self, other: &PolygonSet) {
        self.apply(other, BooleanOp::Union);
    }

    /// Replace this set with the area filled by both `self` and `other`
    pub fn intersect_with(&mut self, other: &PolygonSet) {
        self.apply(other, BooleanOp::Intersection);
    }

    /// Replace this set with the area filled by `self` and not `other`
    pub fn subtract(&mut self, other: &PolygonSet) {
        self.apply(other, BooleanOp::Difference);
    }

    /// Replace this set with the area filled by exactly one of `self` and
    /// `other`
    pub fn symmetric_difference(&mut self, other: &PolygonSet) {
        self.apply(other, BooleanOp::SymmetricDifference);
    }

    /// Resolve self-overlaps and self-intersections into a clean
    /// non-overlapping representation (the union of the set with itself)
    pub fn normalize(&mut self) {
        let result = boolean(&self.polygons, &[], BooleanOp::Union);
        debug!(
            before = self.polygons.len(),
            after = result.len(),
            "normalized polygon set"
        );
        self.polygons = result;
    }

    /// Replace the collection with non-overlapping trapezoids whose union
    /// equals the normalized filled area
    pub fn trapezoidize(&mut self) {
        let result = trapezoid::decompose(&self.polygons);
        debug!(trapezoids = result.len(), "trapezoidized polygon set");
        self.polygons = result;
    }

    /// Offset the filled area by `distance` (positive grows, negative
    /// shrinks), optionally filling convex corners with `arc_segments`-chord
    /// arcs. See [`Error::InvalidParameter`] for the arc constraint.
    pub fn resize(
        &mut self,
        distance: f64,
        fill_arc_corners: bool,
        arc_segments: u32,
    ) -> Result<()> {
        let result = offset::resize(&self.polygons, distance, fill_arc_corners, arc_segments)?;
        debug!(distance, polygons = result.len(), "resized polygon set");
        self.polygons = result;
        Ok(())
    }

    fn apply(&mut self, other: &PolygonSet, op: BooleanOp) {
        let result = boolean(&self.polygons, &other.polygons, op);
        debug!(
            ?op,
            subject = self.polygons.len(),
            clip = other.polygons.len(),
            output = result.len(),
            "applied boolean operation"
        );
        self.polygons = result;
    }
}
