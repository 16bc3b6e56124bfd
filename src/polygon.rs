// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integer point and polygon primitives

use crate::error::{Error, Result};
use nalgebra::Point2;

/// Integer lattice point
pub type Point = Point2<i32>;

/// An implicitly closed polygon over integer coordinates.
///
/// Vertices are stored in insertion order; an edge connects the last vertex
/// back to the first, so no closing point is stored or emitted. Winding
/// order encodes polarity under the nonzero fill rule: counter-clockwise
/// loops contribute positive coverage, clockwise loops negative (holes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    /// Build a polygon from a flat `[x0, y0, x1, y1, ...]` coordinate slice.
    ///
    /// Fails with [`Error::InvalidGeometry`] when the slice length is odd.
    /// No deduplication or edge validation happens here; polygons with
    /// fewer than 3 vertices or zero area are accepted and treated as
    /// empty by the consuming algorithms.
    pub fn from_flat(coords: &[i32]) -> Result<Self> {
        if coords.len() % 2 != 0 {
            return Err(Error::InvalidGeometry(format!(
                "flat coordinate sequence must hold (x, y) pairs, got {} values",
                coords.len()
            )));
        }

        let vertices = coords
            .chunks_exact(2)
            .map(|pair| Point::new(pair[0], pair[1]))
            .collect();

        Ok(Self { vertices })
    }

    /// Build a polygon from an owned vertex list
    pub fn from_points(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    /// Number of vertices
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// True when the polygon has no vertices at all
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// True when the polygon has fewer than 3 vertices and cannot bound area
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.vertices.len() < 3
    }

    /// Vertices in insertion order as a lazy, restartable iterator.
    /// The implicit closing point is not emitted.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.vertices.iter().copied()
    }

    /// Vertex slice in insertion order
    #[inline]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Flatten back to `[x0, y0, x1, y1, ...]`
    pub fn flat_coords(&self) -> Vec<i32> {
        let mut coords = Vec::with_capacity(self.vertices.len() * 2);
        for p in &self.vertices {
            coords.push(p.x);
            coords.push(p.y);
        }
        coords
    }

    /// Signed shoelace area: positive for counter-clockwise winding.
    ///
    /// Accumulates in `i64`; coordinates within the documented `i32` range
    /// stay exact in double precision.
    pub fn signed_area(&self) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }

        let n = self.vertices.len();
        let mut twice: i64 = 0;
        for i in 0..n {
            let p = self.vertices[i];
            let q = self.vertices[(i + 1) % n];
            twice += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
        }

        twice as f64 * 0.5
    }
}

/// Net signed area of a polygon collection
pub(crate) fn total_area(polygons: &[Polygon]) -> f64 {
    polygons.iter().map(Polygon::signed_area).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flat_pairs() {
        let poly = Polygon::from_flat(&[0, 0, 10, 0, 10, 10, 0, 10]).unwrap();
        assert_eq!(poly.len(), 4);
        assert_eq!(poly.vertices()[2], Point::new(10, 10));
    }

    #[test]
    fn test_from_flat_odd_length_fails() {
        let result = Polygon::from_flat(&[0, 0, 10]);
        assert!(matches!(result, Err(Error::InvalidGeometry(_))));
    }

    #[test]
    fn test_flat_round_trip() {
        let coords = vec![0, 0, 10, 0, 10, 10, 0, 10];
        let poly = Polygon::from_flat(&coords).unwrap();
        assert_eq!(poly.flat_coords(), coords);
    }

    #[test]
    fn test_points_iterator_is_restartable() {
        let poly = Polygon::from_flat(&[0, 0, 5, 0, 5, 5]).unwrap();
        assert_eq!(poly.points().count(), 3);
        // Second pass yields the same sequence
        let first: Vec<Point> = poly.points().collect();
        let second: Vec<Point> = poly.points().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_signed_area_ccw() {
        let poly = Polygon::from_flat(&[0, 0, 10, 0, 10, 10, 0, 10]).unwrap();
        assert_eq!(poly.signed_area(), 100.0);
    }

    #[test]
    fn test_signed_area_cw() {
        let poly = Polygon::from_flat(&[0, 0, 0, 10, 10, 10, 10, 0]).unwrap();
        assert_eq!(poly.signed_area(), -100.0);
    }

    #[test]
    fn test_degenerate_area_is_zero() {
        let two_points = Polygon::from_flat(&[0, 0, 10, 10]).unwrap();
        assert_eq!(two_points.signed_area(), 0.0);
        assert!(two_points.is_degenerate());

        // Collinear triangle bounds no area
        let collinear = Polygon::from_flat(&[0, 0, 5, 5, 10, 10]).unwrap();
        assert_eq!(collinear.signed_area(), 0.0);
        assert!(!collinear.is_degenerate());
    }
}
