// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decomposition of a polygon set into non-overlapping trapezoids.
//!
//! Each covered y-interval of each sweep slab becomes one trapezoid with
//! vertical sides at the slab boundaries. Adjacent trapezoids share their
//! snapped corner coordinates exactly, so the pieces tile the filled region
//! without overlap and their areas sum to the normalized area.

use crate::polygon::{Point, Polygon};
use crate::stitch::snap;
use crate::sweep::{collect_edges, sweep_slabs, BooleanOp, Edge};

/// Decompose the nonzero-filled region of `polygons` into trapezoids.
///
/// Degenerate slabs and intervals (zero width or height after snapping)
/// are skipped. Output polygons are counter-clockwise and have 3 or 4
/// vertices.
pub(crate) fn decompose(polygons: &[Polygon]) -> Vec<Polygon> {
    let mut edges = Vec::new();
    collect_edges(polygons, true, &mut edges);

    let mut trapezoids = Vec::new();
    sweep_slabs(&edges, BooleanOp::Union, |edges: &[Edge], xa, xb, intervals| {
        let sxa = snap(xa);
        let sxb = snap(xb);
        if sxa == sxb {
            return;
        }
        for &(lo, hi) in intervals {
            let corners = [
                (sxa, snap(edges[lo].y_at(xa))),
                (sxb, snap(edges[lo].y_at(xb))),
                (sxb, snap(edges[hi].y_at(xb))),
                (sxa, snap(edges[hi].y_at(xa))),
            ];
            if let Some(poly) = build_trapezoid(&corners) {
                trapezoids.push(poly);
            }
        }
    });

    trapezoids
}

/// Build a polygon from trapezoid corners, collapsing coincident ones.
fn build_trapezoid(corners: &[(i64, i64); 4]) -> Option<Polygon> {
    let mut vertices: Vec<Point> = Vec::with_capacity(4);
    for &(x, y) in corners {
        let p = Point::new(x as i32, y as i32);
        if vertices.last() != Some(&p) {
            vertices.push(p);
        }
    }
    while vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }
    let poly = Polygon::from_points(vertices);
    if poly.is_degenerate() || poly.signed_area() <= 0.0 {
        return None;
    }
    Some(poly)
}
