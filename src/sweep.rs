// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scanline sweep core shared by the boolean, trapezoidation and offset
//! engines.
//!
//! The plane is swept along x. Non-vertical edges are oriented by ascending
//! x and carry a winding weight of +1 (original direction was
//! left-to-right) or -1. Event positions are every edge endpoint x plus
//! every pairwise edge-crossing x, so inside a slab between two consecutive
//! events every active edge is linear and crossing-free. Walking the active
//! edges of a slab in y order accumulates per-operand winding counts; the
//! boolean predicate over nonzero coverage turns that walk into maximal
//! covered y-intervals. Edges sharing an event endpoint need no explicit
//! tie-break: ordering at the slab midpoint separates them by slope.
//!
//! All sweep state lives in an edge arena (`Vec<Edge>`) addressed by an
//! explicit ordered index list, and is dropped when the operation returns.

use crate::polygon::Polygon;
use crate::stitch::{snap, SegmentSink};
use smallvec::SmallVec;

/// Event/coordinate comparison tolerance. Input vertices sit on the integer
/// grid, so anything closer than this is the same position.
pub(crate) const EPS: f64 = 1e-9;

/// Boolean predicate over the two operands' nonzero coverage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BooleanOp {
    Union,
    Intersection,
    Difference,
    SymmetricDifference,
}

impl BooleanOp {
    #[inline]
    fn filled(self, a: bool, b: bool) -> bool {
        match self {
            BooleanOp::Union => a || b,
            BooleanOp::Intersection => a && b,
            BooleanOp::Difference => a && !b,
            BooleanOp::SymmetricDifference => a != b,
        }
    }
}

/// A non-vertical edge oriented by ascending x
#[derive(Debug, Clone, Copy)]
pub(crate) struct Edge {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    /// +1 when the polygon traversed this edge left-to-right, -1 otherwise
    weight: i32,
    /// True when the edge came from the first operand
    subject: bool,
}

impl Edge {
    /// y of the supporting line at x; callers keep x within [x0, x1]
    #[inline]
    pub fn y_at(&self, x: f64) -> f64 {
        self.y0 + (self.y1 - self.y0) * (x - self.x0) / (self.x1 - self.x0)
    }

    #[inline]
    fn y_min(&self) -> f64 {
        self.y0.min(self.y1)
    }

    #[inline]
    fn y_max(&self) -> f64 {
        self.y0.max(self.y1)
    }
}

/// A covered y-interval in one slab, as (lower edge, upper edge) indices
/// into the edge arena.
pub(crate) type Interval = (usize, usize);

/// Collect the non-vertical edges of a polygon collection.
///
/// Vertical edges are parallel to the coverage scan at every fixed x and
/// never span a slab of positive width, so they contribute nothing here.
/// Degenerate polygons contribute no coverage at all.
pub(crate) fn collect_edges(polygons: &[Polygon], subject: bool, edges: &mut Vec<Edge>) {
    for poly in polygons {
        if poly.is_degenerate() {
            continue;
        }
        let verts = poly.vertices();
        let n = verts.len();
        for i in 0..n {
            let p = verts[i];
            let q = verts[(i + 1) % n];
            if p.x == q.x {
                continue;
            }
            let (x0, y0, x1, y1, weight) = if p.x < q.x {
                (p.x, p.y, q.x, q.y, 1)
            } else {
                (q.x, q.y, p.x, p.y, -1)
            };
            edges.push(Edge {
                x0: x0 as f64,
                y0: y0 as f64,
                x1: x1 as f64,
                y1: y1 as f64,
                weight,
                subject,
            });
        }
    }
}

/// Interior crossing x of two edges, if any.
///
/// Endpoint touches and T-junctions already coincide with endpoint events
/// and are skipped; collinear overlaps never cross.
fn crossing_x(a: &Edge, b: &Edge) -> Option<f64> {
    let d1x = a.x1 - a.x0;
    let d1y = a.y1 - a.y0;
    let d2x = b.x1 - b.x0;
    let d2y = b.y1 - b.y0;

    let denom = d1x * d2y - d1y * d2x;
    if denom.abs() < EPS {
        return None;
    }

    let sx = b.x0 - a.x0;
    let sy = b.y0 - a.y0;
    let t = (sx * d2y - sy * d2x) / denom;
    let u = (sx * d1y - sy * d1x) / denom;

    const INTERIOR: f64 = 1e-12;
    if t > INTERIOR && t < 1.0 - INTERIOR && u > INTERIOR && u < 1.0 - INTERIOR {
        Some(a.x0 + t * d1x)
    } else {
        None
    }
}

/// Sorted, deduplicated event positions: every endpoint x plus every
/// pairwise crossing x, gathered by a sort-and-prune pass over x-sorted
/// edges.
pub(crate) fn event_positions(edges: &[Edge], order: &[usize]) -> Vec<f64> {
    let mut events = Vec::with_capacity(edges.len() * 2);
    for e in edges {
        events.push(e.x0);
        events.push(e.x1);
    }

    for (pos, &i) in order.iter().enumerate() {
        let ei = &edges[i];
        for &j in &order[pos + 1..] {
            let ej = &edges[j];
            if ej.x0 >= ei.x1 {
                break;
            }
            if ei.y_min() > ej.y_max() || ej.y_min() > ei.y_max() {
                continue;
            }
            if let Some(x) = crossing_x(ei, ej) {
                events.push(x);
            }
        }
    }

    events.sort_by(f64::total_cmp);
    events.dedup_by(|a, b| (*a - *b).abs() <= EPS);
    events
}

/// Covered y-intervals of one slab: walk the active edges in y order at the
/// slab midpoint, accumulating per-operand winding, and open/close runs
/// where the predicate flips.
pub(crate) fn slab_intervals(
    edges: &[Edge],
    active: &[usize],
    xa: f64,
    xb: f64,
    op: BooleanOp,
) -> SmallVec<[Interval; 8]> {
    let xm = 0.5 * (xa + xb);
    let mut ordered: SmallVec<[(f64, usize); 16]> = active
        .iter()
        .map(|&i| (edges[i].y_at(xm), i))
        .collect();
    ordered.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut intervals = SmallVec::new();
    let mut wind_a = 0i32;
    let mut wind_b = 0i32;
    let mut open: Option<usize> = None;

    for &(_, idx) in &ordered {
        let e = &edges[idx];
        if e.subject {
            wind_a += e.weight;
        } else {
            wind_b += e.weight;
        }
        let filled = op.filled(wind_a != 0, wind_b != 0);
        match (open, filled) {
            (None, true) => open = Some(idx),
            (Some(lower), false) => {
                intervals.push((lower, idx));
                open = None;
            }
            _ => {}
        }
    }

    // Winding returns to zero past the last edge, so no run stays open.
    intervals
}

/// Visitor over every (slab, covered interval) pair of a sweep.
///
/// `xa`/`xb` are the slab bounds; `lower`/`upper` index the edge arena.
pub(crate) fn sweep_slabs<F>(edges: &[Edge], op: BooleanOp, mut visit: F)
where
    F: FnMut(&[Edge], f64, f64, &[Interval]),
{
    if edges.is_empty() {
        return;
    }

    let mut order: Vec<usize> = (0..edges.len()).collect();
    order.sort_by(|&a, &b| edges[a].x0.total_cmp(&edges[b].x0));

    let events = event_positions(edges, &order);

    let mut active: Vec<usize> = Vec::new();
    let mut next = 0usize;

    for window in events.windows(2) {
        let (xa, xb) = (window[0], window[1]);
        while next < order.len() && edges[order[next]].x0 <= xa + EPS {
            active.push(order[next]);
            next += 1;
        }
        active.retain(|&i| edges[i].x1 >= xb - EPS);
        if active.is_empty() {
            continue;
        }

        let intervals = slab_intervals(edges, &active, xa, xb, op);
        visit(edges, xa, xb, &intervals);
    }
}

/// Compute a boolean combination of two polygon collections.
///
/// The result is normalized: snap-rounded to the integer grid, stitched
/// into closed loops with counter-clockwise outer boundaries and clockwise
/// holes, with collinear interior vertices removed. `boolean(a, &[],
/// Union)` is the normalize operation.
pub(crate) fn boolean(subject: &[Polygon], clip: &[Polygon], op: BooleanOp) -> Vec<Polygon> {
    let mut edges = Vec::new();
    collect_edges(subject, true, &mut edges);
    collect_edges(clip, false, &mut edges);
    if edges.is_empty() {
        return Vec::new();
    }

    let mut sink = SegmentSink::default();

    // Coverage of the previous slab evaluated at its right boundary, for
    // the vertical column between two slabs.
    let mut prev_cover: Vec<(i64, i64)> = Vec::new();
    let mut prev_x: Option<f64> = None;

    sweep_slabs(&edges, op, |edges, xa, xb, intervals| {
        let sxa = snap(xa);
        let sxb = snap(xb);

        let left_cover: Vec<(i64, i64)> = intervals
            .iter()
            .map(|&(lo, hi)| (snap(edges[lo].y_at(xa)), snap(edges[hi].y_at(xa))))
            .collect();
        let right_cover: Vec<(i64, i64)> = intervals
            .iter()
            .map(|&(lo, hi)| (snap(edges[lo].y_at(xb)), snap(edges[hi].y_at(xb))))
            .collect();

        // Slanted boundaries of this slab, region kept on the left:
        // lower bounds run left-to-right, upper bounds right-to-left.
        if sxa != sxb {
            for (&(lo_a, hi_a), &(lo_b, hi_b)) in left_cover.iter().zip(&right_cover) {
                sink.add((sxa, lo_a), (sxb, lo_b));
                sink.add((sxb, hi_b), (sxa, hi_a));
            }
        }

        // Vertical boundaries at the event between the previous slab and
        // this one. Slabs with no coverage never reach this visitor, so an
        // intervening uncovered slab is flushed here as well.
        match prev_x {
            Some(px) if (px - xa).abs() <= EPS => {
                sink.add_column(sxa, &prev_cover, &left_cover);
            }
            _ => {
                if let Some(px) = prev_x {
                    sink.add_column(snap(px), &prev_cover, &[]);
                }
                sink.add_column(sxa, &[], &left_cover);
            }
        }

        prev_cover = right_cover;
        prev_x = Some(xb);
    });

    // Closing column past the final covered slab
    if let Some(px) = prev_x {
        sink.add_column(snap(px), &prev_cover, &[]);
    }

    sink.into_loops()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::total_area;
    use approx::assert_relative_eq;

    fn square(x0: i32, y0: i32, size: i32) -> Polygon {
        Polygon::from_flat(&[
            x0,
            y0,
            x0 + size,
            y0,
            x0 + size,
            y0 + size,
            x0,
            y0 + size,
        ])
        .unwrap()
    }

    #[test]
    fn test_union_overlapping_squares() {
        let a = vec![square(0, 0, 10)];
        let b = vec![square(5, 5, 10)];
        let result = boolean(&a, &b, BooleanOp::Union);
        assert_eq!(result.len(), 1);
        assert_relative_eq!(total_area(&result), 175.0);
    }

    #[test]
    fn test_intersection_overlapping_squares() {
        let a = vec![square(0, 0, 10)];
        let b = vec![square(5, 5, 10)];
        let result = boolean(&a, &b, BooleanOp::Intersection);
        assert_relative_eq!(total_area(&result), 25.0);
    }

    #[test]
    fn test_difference_overlapping_squares() {
        let a = vec![square(0, 0, 10)];
        let b = vec![square(5, 5, 10)];
        let result = boolean(&a, &b, BooleanOp::Difference);
        assert_relative_eq!(total_area(&result), 75.0);
    }

    #[test]
    fn test_xor_overlapping_squares() {
        let a = vec![square(0, 0, 10)];
        let b = vec![square(5, 5, 10)];
        let result = boolean(&a, &b, BooleanOp::SymmetricDifference);
        assert_relative_eq!(total_area(&result), 150.0);
    }

    #[test]
    fn test_union_disjoint_squares_keeps_two_loops() {
        let a = vec![square(0, 0, 10)];
        let b = vec![square(20, 20, 10)];
        let result = boolean(&a, &b, BooleanOp::Union);
        assert_eq!(result.len(), 2);
        assert_relative_eq!(total_area(&result), 200.0);
    }

    #[test]
    fn test_difference_of_identical_squares_is_empty() {
        let a = vec![square(0, 0, 10)];
        let result = boolean(&a, &a.clone(), BooleanOp::Difference);
        assert_relative_eq!(total_area(&result), 0.0);
    }

    #[test]
    fn test_normalize_merges_self_overlap() {
        // Two identical squares in one operand: winding 2 inside, still
        // one filled square after normalization.
        let a = vec![square(0, 0, 10), square(0, 0, 10)];
        let result = boolean(&a, &[], BooleanOp::Union);
        assert_eq!(result.len(), 1);
        assert_relative_eq!(total_area(&result), 100.0);
    }

    #[test]
    fn test_difference_carves_hole() {
        let a = vec![square(0, 0, 20)];
        let b = vec![square(5, 5, 10)];
        let result = boolean(&a, &b, BooleanOp::Difference);
        // Outer boundary plus a clockwise hole loop
        assert_eq!(result.len(), 2);
        assert_relative_eq!(total_area(&result), 300.0);
        let negative = result.iter().filter(|p| p.signed_area() < 0.0).count();
        assert_eq!(negative, 1);
    }

    #[test]
    fn test_hole_winding_cancels_under_normalize() {
        // CCW outer with a CW hole of equal size nets to zero coverage
        let outer = square(0, 0, 10);
        let hole = Polygon::from_flat(&[0, 0, 0, 10, 10, 10, 10, 0]).unwrap();
        let result = boolean(&[outer, hole], &[], BooleanOp::Union);
        assert_relative_eq!(total_area(&result), 0.0);
    }

    #[test]
    fn test_crossing_edges_get_events() {
        // A band crossing a triangle's hypotenuse at (7, 3) and (3, 7)
        let a = vec![Polygon::from_flat(&[0, 0, 10, 0, 0, 10]).unwrap()];
        let b = vec![Polygon::from_flat(&[0, 3, 10, 3, 10, 7, 0, 7]).unwrap()];
        let union = boolean(&a, &b, BooleanOp::Union);
        let inter = boolean(&a, &b, BooleanOp::Intersection);
        assert_relative_eq!(total_area(&inter), 20.0, epsilon = 1e-6);
        // Inclusion-exclusion across the crossings
        assert_relative_eq!(
            total_area(&union) + total_area(&inter),
            50.0 + 40.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_corner_touching_squares_stay_separate() {
        let a = vec![square(0, 0, 10)];
        let b = vec![square(10, 10, 10)];
        let result = boolean(&a, &b, BooleanOp::Union);
        assert_eq!(result.len(), 2);
        assert_relative_eq!(total_area(&result), 200.0);
    }
}
