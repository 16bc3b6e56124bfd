// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Snap-rounding, directed-segment cancellation and loop assembly.
//!
//! The sweep emits the boundary of the result region as directed segments
//! with the region kept on the left. Segments are snapped to the integer
//! grid, opposite traversals of the same geometry cancel, and the survivors
//! are chained into closed loops by endpoint matching. Region-on-left makes
//! outer boundaries come out counter-clockwise and holes clockwise without
//! any separate classification pass.

use crate::polygon::{Point, Polygon};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Snapped grid position
pub(crate) type GridPoint = (i64, i64);

/// Round a sweep coordinate to the integer grid
#[inline]
pub(crate) fn snap(v: f64) -> i64 {
    v.round() as i64
}

/// Accumulates directed boundary segments with net multiplicity.
///
/// Each undirected segment is keyed by its lexicographically smaller
/// endpoint; the signed count records how often it was traversed in the
/// canonical direction minus the opposite one. Exact opposite traversals
/// cancel to zero and vanish from the output.
#[derive(Default)]
pub(crate) struct SegmentSink {
    net: FxHashMap<(GridPoint, GridPoint), i32>,
}

impl SegmentSink {
    /// Record one directed segment
    pub fn add(&mut self, from: GridPoint, to: GridPoint) {
        self.add_counted(from, to, 1);
    }

    fn add_counted(&mut self, from: GridPoint, to: GridPoint, count: i32) {
        if from == to || count == 0 {
            return;
        }
        let (key, delta) = if from < to {
            ((from, to), count)
        } else {
            ((to, from), -count)
        };
        let entry = self.net.entry(key).or_insert(0);
        *entry += delta;
        let dead = *entry == 0;
        // Drop cancelled keys eagerly so the stitch walk never sees them
        if dead {
            self.net.remove(&key);
        }
    }

    /// Record the vertical boundary at one x column.
    ///
    /// `left`/`right` are the covered y-intervals of the slabs on either
    /// side of the column, already snapped. Where only the left slab is
    /// covered the region's right boundary runs upward; where only the
    /// right slab is covered its left boundary runs downward. Shared
    /// coverage cancels and emits nothing.
    pub fn add_column(&mut self, x: i64, left: &[(i64, i64)], right: &[(i64, i64)]) {
        if left.is_empty() && right.is_empty() {
            return;
        }

        let mut deltas: SmallVec<[(i64, i32); 8]> = SmallVec::new();
        for &(lo, hi) in left {
            if lo != hi {
                deltas.push((lo, 1));
                deltas.push((hi, -1));
            }
        }
        for &(lo, hi) in right {
            if lo != hi {
                deltas.push((lo, -1));
                deltas.push((hi, 1));
            }
        }
        deltas.sort_unstable();

        let mut cover = 0i32;
        let mut prev_y = 0i64;
        for (y, delta) in deltas {
            if cover != 0 && y > prev_y {
                // cover > 0: left-only, upward; cover < 0: right-only, downward
                self.add_counted((x, prev_y), (x, y), cover);
            }
            cover += delta;
            prev_y = y;
        }
    }

    /// Chain surviving segments into closed polygon loops.
    pub fn into_loops(self) -> Vec<Polygon> {
        let mut segments: Vec<(GridPoint, GridPoint)> = Vec::with_capacity(self.net.len());
        for ((a, b), count) in self.net {
            for _ in 0..count.abs() {
                if count > 0 {
                    segments.push((a, b));
                } else {
                    segments.push((b, a));
                }
            }
        }

        let mut outgoing: FxHashMap<GridPoint, SmallVec<[usize; 4]>> = FxHashMap::default();
        for (i, seg) in segments.iter().enumerate() {
            outgoing.entry(seg.0).or_default().push(i);
        }

        let mut used = vec![false; segments.len()];
        let mut loops = Vec::new();

        for start in 0..segments.len() {
            if used[start] {
                continue;
            }
            used[start] = true;
            let origin = segments[start].0;
            let mut current = segments[start];
            let mut path: Vec<GridPoint> = vec![origin];
            let mut remaining = segments.len();
            let mut closed = false;

            loop {
                path.push(current.1);
                if current.1 == origin {
                    closed = true;
                    break;
                }
                if remaining == 0 {
                    break;
                }
                remaining -= 1;

                let next = outgoing
                    .get(&current.1)
                    .and_then(|candidates| pick_leftmost(&segments, &used, current, candidates));
                match next {
                    Some(i) => {
                        used[i] = true;
                        current = segments[i];
                    }
                    None => break,
                }
            }

            if !closed {
                // Open chain: degenerate rounding artifact, drop it
                continue;
            }
            path.pop();
            let cleaned = simplify_loop(&path);
            if cleaned.len() >= 3 {
                loops.push(Polygon::from_points(
                    cleaned
                        .iter()
                        .map(|&(x, y)| Point::new(x as i32, y as i32))
                        .collect(),
                ));
            }
        }

        loops
    }
}

/// At a junction, continue with the unused outgoing segment making the
/// sharpest left turn. That traces each face separately where loops touch
/// at a vertex instead of fusing them into a figure eight. A full U-turn is
/// ranked last so a spur is only taken when nothing else leaves the vertex.
fn pick_leftmost(
    segments: &[(GridPoint, GridPoint)],
    used: &[bool],
    incoming: (GridPoint, GridPoint),
    candidates: &[usize],
) -> Option<usize> {
    let din = direction(incoming);
    let mut best: Option<(f64, usize)> = None;
    for &i in candidates {
        if used[i] {
            continue;
        }
        let turn = turn_angle(din, direction(segments[i]));
        if best.map_or(true, |(b, _)| turn > b) {
            best = Some((turn, i));
        }
    }
    best.map(|(_, i)| i)
}

#[inline]
fn direction(seg: (GridPoint, GridPoint)) -> (f64, f64) {
    (
        (seg.1 .0 - seg.0 .0) as f64,
        (seg.1 .1 - seg.0 .1) as f64,
    )
}

/// Counter-clockwise turn angle in (-pi, pi], with exact reversal mapped to
/// the minimum instead of the maximum.
#[inline]
fn turn_angle(din: (f64, f64), dout: (f64, f64)) -> f64 {
    let cross = din.0 * dout.1 - din.1 * dout.0;
    let dot = din.0 * dout.0 + din.1 * dout.1;
    if cross == 0.0 && dot < 0.0 {
        return -std::f64::consts::PI;
    }
    cross.atan2(dot)
}

/// Drop repeated and collinear vertices from a closed loop
fn simplify_loop(path: &[GridPoint]) -> Vec<GridPoint> {
    let mut deduped: Vec<GridPoint> = Vec::with_capacity(path.len());
    for &p in path {
        if deduped.last() != Some(&p) {
            deduped.push(p);
        }
    }
    while deduped.len() > 1 && deduped.first() == deduped.last() {
        deduped.pop();
    }
    if deduped.len() < 3 {
        return Vec::new();
    }

    let n = deduped.len();
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let p = deduped[(i + n - 1) % n];
        let c = deduped[i];
        let q = deduped[(i + 1) % n];
        let cross = (c.0 - p.0) as i128 * (q.1 - p.1) as i128
            - (c.1 - p.1) as i128 * (q.0 - p.0) as i128;
        if cross != 0 {
            out.push(c);
        }
    }
    out
}
