// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Offset (resize) engine: grow or shrink a polygon set by a perpendicular
//! distance.
//!
//! Growing is a Minkowski-style construction: the normalized input is
//! unioned with one rectangle per edge, pushed to the solid's exterior, and
//! one join piece per convex corner (miter quad by default, arc fan when
//! requested). Normalization runs first so every loop carries a known
//! winding and "exterior" is always the right-hand side of travel, for
//! outer boundaries and holes alike. Shrinking reuses growing through the
//! complement: subtract the set from an inflated bounding frame, grow that
//! complement, and subtract the grown complement from the frame again.

use crate::error::{Error, Result};
use crate::polygon::{Point, Polygon};
use crate::stitch::snap;
use crate::sweep::{boolean, BooleanOp};
use nalgebra::Vector2;

/// Direction lengths below this are treated as a repeated vertex.
const MIN_EDGE_LEN: f64 = 1e-9;

/// Offset `polygons` by `distance` (positive grows, negative shrinks).
///
/// With `fill_arc_corners` set, convex corners are filled with a polygonal
/// arc of `arc_segments` chords; `arc_segments == 0` is rejected with
/// [`Error::InvalidParameter`] before any geometry is touched. A zero
/// distance only normalizes.
pub(crate) fn resize(
    polygons: &[Polygon],
    distance: f64,
    fill_arc_corners: bool,
    arc_segments: u32,
) -> Result<Vec<Polygon>> {
    if fill_arc_corners && arc_segments == 0 {
        return Err(Error::InvalidParameter(
            "arc corner fill requires at least 1 segment".to_string(),
        ));
    }

    let normalized = boolean(polygons, &[], BooleanOp::Union);
    if distance == 0.0 || normalized.is_empty() {
        return Ok(normalized);
    }

    if distance > 0.0 {
        let pieces = grow_pieces(&normalized, distance, fill_arc_corners, arc_segments);
        Ok(boolean(&pieces, &[], BooleanOp::Union))
    } else {
        let d = -distance;
        let frame = bounding_frame(&normalized, d);
        let complement = boolean(&[frame.clone()], &normalized, BooleanOp::Difference);
        let cover = grow_pieces(&complement, d, fill_arc_corners, arc_segments);
        Ok(boolean(&[frame], &cover, BooleanOp::Difference))
    }
}

/// The raw cover of the grown region: the loops themselves, an exterior
/// rectangle per edge and a join piece per convex corner. All generated
/// pieces are counter-clockwise so overlapping coverage only accumulates.
fn grow_pieces(
    loops: &[Polygon],
    distance: f64,
    fill_arc_corners: bool,
    arc_segments: u32,
) -> Vec<Polygon> {
    let mut pieces: Vec<Polygon> = Vec::with_capacity(loops.len() * 4);

    for poly in loops {
        if poly.is_degenerate() {
            continue;
        }
        pieces.push(poly.clone());

        let verts: Vec<Vector2<f64>> = poly
            .points()
            .map(|p| Vector2::new(p.x as f64, p.y as f64))
            .collect();
        let n = verts.len();

        // Unit direction of each edge i: verts[i] -> verts[i + 1]
        let dirs: Vec<Option<Vector2<f64>>> = (0..n)
            .map(|i| {
                let d = verts[(i + 1) % n] - verts[i];
                let len = d.norm();
                (len > MIN_EDGE_LEN).then(|| d / len)
            })
            .collect();

        for i in 0..n {
            let Some(dir) = dirs[i] else { continue };
            let normal = right_normal(&dir);
            // Exterior rectangle along the edge, counter-clockwise
            push_piece(
                &mut pieces,
                &[
                    verts[i],
                    verts[i] + normal * distance,
                    verts[(i + 1) % n] + normal * distance,
                    verts[(i + 1) % n],
                ],
            );
        }

        for i in 0..n {
            let Some(incoming) = dirs[(i + n - 1) % n] else { continue };
            let Some(outgoing) = dirs[i] else { continue };
            let turn = incoming.x * outgoing.y - incoming.y * outgoing.x;
            if turn <= MIN_EDGE_LEN {
                // Right turns leave the exterior rectangles overlapping;
                // only left turns open a wedge on the exterior side.
                continue;
            }
            let join = corner_join(
                &verts[i],
                &right_normal(&incoming),
                &right_normal(&outgoing),
                distance,
                fill_arc_corners,
                arc_segments,
            );
            push_piece(&mut pieces, &join);
        }
    }

    pieces
}

/// Exterior-side normal: the right-hand side of the travel direction.
/// Normalized loops keep the solid on the left, so this points out of the
/// solid for outer boundaries and into the void for holes.
#[inline]
fn right_normal(dir: &Vector2<f64>) -> Vector2<f64> {
    Vector2::new(dir.y, -dir.x)
}

/// Wedge filling the exterior gap at a convex corner: an arc fan of
/// `arc_segments` chords from the incoming offset normal to the outgoing
/// one, or a miter quad whose apex is the offset-line intersection. A
/// near-reversal spike has no finite miter apex and degenerates to a bevel.
fn corner_join(
    vertex: &Vector2<f64>,
    n1: &Vector2<f64>,
    n2: &Vector2<f64>,
    distance: f64,
    fill_arc_corners: bool,
    arc_segments: u32,
) -> Vec<Vector2<f64>> {
    if fill_arc_corners {
        let start = n1.y.atan2(n1.x);
        let cross = n1.x * n2.y - n1.y * n2.x;
        let dot = n1.dot(n2);
        let span = cross.atan2(dot).rem_euclid(std::f64::consts::TAU);

        let mut fan = Vec::with_capacity(arc_segments as usize + 2);
        fan.push(*vertex);
        for k in 0..=arc_segments {
            let angle = start + span * (k as f64 / arc_segments as f64);
            fan.push(vertex + Vector2::new(angle.cos(), angle.sin()) * distance);
        }
        fan
    } else {
        let denom = 1.0 + n1.dot(n2);
        if denom > 1e-9 {
            let apex = vertex + (n1 + n2) * (distance / denom);
            vec![*vertex, vertex + n1 * distance, apex, vertex + n2 * distance]
        } else {
            vec![*vertex, vertex + n1 * distance, vertex + n2 * distance]
        }
    }
}

/// Snap a generated piece to the grid and keep it when it still bounds
/// area. Rounding can flip a sliver's winding; generated cover must never
/// carve, so those are reoriented counter-clockwise.
fn push_piece(pieces: &mut Vec<Polygon>, corners: &[Vector2<f64>]) {
    let mut vertices: Vec<Point> = Vec::with_capacity(corners.len());
    for c in corners {
        let p = Point::new(snap(c.x) as i32, snap(c.y) as i32);
        if vertices.last() != Some(&p) {
            vertices.push(p);
        }
    }
    while vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }

    let mut poly = Polygon::from_points(vertices);
    if poly.is_degenerate() || poly.signed_area() == 0.0 {
        return;
    }
    if poly.signed_area() < 0.0 {
        let mut reversed: Vec<Point> = poly.points().collect();
        reversed.reverse();
        poly = Polygon::from_points(reversed);
    }
    pieces.push(poly);
}

/// Axis-aligned frame comfortably containing the set and every point
/// within `distance` of it.
fn bounding_frame(polygons: &[Polygon], distance: f64) -> Polygon {
    let mut min_x = i64::MAX;
    let mut min_y = i64::MAX;
    let mut max_x = i64::MIN;
    let mut max_y = i64::MIN;
    for poly in polygons {
        for p in poly.points() {
            min_x = min_x.min(p.x as i64);
            min_y = min_y.min(p.y as i64);
            max_x = max_x.max(p.x as i64);
            max_y = max_y.max(p.y as i64);
        }
    }

    let margin = distance.ceil() as i64 * 2 + 2;
    let clamp = |v: i64| v.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
    let (x0, y0) = (clamp(min_x - margin), clamp(min_y - margin));
    let (x1, y1) = (clamp(max_x + margin), clamp(max_y + margin));

    Polygon::from_points(vec![
        Point::new(x0, y0),
        Point::new(x1, y0),
        Point::new(x1, y1),
        Point::new(x0, y1),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::total_area;

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
    fn test_grow_square_with_miter_corners() {
        let result = resize(&[square(0, 0, 100)], 50.0, false, 0).unwrap();
        // Miter joins make the offset of a square another square
        assert_eq!(total_area(&result), 40000.0);
    }

    #[test]
    fn test_grow_square_with_arc_corners() {
        let result = resize(&[square(0, 0, 100)], 50.0, true, 8).unwrap();
        // Sides plus four quarter-circle fans of 8 chords each:
        // 30000 + 4 * (r^2 / 2) * 8 * sin(pi / 16)
        let expected = 30000.0 + 4.0 * 1250.0 * 8.0 * (std::f64::consts::PI / 16.0).sin();
        let area = total_area(&result);
        assert!((area - expected).abs() < 150.0, "area was {area}");
        // Arc corners are strictly inside the miter corners
        assert!(area < 40000.0);
    }

    #[test]
    fn test_shrink_square() {
        let result = resize(&[square(0, 0, 100)], -20.0, false, 0).unwrap();
        assert_eq!(total_area(&result), 3600.0);
    }

    #[test]
    fn test_shrink_past_collapse_is_empty() {
        let result = resize(&[square(0, 0, 100)], -60.0, false, 0).unwrap();
        assert_eq!(total_area(&result), 0.0);
    }

    #[test]
    fn test_shrink_preserves_hole_polarity() {
        // 40x40 square with a 10x10 hole; shrinking by 5 grows the hole
        let outer = square(0, 0, 40);
        let hole = Polygon::from_flat(&[15, 15, 15, 25, 25, 25, 25, 15]).unwrap();
        let result = resize(&[outer, hole], -5.0, false, 0).unwrap();
        // Outer becomes 30x30, hole becomes 20x20
        assert_eq!(total_area(&result), 900.0 - 400.0);
    }

    #[test]
    fn test_resize_monotonicity() {
        let base = vec![square(0, 0, 50), square(80, 0, 30)];
        let small = resize(&base, 5.0, true, 4).unwrap();
        let large = resize(&base, 15.0, true, 4).unwrap();
        assert!(total_area(&large) >= total_area(&small));
        assert!(total_area(&small) >= total_area(&base));
    }

    #[test]
    fn test_zero_distance_only_normalizes() {
        let overlapping = vec![square(0, 0, 10), square(5, 5, 10)];
        let result = resize(&overlapping, 0.0, false, 0).unwrap();
        assert_eq!(total_area(&result), 175.0);
    }

    #[test]
    fn test_arc_fill_rejects_zero_segments() {
        let result = resize(&[square(0, 0, 10)], 5.0, true, 0);
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_grow_merges_nearby_components() {
        // Two squares 10 apart merge once each grows by 6
        let parts = vec![square(0, 0, 20), square(30, 0, 20)];
        let result = resize(&parts, 6.0, false, 0).unwrap();
        assert_eq!(result.len(), 1);
    }
}
