// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inward offsets of rings and boundary edges.

use crate::error::{Error, Result};
use crate::line::LineSeg2;
use crate::polygon::Polygon2;
use nalgebra::{Point2, Vector2};

/// Unit normal of `v` pointing toward the interior of a ring with the
/// given winding (counter-clockwise keeps the interior on the left).
fn inward_normal(v: Vector2<f64>, counter_clockwise: bool) -> Option<Vector2<f64>> {
    let len = v.norm();
    if len == 0.0 {
        return None;
    }
    let left = Vector2::new(-v.y, v.x) / len;
    Some(if counter_clockwise { left } else { -left })
}

fn carrier_intersection(
    p1: Point2<f64>,
    d1: Vector2<f64>,
    p2: Point2<f64>,
    d2: Vector2<f64>,
) -> Option<Point2<f64>> {
    let denom = d1.x * d2.y - d1.y * d2.x;
    if denom.abs() < 1e-12 {
        return None;
    }
    let qp = p2 - p1;
    let t = (qp.x * d2.y - qp.y * d2.x) / denom;
    Some(p1 + d1 * t)
}

/// Miter offset of the whole ring. Positive `distance` shrinks the
/// polygon, negative grows it. Fails when the shrunken ring collapses.
pub fn offset_polygon_inward(poly: &Polygon2, distance: f64) -> Result<Polygon2> {
    let n = poly.vertex_count();
    if n < 3 {
        return Err(Error::DegeneratePolygon(format!(
            "ring has {n} vertices, need at least 3"
        )));
    }
    if distance == 0.0 {
        return Ok(poly.clone());
    }
    let ccw = !poly.is_clockwise();
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let prev = poly.edge((i + n - 1) % n);
        let curr = poly.edge(i);
        let (dp, dc) = (prev.vector(), curr.vector());
        let (np, nc) = match (inward_normal(dp, ccw), inward_normal(dc, ccw)) {
            (Some(a), Some(b)) => (a, b),
            _ => continue,
        };
        let vertex = poly.points[i];
        let shifted = match carrier_intersection(
            prev.start + np * distance,
            dp,
            curr.start + nc * distance,
            dc,
        ) {
            Some(p) => p,
            // collinear neighbours: translate the vertex straight in
            None => vertex + nc * distance,
        };
        out.push(shifted);
    }
    let offset = Polygon2::new(out);
    let shrinking = distance > 0.0;
    if offset.vertex_count() < 3
        || offset.area() <= 0.0
        || (shrinking && offset.area() >= poly.area())
    {
        return Err(Error::OffsetCollapsed(format!(
            "inward offset by {distance} left no usable ring"
        )));
    }
    Ok(offset)
}

/// Offsets a boundary segment perpendicular to itself, toward the
/// polygon interior. The interior side is probed just off the segment
/// midpoint so edges lying exactly on the boundary resolve correctly.
pub fn offset_seg_inward(seg: &LineSeg2, poly: &Polygon2, distance: f64) -> LineSeg2 {
    let v = seg.vector();
    let len = v.norm();
    if len == 0.0 {
        return *seg;
    }
    let n = Vector2::new(-v.y, v.x) / len;
    let probe = 1e-6 * (1.0 + distance.abs());
    let inward = if poly.contains_point(&(seg.midpoint() + n * probe)) {
        n
    } else {
        -n
    };
    LineSeg2::new(seg.start + inward * distance, seg.end + inward * distance)
}

/// True when the edge, offset inward by `distance`, still runs through
/// the polygon interior (sampled along the offset segment).
pub fn edge_offset_fits(poly: &Polygon2, edge_index: usize, distance: f64) -> bool {
    if poly.vertex_count() < 3 || distance <= 0.0 {
        return false;
    }
    let off = offset_seg_inward(&poly.edge(edge_index), poly, distance);
    [0.25, 0.5, 0.75]
        .iter()
        .all(|&t| poly.contains_point(&off.point_at(t)))
}

/// Largest depth the edge can be offset inward and still fit, found by
/// binary search over [`edge_offset_fits`].
pub fn max_inward_offset(poly: &Polygon2, edge_index: usize) -> f64 {
    let (w, h) = poly.spans();
    let mut hi = w.max(h);
    if hi <= 0.0 {
        return 0.0;
    }
    if edge_offset_fits(poly, edge_index, hi) {
        return hi;
    }
    let mut lo = 0.0;
    for _ in 0..40 {
        let mid = 0.5 * (lo + hi);
        if edge_offset_fits(poly, edge_index, mid) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}
