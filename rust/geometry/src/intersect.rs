// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Segment intersection, side classification, and ring reassembly.

use crate::line::LineSeg2;
use nalgebra::Point2;
use smallvec::SmallVec;

/// Parametric tolerance for segment-intersection hit tests.
const PARAM_EPS: f64 = 1e-9;

/// Distance under which two intersection hits are considered the same point.
const MERGE_EPS: f64 = 1e-6;

/// Intersection point of two segments, endpoint touches included.
pub fn seg_seg_intersection(a: &LineSeg2, b: &LineSeg2) -> Option<Point2<f64>> {
    let r = a.vector();
    let s = b.vector();
    let denom = r.x * s.y - r.y * s.x;
    if denom.abs() < PARAM_EPS {
        return None; // parallel or collinear
    }
    let qp = b.start - a.start;
    let t = (qp.x * s.y - qp.y * s.x) / denom;
    let u = (qp.x * r.y - qp.y * r.x) / denom;
    if (-PARAM_EPS..=1.0 + PARAM_EPS).contains(&t) && (-PARAM_EPS..=1.0 + PARAM_EPS).contains(&u) {
        Some(a.point_at(t))
    } else {
        None
    }
}

/// All crossings of `line` with the edges of the closed ring, deduplicated.
pub fn line_polygon_intersections(
    ring: &[Point2<f64>],
    line: &LineSeg2,
) -> SmallVec<[Point2<f64>; 4]> {
    let mut hits: SmallVec<[Point2<f64>; 4]> = SmallVec::new();
    let n = ring.len();
    for i in 0..n {
        let edge = LineSeg2::new(ring[i], ring[(i + 1) % n]);
        if let Some(p) = seg_seg_intersection(&edge, line) {
            if !hits.iter().any(|q| (p - q).norm() < MERGE_EPS) {
                hits.push(p);
            }
        }
    }
    hits
}

/// True when `p` lies to the left of the directed line through the segment.
pub fn point_side_of_line(line: &LineSeg2, p: &Point2<f64>) -> bool {
    let a = line.start;
    let b = line.end;
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x) > 0.0
}

/// Sorts loose points into a clockwise ring around their average,
/// merging near-coincident points.
pub fn sort_ring_clockwise(points: &mut Vec<Point2<f64>>) {
    if points.len() < 3 {
        return;
    }
    let n = points.len() as f64;
    let cx = points.iter().map(|p| p.x).sum::<f64>() / n;
    let cy = points.iter().map(|p| p.y).sum::<f64>() / n;
    points.sort_by(|a, b| {
        let aa = (a.y - cy).atan2(a.x - cx);
        let bb = (b.y - cy).atan2(b.x - cx);
        bb.partial_cmp(&aa).unwrap_or(std::cmp::Ordering::Equal)
    });
    points.dedup_by(|a, b| (*a - *b).norm() < MERGE_EPS);
    if points.len() > 1 {
        let first = points[0];
        let last = *points.last().unwrap();
        if (first - last).norm() < MERGE_EPS {
            points.pop();
        }
    }
}
