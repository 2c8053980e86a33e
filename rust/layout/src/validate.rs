// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Usability predicates and repair routines for polygons.
//!
//! Every splitting operation guards its entry with these checks; the
//! repair loops are capped so a stubborn ring degrades quality instead of
//! hanging the run.

use crate::config::LayoutConfig;
use spaceplan_geometry::intersect::seg_seg_intersection;
use spaceplan_geometry::offset::{offset_polygon_inward, offset_seg_inward};
use spaceplan_geometry::{LineSeg2, Orientation, Point2, Polygon2};

/// Result of the iterative notch repair.
#[derive(Debug, Clone)]
pub struct NotchRepair {
    pub polygon: Polygon2,
    /// True when the trial cap expired with notches still present.
    pub has_notches: bool,
    /// Collapse passes actually run.
    pub trials: usize,
}

/// Per-edge offsetability report for a polygon inside its container.
#[derive(Debug, Clone)]
pub struct EdgeOffsetReport {
    /// One flag per edge: may this edge be offset inward by the depth?
    pub offsetable: Vec<bool>,
    pub blocked_edges: Vec<LineSeg2>,
    pub blocked_indices: Vec<usize>,
    /// Offset endpoints that landed outside the container.
    pub outside_points: Vec<Point2<f64>>,
}

/// A usable polygon has at least 3 vertices and positive area.
pub fn is_valid_polygon(poly: &Polygon2) -> bool {
    poly.vertex_count() >= 3 && poly.area() > 0.0
}

/// True only for a non-empty list whose members are all usable.
pub fn is_valid_polygon_list(polys: &[Polygon2]) -> bool {
    !polys.is_empty() && polys.iter().all(is_valid_polygon)
}

/// Rejects polygons below an area or span threshold.
pub fn meets_minimum_dimensions(poly: &Polygon2, min_area: f64, min_side: f64) -> bool {
    if !is_valid_polygon(poly) {
        return false;
    }
    if poly.area() < min_area {
        return false;
    }
    let (w, h) = poly.spans();
    w >= min_side && h >= min_side
}

/// Both spans at least `min_dim`; the acceptance gate for program slices.
pub fn meets_min_aspect(poly: &Polygon2, min_dim: f64) -> bool {
    let (w, h) = poly.spans();
    w >= min_dim && h >= min_dim
}

/// Drops unusable members; an all-unusable list comes back empty.
pub fn clean_polygon_list(polys: Vec<Polygon2>) -> Vec<Polygon2> {
    polys.into_iter().filter(is_valid_polygon).collect()
}

/// Repeatedly collapses adjacent short edges until no two consecutive
/// edges are both shorter than `distance`, or `2 × vertex_count` passes
/// have run. Cap expiry is not an error, just a worse-quality ring.
pub fn remove_notches(poly: &Polygon2, distance: f64) -> NotchRepair {
    let max_trials = 2 * poly.vertex_count();
    let mut current = poly.clone();
    let mut trials = 0;
    let mut has_notches = ring_has_notches(&current, distance);
    while has_notches && trials < max_trials {
        let reduced = current.collapse_short_edges(distance);
        trials += 1;
        if reduced.vertex_count() == current.vertex_count() {
            // collapse refused to shrink further; stop early
            break;
        }
        current = reduced;
        has_notches = ring_has_notches(&current, distance);
    }
    if !is_valid_polygon(&current) {
        current = poly.clone();
        has_notches = false;
    }
    NotchRepair {
        polygon: current,
        has_notches,
        trials,
    }
}

fn ring_has_notches(poly: &Polygon2, distance: f64) -> bool {
    let n = poly.vertex_count();
    (0..n).any(|i| poly.edge(i).length() < distance && poly.edge((i + 1) % n).length() < distance)
}

/// Decides, per edge, whether offsetting it inward by `distance` keeps
/// both endpoints inside a slightly slackened copy of the polygon and,
/// unless `allow_interior_walls` is set, whether the edge runs along the
/// container's exterior boundary.
pub fn edges_offsetable(
    poly: &Polygon2,
    container: &Polygon2,
    distance: f64,
    allow_interior_walls: bool,
    cfg: &LayoutConfig,
) -> EdgeOffsetReport {
    let n = poly.vertex_count();
    // Expand by the slack so offset endpoints sitting exactly on the
    // boundary still count as inside.
    let slackened = offset_polygon_inward(poly, -cfg.erosion).unwrap_or_else(|_| poly.clone());
    let mut offsetable = Vec::with_capacity(n);
    let mut blocked_edges = Vec::new();
    let mut blocked_indices = Vec::new();
    let mut outside_points = Vec::new();
    for i in 0..n {
        let edge = poly.edge(i);
        let off = offset_seg_inward(&edge, poly, distance);
        let start_ok = slackened.contains_point(&off.start);
        let end_ok = slackened.contains_point(&off.end);
        let wall_ok = allow_interior_walls || edge_on_boundary(&edge, container, cfg.adjacency_eps);
        if start_ok && end_ok && wall_ok {
            offsetable.push(true);
        } else {
            if !start_ok {
                outside_points.push(off.start);
            }
            if !end_ok {
                outside_points.push(off.end);
            }
            blocked_edges.push(edge);
            blocked_indices.push(i);
            offsetable.push(false);
        }
    }
    EdgeOffsetReport {
        offsetable,
        blocked_edges,
        blocked_indices,
        outside_points,
    }
}

/// True when the edge runs along one of the container's edges.
pub fn edge_on_boundary(edge: &LineSeg2, container: &Polygon2, eps: f64) -> bool {
    container.edges().any(|c| edge.coincides_with(&c, eps))
}

/// Opportunistic self-intersection test: any two non-adjacent edges
/// crossing each other. Quadratic, meant for small rings.
pub fn self_intersects(poly: &Polygon2) -> bool {
    let n = poly.vertex_count();
    if n < 4 {
        return false;
    }
    for i in 0..n {
        for j in (i + 1)..n {
            // skip the shared-vertex neighbours, including the wrap pair
            if j == i + 1 || (i == 0 && j == n - 1) {
                continue;
            }
            let a = poly.edge(i);
            let b = poly.edge(j);
            if let Some(hit) = seg_seg_intersection(&a, &b) {
                let touches_endpoint = [a.start, a.end, b.start, b.end]
                    .iter()
                    .any(|p| (p - hit).norm() < 1e-6);
                if !touches_endpoint {
                    return true;
                }
            }
        }
    }
    false
}

/// At least `min_fraction` of all edges across the list are axis-aligned.
pub fn is_mostly_orthogonal(polys: &[Polygon2], min_fraction: f64) -> bool {
    let mut total = 0usize;
    let mut ortho = 0usize;
    for poly in polys {
        for edge in poly.edges() {
            total += 1;
            if edge.orientation() != Orientation::Oblique {
                ortho += 1;
            }
        }
    }
    if total == 0 {
        return false;
    }
    ortho as f64 / total as f64 >= min_fraction
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side: f64) -> Polygon2 {
        Polygon2::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, side),
            Point2::new(side, side),
            Point2::new(side, 0.0),
        ])
    }

    #[test]
    fn validity_is_idempotent() {
        let sq = square(4.0);
        assert!(is_valid_polygon(&sq));
        assert!(is_valid_polygon(&sq)); // re-validating changes nothing
        let empty = Polygon2::new(vec![]);
        assert!(!is_valid_polygon(&empty));
        let line = Polygon2::new(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]);
        assert!(!is_valid_polygon(&line));
    }

    #[test]
    fn list_validity_requires_every_member() {
        let good = square(2.0);
        let bad = Polygon2::new(vec![]);
        assert!(is_valid_polygon_list(&[good.clone()]));
        assert!(!is_valid_polygon_list(&[good.clone(), bad]));
        assert!(!is_valid_polygon_list(&[]));
        assert_eq!(clean_polygon_list(vec![square(2.0), Polygon2::new(vec![])]).len(), 1);
    }

    #[test]
    fn minimum_dimensions_reject_slivers() {
        let sliver = Polygon2::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 0.5),
            Point2::new(30.0, 0.5),
            Point2::new(30.0, 0.0),
        ]);
        assert!(!meets_minimum_dimensions(&sliver, 6.0, 2.0));
        assert!(meets_minimum_dimensions(&square(5.0), 6.0, 2.0));
        assert!(meets_min_aspect(&square(5.0), 4.0));
        assert!(!meets_min_aspect(&sliver, 4.0));
    }

    #[test]
    fn notch_repair_terminates_and_reports() {
        let notched = Polygon2::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 20.0),
            Point2::new(20.0, 20.0),
            Point2::new(20.0, 0.0),
            Point2::new(10.4, 0.0),
            Point2::new(10.4, 0.4),
            Point2::new(10.0, 0.4),
            Point2::new(10.0, 0.0),
        ]);
        let repair = remove_notches(&notched, 1.0);
        assert!(repair.trials <= 2 * notched.vertex_count());
        assert!(is_valid_polygon(&repair.polygon));
        assert!(repair.polygon.vertex_count() < notched.vertex_count());

        // A clean square needs no passes at all.
        let clean = remove_notches(&square(10.0), 1.0);
        assert_eq!(clean.trials, 0);
        assert!(!clean.has_notches);
    }

    #[test]
    fn every_exterior_edge_of_a_square_is_offsetable() {
        let sq = square(40.0);
        let cfg = LayoutConfig::default();
        let report = edges_offsetable(&sq, &sq, 10.0, false, &cfg);
        assert_eq!(report.offsetable.len(), 4);
        assert!(report.offsetable.iter().all(|&ok| ok));
        assert!(report.blocked_edges.is_empty());
    }

    #[test]
    fn deep_offsets_are_blocked() {
        let sq = square(40.0);
        let cfg = LayoutConfig::default();
        let report = edges_offsetable(&sq, &sq, 60.0, false, &cfg);
        assert!(report.offsetable.iter().all(|&ok| !ok));
        assert_eq!(report.blocked_indices.len(), 4);
        assert!(!report.outside_points.is_empty());
    }

    #[test]
    fn interior_edges_gated_by_container() {
        // A block sitting inside a much larger container: only its two
        // boundary-coincident edges count as exterior.
        let container = square(100.0);
        let block = Polygon2::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 30.0),
            Point2::new(30.0, 30.0),
            Point2::new(30.0, 0.0),
        ]);
        let cfg = LayoutConfig::default();
        let gated = edges_offsetable(&block, &container, 5.0, false, &cfg);
        assert_eq!(gated.offsetable.iter().filter(|&&ok| ok).count(), 2);
        let open = edges_offsetable(&block, &container, 5.0, true, &cfg);
        assert!(open.offsetable.iter().all(|&ok| ok));
    }

    #[test]
    fn self_intersection_detected() {
        let bowtie = Polygon2::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(10.0, 0.0),
            Point2::new(0.0, 10.0),
        ]);
        assert!(self_intersects(&bowtie));
        assert!(!self_intersects(&square(10.0)));
    }

    #[test]
    fn orthogonality_fraction() {
        let sq = square(10.0);
        let wedge = Polygon2::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 9.0),
            Point2::new(9.0, 2.0),
        ]);
        assert!(is_mostly_orthogonal(&[sq.clone()], 0.5));
        assert!(!is_mostly_orthogonal(&[wedge], 0.5));
        assert!(!is_mostly_orthogonal(&[], 0.5));
    }
}
