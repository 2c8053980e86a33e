// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon-splitting primitives.
//!
//! Ratio splits, offset-from-edge splits, recursive area-bounded
//! subdivision, and the greedy perimeter block carver. Every operation
//! returns a typed [`SplitError`] on failure so callers can branch on the
//! reason; none of them mutate their input.

use crate::config::LayoutConfig;
use crate::error::{SplitError, SplitResult};
use crate::validate;
use rand::rngs::StdRng;
use rand::Rng;
use spaceplan_geometry::intersect::{line_polygon_intersections, point_side_of_line, sort_ring_clockwise};
use spaceplan_geometry::offset::offset_seg_inward;
use spaceplan_geometry::{Axis, LineSeg2, Point2, Polygon2};
use std::collections::VecDeque;
use tracing::trace;

/// Per-polygon iteration cap of the perimeter carver.
const MAX_CARVE_TRIES: usize = 100;

/// Safety cap on dequeues during recursive subdivision.
const MAX_SUBDIVIDE_STEPS: usize = 1_000;

/// Blocks below this area are discarded by the multi-edge offset split.
const MIN_BLOCK_AREA: f64 = 3.0;

/// The carver shortens an edge only when the area it would sweep exceeds
/// the remaining need by more than this share.
const EDGE_FIT_SHARE: f64 = 0.9;

/// Two polygons produced by a ratio or distance split.
#[derive(Debug, Clone)]
pub struct RatioSplit {
    pub pieces: Vec<Polygon2>,
    pub split_line: LineSeg2,
    pub intersections: Vec<Point2<f64>>,
}

/// A block carved off an edge, and what is left of the polygon.
#[derive(Debug, Clone)]
pub struct OffsetSplit {
    pub block: Polygon2,
    pub leftover: Polygon2,
    pub offset_line: LineSeg2,
}

/// Blocks carved off several edges in sequence.
#[derive(Debug, Clone)]
pub struct OffsetSplitSeries {
    pub blocks: Vec<Polygon2>,
    pub leftover: Polygon2,
}

/// Output of the recursive subdivision: finalized cells plus the larger
/// pieces flagged as circulation candidates.
#[derive(Debug, Clone)]
pub struct RecursiveSplit {
    pub cells: Vec<Polygon2>,
    pub circulation: Vec<Polygon2>,
}

/// Output of the greedy perimeter carver.
#[derive(Debug, Clone)]
pub struct PerimeterCarve {
    pub blocks: Vec<Polygon2>,
    pub leftovers: Vec<Polygon2>,
    pub area_assigned: f64,
    /// Edges that failed the offsetability gate, for diagnostics.
    pub blocked_edges: Vec<LineSeg2>,
}

/// Splits a polygon in two across its longer span.
///
/// The ratio is clamped into the configured band and pinned to 0.5 when
/// the polygon is narrow; `axis_hint` only breaks near-square ties. The
/// split line runs through the centroid, shifted along the minor axis by
/// `(ratio − 0.5) × span`.
pub fn split_by_ratio(
    poly: &Polygon2,
    ratio: f64,
    axis_hint: Option<Axis>,
    cfg: &LayoutConfig,
) -> SplitResult<RatioSplit> {
    if !validate::is_valid_polygon(poly) {
        return Err(SplitError::InvalidPolygon);
    }
    let ring = poly.resampled(cfg.spacing);
    let (hspan, vspan) = ring.spans();
    let min_span = hspan.min(vspan);
    if min_span < cfg.min_split_span {
        return Err(SplitError::BelowMinimumSpan {
            span: min_span,
            min: cfg.min_split_span,
        });
    }
    // Cut across the longer span; the hint matters only on a near-tie.
    let axis = if (hspan - vspan).abs() < 1e-9 {
        axis_hint.unwrap_or(Axis::Vertical)
    } else if hspan > vspan {
        Axis::Vertical
    } else {
        Axis::Horizontal
    };
    let mut ratio = ratio.clamp(cfg.ratio_min, cfg.ratio_max);
    if hspan < cfg.min_split_width || vspan < cfg.min_split_width {
        ratio = 0.5;
    }
    let shift = ratio - 0.5;
    let center = ring.centroid();
    let line = match axis {
        Axis::Vertical => LineSeg2::axis_through(center, Axis::Vertical).translated(shift * hspan, 0.0),
        Axis::Horizontal => {
            LineSeg2::axis_through(center, Axis::Horizontal).translated(0.0, shift * vspan)
        }
    };
    let (side_a, side_b, hits) = split_ring_with_line(&ring, &line)?;
    let piece_a = Polygon2::new(side_a).resampled(cfg.spacing);
    let piece_b = Polygon2::new(side_b).resampled(cfg.spacing);
    if !validate::is_valid_polygon(&piece_a) || !validate::is_valid_polygon(&piece_b) {
        return Err(SplitError::InvalidPolygon);
    }
    Ok(RatioSplit {
        pieces: vec![piece_a, piece_b],
        split_line: line,
        intersections: hits,
    })
}

/// Splits at `distance` from a randomly selected boundary vertex, on a
/// random side. Shares the ratio split's reassembly machinery.
pub fn split_by_distance(
    poly: &Polygon2,
    rng: &mut StdRng,
    distance: f64,
    axis: Axis,
    cfg: &LayoutConfig,
) -> SplitResult<RatioSplit> {
    if !validate::is_valid_polygon(poly) {
        return Err(SplitError::InvalidPolygon);
    }
    let ring = poly.resampled(cfg.spacing);
    let anchor = ring.points[rng.gen_range(0..ring.vertex_count())];
    let side = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    let line = match axis {
        Axis::Horizontal => LineSeg2::axis_through(anchor, Axis::Horizontal)
            .translated(0.0, side * distance),
        Axis::Vertical => {
            LineSeg2::axis_through(anchor, Axis::Vertical).translated(side * distance, 0.0)
        }
    };
    let (side_a, side_b, hits) = split_ring_with_line(&ring, &line)?;
    let piece_a = Polygon2::new(side_a);
    let piece_b = Polygon2::new(side_b);
    if !validate::is_valid_polygon(&piece_a) || !validate::is_valid_polygon(&piece_b) {
        return Err(SplitError::InvalidPolygon);
    }
    Ok(RatioSplit {
        pieces: vec![piece_a, piece_b],
        split_line: line,
        intersections: hits,
    })
}

/// Classifies the ring's vertices against the line, merges in the
/// crossing points, and reassembles a closed clockwise ring per side.
fn split_ring_with_line(
    ring: &Polygon2,
    line: &LineSeg2,
) -> SplitResult<(Vec<Point2<f64>>, Vec<Point2<f64>>, Vec<Point2<f64>>)> {
    let hits = line_polygon_intersections(&ring.points, line);
    if hits.len() < 2 {
        return Err(SplitError::InvalidPolygon);
    }
    let mut side_a: Vec<Point2<f64>> = Vec::new();
    let mut side_b: Vec<Point2<f64>> = Vec::new();
    for p in &ring.points {
        if point_side_of_line(line, p) {
            side_a.push(*p);
        } else {
            side_b.push(*p);
        }
    }
    side_a.extend(hits.iter().copied());
    side_b.extend(hits.iter().copied());
    sort_ring_clockwise(&mut side_a);
    sort_ring_clockwise(&mut side_b);
    Ok((side_a, side_b, hits.to_vec()))
}

/// Carves the quad between an edge and its inward offset out of the
/// polygon, reconstructing the leftover boundary without degenerate
/// corner notches.
pub fn split_by_offset_from_edge(
    poly: &Polygon2,
    edge_index: usize,
    distance: f64,
    min_edge_length: f64,
) -> SplitResult<OffsetSplit> {
    if !validate::is_valid_polygon(poly) {
        return Err(SplitError::InvalidPolygon);
    }
    let n = poly.vertex_count();
    if edge_index >= n {
        return Err(SplitError::InvalidPolygon);
    }
    let a = edge_index;
    let b = (a + 1) % n;
    let prev = (a + n - 1) % n;
    let edge = poly.edge(a);
    if edge.length() < min_edge_length {
        return Err(SplitError::EdgeBelowMinimum {
            index: a,
            length: edge.length(),
            min: min_edge_length,
        });
    }
    let off = offset_seg_inward(&edge, poly, distance);
    let block = Polygon2::new(vec![poly.points[a], poly.points[b], off.end, off.start]);

    let mut ring = poly.points.clone();
    let o_prev = poly.edge(prev).orientation();
    let o_curr = edge.orientation();
    let o_next = poly.edge(b).orientation();
    // Four corner cases keyed on whether the neighbouring edges share the
    // carved edge's orientation; this keeps corners free of zero-area
    // notches.
    match (o_prev == o_curr, o_next == o_curr) {
        (true, true) => {
            ring.insert(b, off.end);
            ring.insert(b, off.start);
        }
        (false, true) => {
            ring[a] = off.start;
            ring.insert(b, off.end);
        }
        (true, false) => {
            ring.insert(b, off.start);
            ring[b + 1] = off.end;
        }
        (false, false) => {
            ring[a] = off.start;
            ring[b] = off.end;
        }
    }
    let leftover = Polygon2::new(ring);
    if !validate::is_valid_polygon(&block) || !validate::is_valid_polygon(&leftover) {
        return Err(SplitError::InvalidPolygon);
    }
    Ok(OffsetSplit {
        block,
        leftover,
        offset_line: off,
    })
}

/// Applies [`split_by_offset_from_edge`] over several edge ids in
/// sequence, skipping carves that fail or produce negligible blocks.
/// Edge ids refer to the ring as it existed when they were computed, so
/// later ids are best-effort against the shrinking leftover.
pub fn split_by_offset_from_edges(
    poly: &Polygon2,
    edge_ids: &[usize],
    distance: f64,
    min_edge_length: f64,
) -> SplitResult<OffsetSplitSeries> {
    if !validate::is_valid_polygon(poly) {
        return Err(SplitError::InvalidPolygon);
    }
    let mut current = poly.clone();
    let mut blocks = Vec::new();
    for &id in edge_ids {
        if id >= current.vertex_count() {
            continue;
        }
        match split_by_offset_from_edge(&current, id, distance, min_edge_length) {
            Ok(split) if split.block.area() > MIN_BLOCK_AREA => {
                blocks.push(split.block);
                current = split.leftover;
            }
            _ => {}
        }
    }
    Ok(OffsetSplitSeries {
        blocks,
        leftover: current,
    })
}

/// Inserts a vertex at parameter `t` on the given edge. A parameter
/// outside (0, 1) leaves the ring unchanged.
pub fn add_split_point(poly: &Polygon2, edge_index: usize, t: f64) -> Polygon2 {
    let n = poly.vertex_count();
    if n == 0 || edge_index >= n || t <= 0.0 || t >= 1.0 {
        return poly.clone();
    }
    let mut ring = Vec::with_capacity(n + 1);
    for i in 0..n {
        ring.push(poly.points[i]);
        if i == edge_index {
            ring.push(poly.edge(i).point_at(t));
        }
    }
    Polygon2::new(ring)
}

/// Breadth-first subdivision of a polygon pool until every piece's
/// bounding span drops below `acceptable_width`.
///
/// Pieces whose area exceeds `total area / circulation_factor` are also
/// flagged as circulation candidates. Pieces a split cannot handle are
/// dropped from the queue, which (with the strict area reduction per
/// split) bounds the loop; a hard step cap backs that up.
pub fn split_recursively(
    polys: &[Polygon2],
    acceptable_width: f64,
    ratio: f64,
    cfg: &LayoutConfig,
) -> SplitResult<RecursiveSplit> {
    if !validate::is_valid_polygon_list(polys) {
        return Err(SplitError::InvalidPolygon);
    }
    let total: f64 = polys.iter().map(Polygon2::area).sum();
    let circulation_target = total / cfg.circulation_factor;
    let mut queue: VecDeque<Polygon2> = polys.iter().cloned().collect();
    let mut cells = Vec::new();
    let mut circulation = Vec::new();
    let mut steps = 0usize;
    while let Some(current) = queue.pop_front() {
        steps += 1;
        if steps > MAX_SUBDIVIDE_STEPS {
            cells.push(current);
            continue; // drain the rest unsplit
        }
        let split = match split_by_ratio(&current, ratio, None, cfg) {
            Ok(split) => split,
            Err(err) => {
                trace!(%err, "subdivision dropped an unsplittable piece");
                continue;
            }
        };
        for piece in split.pieces {
            if piece.area() > circulation_target {
                circulation.push(piece.clone());
            }
            let (w, h) = piece.spans();
            if w < acceptable_width || h < acceptable_width {
                cells.push(piece);
            } else {
                queue.push_back(piece);
            }
        }
    }
    Ok(RecursiveSplit { cells, circulation })
}

/// One carve candidate produced by [`carve_block`].
struct BlockCarve {
    block: Polygon2,
    leftover: Polygon2,
    /// Offsetable edges other than the carved one.
    remaining_options: Vec<LineSeg2>,
    blocked_edges: Vec<LineSeg2>,
}

/// Picks an offsetable edge (longest, or seeded-random when requested),
/// shortens it so the swept area matches what is still needed, and
/// offset-splits the block out.
#[allow(clippy::too_many_arguments)]
fn carve_block(
    poly: &Polygon2,
    container: &Polygon2,
    depth: f64,
    area_target: f64,
    threshold: f64,
    allow_interior_walls: bool,
    randomize_edges: bool,
    rng: &mut StdRng,
    cfg: &LayoutConfig,
) -> SplitResult<BlockCarve> {
    let report = validate::edges_offsetable(poly, container, depth, allow_interior_walls, cfg);
    let n = poly.vertex_count();
    let candidates: Vec<usize> = (0..n)
        .filter(|&i| report.offsetable[i] && poly.edge(i).length() > 0.0)
        .collect();
    if candidates.is_empty() {
        return Err(SplitError::NoOffsetableEdge { depth });
    }
    let longest = *candidates
        .iter()
        .max_by(|&&a, &&b| {
            poly.edge(a)
                .length()
                .partial_cmp(&poly.edge(b).length())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap();
    let chosen = if randomize_edges {
        let usable: Vec<usize> = candidates
            .iter()
            .copied()
            .filter(|&i| poly.edge(i).length() > threshold)
            .collect();
        if usable.is_empty() {
            longest
        } else {
            usable[rng.gen_range(0..usable.len())]
        }
    } else {
        longest
    };
    let remaining_options: Vec<LineSeg2> = candidates
        .iter()
        .copied()
        .filter(|&i| i != chosen)
        .map(|i| poly.edge(i))
        .collect();
    let working = fit_edge_to_area(poly, chosen, area_target, depth);
    let split = split_by_offset_from_edge(&working, chosen, depth, threshold)?;
    Ok(BlockCarve {
        block: split.block,
        leftover: split.leftover,
        remaining_options,
        blocked_edges: report.blocked_edges,
    })
}

/// Shortens `edge_index` with an inserted vertex so that
/// `edge length × depth` approximates `area_target`. Left unchanged when
/// the sweep is already within the fit share of the need.
fn fit_edge_to_area(poly: &Polygon2, edge_index: usize, area_target: f64, depth: f64) -> Polygon2 {
    let len = poly.edge(edge_index).length();
    let available = len * depth;
    if available <= 0.0 || area_target / available >= EDGE_FIT_SHARE {
        return poly.clone();
    }
    let t = (area_target / depth) / len;
    if t > 0.0 && t < 1.0 {
        add_split_point(poly, edge_index, t)
    } else {
        poly.clone()
    }
}

/// Greedy perimeter block allocator.
///
/// Polygons are processed largest-area-first; within each, a depth-first
/// stack of leftovers is carved along offsetable edges until the target
/// area is met, no usable edge remains, or the per-polygon try cap runs
/// out. Failed carves degrade to leftovers instead of aborting.
#[allow(clippy::too_many_arguments)]
pub fn carve_perimeter_blocks(
    polys: &[Polygon2],
    depth: f64,
    target_area: f64,
    threshold: f64,
    rng: &mut StdRng,
    allow_interior_walls: bool,
    randomize_edges: bool,
    cfg: &LayoutConfig,
) -> SplitResult<PerimeterCarve> {
    if !validate::is_valid_polygon_list(polys) {
        return Err(SplitError::InvalidPolygon);
    }
    let mut ordered: Vec<Polygon2> = polys.to_vec();
    ordered.sort_by(|a, b| {
        b.area()
            .partial_cmp(&a.area())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let mut blocks: Vec<Polygon2> = Vec::new();
    let mut leftovers: Vec<Polygon2> = Vec::new();
    let mut blocked_edges: Vec<LineSeg2> = Vec::new();
    let mut area_assigned = 0.0;
    for poly in &ordered {
        if area_assigned >= target_area {
            leftovers.push(poly.clone());
            continue;
        }
        let mut stack = vec![poly.clone()];
        let mut tries = 0usize;
        // carve budget when interior walls are allowed and every edge
        // qualifies; drawn from the seeded generator
        let budget = rng.gen_range(4..=7);
        let mut carves = 0usize;
        while let Some(current) = stack.pop() {
            if area_assigned >= target_area || tries >= MAX_CARVE_TRIES {
                stack.push(current);
                break;
            }
            tries += 1;
            let area_left = target_area - area_assigned;
            let carve = match carve_block(
                &current,
                poly,
                depth,
                area_left,
                threshold,
                allow_interior_walls,
                randomize_edges,
                rng,
                cfg,
            ) {
                Ok(carve) => carve,
                Err(err) => {
                    trace!(%err, "perimeter carve step failed");
                    leftovers.push(current);
                    continue;
                }
            };
            if validate::self_intersects(&carve.leftover)
                || !current.contains_point(&carve.block.centroid())
            {
                leftovers.push(current);
                continue;
            }
            area_assigned += carve.block.area();
            blocks.push(carve.block);
            blocked_edges.extend(carve.blocked_edges);
            stack.push(carve.leftover);
            carves += 1;
            let more_options = carve
                .remaining_options
                .iter()
                .any(|edge| edge.length() > threshold);
            if !more_options {
                break;
            }
            if allow_interior_walls && carves > budget {
                break;
            }
        }
        leftovers.append(&mut stack);
    }
    if blocks.is_empty() && target_area > 0.0 {
        return Err(SplitError::RetryBudgetExhausted(MAX_CARVE_TRIES as u32));
    }
    Ok(PerimeterCarve {
        blocks: validate::clean_polygon_list(blocks),
        leftovers: validate::clean_polygon_list(leftovers),
        area_assigned,
        blocked_edges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;

    fn rect(w: f64, h: f64) -> Polygon2 {
        Polygon2::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, h),
            Point2::new(w, h),
            Point2::new(w, 0.0),
        ])
    }

    #[test]
    fn half_ratio_split_of_unit_square() {
        let cfg = LayoutConfig {
            min_split_span: 0.5,
            ..LayoutConfig::default()
        };
        let split = split_by_ratio(&rect(1.0, 1.0), 0.5, None, &cfg).unwrap();
        assert_eq!(split.pieces.len(), 2);
        for piece in &split.pieces {
            assert_relative_eq!(piece.area(), 0.5, epsilon = 1e-6);
            assert!(piece.vertex_count() >= 3);
            assert!(piece.area() > 0.0);
        }
        assert_eq!(split.intersections.len(), 2);
    }

    #[test]
    fn ratio_is_clamped_into_band() {
        let cfg = LayoutConfig::default();
        let split = split_by_ratio(&rect(100.0, 40.0), 0.01, None, &cfg).unwrap();
        let small = split.pieces.iter().map(Polygon2::area).fold(f64::INFINITY, f64::min);
        // 0.01 clamps to 0.15 of the 100-long span
        assert_relative_eq!(small, 0.15 * 4_000.0, epsilon = 50.0);
    }

    #[test]
    fn tiny_span_is_a_typed_failure() {
        let cfg = LayoutConfig::default();
        let err = split_by_ratio(&rect(1.0, 0.5), 0.5, None, &cfg).unwrap_err();
        assert!(matches!(err, SplitError::BelowMinimumSpan { .. }));
        let err = split_by_ratio(&Polygon2::new(vec![]), 0.5, None, &cfg).unwrap_err();
        assert_eq!(err, SplitError::InvalidPolygon);
    }

    #[test]
    fn distance_split_is_seed_stable() {
        let cfg = LayoutConfig::default();
        let poly = rect(60.0, 40.0);
        // a randomly anchored line may exit the ring; find a seed that
        // lands, then check the same seed reproduces the same split
        let mut landed = None;
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            if let Ok(split) = split_by_distance(&poly, &mut rng, 12.0, Axis::Vertical, &cfg) {
                landed = Some((seed, split));
                break;
            }
        }
        let (seed, a) = landed.expect("some seed produces a landing split");
        let mut rng = StdRng::seed_from_u64(seed);
        let b = split_by_distance(&poly, &mut rng, 12.0, Axis::Vertical, &cfg).unwrap();
        assert_eq!(a.pieces[0].points, b.pieces[0].points);
        let total: f64 = a.pieces.iter().map(Polygon2::area).sum();
        assert_relative_eq!(total, poly.area(), epsilon = 1e-6);
    }

    #[test]
    fn offset_split_conserves_area() {
        let poly = rect(60.0, 40.0);
        let split = split_by_offset_from_edge(&poly, 1, 10.0, 5.0).unwrap();
        assert_relative_eq!(
            split.block.area() + split.leftover.area(),
            poly.area(),
            epsilon = 1e-6
        );
        assert_relative_eq!(split.block.area(), 600.0, epsilon = 1e-6);
        // carved off the top edge, so the offset line sits 10 below it
        assert_relative_eq!(split.offset_line.start.y, 30.0, epsilon = 1e-9);
    }

    #[test]
    fn short_edge_is_a_typed_failure() {
        let poly = rect(60.0, 40.0);
        let err = split_by_offset_from_edge(&poly, 0, 10.0, 50.0).unwrap_err();
        assert!(matches!(err, SplitError::EdgeBelowMinimum { index: 0, .. }));
    }

    #[test]
    fn offset_split_handles_inserted_corner() {
        // Shorten the top edge first, then carve: exercises the
        // mixed-orientation corner cases.
        let poly = add_split_point(&rect(60.0, 40.0), 1, 0.5);
        let split = split_by_offset_from_edge(&poly, 1, 8.0, 5.0).unwrap();
        assert_relative_eq!(split.block.area(), 30.0 * 8.0, epsilon = 1e-6);
        assert_relative_eq!(
            split.block.area() + split.leftover.area(),
            poly.area(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn split_point_insertion() {
        let poly = rect(10.0, 10.0);
        let with_point = add_split_point(&poly, 0, 0.25);
        assert_eq!(with_point.vertex_count(), 5);
        assert_relative_eq!(with_point.area(), poly.area(), epsilon = 1e-9);
        // out-of-band parameter is a no-op
        assert_eq!(add_split_point(&poly, 0, 1.5).vertex_count(), 4);
    }

    #[test]
    fn recursive_split_bounds_cell_spans() {
        let cfg = LayoutConfig::default();
        let split = split_recursively(&[rect(100.0, 100.0)], 35.0, 0.5, &cfg).unwrap();
        assert!(!split.cells.is_empty());
        for cell in &split.cells {
            let (w, h) = cell.spans();
            assert!(w.min(h) <= 35.0 + 1e-6);
            assert!(cell.vertex_count() >= 3 && cell.area() > 0.0);
        }
        // circulation candidates are the larger interim pieces
        for cand in &split.circulation {
            assert!(cand.area() > 10_000.0 / cfg.circulation_factor);
        }
    }

    #[test]
    fn perimeter_carve_meets_target_with_depth_wide_blocks() {
        let cfg = LayoutConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        let carve = carve_perimeter_blocks(
            &[rect(100.0, 50.0)],
            10.0,
            500.0,
            10.0,
            &mut rng,
            false,
            false,
            &cfg,
        )
        .unwrap();
        let total: f64 = carve.blocks.iter().map(Polygon2::area).sum();
        assert_relative_eq!(total, 500.0, epsilon = 1.0);
        assert_relative_eq!(carve.area_assigned, total, epsilon = 1e-6);
        for block in &carve.blocks {
            let (w, h) = block.spans();
            assert_relative_eq!(w.min(h), 10.0, epsilon = 0.5);
        }
        // whatever was not carved is still around as leftover
        let leftover: f64 = carve.leftovers.iter().map(Polygon2::area).sum();
        assert_relative_eq!(total + leftover, 5_000.0, epsilon = 1.0);
    }

    #[test]
    fn carve_of_invalid_pool_fails_fast() {
        let cfg = LayoutConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        let err = carve_perimeter_blocks(&[], 10.0, 100.0, 10.0, &mut rng, false, false, &cfg)
            .unwrap_err();
        assert_eq!(err, SplitError::InvalidPolygon);
    }

    #[test]
    fn multi_edge_offset_split_carves_series() {
        let poly = rect(60.0, 40.0);
        let series = split_by_offset_from_edges(&poly, &[1, 3], 5.0, 0.0).unwrap();
        assert_eq!(series.blocks.len(), 2);
        let carved: f64 = series.blocks.iter().map(Polygon2::area).sum();
        assert_relative_eq!(carved + series.leftover.area(), poly.area(), epsilon = 1e-6);
    }
}
