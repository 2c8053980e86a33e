// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Program placement inside placed departments.
//!
//! Primary (KPU) departments are sliced into strips of the configured
//! width and dealt to a round-robin program queue; every other
//! department matches programs against its polygons by area need.

use crate::config::LayoutConfig;
use crate::data::{Department, DeptType, Program};
use crate::error::{LayoutError, LayoutResult};
use crate::split;
use crate::validate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spaceplan_geometry::{Orientation, Point2, Polygon2};
use std::collections::VecDeque;
use tracing::debug;

/// Slice cap per department polygon in primary placement.
const MAX_PRIMARY_SLICES: usize = 200;

/// Retry cap of the degenerate-split fallback in secondary placement.
const MAX_SECONDARY_RETRIES: usize = 15;

/// Band around a program's need within which a polygon is taken as-is.
const AREA_BAND: f64 = 50.0;

/// Ratio draw band of the secondary matcher.
const SECONDARY_RATIO_MIN: f64 = 0.27;
const SECONDARY_RATIO_MAX: f64 = 0.73;

/// Slice width used when the caller supplies no width list.
const DEFAULT_PRIMARY_WIDTH: f64 = 10.0;

/// Marks a program whose allocation was split across polygons.
const SPLIT_ALLOCATION_TAG: &str = "##";

/// Distributes each department's programs over its assigned polygons.
///
/// The input list is cloned before any mutation. Departments with no
/// polygons or no programs are passed through untouched.
pub fn place_programs(
    departments: &[Department],
    program_widths: &[f64],
    min_allowed_dim: f64,
    design_seed: u64,
    check_aspect_ratio: bool,
    cfg: &LayoutConfig,
) -> LayoutResult<Vec<Department>> {
    if departments.is_empty() {
        return Err(LayoutError::NoDepartments);
    }
    let mut rng = StdRng::seed_from_u64(design_seed);
    let mut out: Vec<Department> = departments.to_vec();
    for dept in &mut out {
        if dept.programs.is_empty() || dept.polygons.is_empty() {
            continue;
        }
        match dept.dept_type {
            DeptType::KeyPlanningUnit => {
                dept.programs =
                    place_primary_programs(&dept.polygons, &dept.programs, program_widths, cfg);
            }
            _ => place_secondary_programs(dept, min_allowed_dim, &mut rng, check_aspect_ratio, cfg),
        }
        debug!(dept = %dept.name, programs = dept.programs.len(), "programs placed");
    }
    Ok(out)
}

/// Slices each polygon by the configured width along its dominant span,
/// dealing slices to the programs round-robin; the queue is refilled
/// from a template clone of the first program when it runs dry, and the
/// final remainder goes to the last program.
pub fn place_primary_programs(
    polys: &[Polygon2],
    programs: &[Program],
    widths: &[f64],
    cfg: &LayoutConfig,
) -> Vec<Program> {
    if programs.is_empty() || !validate::is_valid_polygon_list(polys) {
        return programs.to_vec();
    }
    let template = programs[0].clone();
    let mut queue: VecDeque<Program> = programs.iter().cloned().collect();
    let mut placed: Vec<Program> = Vec::new();
    for (i, poly) in polys.iter().enumerate() {
        let (w, h) = poly.spans();
        // slice across the dominant span; the slice edge is whichever of
        // the first two edges runs across it
        let slice_orient = if w > h {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        };
        let mut span = w.max(h);
        let edge_id = if poly.edge(0).orientation() == slice_orient {
            0
        } else {
            1
        };
        // the width list cycles from the third polygon on
        let width = if widths.is_empty() {
            DEFAULT_PRIMARY_WIDTH
        } else if i <= 2 {
            widths[0]
        } else {
            widths[(i - 2) % widths.len()]
        };
        if width <= 0.0 {
            continue;
        }
        let mut current = poly.clone();
        let mut slices = 0;
        let mut remainder: Option<Polygon2> = None;
        while span > width && slices < MAX_PRIMARY_SLICES {
            if queue.is_empty() {
                queue.push_back(template.clone());
            }
            if span < 1.5 * width {
                // too narrow for another full slice: the rest goes whole
                let mut prog = queue.pop_front().unwrap();
                prog.area_provided = current.area();
                prog.polygons = vec![current.clone()];
                placed.push(prog);
                remainder = None;
                break;
            }
            match split::split_by_offset_from_edge(&current, edge_id, width, cfg.min_split_width) {
                Ok(result) => {
                    let mut prog = queue.pop_front().unwrap();
                    prog.area_provided = result.block.area();
                    prog.polygons = vec![result.block];
                    placed.push(prog);
                    current = result.leftover.clone();
                    remainder = Some(result.leftover);
                    span -= width;
                    slices += 1;
                }
                Err(_) => {
                    slices += 1;
                }
            }
        }
        if let Some(rest) = remainder {
            let mut prog = template.clone();
            prog.area_provided = rest.area();
            prog.polygons = vec![rest];
            placed.push(prog);
        }
    }
    placed
}

/// Matches each program against the department's polygons, sorted
/// radially from the department centroid. Oversized polygons are
/// ratio-split back into the queue; a degenerate split falls back to a
/// finer resample with a walked-down ratio before the polygon is
/// accepted as-is.
pub fn place_secondary_programs(
    dept: &mut Department,
    min_allowed_dim: f64,
    rng: &mut StdRng,
    check_aspect_ratio: bool,
    cfg: &LayoutConfig,
) {
    let mut polys = validate::clean_polygon_list(dept.polygons.clone());
    if polys.is_empty() {
        return;
    }
    let n = polys.len() as f64;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for poly in &polys {
        let c = poly.centroid();
        cx += c.x;
        cy += c.y;
    }
    let center = Point2::new(cx / n, cy / n);
    polys.sort_by(|a, b| {
        (a.centroid() - center)
            .norm()
            .partial_cmp(&(b.centroid() - center).norm())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let mut queue: VecDeque<Polygon2> = polys.into_iter().collect();
    for prog in &mut dept.programs {
        prog.polygons.clear();
        let need = prog.area_needed;
        let mut assigned = 0.0;
        while assigned < need && !queue.is_empty() {
            // ratio is currently pinned at 0.5; the draw keeps the seed
            // stream aligned with randomized configurations
            let _ = rng.gen_range(SECONDARY_RATIO_MIN..SECONDARY_RATIO_MAX);
            let ratio = 0.5;
            let current = queue.pop_front().unwrap();
            let area = current.area();
            if area > need + AREA_BAND {
                match split::split_by_ratio(&current, ratio, None, cfg) {
                    Ok(result) => {
                        for piece in result.pieces {
                            queue.push_back(piece);
                        }
                        continue;
                    }
                    Err(_) => {
                        let mut retry_ratio = 0.65;
                        let mut working = current.clone();
                        let mut healed = None;
                        for _ in 0..MAX_SECONDARY_RETRIES {
                            retry_ratio -= 0.02;
                            working = working.resampled(cfg.fine_spacing);
                            if let Ok(result) =
                                split::split_by_ratio(&working, retry_ratio, None, cfg)
                            {
                                healed = Some(result);
                                break;
                            }
                        }
                        if let Some(result) = healed {
                            for piece in result.pieces {
                                queue.push_back(piece);
                            }
                            continue;
                        }
                        // fall through and accept the stubborn polygon
                    }
                }
            }
            if validate::is_valid_polygon(&current)
                && (!check_aspect_ratio || validate::meets_min_aspect(&current, min_allowed_dim))
            {
                assigned += area;
                prog.polygons.push(current);
            }
        }
        prog.area_provided = assigned;
        if prog.polygons.len() > 1 && !prog.name.contains(SPLIT_ALLOCATION_TAG) {
            prog.name.push_str(" ##");
        }
    }
}
