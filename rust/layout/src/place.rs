// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Department placement over a site boundary.
//!
//! One pass over the department list, dispatching on type: Public carves
//! around the attractor point, KPU claims depth-bounded perimeter blocks,
//! Regular departments draw from a one-time subdivided cell grid. The
//! leftover pool threads through the whole pass; convergence trouble
//! degrades to a smaller allocation, never an abort.

use crate::circulation::carve_circulation;
use crate::config::LayoutConfig;
use crate::data::{Department, DeptType};
use crate::error::{LayoutError, LayoutResult, SplitError, SplitResult};
use crate::split;
use crate::validate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use spaceplan_geometry::offset::{edge_offset_fits, max_inward_offset};
use spaceplan_geometry::{lowest_point_index, Axis, LineSeg2, Point2, Polygon2};
use std::collections::VecDeque;
use tracing::debug;

/// Retry cap of the public-department carve loop.
const MAX_PUBLIC_TRIES: usize = 5;

/// Retry cap when a regular fit has to re-split an oversized polygon.
const MAX_REGION_RETRIES: usize = 10;

/// Retry cap for the regular-grid subdivision ratio walk.
const MAX_GRID_RETRIES: usize = 20;

/// Minimum edge length the KPU carver accepts for a block edge.
const KPU_THRESHOLD: f64 = 20.0;

/// Carved public blocks below this area are discarded.
const MIN_KEPT_AREA: f64 = 2.0;

/// Block edges shorter than this are not exit-line candidates.
const EXIT_EDGE_MIN: f64 = 5.0;

/// Share of the remaining pool an unlimited KPU department claims.
const UNLIMITED_KPU_SHARE: f64 = 0.9;

/// Fraction of axis-aligned edges the cell grid must reach.
const ORTHO_FRACTION: f64 = 0.5;

/// Depth used when the caller supplies no KPU depth list.
const DEFAULT_KPU_DEPTH: f64 = 10.0;

/// Result of one full placement pass.
#[derive(Debug, Clone)]
pub struct PlacementOutcome {
    /// The caller's departments, cloned and filled in.
    pub departments: Vec<Department>,
    /// Site area not assigned to any department.
    pub leftover: Vec<Polygon2>,
    /// Leftover snapshots taken after each Public/KPU carve (diagnostic).
    pub other_dept_polys: Vec<Polygon2>,
    /// The raw cell grid before corridor carving (diagnostic).
    pub subdivided_polys: Vec<Polygon2>,
}

/// Output of the public-department fit.
#[derive(Debug, Clone)]
pub struct PublicFit {
    pub blocks: Vec<Polygon2>,
    pub leftover: Polygon2,
    pub area_assigned: f64,
    /// Longest-ish block edge nearest the site center, kept as the
    /// suggested exit side.
    pub exit_line: Option<LineSeg2>,
}

/// Output of a regular-department fit against the cell pool.
#[derive(Debug, Clone)]
pub struct RegionFit {
    pub assigned: Vec<Polygon2>,
    pub leftover: Vec<Polygon2>,
    pub area_assigned: f64,
}

/// Places every department onto the site and returns the filled-in
/// records plus the unassigned leftovers.
///
/// The input lists are cloned before any mutation. Fails only on
/// unusable input (no departments, degenerate boundary); everything else
/// degrades to a partially filled result.
#[allow(clippy::too_many_arguments)]
pub fn place_departments(
    departments: &[Department],
    site_boundary: &[Polygon2],
    attractor: Point2<f64>,
    kpu_depths: &[f64],
    design_seed: u64,
    corridor_width: f64,
    allow_no_external_wall: bool,
    unlimited_kpu: bool,
    cfg: &LayoutConfig,
) -> LayoutResult<PlacementOutcome> {
    if departments.is_empty() {
        return Err(LayoutError::NoDepartments);
    }
    if !validate::is_valid_polygon_list(site_boundary) {
        return Err(LayoutError::InvalidBoundary);
    }
    let mut rng = StdRng::seed_from_u64(design_seed);
    let grid_ratio = rng.gen_range(0.23..0.76);
    let placer = DeptPlacer {
        cfg,
        rng,
        attractor,
        kpu_depths,
        corridor_width,
        allow_no_external_wall,
        unlimited_kpu,
        boundary: site_boundary.to_vec(),
        leftover_blocks: site_boundary.to_vec(),
        pool: Vec::new(),
        grid_ready: false,
        grid_ratio,
        grid_corridors: Vec::new(),
        other_dept: Vec::new(),
        subdivided: Vec::new(),
    };
    placer.run(departments)
}

/// Evaluates several design seeds independently, in parallel. Each run
/// clones its own inputs, so results are identical to calling
/// [`place_departments`] once per seed.
#[allow(clippy::too_many_arguments)]
pub fn place_departments_batch(
    seeds: &[u64],
    departments: &[Department],
    site_boundary: &[Polygon2],
    attractor: Point2<f64>,
    kpu_depths: &[f64],
    corridor_width: f64,
    allow_no_external_wall: bool,
    unlimited_kpu: bool,
    cfg: &LayoutConfig,
) -> Vec<(u64, LayoutResult<PlacementOutcome>)> {
    seeds
        .par_iter()
        .map(|&seed| {
            (
                seed,
                place_departments(
                    departments,
                    site_boundary,
                    attractor,
                    kpu_depths,
                    seed,
                    corridor_width,
                    allow_no_external_wall,
                    unlimited_kpu,
                    cfg,
                ),
            )
        })
        .collect()
}

/// What one department ended up with.
struct Placed {
    polys: Vec<Polygon2>,
    area: f64,
    circulation: Vec<Polygon2>,
}

impl Placed {
    fn empty() -> Self {
        Self {
            polys: Vec::new(),
            area: 0.0,
            circulation: Vec::new(),
        }
    }
}

/// Placement state threaded through one pass over the departments.
struct DeptPlacer<'a> {
    cfg: &'a LayoutConfig,
    rng: StdRng,
    attractor: Point2<f64>,
    kpu_depths: &'a [f64],
    corridor_width: f64,
    allow_no_external_wall: bool,
    unlimited_kpu: bool,
    boundary: Vec<Polygon2>,
    /// Site area not yet claimed by Public/KPU departments.
    leftover_blocks: Vec<Polygon2>,
    /// Cell pool the Regular departments draw from.
    pool: Vec<Polygon2>,
    grid_ready: bool,
    grid_ratio: f64,
    /// Corridors carved around the cell grid, handed to the regular
    /// department that triggered grid preparation.
    grid_corridors: Vec<Polygon2>,
    other_dept: Vec<Polygon2>,
    subdivided: Vec<Polygon2>,
}

impl DeptPlacer<'_> {
    fn run(mut self, departments: &[Department]) -> LayoutResult<PlacementOutcome> {
        // the caller's records are never mutated
        let mut depts: Vec<Department> = departments.to_vec();
        debug!(count = depts.len(), "department placement starts");
        let mut placed: Vec<Placed> = Vec::with_capacity(depts.len());
        for (i, dept) in depts.iter().enumerate() {
            let record = match dept.dept_type {
                DeptType::Public => self.place_public(dept)?,
                DeptType::KeyPlanningUnit => self.place_kpu(i, dept),
                DeptType::Regular => self.place_regular(dept),
            };
            debug!(dept = %dept.name, area = record.area, "department placed");
            placed.push(record);
        }
        for (dept, record) in depts.iter_mut().zip(placed) {
            dept.polygons = validate::clean_polygon_list(record.polys);
            dept.area_provided = record.area;
            dept.circulation = record.circulation;
        }
        let total: f64 = depts.iter().map(|d| d.area_provided).sum();
        if total > 0.0 {
            for dept in &mut depts {
                dept.area_proportion_achieved = round3(dept.area_provided / total);
            }
        }
        let leftover = if self.grid_ready {
            self.pool
        } else {
            self.leftover_blocks
        };
        debug!("department placement ends");
        Ok(PlacementOutcome {
            departments: depts,
            leftover,
            other_dept_polys: self.other_dept,
            subdivided_polys: self.subdivided,
        })
    }

    fn place_public(&mut self, dept: &Department) -> LayoutResult<Placed> {
        let Some(first) = self.leftover_blocks.first().cloned() else {
            return Err(LayoutError::InvalidBoundary);
        };
        let fit = fit_public_dept(&first, self.attractor, dept.area_target, self.cfg)
            .map_err(|_| LayoutError::InvalidBoundary)?;
        self.leftover_blocks[0] = fit.leftover;
        let (corridors, reduced) =
            carve_circulation(&fit.blocks, &self.boundary, self.corridor_width, self.cfg);
        for block in &self.leftover_blocks {
            self.other_dept.push(block.clone());
        }
        Ok(Placed {
            polys: reduced,
            area: fit.area_assigned,
            circulation: corridors,
        })
    }

    fn place_kpu(&mut self, index: usize, dept: &Department) -> Placed {
        let available: f64 = self.leftover_blocks.iter().map(Polygon2::area).sum();
        let target = if self.unlimited_kpu {
            UNLIMITED_KPU_SHARE * available
        } else {
            dept.area_target
        };
        let depth = self
            .kpu_depths
            .get(index)
            .or_else(|| self.kpu_depths.first())
            .copied()
            .unwrap_or(DEFAULT_KPU_DEPTH)
            + self.corridor_width;
        let pool = self.leftover_blocks.clone();
        let carve = match split::carve_perimeter_blocks(
            &pool,
            depth,
            target,
            KPU_THRESHOLD,
            &mut self.rng,
            self.allow_no_external_wall,
            false,
            self.cfg,
        ) {
            Ok(carve) => carve,
            Err(err) => {
                debug!(%err, "perimeter carve failed, retrying with randomized edge order");
                match split::carve_perimeter_blocks(
                    &pool,
                    depth,
                    target,
                    KPU_THRESHOLD,
                    &mut self.rng,
                    self.allow_no_external_wall,
                    true,
                    self.cfg,
                ) {
                    Ok(carve) => carve,
                    Err(err) => {
                        debug!(%err, "perimeter carve failed twice, department left empty");
                        return Placed::empty();
                    }
                }
            }
        };
        self.leftover_blocks = carve.leftovers;
        let (corridors, reduced) =
            carve_circulation(&carve.blocks, &pool, self.corridor_width, self.cfg);
        for block in &self.leftover_blocks {
            self.other_dept.push(block.clone());
        }
        Placed {
            polys: reduced,
            area: carve.area_assigned,
            circulation: corridors,
        }
    }

    fn place_regular(&mut self, dept: &Department) -> Placed {
        if !self.grid_ready {
            self.prepare_regular_grid();
        }
        if self.pool.is_empty() {
            return Placed::empty();
        }
        match fit_region_to_area(dept.area_target, &self.pool, self.cfg) {
            Ok(fit) => {
                self.pool = fit.leftover;
                // the grid corridors ride with whichever regular
                // department triggered grid preparation
                let circulation = std::mem::take(&mut self.grid_corridors);
                Placed {
                    polys: fit.assigned,
                    area: fit.area_assigned,
                    circulation,
                }
            }
            Err(err) => {
                debug!(%err, "regular fit skipped");
                Placed::empty()
            }
        }
    }

    /// Subdivides the entire remaining pool once into a grid of cells,
    /// walking the split ratio down until the grid is mostly orthogonal.
    fn prepare_regular_grid(&mut self) {
        self.grid_ready = true;
        let container = self.leftover_blocks.clone();
        if container.is_empty() {
            return;
        }
        let mut ratio = self.grid_ratio;
        let mut best: Option<split::RecursiveSplit> = None;
        for _ in 0..=MAX_GRID_RETRIES {
            match split::split_recursively(&container, self.cfg.cell_width, ratio, self.cfg) {
                Ok(result) if validate::is_mostly_orthogonal(&result.cells, ORTHO_FRACTION) => {
                    best = Some(result);
                    break;
                }
                Ok(result) => best = Some(result),
                Err(_) => {}
            }
            ratio -= 0.01;
            if ratio < 0.0 {
                ratio = 0.6;
            }
        }
        let Some(result) = best else {
            self.pool = container;
            return;
        };
        self.subdivided = result.cells.clone();
        let mut cells = result.cells;
        // deterministic downstream order: nearest the lowest site point first
        let site_points: Vec<Point2<f64>> = container
            .iter()
            .flat_map(|p| p.points.iter().copied())
            .collect();
        if !site_points.is_empty() {
            let low = site_points[lowest_point_index(&site_points)];
            cells.sort_by(|a, b| {
                (a.centroid() - low)
                    .norm()
                    .partial_cmp(&(b.centroid() - low).norm())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        let (corridors, reduced) =
            carve_circulation(&cells, &container, self.corridor_width, self.cfg);
        self.grid_corridors = corridors;
        self.pool = validate::clean_polygon_list(reduced);
    }
}

/// Carves the public department out of `poly`, growing rectangles of the
/// configured aspect from the boundary edge nearest the attractor point
/// until the target is met or the retry budget runs out.
pub fn fit_public_dept(
    poly: &Polygon2,
    attractor: Point2<f64>,
    target_area: f64,
    cfg: &LayoutConfig,
) -> SplitResult<PublicFit> {
    if !validate::is_valid_polygon(poly) {
        return Err(SplitError::InvalidPolygon);
    }
    let mut current = poly.clone();
    let mut blocks = Vec::new();
    let mut area_assigned = 0.0;
    let mut tries = 0;
    while area_assigned < target_area && tries < MAX_PUBLIC_TRIES {
        tries += 1;
        let area_left = target_area - area_assigned;
        let max_width = (area_left * cfg.public_aspect).sqrt();
        let max_len = area_left / max_width;
        let edge_id = current.closest_vertex_index(&attractor);
        if current.edge(edge_id).length() > max_len {
            let t = max_len / current.edge(edge_id).length();
            current = split::add_split_point(&current, edge_id, t);
        }
        let len = current.edge(edge_id).length();
        if len <= 0.0 {
            continue;
        }
        let mut width = area_left / len;
        let allowed = max_inward_offset(&current, edge_id);
        if allowed < width * 0.75 {
            width = allowed * 0.75;
        }
        if !edge_offset_fits(&current, edge_id, width) {
            width *= 0.5;
        }
        let Ok(split) = split::split_by_offset_from_edge(&current, edge_id, width, 0.0) else {
            continue;
        };
        area_assigned += split.block.area();
        current = split.leftover;
        if split.block.area() > MIN_KEPT_AREA {
            blocks.push(split.block);
        }
    }
    // suggested exit side: a usable block edge nearest the site center
    let center = poly.centroid();
    let mut exit_line = None;
    let mut best = f64::INFINITY;
    for block in &blocks {
        for edge in block.edges() {
            if edge.length() > EXIT_EDGE_MIN {
                let d = edge.distance_to_point(&center);
                if d < best {
                    best = d;
                    exit_line = Some(edge);
                }
            }
        }
    }
    Ok(PublicFit {
        blocks,
        leftover: current,
        area_assigned,
        exit_line,
    })
}

/// Draws polygons from the pool in order until the target area is met,
/// ratio-splitting any polygon larger than the *remaining* need (ratio
/// nudged up and axis toggled on repeated failure) and accepting the
/// smaller piece. Leftovers come back sorted radially from their joint
/// centroid.
pub fn fit_region_to_area(
    target_area: f64,
    pool: &[Polygon2],
    cfg: &LayoutConfig,
) -> SplitResult<RegionFit> {
    if !validate::is_valid_polygon_list(pool) {
        return Err(SplitError::InvalidPolygon);
    }
    let mut queue: VecDeque<Polygon2> = pool.iter().cloned().collect();
    let mut assigned = Vec::new();
    let mut area_assigned = 0.0;
    let mut axis = Axis::Horizontal;
    while area_assigned < target_area && !queue.is_empty() {
        let mut current = queue.pop_front().unwrap();
        let area_left = target_area - area_assigned;
        if current.area() > area_left {
            let mut ratio = 0.3;
            let mut attempt = split::split_by_ratio(&current, ratio, Some(axis), cfg);
            let mut retries = 0;
            while attempt.is_err() && retries < MAX_REGION_RETRIES {
                retries += 1;
                ratio += 0.02;
                axis = axis.toggled();
                attempt = split::split_by_ratio(&current, ratio, Some(axis), cfg);
            }
            if let Ok(mut split_ok) = attempt {
                split_ok.pieces.sort_by(|a, b| {
                    a.area()
                        .partial_cmp(&b.area())
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                let larger = split_ok.pieces.pop().unwrap();
                queue.push_back(larger);
                if let Some(smaller) = split_ok.pieces.pop() {
                    current = smaller;
                }
            }
            axis = axis.toggled();
        }
        area_assigned += current.area();
        assigned.push(current);
    }
    let mut leftover: Vec<Polygon2> = queue.into_iter().collect();
    sort_radially(&mut leftover);
    Ok(RegionFit {
        assigned,
        leftover,
        area_assigned,
    })
}

/// Sorts polygons by distance of their centroid from the joint centroid.
fn sort_radially(polys: &mut [Polygon2]) {
    if polys.len() < 2 {
        return;
    }
    let n = polys.len() as f64;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for poly in polys.iter() {
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
}

fn round3(x: f64) -> f64 {
    (x * 1_000.0).round() / 1_000.0
}
