// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Corridor strips around placed department blocks.

use crate::config::LayoutConfig;
use crate::split;
use crate::validate;
use spaceplan_geometry::{LineSeg2, Polygon2};

/// Carves a corridor strip along every block edge that is not already
/// shared with the container boundary or an earlier strip.
///
/// Returns `(corridor polygons, reduced blocks)`; a block whose carve
/// fails is passed through untouched.
pub fn carve_circulation(
    blocks: &[Polygon2],
    container: &[Polygon2],
    corridor_width: f64,
    cfg: &LayoutConfig,
) -> (Vec<Polygon2>, Vec<Polygon2>) {
    if blocks.is_empty() || corridor_width <= 0.0 {
        return (Vec::new(), blocks.to_vec());
    }
    let mut placed: Vec<LineSeg2> = container.iter().flat_map(|p| p.edges()).collect();
    let mut corridors = Vec::new();
    let mut reduced = Vec::new();
    for block in blocks {
        if !validate::is_valid_polygon(block) {
            reduced.push(block.clone());
            continue;
        }
        let free: Vec<usize> = (0..block.vertex_count())
            .filter(|&i| {
                let edge = block.edge(i);
                !placed
                    .iter()
                    .any(|line| edge.coincides_with(line, cfg.adjacency_eps))
            })
            .collect();
        if free.is_empty() {
            reduced.push(block.clone());
            continue;
        }
        match split::split_by_offset_from_edges(block, &free, corridor_width, 0.0) {
            Ok(series) => {
                for strip in &series.blocks {
                    placed.extend(strip.edges());
                }
                corridors.extend(series.blocks);
                reduced.push(series.leftover);
            }
            Err(_) => reduced.push(block.clone()),
        }
    }
    (corridors, reduced)
}
