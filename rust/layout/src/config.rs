// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Engine tunables, passed explicitly into every placement call.

/// Spacing, threshold, and ratio tunables for one placement run.
///
/// Earlier revisions kept these as process-wide mutable statics; every
/// entry point now takes a `LayoutConfig` so two runs can never bleed
/// settings into each other. `Default` carries the tuned values.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Boundary resample spacing applied before ratio splits.
    pub spacing: f64,
    /// Finer resample spacing used when retrying a degenerate split.
    pub fine_spacing: f64,
    /// Target cell width for the regular-department grid.
    pub cell_width: f64,
    /// A cell larger than `total area / circulation_factor` becomes a
    /// circulation candidate during recursive subdivision.
    pub circulation_factor: f64,
    /// Absolute minimum span a polygon must have to be ratio-split.
    pub min_split_span: f64,
    /// Below this span the split ratio is pinned to 0.5.
    pub min_split_width: f64,
    /// Lower clamp of the split ratio band.
    pub ratio_min: f64,
    /// Upper clamp of the split ratio band.
    pub ratio_max: f64,
    /// Distance under which two parallel edges count as coincident.
    pub adjacency_eps: f64,
    /// Containment slack applied to the container before deciding which
    /// edges may be offset inward.
    pub erosion: f64,
    /// Width/length proportion of the public department's carve rectangles.
    pub public_aspect: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            spacing: 20.0,
            fine_spacing: 3.0,
            cell_width: 35.0,
            circulation_factor: 10.0,
            min_split_span: 2.0,
            min_split_width: 10.0,
            ratio_min: 0.15,
            ratio_max: 0.85,
            adjacency_eps: 0.5,
            erosion: 0.2,
            public_aspect: 0.8,
        }
    }
}
