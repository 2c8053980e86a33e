// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Department and program records.
//!
//! Both record types are plain value types. Every placement entry point
//! clones the caller's records before touching them, so input lists are
//! never mutated; the clones are what get progressively filled in and
//! returned.

use spaceplan_geometry::Polygon2;

/// How a department is placed on the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeptType {
    /// Placed around a user-supplied attractor point.
    Public,
    /// Placed as depth-bounded blocks along usable perimeter edges.
    KeyPlanningUnit,
    /// Allocated from a pre-subdivided grid of cells.
    Regular,
}

impl DeptType {
    /// Lenient mapping from the tags found in program documents:
    /// anything containing "kpu" or "public" (any case) maps to the
    /// matching type, everything else is Regular.
    pub fn from_tag(tag: &str) -> DeptType {
        let lower = tag.to_lowercase();
        if lower.contains("kpu") {
            DeptType::KeyPlanningUnit
        } else if lower.contains("public") {
            DeptType::Public
        } else {
            DeptType::Regular
        }
    }
}

/// The smallest allocatable unit within a department.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Program {
    pub id: u32,
    pub name: String,
    /// Name of the owning department.
    pub dept_name: String,
    pub unit_count: u32,
    pub unit_area: f64,
    /// Area this program asks for (`unit_count × unit_area`).
    pub area_needed: f64,
    /// Area actually provided by placement.
    pub area_provided: f64,
    /// Polygons assigned by placement.
    pub polygons: Vec<Polygon2>,
}

impl Program {
    pub fn new(id: u32, name: &str, dept_name: &str, unit_count: u32, unit_area: f64) -> Self {
        Self {
            id,
            name: name.to_string(),
            dept_name: dept_name.to_string(),
            unit_count,
            unit_area,
            area_needed: unit_count as f64 * unit_area,
            area_provided: 0.0,
            polygons: Vec::new(),
        }
    }
}

/// A named region of the building program with a target area.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Department {
    pub id: u32,
    pub name: String,
    pub dept_type: DeptType,
    /// Area this department asks for.
    pub area_target: f64,
    /// Requested share of the total area.
    pub area_proportion_target: f64,
    /// Floor-stacking metadata, consumed only by the 3D variant.
    pub mode_3d: bool,
    pub floor_heights: Vec<f64>,
    pub num_dept_per_floor: u32,
    pub programs: Vec<Program>,
    /// Polygons assigned by placement.
    pub polygons: Vec<Polygon2>,
    pub area_provided: f64,
    /// `area_provided / Σ area_provided` across the run, 3 decimals.
    pub area_proportion_achieved: f64,
    /// Corridor strips carved off this department's blocks.
    pub circulation: Vec<Polygon2>,
}

impl Department {
    pub fn new(id: u32, name: &str, dept_type: DeptType, area_target: f64) -> Self {
        Self {
            id,
            name: name.to_string(),
            dept_type,
            area_target,
            area_proportion_target: 0.0,
            mode_3d: false,
            floor_heights: Vec::new(),
            num_dept_per_floor: 0,
            programs: Vec::new(),
            polygons: Vec::new(),
            area_provided: 0.0,
            area_proportion_achieved: 0.0,
            circulation: Vec::new(),
        }
    }

    /// Builds a department whose area target is the sum of its programs'
    /// needs.
    pub fn from_programs(id: u32, name: &str, dept_type: DeptType, programs: Vec<Program>) -> Self {
        let target = programs.iter().map(|p| p.area_needed).sum();
        let mut dept = Self::new(id, name, dept_type, target);
        dept.programs = programs;
        dept
    }

    pub fn with_programs(mut self, programs: Vec<Program>) -> Self {
        self.programs = programs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_map_leniently() {
        assert_eq!(DeptType::from_tag("KPU dept"), DeptType::KeyPlanningUnit);
        assert_eq!(DeptType::from_tag("Public lobby"), DeptType::Public);
        assert_eq!(DeptType::from_tag("radiology"), DeptType::Regular);
    }

    #[test]
    fn program_area_is_count_times_unit() {
        let prog = Program::new(4, "Exam", "Clinic", 6, 25.0);
        assert_eq!(prog.area_needed, 150.0);
        assert_eq!(prog.area_provided, 0.0);
    }

    #[test]
    fn department_target_from_programs() {
        let programs = vec![
            Program::new(0, "Exam", "Clinic", 4, 25.0),
            Program::new(1, "Waiting", "Clinic", 1, 60.0),
        ];
        let dept = Department::from_programs(1, "Clinic", DeptType::Regular, programs);
        assert_eq!(dept.area_target, 160.0);
        assert_eq!(dept.programs.len(), 2);
    }
}
