//! SpacePlan Layout
//!
//! Area-constrained recursive polygon subdivision and space allocation:
//! given a site boundary, department area targets, and placement hints
//! (attractor point, KPU depths, a design seed), the engine partitions
//! the site into department polygons, carves corridor strips around
//! them, and sub-allocates each department among its programs.
//!
//! All placement is synchronous and single-threaded per invocation;
//! every entry point clones its input records, and all randomness flows
//! through one seeded generator so a fixed seed reproduces a layout.

pub mod circulation;
pub mod config;
pub mod data;
pub mod error;
pub mod place;
pub mod programs;
pub mod split;
pub mod validate;

pub use config::LayoutConfig;
pub use data::{Department, DeptType, Program};
pub use error::{LayoutError, LayoutResult, SplitError, SplitResult};
pub use place::{
    fit_public_dept, fit_region_to_area, place_departments, place_departments_batch,
    PlacementOutcome,
};
pub use programs::place_programs;
