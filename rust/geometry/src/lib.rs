//! SpacePlan Geometry
//!
//! 2D polygon primitives and queries for the layout engine: closed rings,
//! boundary resampling, containment, inward offsets, and the intersection
//! machinery used to split site polygons.

pub mod error;
pub mod intersect;
pub mod line;
pub mod offset;
pub mod polygon;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Vector2};

pub use error::{Error, Result};
pub use line::{Axis, LineSeg2, Orientation};
pub use polygon::{lowest_point_index, Polygon2};
