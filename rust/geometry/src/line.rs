// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Line segments, axes, and edge-orientation classification.

use nalgebra::{Point2, Vector2};

/// Tolerance under which a coordinate delta counts as zero when
/// classifying an edge as horizontal or vertical.
pub const AXIS_EPS: f64 = 1e-2;

/// Half-extent used to emulate an unbounded split line.
pub const SPLIT_LINE_EXTENT: f64 = 5_000.0;

/// Coordinate axis of a split line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// The other axis.
    pub fn toggled(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

/// Axis classification of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
    Oblique,
}

/// A 2D line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineSeg2 {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

impl LineSeg2 {
    pub fn new(start: Point2<f64>, end: Point2<f64>) -> Self {
        Self { start, end }
    }

    /// A long axis-aligned segment through `point`, standing in for an
    /// unbounded split line.
    pub fn axis_through(point: Point2<f64>, axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => Self::new(
                Point2::new(point.x - SPLIT_LINE_EXTENT, point.y),
                Point2::new(point.x + SPLIT_LINE_EXTENT, point.y),
            ),
            Axis::Vertical => Self::new(
                Point2::new(point.x, point.y - SPLIT_LINE_EXTENT),
                Point2::new(point.x, point.y + SPLIT_LINE_EXTENT),
            ),
        }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    pub fn midpoint(&self) -> Point2<f64> {
        nalgebra::center(&self.start, &self.end)
    }

    /// Unnormalized direction vector.
    pub fn vector(&self) -> Vector2<f64> {
        self.end - self.start
    }

    /// Point at parameter `t` (0 = start, 1 = end).
    pub fn point_at(&self, t: f64) -> Point2<f64> {
        self.start + self.vector() * t
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        let shift = Vector2::new(dx, dy);
        Self::new(self.start + shift, self.end + shift)
    }

    /// Classifies the segment as horizontal, vertical, or oblique.
    pub fn orientation(&self) -> Orientation {
        let d = self.vector();
        if d.x.abs() < AXIS_EPS {
            Orientation::Vertical
        } else if d.y.abs() < AXIS_EPS {
            Orientation::Horizontal
        } else {
            Orientation::Oblique
        }
    }

    /// Distance from `p` to the segment (projection clamped to the span).
    pub fn distance_to_point(&self, p: &Point2<f64>) -> f64 {
        let v = self.vector();
        let len2 = v.norm_squared();
        if len2 == 0.0 {
            return (p - self.start).norm();
        }
        let t = ((p - self.start).dot(&v) / len2).clamp(0.0, 1.0);
        (p - self.point_at(t)).norm()
    }

    /// True when the two segments run along the same carrier line and
    /// overlap within `eps`: parallel directions and the midpoint of one
    /// lying within `eps` of the other.
    pub fn coincides_with(&self, other: &LineSeg2, eps: f64) -> bool {
        let a = self.vector();
        let b = other.vector();
        let (la, lb) = (a.norm(), b.norm());
        if la == 0.0 || lb == 0.0 {
            return false;
        }
        let cross = (a.x * b.y - a.y * b.x).abs() / (la * lb);
        cross < 1e-3 && other.distance_to_point(&self.midpoint()) <= eps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn orientation_classification() {
        let h = LineSeg2::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        let v = LineSeg2::new(Point2::new(3.0, 1.0), Point2::new(3.0, 8.0));
        let o = LineSeg2::new(Point2::new(0.0, 0.0), Point2::new(4.0, 4.0));
        assert_eq!(h.orientation(), Orientation::Horizontal);
        assert_eq!(v.orientation(), Orientation::Vertical);
        assert_eq!(o.orientation(), Orientation::Oblique);
    }

    #[test]
    fn axis_through_spans_both_sides() {
        let line = LineSeg2::axis_through(Point2::new(5.0, 2.0), Axis::Vertical);
        assert_relative_eq!(line.start.x, 5.0);
        assert_relative_eq!(line.end.x, 5.0);
        assert!(line.start.y < 2.0 && line.end.y > 2.0);
        assert_eq!(Axis::Vertical.toggled(), Axis::Horizontal);
    }

    #[test]
    fn distance_clamps_to_segment() {
        let seg = LineSeg2::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        assert_relative_eq!(seg.distance_to_point(&Point2::new(5.0, 3.0)), 3.0);
        assert_relative_eq!(seg.distance_to_point(&Point2::new(13.0, 4.0)), 5.0);
    }

    #[test]
    fn coincident_edges_detected() {
        let a = LineSeg2::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        let b = LineSeg2::new(Point2::new(2.0, 0.0), Point2::new(8.0, 0.0));
        let c = LineSeg2::new(Point2::new(2.0, 5.0), Point2::new(8.0, 5.0));
        assert!(b.coincides_with(&a, 0.5));
        assert!(!c.coincides_with(&a, 0.5));
    }
}
