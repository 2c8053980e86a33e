// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Closed 2D polygon ring and its basic queries.
//!
//! A [`Polygon2`] is an ordered ring of vertices with an implicit closing
//! edge from the last vertex back to the first. Every transformation
//! returns a new polygon; nothing mutates in place.

use crate::line::LineSeg2;
use nalgebra::Point2;

/// Consecutive vertices closer than this are merged at construction.
const DUP_EPS: f64 = 1e-9;

/// A closed polygon in the plane.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon2 {
    /// Ring vertices in order; the edge from the last vertex to the first
    /// closes the loop. The constructor guarantees no zero-length edges.
    pub points: Vec<Point2<f64>>,
}

impl Polygon2 {
    /// Builds a polygon, dropping duplicate consecutive vertices
    /// (including a trailing copy of the first vertex).
    pub fn new(points: Vec<Point2<f64>>) -> Self {
        let mut ring: Vec<Point2<f64>> = Vec::with_capacity(points.len());
        for p in points {
            if let Some(last) = ring.last() {
                if (p - last).norm() < DUP_EPS {
                    continue;
                }
            }
            ring.push(p);
        }
        while ring.len() > 1 {
            let first = ring[0];
            let last = *ring.last().unwrap();
            if (first - last).norm() < DUP_EPS {
                ring.pop();
            } else {
                break;
            }
        }
        Self { points: ring }
    }

    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Edge from vertex `i` to vertex `i + 1` (wrapping).
    pub fn edge(&self, i: usize) -> LineSeg2 {
        let n = self.points.len();
        LineSeg2::new(self.points[i % n], self.points[(i + 1) % n])
    }

    pub fn edges(&self) -> impl Iterator<Item = LineSeg2> + '_ {
        (0..self.points.len()).map(move |i| self.edge(i))
    }

    /// Shoelace area with winding sign (positive = counter-clockwise).
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut acc = 0.0;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            acc += a.x * b.y - b.x * a.y;
        }
        acc / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn is_clockwise(&self) -> bool {
        self.signed_area() < 0.0
    }

    /// Same ring, forced into clockwise order.
    pub fn oriented_clockwise(&self) -> Polygon2 {
        if self.is_clockwise() {
            self.clone()
        } else {
            let mut points = self.points.clone();
            points.reverse();
            Polygon2 { points }
        }
    }

    /// Vertex average. Cheap and order-stable, which is what the layout
    /// passes rely on; not the area centroid.
    pub fn centroid(&self) -> Point2<f64> {
        if self.points.is_empty() {
            return Point2::origin();
        }
        let mut x = 0.0;
        let mut y = 0.0;
        for p in &self.points {
            x += p.x;
            y += p.y;
        }
        let n = self.points.len() as f64;
        Point2::new(x / n, y / n)
    }

    /// Bounding extents as `(horizontal span, vertical span)`.
    pub fn spans(&self) -> (f64, f64) {
        let (min, max) = self.bounding_box();
        (max.x - min.x, max.y - min.y)
    }

    pub fn bounding_box(&self) -> (Point2<f64>, Point2<f64>) {
        let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in &self.points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        if self.points.is_empty() {
            return (Point2::origin(), Point2::origin());
        }
        (min, max)
    }

    /// Resamples the boundary so no edge is longer than `spacing`,
    /// keeping every original vertex.
    pub fn resampled(&self, spacing: f64) -> Polygon2 {
        if spacing <= 0.0 || self.points.len() < 2 {
            return self.clone();
        }
        let mut out = Vec::with_capacity(self.points.len());
        for edge in self.edges() {
            out.push(edge.start);
            let segments = (edge.length() / spacing).ceil() as usize;
            for k in 1..segments {
                out.push(edge.point_at(k as f64 / segments as f64));
            }
        }
        Polygon2::new(out)
    }

    /// Even-odd ray-casting containment test.
    pub fn contains_point(&self, p: &Point2<f64>) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[j];
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// One notch-collapse pass: drops the vertex shared by two consecutive
    /// edges that are both shorter than `distance`. Returns the original
    /// ring when collapsing would leave fewer than 3 vertices.
    pub fn collapse_short_edges(&self, distance: f64) -> Polygon2 {
        let n = self.points.len();
        if n < 4 {
            return self.clone();
        }
        let mut keep = vec![true; n];
        for i in 0..n {
            let j = (i + 1) % n;
            if self.edge(i).length() < distance && self.edge(j).length() < distance {
                keep[j] = false;
            }
        }
        let reduced: Vec<Point2<f64>> = self
            .points
            .iter()
            .zip(&keep)
            .filter(|(_, k)| **k)
            .map(|(p, _)| *p)
            .collect();
        if reduced.len() < 3 {
            return self.clone();
        }
        Polygon2::new(reduced)
    }

    /// Index of the vertex nearest to `p`.
    pub fn closest_vertex_index(&self, p: &Point2<f64>) -> usize {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (i, v) in self.points.iter().enumerate() {
            let d = (v - p).norm();
            if d < best_dist {
                best_dist = d;
                best = i;
            }
        }
        best
    }
}

/// Index of the point with the smallest `y` (ties broken by smallest `x`).
pub fn lowest_point_index(points: &[Point2<f64>]) -> usize {
    let mut best = 0;
    for (i, p) in points.iter().enumerate() {
        let b = points[best];
        if p.y < b.y || (p.y == b.y && p.x < b.x) {
            best = i;
        }
    }
    best
}
