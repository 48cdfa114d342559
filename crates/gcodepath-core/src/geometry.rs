//! Geometry collaborator types
//!
//! The codec only needs two things from a host's geometry model: a point has
//! X, Y and Z, and a directed segment has a start and an end point. The
//! [`Point3`] and [`DirectedSegment`] traits capture exactly that, and
//! [`Point3D`] / [`LineSegment`] are the concrete types the codec produces.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Anything that exposes absolute X, Y and Z coordinates
pub trait Point3 {
    fn x(&self) -> f64;
    fn y(&self) -> f64;
    fn z(&self) -> f64;

    /// Copy into the codec's own point type
    fn to_point3d(&self) -> Point3D {
        Point3D::new(self.x(), self.y(), self.z())
    }
}

/// A directed segment between two points
///
/// The end point is the destination of the move; it is the point written to
/// a generated motion line.
pub trait DirectedSegment {
    type Point: Point3;

    fn start(&self) -> &Self::Point;
    fn end(&self) -> &Self::Point;
}

/// 3D point in machine coordinates (mm)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance in the XY plane, ignoring Z
    pub fn planar_distance(&self, other: &Point3D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Full 3D Euclidean distance
    pub fn distance(&self, other: &Point3D) -> f64 {
        let dz = self.z - other.z;
        let planar = self.planar_distance(other);
        (planar * planar + dz * dz).sqrt()
    }
}

impl Point3 for Point3D {
    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }

    fn z(&self) -> f64 {
        self.z
    }

    fn to_point3d(&self) -> Point3D {
        *self
    }
}

impl From<(f64, f64, f64)> for Point3D {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::new(x, y, z)
    }
}

impl fmt::Display for Point3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Directed line segment from `start` to `end`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LineSegment {
    pub start: Point3D,
    pub end: Point3D,
}

impl LineSegment {
    pub fn new(start: Point3D, end: Point3D) -> Self {
        Self { start, end }
    }

    /// 3D length of the segment
    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }

    /// Length of the segment projected onto the XY plane
    pub fn planar_length(&self) -> f64 {
        self.start.planar_distance(&self.end)
    }
}

impl DirectedSegment for LineSegment {
    type Point = Point3D;

    fn start(&self) -> &Point3D {
        &self.start
    }

    fn end(&self) -> &Point3D {
        &self.end
    }
}
