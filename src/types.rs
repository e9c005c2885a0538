//! Shared types used across faceprep.
//! Includes the 2D `Point`, the four-point `Landmarks` set read from the catalog,
//! and the per-entry `AlignmentOutcome`.
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A pixel coordinate in image space, serialized as `[x, y]`.
#[derive(Copy, Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length of the point taken as a vector.
    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn midpoint(self, other: Point) -> Point {
        (self + other) * 0.5
    }

    /// Quarter turn: `(x, y) -> (-y, x)`.
    pub fn rotate90(self) -> Point {
        Point::new(-self.y, self.x)
    }
}

impl From<[f64; 2]> for Point {
    fn from(v: [f64; 2]) -> Self {
        Point::new(v[0], v[1])
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Point;
    fn div(self, rhs: f64) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

/// Facial landmarks in the raw image's pixel space.
///
/// No ordering or bounds constraint is enforced: swapped or coincident points
/// produce a geometrically meaningless crop, never an error.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Landmarks {
    pub eye_left: Point,
    pub eye_right: Point,
    pub mouth_left: Point,
    pub mouth_right: Point,
}

impl Landmarks {
    /// The same face seen with left and right exchanged on both eyes and mouth.
    pub fn swapped_sides(&self) -> Self {
        Self {
            eye_left: self.eye_right,
            eye_right: self.eye_left,
            mouth_left: self.mouth_right,
            mouth_right: self.mouth_left,
        }
    }
}

/// Result of processing a single catalog entry.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum AlignmentOutcome {
    /// The aligned output already existed; nothing was read or written.
    Skipped,
    /// The raw source image is not in the raw store.
    MissingSource,
    /// A new aligned image was written.
    Produced,
}

impl std::fmt::Display for AlignmentOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlignmentOutcome::Skipped => write!(f, "exists"),
            AlignmentOutcome::MissingSource => write!(f, "missing source"),
            AlignmentOutcome::Produced => write!(f, "produced"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_round_trips_as_pair() {
        let p: Point = serde_json::from_str("[12.5, -3.0]").unwrap();
        assert_eq!(p, Point::new(12.5, -3.0));
        assert_eq!(serde_json::to_string(&p).unwrap(), "[12.5,-3.0]");
    }

    #[test]
    fn rotate90_is_a_quarter_turn() {
        let v = Point::new(3.0, 4.0);
        assert_eq!(v.rotate90(), Point::new(-4.0, 3.0));
        assert_eq!(v.rotate90().rotate90(), -v);
        assert_eq!(v.norm(), 5.0);
    }
}
