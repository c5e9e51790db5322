//! Planar coordinate type.
//!
//! Positions live on an unbounded euclidean plane; distances are in abstract
//! "units" (the demo scenarios treat them as kilometres).

/// A position on the plane.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Two points closer than this are considered the same location.
    pub const EPSILON: f64 = 1e-9;

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// `true` if `other` is within [`Point::EPSILON`] of `self`.
    #[inline]
    pub fn same_location(self, other: Point) -> bool {
        self.distance(other) < Self::EPSILON
    }

    /// Move from `self` towards `target` by at most `max_dist`.
    ///
    /// Returns the new position and the distance actually travelled.  Lands
    /// exactly on `target` when it is within reach.
    pub fn step_towards(self, target: Point, max_dist: f64) -> (Point, f64) {
        let dist = self.distance(target);
        if dist <= max_dist || dist < Self::EPSILON {
            return (target, dist);
        }
        let ratio = max_dist / dist;
        let next = Point::new(
            self.x + (target.x - self.x) * ratio,
            self.y + (target.y - self.y) * ratio,
        );
        (next, max_dist)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
