//! A single pointer sample

use std::hash::{Hash, Hasher};

use crate::geometry::Vec2;

/// One sampled pointer location.
///
/// Equality and hashing look at the location only (bitwise), so two samples
/// taken at different times on the same pixel dedup to one.
#[derive(Clone, Copy, Debug)]
pub struct Point {
    pub location: Vec2,
    /// Seconds since the owning stroke began
    pub time: f64,
    pub force: f32,
}

impl Point {
    pub const fn new(location: Vec2, time: f64, force: f32) -> Self {
        Self {
            location,
            time,
            force,
        }
    }

    /// Point at `(x, y)` with zero time and force
    pub const fn at(x: f32, y: f32) -> Self {
        Self::new(Vec2::new(x, y), 0.0, 0.0)
    }

    pub fn with_location(self, location: Vec2) -> Self {
        Self { location, ..self }
    }

    pub fn with_time(self, time: f64) -> Self {
        Self { time, ..self }
    }

    pub fn distance(&self, to: &Point) -> f32 {
        self.location.distance(to.location)
    }

    /// Travelled distance per second between two samples.
    ///
    /// Infinite when both samples share a timestamp and NaN when they also
    /// share a location.
    pub fn speed(&self, to: &Point) -> f32 {
        self.distance(to) / (to.time - self.time) as f32
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.location.x.to_bits() == other.location.x.to_bits()
            && self.location.y.to_bits() == other.location.y.to_bits()
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.location.x.to_bits().hash(state);
        self.location.y.to_bits().hash(state);
    }
}
