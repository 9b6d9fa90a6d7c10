//! Polyline / polygon of sampled points

use crate::geometry::{Rect, Vec2};
use crate::point::Point;

/// An ordered run of points rendered with a single width.
///
/// Open strokes are stroked with round caps and joins; closed + filled
/// strokes are filled polygons (the outline transformer produces these).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stroke {
    pub points: Vec<Point>,
    pub width: f32,
    pub is_closed: bool,
    pub is_filled: bool,
}

impl Stroke {
    pub fn new(points: Vec<Point>, width: f32, is_closed: bool, is_filled: bool) -> Self {
        Self {
            points,
            width,
            is_closed,
            is_filled,
        }
    }

    /// An open, unfilled polyline
    pub fn open(points: Vec<Point>, width: f32) -> Self {
        Self::new(points, width, false, false)
    }

    pub fn append(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First location, or the origin for an empty stroke
    pub fn start(&self) -> Vec2 {
        self.points.first().map_or(Vec2::ZERO, |p| p.location)
    }

    /// Last location, or the origin for an empty stroke
    pub fn end(&self) -> Vec2 {
        self.points.last().map_or(Vec2::ZERO, |p| p.location)
    }

    /// Axis-aligned bounding box of the points ([`Rect::ZERO`] when empty)
    pub fn frame(&self) -> Rect {
        Rect::bounding(self.points.iter().map(|p| p.location)).unwrap_or(Rect::ZERO)
    }

    /// Total polyline length
    pub fn length(&self) -> f32 {
        self.points.windows(2).map(|w| w[0].distance(&w[1])).sum()
    }

    pub fn with_points(self, points: Vec<Point>) -> Self {
        Self { points, ..self }
    }
}
