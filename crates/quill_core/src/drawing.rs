//! A group of strokes sharing one color and ink

use smallvec::SmallVec;

use crate::color::Color;
use crate::point::Point;
use crate::stroke::Stroke;
use crate::style::InkKind;

/// Strokes that are rasterized together into one mask.
///
/// `strokes[0]` is the primary stroke. Transformers only replace the primary
/// stroke, except the tip accessory which appends an arrowhead stroke, so
/// two inline slots cover every drawing the pipeline produces.
#[derive(Clone, Debug, PartialEq)]
pub struct Drawing {
    pub strokes: SmallVec<[Stroke; 2]>,
    pub color: Color,
    pub ink: InkKind,
}

impl Drawing {
    pub fn new(strokes: impl IntoIterator<Item = Stroke>, color: Color, ink: InkKind) -> Self {
        Self {
            strokes: strokes.into_iter().collect(),
            color,
            ink,
        }
    }

    /// A drawing made of a single stroke
    pub fn from_points(
        points: Vec<Point>,
        color: Color,
        ink: InkKind,
        width: f32,
        is_closed: bool,
        is_filled: bool,
    ) -> Self {
        Self::new(
            [Stroke::new(points, width, is_closed, is_filled)],
            color,
            ink,
        )
    }

    /// Total number of points across all strokes
    pub fn points_count(&self) -> usize {
        self.strokes.iter().map(Stroke::len).sum()
    }

    pub fn primary(&self) -> Option<&Stroke> {
        self.strokes.first()
    }

    /// Append a point to the last stroke; no-op when there are no strokes
    pub fn append(&mut self, point: Point) {
        if let Some(stroke) = self.strokes.last_mut() {
            stroke.append(point);
        }
    }

    pub fn with_strokes(self, strokes: impl IntoIterator<Item = Stroke>) -> Self {
        Self {
            strokes: strokes.into_iter().collect(),
            ..self
        }
    }
}
