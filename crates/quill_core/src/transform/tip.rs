use super::Transforming;
use crate::drawing::Drawing;
use crate::point::Point;
use crate::stroke::Stroke;
use crate::style::TipKind;

/// Arrowhead size relative to stroke width
pub const TIP_SIZE_FACTOR: f32 = 4.0;
/// Arrowhead wing stroke width relative to stroke width
pub const WING_WIDTH_FACTOR: f32 = 1.5;

/// Appends an arrowhead stroke at the end of the primary stroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TipAccessory {
    pub tip: TipKind,
}

impl TipAccessory {
    pub const fn new(tip: TipKind) -> Self {
        Self { tip }
    }
}

impl Transforming for TipAccessory {
    fn transform(&self, drawing: Drawing) -> Drawing {
        if self.tip != TipKind::Arrow {
            return drawing;
        }
        let Some(primary) = drawing.primary() else {
            return drawing;
        };
        let points = &primary.points;
        if points.len() < 2 {
            return drawing;
        }

        let size = primary.width * TIP_SIZE_FACTOR;
        let last = points.len() - 1;

        let mut distance = 0.0;
        let mut index = last;
        while distance < size && index > 0 {
            distance += points[index - 1].distance(&points[index]);
            index -= 1;
        }
        if distance < size {
            return drawing;
        }

        let tip = points[last];
        let pivot = if distance > size * 1.5 {
            pivot_point(points[last - 1], tip, size)
        } else {
            points[index]
        };

        let wing = pivot.location.chord_normal(tip.location) * size;
        if wing.is_nan() {
            tracing::trace!("arrow pivot coincides with tip, skipping");
            return drawing;
        }

        let arrow = Stroke::open(
            vec![
                Point::new(pivot.location + wing, pivot.time, 0.0),
                tip,
                Point::new(pivot.location - wing, tip.time, 0.0),
            ],
            primary.width * WING_WIDTH_FACTOR,
        );
        let primary = primary.clone();
        drawing.with_strokes([primary, arrow])
    }
}

/// Point `distance` behind `tip` on the line through `from` and `tip`,
/// keeping the tip's time and force. Falls back to `from` when both
/// samples coincide.
fn pivot_point(from: Point, tip: Point, distance: f32) -> Point {
    let dir = tip.location - from.location;
    if dir.length() == 0.0 || dir.is_nan() {
        return from;
    }
    tip.with_location(tip.location - dir.normalize() * distance)
}
