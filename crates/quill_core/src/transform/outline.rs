use super::{map_primary, Transforming};
use crate::drawing::Drawing;
use crate::easing::{ease_to, Easing};
use crate::point::Point;
use crate::stroke::Stroke;

/// Distance over which a dynamic outline tapers in and out
pub const TAIL_LENGTH: f32 = 150.0;

/// Divisor turning px/s into the unitless speed fed to the width damping
pub const SPEED_NORMALIZATION: f32 = 10_000.0;

const SPEED_SMOOTHING: f32 = 0.5;
const MIN_SPEED_FACTOR: f32 = 0.3;
const MAX_SPEED_FACTOR: f32 = 1.5;

/// Extrudes a centerline into a closed, filled ribbon polygon.
///
/// With `dynamic_width` the half-width shrinks as the pen moves faster and
/// eases in/out over [`TAIL_LENGTH`] at both ends of the stroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutlineExtruder {
    pub dynamic_width: bool,
}

impl OutlineExtruder {
    pub const fn new(dynamic_width: bool) -> Self {
        Self { dynamic_width }
    }

    fn half_width(&self, width: f32, distance: f32, remaining: f32, speed: f32) -> f32 {
        if !self.dynamic_width {
            return width;
        }
        let speed = if speed.is_nan() { 0.0 } else { speed };
        let k = (1.0 - speed).clamp(MIN_SPEED_FACTOR, MAX_SPEED_FACTOR);

        if distance < TAIL_LENGTH {
            k * ease_to(width, (distance / TAIL_LENGTH).min(1.0), Easing::EaseOutCirc)
        } else if remaining < TAIL_LENGTH {
            k * ease_to(width, (remaining / TAIL_LENGTH).min(1.0), Easing::EaseOutCirc)
        } else {
            width * k
        }
    }

    fn extrude(&self, stroke: Stroke) -> Stroke {
        let points = &stroke.points;
        let n = points.len();
        if n == 0 {
            return stroke;
        }

        let (speed, total) = speed_series(points);
        let end_time = points[n - 1].time;

        let mut left = Vec::with_capacity(n);
        let mut right = Vec::with_capacity(n);
        let mut distance = 0.0_f32;

        left.push(points[0]);
        for index in 1..n.saturating_sub(1) {
            let point = points[index];
            let next = points[index + 1];

            let w = self.half_width(
                stroke.width,
                distance,
                (total - distance).max(0.0),
                speed[index],
            );
            distance += point.distance(&next);

            let offset = points[index - 1].location.chord_normal(next.location) * w;
            if offset.is_nan() {
                continue;
            }

            left.push(point.with_location(point.location + offset));
            right.push(
                point
                    .with_location(point.location - offset)
                    .with_time(end_time + points[n - 1 - index].time),
            );
        }
        if n > 1 {
            right.push(points[n - 1]);
        }

        left.reverse();
        left.extend(right);
        Stroke {
            points: left,
            is_closed: true,
            is_filled: true,
            ..stroke
        }
    }
}

/// Normalized per-sample speed (index 0 is at rest) and the travelled
/// distance over the same sample pairs.
fn speed_series(points: &[Point]) -> (Vec<f32>, f32) {
    let mut speed = vec![0.0];
    let mut total = 0.0;
    if points.len() > 2 {
        for pair in points[..points.len() - 1].windows(2) {
            total += pair[0].distance(&pair[1]);
            speed.push(pair[0].speed(&pair[1]) / SPEED_NORMALIZATION);
        }
    }
    (smooth(&speed, SPEED_SMOOTHING), total)
}

/// One smoothing pass where every interior value reads its raw neighbours
fn smooth(values: &[f32], ratio: f32) -> Vec<f32> {
    let mut out = values.to_vec();
    if values.len() < 3 {
        return out;
    }
    for i in 1..values.len() - 1 {
        let (prev, next) = (values[i - 1], values[i + 1]);
        out[i] = prev + (next - prev) * ratio;
    }
    out
}

impl Transforming for OutlineExtruder {
    fn transform(&self, drawing: Drawing) -> Drawing {
        map_primary(drawing, |stroke| self.extrude(stroke))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::geometry::Vec2;
    use crate::style::InkKind;

    fn line(count: usize, spacing: f32, dt: f64, width: f32) -> Drawing {
        let points = (0..count)
            .map(|i| Point::new(Vec2::new(i as f32 * spacing, 0.0), i as f64 * dt, 0.0))
            .collect();
        Drawing::from_points(points, Color::BLACK, InkKind::Draw, width, false, false)
    }

    #[test]
    fn fixed_width_offsets_by_width() {
        let out = OutlineExtruder::new(false).transform(line(3, 10.0, 0.1, 4.0));
        let pts: Vec<Vec2> = out.strokes[0].points.iter().map(|p| p.location).collect();
        assert_eq!(
            pts,
            vec![
                Vec2::new(10.0, 4.0),
                Vec2::new(0.0, 0.0),
                Vec2::new(10.0, -4.0),
                Vec2::new(20.0, 0.0),
            ]
        );
    }

    #[test]
    fn slow_stroke_keeps_full_width_away_from_tails() {
        // 400 units long, nearly zero speed
        let out = OutlineExtruder::new(true).transform(line(41, 10.0, 1.0e6, 10.0));
        let at_200: Vec<f32> = out.strokes[0]
            .points
            .iter()
            .filter(|p| p.location.x == 200.0)
            .map(|p| p.location.y)
            .collect();
        assert_eq!(at_200.len(), 2);
        for y in at_200 {
            assert!((y.abs() - 10.0).abs() < 1e-3, "half-width was {}", y.abs());
        }
    }

    #[test]
    fn dynamic_width_tapers_at_start() {
        let out = OutlineExtruder::new(true).transform(line(41, 10.0, 1.0e6, 10.0));
        let near_start: Vec<f32> = out.strokes[0]
            .points
            .iter()
            .filter(|p| p.location.x == 10.0)
            .map(|p| p.location.y.abs())
            .collect();
        // First interior sample sits at distance 0 into the taper
        assert!(near_start.iter().all(|y| *y < 1e-3));
    }

    #[test]
    fn coincident_neighbours_are_skipped() {
        let points = vec![Point::at(5.0, 5.0), Point::at(6.0, 5.0), Point::at(5.0, 5.0)];
        let d = Drawing::from_points(points, Color::BLACK, InkKind::Draw, 2.0, false, false);
        let out = OutlineExtruder::new(false).transform(d);
        // start + end cap only
        assert_eq!(out.strokes[0].points.len(), 2);
        assert!(out.strokes[0].points.iter().all(|p| !p.location.is_nan()));
    }

    #[test]
    fn smoothing_reads_raw_neighbours() {
        assert_eq!(smooth(&[0.0, 5.0, 2.0, 4.0], 0.5), vec![0.0, 1.0, 4.5, 4.0]);
        assert_eq!(smooth(&[1.0, 9.0], 0.5), vec![1.0, 9.0]);
    }
}
