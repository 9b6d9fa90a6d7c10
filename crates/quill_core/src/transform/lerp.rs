use super::{map_primary, Transforming};
use crate::drawing::Drawing;

/// Repeated midpoint smoothing of the primary stroke.
///
/// Each pass moves every interior point to the midpoint of its neighbours as
/// they were after the previous pass. Endpoints stay put, and time and force
/// of every sample are kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LerpSmoother {
    pub iterations: usize,
}

impl LerpSmoother {
    pub const fn new(iterations: usize) -> Self {
        Self { iterations }
    }
}

impl Transforming for LerpSmoother {
    fn transform(&self, drawing: Drawing) -> Drawing {
        map_primary(drawing, |stroke| {
            let n = stroke.points.len();
            if n <= 2 || self.iterations == 0 {
                return stroke;
            }

            let mut points = stroke.points.clone();
            let mut snapshot = points.clone();
            for _ in 0..self.iterations {
                snapshot.copy_from_slice(&points);
                for i in 1..n - 1 {
                    let mid = snapshot[i - 1].location.lerp(snapshot[i + 1].location, 0.5);
                    points[i] = points[i].with_location(mid);
                }
            }
            stroke.with_points(points)
        })
    }
}
