//! Easing functions for stroke tapering

/// Easing curve over a progress value in `0.0..=1.0`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    #[default]
    Linear,
    EaseInOutCubic,
    EaseOutCirc,
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseOutCirc => (1.0 - (t - 1.0).powi(2)).sqrt(),
        }
    }
}

/// Scale `to` by the eased progress `t`.
///
/// Progress outside `0.0..=1.0` (or NaN) is rejected and yields `to` unchanged.
pub fn ease_to(to: f32, t: f32, curve: Easing) -> f32 {
    if !(0.0..=1.0).contains(&t) {
        tracing::trace!("easing progress {} out of range", t);
        return to;
    }
    to * curve.apply(t)
}
