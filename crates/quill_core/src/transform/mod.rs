//! Geometry transform pipeline
//!
//! Raw pointer samples are turned into renderable geometry by folding a
//! [`TransformChain`] over a [`Drawing`]. Each stage only touches the primary
//! stroke (`strokes[0]`), except [`TipAccessory`] which appends an arrowhead.
//!
//! All stages are total: degenerate input (too few points, coincident
//! samples, NaN offsets) passes through or is skipped, never panics.

mod chain;
mod lerp;
mod outline;
mod tip;

pub use chain::TransformChain;
pub use lerp::LerpSmoother;
pub use outline::OutlineExtruder;
pub use tip::TipAccessory;

use crate::drawing::Drawing;
use crate::stroke::Stroke;

/// Capability shared by every geometry stage
pub trait Transforming {
    fn transform(&self, drawing: Drawing) -> Drawing;
}

/// Closed set of transform stages a chain can hold
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transformer {
    Lerp(LerpSmoother),
    Outline(OutlineExtruder),
    Tip(TipAccessory),
}

impl Transforming for Transformer {
    fn transform(&self, drawing: Drawing) -> Drawing {
        match self {
            Transformer::Lerp(t) => t.transform(drawing),
            Transformer::Outline(t) => t.transform(drawing),
            Transformer::Tip(t) => t.transform(drawing),
        }
    }
}

impl From<LerpSmoother> for Transformer {
    fn from(t: LerpSmoother) -> Self {
        Transformer::Lerp(t)
    }
}

impl From<OutlineExtruder> for Transformer {
    fn from(t: OutlineExtruder) -> Self {
        Transformer::Outline(t)
    }
}

impl From<TipAccessory> for Transformer {
    fn from(t: TipAccessory) -> Self {
        Transformer::Tip(t)
    }
}

/// Replace the primary stroke through `f`, leaving every other stroke as is.
pub(crate) fn map_primary(mut drawing: Drawing, f: impl FnOnce(Stroke) -> Stroke) -> Drawing {
    if let Some(first) = drawing.strokes.first_mut() {
        *first = f(std::mem::take(first));
    }
    drawing
}
