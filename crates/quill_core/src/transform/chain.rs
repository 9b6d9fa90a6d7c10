use super::{Transformer, Transforming};
use crate::drawing::Drawing;

/// Ordered list of transform stages applied as a left fold.
///
/// The order is part of each tool preset; pencil smooths before extruding,
/// pen and marker extrude first and smooth the outline afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransformChain {
    stages: Vec<Transformer>,
}

impl TransformChain {
    pub fn new(stages: impl IntoIterator<Item = Transformer>) -> Self {
        Self {
            stages: stages.into_iter().collect(),
        }
    }

    /// Append a stage, builder style
    pub fn then(mut self, stage: impl Into<Transformer>) -> Self {
        self.stages.push(stage.into());
        self
    }

    pub fn stages(&self) -> &[Transformer] {
        &self.stages
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl Transforming for TransformChain {
    fn transform(&self, drawing: Drawing) -> Drawing {
        self.stages
            .iter()
            .fold(drawing, |drawing, stage| stage.transform(drawing))
    }
}
