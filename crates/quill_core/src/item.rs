//! Committed history entries

use crate::drawing::Drawing;
use crate::style::DrawingStyle;

/// One committed stroke: fully transformed geometry plus the style it was
/// drawn with. Items are never mutated once they enter the history.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub style: DrawingStyle,
    pub drawing: Drawing,
}

impl Item {
    pub fn new(style: DrawingStyle, drawing: Drawing) -> Self {
        Self { style, drawing }
    }
}
