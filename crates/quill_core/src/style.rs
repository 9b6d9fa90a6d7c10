//! Immutable drawing styles and tool presets
//!
//! A [`DrawingStyle`] is a snapshot taken when a tool is selected. The
//! transform chain lives inside the style, so every preset fixes its own
//! stage order.

use crate::color::Color;
use crate::transform::{LerpSmoother, OutlineExtruder, TipAccessory, TransformChain};

/// Compositing effect applied by a stroke
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InkKind {
    #[default]
    Draw,
    Blur,
    Erase,
}

/// Decoration at the end of a stroke
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TipKind {
    #[default]
    Default,
    Arrow,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawingStyle {
    color: Color,
    stroke_width: f32,
    ink: InkKind,
    tip: TipKind,
    chain: TransformChain,
}

impl DrawingStyle {
    pub fn new(
        color: Color,
        stroke_width: f32,
        ink: InkKind,
        tip: TipKind,
        chain: TransformChain,
    ) -> Self {
        Self {
            color,
            stroke_width,
            ink,
            tip,
            chain,
        }
    }

    pub fn pen(width: f32, color: Color, tip: TipKind) -> Self {
        let chain = TransformChain::default()
            .then(TipAccessory::new(tip))
            .then(OutlineExtruder::new(true))
            .then(LerpSmoother::new(7));
        Self::new(color, width, InkKind::Draw, tip, chain)
    }

    /// Pen geometry at half opacity
    pub fn marker(width: f32, color: Color, tip: TipKind) -> Self {
        let chain = TransformChain::default()
            .then(TipAccessory::new(tip))
            .then(OutlineExtruder::new(true))
            .then(LerpSmoother::new(7));
        Self::new(color.with_alpha(0.5), width, InkKind::Draw, tip, chain)
    }

    pub fn pencil(width: f32, color: Color, tip: TipKind) -> Self {
        let chain = TransformChain::default()
            .then(TipAccessory::new(tip))
            .then(LerpSmoother::new(3))
            .then(OutlineExtruder::new(false));
        Self::new(color, width, InkKind::Draw, tip, chain)
    }

    pub fn blur(width: f32) -> Self {
        Self::new(Color::WHITE, width, InkKind::Blur, TipKind::Default, Self::area_chain())
    }

    pub fn erase(width: f32) -> Self {
        Self::new(Color::WHITE, width, InkKind::Erase, TipKind::Default, Self::area_chain())
    }

    fn area_chain() -> TransformChain {
        TransformChain::default()
            .then(LerpSmoother::new(3))
            .then(OutlineExtruder::new(false))
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    pub fn ink(&self) -> InkKind {
        self.ink
    }

    pub fn tip(&self) -> TipKind {
        self.tip
    }

    pub fn chain(&self) -> &TransformChain {
        &self.chain
    }
}

impl Default for DrawingStyle {
    fn default() -> Self {
        ToolPreset::Pen.style(Color::BLACK, TipKind::Default)
    }
}

/// Toolbar tools and their default widths
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ToolPreset {
    #[default]
    Pen,
    Marker,
    Pencil,
    Eraser,
    Blur,
}

impl ToolPreset {
    pub const ALL: [ToolPreset; 5] = [
        ToolPreset::Pen,
        ToolPreset::Marker,
        ToolPreset::Pencil,
        ToolPreset::Eraser,
        ToolPreset::Blur,
    ];

    pub fn default_width(self) -> f32 {
        match self {
            ToolPreset::Pen | ToolPreset::Marker | ToolPreset::Pencil => 10.0,
            ToolPreset::Eraser | ToolPreset::Blur => 72.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolPreset::Pen => "pen",
            ToolPreset::Marker => "marker",
            ToolPreset::Pencil => "pencil",
            ToolPreset::Eraser => "eraser",
            ToolPreset::Blur => "blur",
        }
    }

    /// Style at the preset's default width. Eraser and blur ignore `color`
    /// and `tip`.
    pub fn style(self, color: Color, tip: TipKind) -> DrawingStyle {
        self.style_with_width(self.default_width(), color, tip)
    }

    pub fn style_with_width(self, width: f32, color: Color, tip: TipKind) -> DrawingStyle {
        match self {
            ToolPreset::Pen => DrawingStyle::pen(width, color, tip),
            ToolPreset::Marker => DrawingStyle::marker(width, color, tip),
            ToolPreset::Pencil => DrawingStyle::pencil(width, color, tip),
            ToolPreset::Eraser => DrawingStyle::erase(width),
            ToolPreset::Blur => DrawingStyle::blur(width),
        }
    }
}

impl std::str::FromStr for ToolPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolPreset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown tool '{}'", s))
    }
}
