//! Quill Core
//!
//! The GPU-independent half of the stroke engine.
//!
//! # Features
//!
//! - Stroke model: [`Point`], [`Stroke`], [`Drawing`]
//! - Geometry transforms: lerp smoothing, ribbon outlines, arrow tips
//! - Tool presets ([`DrawingStyle`]) with their own transform order
//! - The pointer-driven stroke lifecycle (begin / move / split / finish)
//!
//! Everything here is plain data and pure functions; rasterization and
//! compositing live in `quill_gpu` and `quill_canvas`.

pub mod color;
pub mod drawing;
pub mod easing;
pub mod geometry;
pub mod item;
pub mod lifecycle;
pub mod point;
pub mod stroke;
pub mod style;
pub mod transform;

pub use color::Color;
pub use drawing::Drawing;
pub use easing::{ease_to, Easing};
pub use geometry::{Rect, Vec2};
pub use item::Item;
pub use lifecycle::{CommitKind, LifecycleEvent, PointerSample, StrokeLifecycle};
pub use point::Point;
pub use stroke::Stroke;
pub use style::{DrawingStyle, InkKind, TipKind, ToolPreset};
pub use transform::{
    LerpSmoother, OutlineExtruder, TipAccessory, TransformChain, Transformer, Transforming,
};
