//! Quill Canvas
//!
//! The stroke engine proper: rasterizes strokes into a CPU mask, drives the
//! ink renderers and keeps the undo history.
//!
//! ```ignore
//! use quill_canvas::{CanvasEngine, EngineConfig};
//! use quill_core::{Color, PointerSample, TipKind, ToolPreset};
//!
//! let style = ToolPreset::Pen.style(Color::BLACK, TipKind::Default);
//! let mut engine = CanvasEngine::new(EngineConfig::from_env(), (512, 512), style)?;
//! engine.pointer_began(PointerSample::new(10.0, 10.0, 0.0))?;
//! engine.pointer_moved(PointerSample::new(200.0, 40.0, 0.05), &[])?;
//! engine.pointer_ended()?;
//! let image = engine.get_image();
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod mask;
pub mod pixels;

pub use config::EngineConfig;
pub use engine::{CanvasEngine, ChangedCallback};
pub use error::{CanvasError, Result};
pub use history::History;
pub use mask::{MaskBuffer, MaskLayer};
