//! Quill GPU Compositing
//!
//! Headless wgpu context, offscreen targets and the ink renderers that
//! composite a stroke mask onto the canvas image.

pub mod config;
pub mod context;
pub mod error;
pub mod ink;
pub mod offscreen;
pub mod pipeline;
pub mod shaders;
pub mod texture;

pub use config::GpuConfig;
pub use context::GpuContext;
pub use error::{GpuError, Result};
pub use ink::{BlurInk, DrawInk, EraseInk, GaussianBlur, InkRenderer};
pub use offscreen::OffscreenTarget;
pub use pipeline::CompositePipeline;
pub use texture::GpuTexture;

pub use wgpu;
