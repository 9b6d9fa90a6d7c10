//! Ink renderers
//!
//! An ink renderer composites the canvas image with the stroke mask into its
//! own offscreen target. Each variant owns a fixed pipeline; renderers are
//! rebuilt (not reconfigured) whenever the style, ink kind or canvas size
//! changes.
//!
//! Composites only ever read the renderer's input image (plus auxiliary
//! textures), never its own output, so `update` is a pure function of the
//! current inputs.

mod blur;
mod draw;
mod erase;

pub use blur::{BlurInk, BlurUniforms, GaussianBlur};
pub use draw::DrawInk;
pub use erase::EraseInk;

use std::sync::Arc;

use quill_core::InkKind;

use crate::context::GpuContext;
use crate::error::Result;
use crate::offscreen::OffscreenTarget;
use crate::texture::GpuTexture;

/// Inputs and output shared by every ink variant
#[derive(Debug)]
pub(crate) struct InkTarget {
    target: OffscreenTarget,
    image: Option<Arc<GpuTexture>>,
    mask: Option<Arc<GpuTexture>>,
    updated: bool,
}

impl InkTarget {
    fn new(ctx: &GpuContext, size: (u32, u32), label: &str) -> Result<Self> {
        Ok(Self {
            target: OffscreenTarget::new(ctx, size.0, size.1, label)?,
            image: None,
            mask: None,
            updated: false,
        })
    }

    /// Output once `update` has run at least once
    fn texture(&self) -> Option<&Arc<GpuTexture>> {
        self.updated.then(|| self.target.texture())
    }
}

/// Closed set of ink renderers
#[derive(Debug)]
pub enum InkRenderer {
    Draw(DrawInk),
    Blur(BlurInk),
    Erase(EraseInk),
}

impl InkRenderer {
    /// Build the renderer for `ink` at canvas `size`.
    ///
    /// `clear_reference` is what erasing reveals (the base image); `blur_sigma`
    /// is only used by the blur ink.
    pub fn new(
        ctx: &GpuContext,
        ink: InkKind,
        size: (u32, u32),
        clear_reference: Option<Arc<GpuTexture>>,
        blur_sigma: f32,
    ) -> Result<Self> {
        tracing::debug!("building {:?} ink renderer at {}x{}", ink, size.0, size.1);
        Ok(match ink {
            InkKind::Draw => InkRenderer::Draw(DrawInk::new(ctx, size)?),
            InkKind::Blur => InkRenderer::Blur(BlurInk::new(ctx, size, blur_sigma)?),
            InkKind::Erase => InkRenderer::Erase(EraseInk::new(ctx, size, clear_reference)?),
        })
    }

    pub fn kind(&self) -> InkKind {
        match self {
            InkRenderer::Draw(_) => InkKind::Draw,
            InkRenderer::Blur(_) => InkKind::Blur,
            InkRenderer::Erase(_) => InkKind::Erase,
        }
    }

    /// Replace the input image. The blur ink recomputes its blurred copy here.
    pub fn set_image(&mut self, image: Option<Arc<GpuTexture>>) -> Result<()> {
        match self {
            InkRenderer::Draw(ink) => {
                ink.set_image(image);
                Ok(())
            }
            InkRenderer::Blur(ink) => ink.set_image(image),
            InkRenderer::Erase(ink) => {
                ink.set_image(image);
                Ok(())
            }
        }
    }

    pub fn set_mask(&mut self, mask: Option<Arc<GpuTexture>>) {
        match self {
            InkRenderer::Draw(ink) => ink.set_mask(mask),
            InkRenderer::Blur(ink) => ink.set_mask(mask),
            InkRenderer::Erase(ink) => ink.set_mask(mask),
        }
    }

    /// Run one synchronous composite into the offscreen target
    pub fn update(&mut self) -> Result<()> {
        match self {
            InkRenderer::Draw(ink) => ink.update(),
            InkRenderer::Blur(ink) => ink.update(),
            InkRenderer::Erase(ink) => ink.update(),
        }
    }

    /// Current output; `None` until the first `update`
    pub fn texture(&self) -> Option<&Arc<GpuTexture>> {
        match self {
            InkRenderer::Draw(ink) => ink.texture(),
            InkRenderer::Blur(ink) => ink.texture(),
            InkRenderer::Erase(ink) => ink.texture(),
        }
    }
}
