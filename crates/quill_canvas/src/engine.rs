//! The canvas engine
//!
//! Owns the base image, the stroke mask, the active ink renderer and the
//! undo history, and turns pointer input into composited frames.
//!
//! Every operation runs synchronously on the caller's thread. GPU work is
//! submitted and waited on before the call returns, so [`CanvasEngine::get_image`]
//! always sees the latest composite.
//!
//! # Renderer chain
//!
//! The renderer's input image is either the base image or the previous
//! renderer's output ("preserve" mode). A committed item is composited once
//! with the item in the mask, after which a fresh renderer takes that output
//! as its input and the mask is emptied. Replaying the history through the
//! same steps reproduces the live result exactly, which is what undo relies
//! on.

use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::RgbaImage;
use quill_core::{
    CommitKind, Drawing, DrawingStyle, InkKind, Item, LifecycleEvent, PointerSample,
    StrokeLifecycle, Transforming,
};
use quill_gpu::{GpuContext, GpuTexture, InkRenderer};

use crate::config::EngineConfig;
use crate::error::{CanvasError, Result};
use crate::history::History;
use crate::mask::MaskLayer;
use crate::pixels::{premultiply, unpremultiply};

/// Callback fired after every commit, undo and clear
pub type ChangedCallback = Box<dyn FnMut()>;

pub struct CanvasEngine {
    ctx: GpuContext,
    config: EngineConfig,
    size: (u32, u32),
    style: DrawingStyle,
    lifecycle: StrokeLifecycle,
    history: History,
    mask: MaskLayer,
    /// Premultiplied base image pixels, kept to rebuild the base texture
    base_image: Option<RgbaImage>,
    base: Option<Arc<GpuTexture>>,
    renderer: Option<InkRenderer>,
    on_changed: Option<ChangedCallback>,
}

impl std::fmt::Debug for CanvasEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasEngine")
            .field("size", &self.size)
            .field("ink", &self.style.ink())
            .field("items", &self.history.len())
            .field("active", &self.lifecycle.is_active())
            .finish_non_exhaustive()
    }
}

impl CanvasEngine {
    /// Create a GPU context from `config` and an empty canvas of `size`
    pub fn new(config: EngineConfig, size: (u32, u32), style: DrawingStyle) -> Result<Self> {
        let ctx = GpuContext::new_blocking(config.gpu.clone())?;
        Self::with_context(ctx, config, size, style)
    }

    /// Create an empty canvas on an existing context
    pub fn with_context(
        ctx: GpuContext,
        config: EngineConfig,
        size: (u32, u32),
        style: DrawingStyle,
    ) -> Result<Self> {
        let size = (size.0.max(1), size.1.max(1));
        let mask = MaskLayer::new(&ctx, size.0, size.1)?;
        tracing::info!("canvas engine {}x{}", size.0, size.1);

        let mut engine = Self {
            ctx,
            config,
            size,
            style,
            lifecycle: StrokeLifecycle::new(),
            history: History::new(),
            mask,
            base_image: None,
            base: None,
            renderer: None,
            on_changed: None,
        };
        engine.clear_mask();
        engine.setup_renderer(engine.style.ink(), false)?;
        Ok(engine)
    }

    /// Register the change observer, replacing any previous one
    pub fn set_on_changed(&mut self, callback: impl FnMut() + 'static) {
        self.on_changed = Some(Box::new(callback));
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn style(&self) -> &DrawingStyle {
        &self.style
    }

    pub fn items(&self) -> &[Item] {
        self.history.items()
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn is_drawing(&self) -> bool {
        self.lifecycle.is_active()
    }

    /// Pending long-press deadline, in the pointer timestamps' clock
    pub fn deadline(&self) -> Option<f64> {
        self.lifecycle.deadline()
    }

    /// Latest composite, for presentation
    pub fn texture(&self) -> Option<&Arc<GpuTexture>> {
        self.renderer.as_ref().and_then(InkRenderer::texture)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Input
    // ─────────────────────────────────────────────────────────────────────────

    /// Start a stroke. A stroke already in progress is discarded.
    pub fn pointer_began(&mut self, sample: PointerSample) -> Result<()> {
        if self.lifecycle.is_active() {
            self.clear_mask();
            self.update_renderer()?;
        }
        self.lifecycle.pointer_began(sample, &self.style);
        Ok(())
    }

    /// Extend the active stroke. `coalesced` are the intermediate samples
    /// delivered with `sample`; pass an empty slice when there are none.
    pub fn pointer_moved(&mut self, sample: PointerSample, coalesced: &[PointerSample]) -> Result<()> {
        match self.lifecycle.pointer_moved(sample, coalesced) {
            Some(event) => self.handle(event),
            None => Ok(()),
        }
    }

    pub fn pointer_ended(&mut self) -> Result<()> {
        match self.lifecycle.finish() {
            Some(event) => self.handle(event),
            None => Ok(()),
        }
    }

    pub fn pointer_cancelled(&mut self) -> Result<()> {
        self.pointer_ended()
    }

    /// Drive the long-press timer; call with the current pointer clock
    pub fn tick(&mut self, now: f64) -> Result<()> {
        match self.lifecycle.tick(now, self.size) {
            Some(event) => self.handle(event),
            None => Ok(()),
        }
    }

    fn handle(&mut self, event: LifecycleEvent) -> Result<()> {
        match event {
            LifecycleEvent::Preview(drawing) => self.show(&drawing),
            LifecycleEvent::Commit { item, kind } => self.commit(item, kind),
        }
    }

    /// Composite `drawing` over the committed image without touching history
    fn show(&mut self, drawing: &Drawing) -> Result<()> {
        self.mask.clear();
        self.mask.draw(drawing);
        self.mask.upload(&self.ctx);
        self.update_renderer()
    }

    fn commit(&mut self, item: Item, kind: CommitKind) -> Result<()> {
        tracing::debug!(
            "commit {:?}: {} points, {:?} ink",
            kind,
            item.drawing.points_count(),
            item.style.ink()
        );
        self.show(&item.drawing)?;
        self.history.push(item);
        self.clear_mask();
        self.setup_renderer(self.style.ink(), true)?;
        self.notify();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // State changes
    // ─────────────────────────────────────────────────────────────────────────

    /// Switch tools. A stroke in progress is committed under its own style
    /// first.
    pub fn set_style(&mut self, style: DrawingStyle) -> Result<()> {
        if self.lifecycle.is_active() {
            self.pointer_ended()?;
        }
        self.style = style;
        self.setup_renderer(self.style.ink(), true)
    }

    /// Replace the base image (straight alpha). `None` removes it.
    ///
    /// Outside a stroke this starts a new document: the history is dropped.
    /// During a stroke the history is kept and the composite carries over.
    pub fn set_base_image(&mut self, image: Option<RgbaImage>) -> Result<()> {
        self.base_image = image.map(|mut image| {
            premultiply(&mut image);
            image
        });

        if self.lifecycle.is_active() {
            self.clear_mask();
            self.update_renderer()?;
            self.reset_base_texture()?;
            self.setup_renderer(self.style.ink(), true)?;
            return self.refresh_preview();
        }

        let had_items = !self.history.is_empty();
        self.history.clear();
        self.reset_base_texture()?;
        self.clear_mask();
        self.setup_renderer(self.style.ink(), false)?;
        if had_items {
            self.notify();
        }
        Ok(())
    }

    /// Reallocate the mask at the new size; the current composite is
    /// stretched onto it. A size the device cannot hold leaves the canvas
    /// untouched.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let size = (width.max(1), height.max(1));
        if size == self.size {
            return Ok(());
        }
        tracing::debug!("resize {:?} -> {:?}", self.size, size);
        let mask = MaskLayer::new(&self.ctx, size.0, size.1)?;

        self.clear_mask();
        self.update_renderer()?;
        self.mask = mask;
        self.size = size;
        self.clear_mask();
        self.reset_base_texture()?;
        self.setup_renderer(self.style.ink(), true)?;
        self.refresh_preview()
    }

    /// Remove the most recent item and rebuild the image from the rest
    pub fn undo(&mut self) -> Result<()> {
        if self.history.pop().is_none() {
            return Ok(());
        }
        self.lifecycle.reset();
        self.redraw()?;
        self.notify();
        Ok(())
    }

    /// Drop every item and any stroke in progress
    pub fn clear(&mut self) -> Result<()> {
        self.lifecycle.reset();
        self.history.clear();
        self.clear_mask();
        self.reset_base_texture()?;
        self.setup_renderer(self.style.ink(), false)?;
        self.notify();
        Ok(())
    }

    /// Rebuild the composite from the base image by replaying the history
    pub fn redraw(&mut self) -> Result<()> {
        tracing::debug!("redraw {} items", self.history.len());
        self.reset_base_texture()?;
        self.clear_mask();
        self.setup_renderer(self.style.ink(), false)?;

        let history = std::mem::take(&mut self.history);
        let replayed = self.replay(history.items());
        self.history = history;
        replayed?;

        self.clear_mask();
        self.setup_renderer(self.style.ink(), true)
    }

    fn replay(&mut self, items: &[Item]) -> Result<()> {
        for item in items {
            self.clear_mask();
            self.setup_renderer(item.style.ink(), true)?;
            self.show(&item.drawing)?;
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Output
    // ─────────────────────────────────────────────────────────────────────────

    /// Read back the current composite as a straight-alpha image.
    ///
    /// Failures are logged and reported as `None`; the call can be retried.
    pub fn get_image(&self) -> Option<RgbaImage> {
        self.try_get_image()
            .map_err(|err| tracing::warn!("get_image failed: {}", err))
            .ok()
    }

    pub fn try_get_image(&self) -> Result<RgbaImage> {
        let texture = self.texture().ok_or(CanvasError::NoOutput)?;
        let mut pixels = self
            .ctx
            .read_rgba(texture)
            .map_err(CanvasError::Readback)?;
        unpremultiply(&mut pixels);
        RgbaImage::from_raw(texture.width(), texture.height(), pixels).ok_or(CanvasError::NoOutput)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn clear_mask(&mut self) {
        self.mask.clear();
        self.mask.upload(&self.ctx);
    }

    fn update_renderer(&mut self) -> Result<()> {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.update()?;
        }
        Ok(())
    }

    /// Replace the renderer with a fresh one for `ink`.
    ///
    /// With `preserve` the old renderer's output becomes the new input image;
    /// otherwise (or when there is no output yet) the base image is. The old
    /// renderer stays in place until the new one has rendered.
    fn setup_renderer(&mut self, ink: InkKind, preserve: bool) -> Result<()> {
        let previous = if preserve { self.texture().cloned() } else { None };

        let mut renderer = InkRenderer::new(
            &self.ctx,
            ink,
            self.size,
            self.base.clone(),
            self.config.blur_sigma,
        )?;
        renderer.set_image(previous.or_else(|| self.base.clone()))?;
        renderer.set_mask(Some(self.mask.texture().clone()));
        renderer.update()?;
        self.renderer = Some(renderer);
        Ok(())
    }

    /// Upload the base image resampled to the canvas size, so every
    /// renderer input and the erase reference share one pixel grid
    fn reset_base_texture(&mut self) -> Result<()> {
        let (width, height) = self.size;
        self.base = match &self.base_image {
            Some(image) if image.dimensions() == self.size => Some(Arc::new(
                self.ctx
                    .upload_rgba(image.as_raw(), width, height, "Base Image")?,
            )),
            Some(image) => {
                tracing::debug!(
                    "resampling base image {:?} to {}x{}",
                    image.dimensions(),
                    width,
                    height
                );
                let fitted = imageops::resize(image, width, height, FilterType::Nearest);
                Some(Arc::new(
                    self.ctx
                        .upload_rgba(fitted.as_raw(), width, height, "Base Image")?,
                ))
            }
            None => None,
        };
        Ok(())
    }

    /// Re-render the live preview of the stroke in progress, if any
    fn refresh_preview(&mut self) -> Result<()> {
        let Some(drawing) = self.lifecycle.active_drawing() else {
            return Ok(());
        };
        let preview = self.style.chain().transform(drawing.clone());
        self.show(&preview)
    }

    fn notify(&mut self) {
        if let Some(callback) = self.on_changed.as_mut() {
            callback();
        }
    }
}
