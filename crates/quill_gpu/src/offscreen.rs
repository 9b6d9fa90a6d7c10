//! Offscreen render targets
//!
//! Each ink renderer composites into its own canvas-sized target instead of
//! a surface. The target texture is published as an `Arc` so the next
//! renderer can take it over as its input image without a copy.

use std::sync::Arc;

use crate::context::GpuContext;
use crate::error::Result;
use crate::texture::GpuTexture;

/// A single canvas-sized color target
#[derive(Debug)]
pub struct OffscreenTarget {
    texture: Arc<GpuTexture>,
    label: String,
}

impl OffscreenTarget {
    pub fn new(ctx: &GpuContext, width: u32, height: u32, label: &str) -> Result<Self> {
        let texture = ctx.create_target(width, height, label)?;
        Ok(Self {
            texture: Arc::new(texture),
            label: label.to_string(),
        })
    }

    /// Begin a pass that clears the target to transparent and draws over it
    pub fn begin_pass<'e>(&self, encoder: &'e mut wgpu::CommandEncoder) -> wgpu::RenderPass<'e> {
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(&self.label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.texture.view(),
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        })
    }

    pub fn texture(&self) -> &Arc<GpuTexture> {
        &self.texture
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.texture.dimensions()
    }
}
