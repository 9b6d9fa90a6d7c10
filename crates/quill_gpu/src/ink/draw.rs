use std::sync::Arc;

use crate::context::GpuContext;
use crate::error::Result;
use crate::pipeline::CompositePipeline;
use crate::shaders::DRAW_SHADER;
use crate::texture::GpuTexture;

use super::InkTarget;

/// Paints the tinted mask over the image
#[derive(Debug)]
pub struct DrawInk {
    ctx: GpuContext,
    pipeline: CompositePipeline,
    target: InkTarget,
}

impl DrawInk {
    pub fn new(ctx: &GpuContext, size: (u32, u32)) -> Result<Self> {
        Ok(Self {
            ctx: ctx.clone(),
            pipeline: CompositePipeline::new(ctx, "Draw Ink", DRAW_SHADER, "fs_draw")?,
            target: InkTarget::new(ctx, size, "Draw Ink Target")?,
        })
    }

    pub fn set_image(&mut self, image: Option<Arc<GpuTexture>>) {
        self.target.image = image;
    }

    pub fn set_mask(&mut self, mask: Option<Arc<GpuTexture>>) {
        self.target.mask = mask;
    }

    pub fn update(&mut self) -> Result<()> {
        let t = &self.target;
        self.pipeline.run(
            &self.ctx,
            &t.target,
            [t.image.as_ref(), t.mask.as_ref(), None],
        )?;
        self.target.updated = true;
        Ok(())
    }

    pub fn texture(&self) -> Option<&Arc<GpuTexture>> {
        self.target.texture()
    }
}
