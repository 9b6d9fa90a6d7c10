use std::sync::Arc;

use crate::context::GpuContext;
use crate::error::Result;
use crate::pipeline::CompositePipeline;
use crate::shaders::ERASE_SHADER;
use crate::texture::GpuTexture;

use super::InkTarget;

/// Reveals the clear reference (the base image, or transparency) under the
/// mask
#[derive(Debug)]
pub struct EraseInk {
    ctx: GpuContext,
    pipeline: CompositePipeline,
    target: InkTarget,
    clear_reference: Option<Arc<GpuTexture>>,
}

impl EraseInk {
    pub fn new(
        ctx: &GpuContext,
        size: (u32, u32),
        clear_reference: Option<Arc<GpuTexture>>,
    ) -> Result<Self> {
        Ok(Self {
            ctx: ctx.clone(),
            pipeline: CompositePipeline::new(ctx, "Erase Ink", ERASE_SHADER, "fs_erase")?,
            target: InkTarget::new(ctx, size, "Erase Ink Target")?,
            clear_reference,
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
            [t.image.as_ref(), self.clear_reference.as_ref(), t.mask.as_ref()],
        )?;
        self.target.updated = true;
        Ok(())
    }

    pub fn texture(&self) -> Option<&Arc<GpuTexture>> {
        self.target.texture()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::create_test_context;
    use crate::ink::test_util::{pixel, solid};

    #[test]
    fn reveals_reference_under_mask() {
        let Some(ctx) = create_test_context() else {
            return;
        };
        let base = solid(&ctx, 2, 2, [0, 0, 255, 255]);
        let painted = solid(&ctx, 2, 2, [255, 0, 0, 255]);
        let mask = solid(&ctx, 2, 2, [0, 0, 0, 255]);

        let mut ink = EraseInk::new(&ctx, (2, 2), Some(base)).unwrap();
        ink.set_image(Some(painted));
        ink.set_mask(Some(mask));
        ink.update().unwrap();
        assert_eq!(pixel(&ctx, ink.texture().unwrap(), 1, 1), [0, 0, 255, 255]);
    }

    #[test]
    fn without_reference_erases_to_transparent() {
        let Some(ctx) = create_test_context() else {
            return;
        };
        let painted = solid(&ctx, 2, 2, [255, 0, 0, 255]);
        let mask = solid(&ctx, 2, 2, [0, 0, 0, 255]);

        let mut ink = EraseInk::new(&ctx, (2, 2), None).unwrap();
        ink.set_image(Some(painted));
        ink.set_mask(Some(mask));
        ink.update().unwrap();
        assert_eq!(pixel(&ctx, ink.texture().unwrap(), 0, 0), [0, 0, 0, 0]);
    }
}
