use std::sync::Arc;

use wgpu::util::DeviceExt;

use crate::context::GpuContext;
use crate::error::Result;
use crate::offscreen::OffscreenTarget;
use crate::pipeline::{fullscreen_pipeline, sampler_entry, texture_entry, CompositePipeline};
use crate::shaders::{BLUR_MIX_SHADER, GAUSSIAN_BLUR_SHADER};
use crate::texture::GpuTexture;

use super::InkTarget;

/// Widest kernel half-width the blur shader will loop over
pub const MAX_BLUR_RADIUS: u32 = 64;

/// Uniforms for one direction of the separable Gaussian
///
/// Memory layout (16 bytes):
/// - direction: `vec2<f32>` - (1, 0) horizontal or (0, 1) vertical
/// - sigma: `f32` - standard deviation in texels
/// - radius: `u32` - kernel half-width in texels
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlurUniforms {
    pub direction: [f32; 2],
    pub sigma: f32,
    pub radius: u32,
}

impl BlurUniforms {
    pub fn new(direction: [f32; 2], sigma: f32) -> Self {
        Self {
            direction,
            sigma,
            radius: kernel_radius(sigma),
        }
    }
}

/// Half-width covering three standard deviations, capped at
/// [`MAX_BLUR_RADIUS`]. Non-positive sigma means no blur.
pub fn kernel_radius(sigma: f32) -> u32 {
    if sigma.is_nan() || sigma <= 0.0 {
        return 0;
    }
    ((sigma * 3.0).ceil() as u32).min(MAX_BLUR_RADIUS)
}

/// Two-pass Gaussian blur into a canvas-sized target
#[derive(Debug)]
pub struct GaussianBlur {
    layout: wgpu::BindGroupLayout,
    pipeline: wgpu::RenderPipeline,
    horizontal: wgpu::Buffer,
    vertical: wgpu::Buffer,
    scratch: OffscreenTarget,
    output: OffscreenTarget,
}

impl GaussianBlur {
    pub fn new(ctx: &GpuContext, size: (u32, u32), sigma: f32) -> Result<Self> {
        let scratch = OffscreenTarget::new(ctx, size.0, size.1, "Gaussian Blur Scratch")?;
        let output = OffscreenTarget::new(ctx, size.0, size.1, "Gaussian Blur Output")?;

        ctx.scoped("Gaussian Blur", || {
            let device = ctx.device();
            let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Gaussian Blur Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    texture_entry(1),
                    sampler_entry(2),
                ],
            });
            let pipeline =
                fullscreen_pipeline(ctx, "Gaussian Blur", GAUSSIAN_BLUR_SHADER, "fs_gaussian", &layout);

            let uniforms = |label: &str, direction: [f32; 2]| {
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(label),
                    contents: bytemuck::bytes_of(&BlurUniforms::new(direction, sigma)),
                    usage: wgpu::BufferUsages::UNIFORM,
                })
            };
            let horizontal = uniforms("Gaussian Blur Horizontal", [1.0, 0.0]);
            let vertical = uniforms("Gaussian Blur Vertical", [0.0, 1.0]);

            Self {
                layout,
                pipeline,
                horizontal,
                vertical,
                scratch,
                output,
            }
        })
    }

    fn bind_group(
        &self,
        ctx: &GpuContext,
        uniforms: &wgpu::Buffer,
        input: &wgpu::TextureView,
    ) -> wgpu::BindGroup {
        ctx.device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Gaussian Blur Bind Group"),
            layout: &self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniforms.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(input),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(ctx.sampler()),
                },
            ],
        })
    }

    /// Blur `input` into [`GaussianBlur::output`]: horizontal into scratch,
    /// then vertical into the output, in one submission.
    pub fn apply(&self, ctx: &GpuContext, input: &GpuTexture) -> Result<()> {
        ctx.scoped("Gaussian Blur", || {
            let first = self.bind_group(ctx, &self.horizontal, input.view());
            let second = self.bind_group(ctx, &self.vertical, self.scratch.texture().view());

            let mut encoder = ctx
                .device()
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Gaussian Blur Encoder"),
                });
            for (target, bind_group) in [(&self.scratch, &first), (&self.output, &second)] {
                let mut pass = target.begin_pass(&mut encoder);
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, bind_group, &[]);
                pass.draw(0..6, 0..1);
            }
            ctx.submit_and_wait(encoder);
        })
    }

    pub fn output(&self) -> &Arc<GpuTexture> {
        self.output.texture()
    }
}

/// Mixes the image with a blurred copy of itself under the mask
#[derive(Debug)]
pub struct BlurInk {
    ctx: GpuContext,
    pipeline: CompositePipeline,
    blur: GaussianBlur,
    has_blurred: bool,
    target: InkTarget,
}

impl BlurInk {
    pub fn new(ctx: &GpuContext, size: (u32, u32), sigma: f32) -> Result<Self> {
        Ok(Self {
            ctx: ctx.clone(),
            pipeline: CompositePipeline::new(ctx, "Blur Ink", BLUR_MIX_SHADER, "fs_blur_mix")?,
            blur: GaussianBlur::new(ctx, size, sigma)?,
            has_blurred: false,
            target: InkTarget::new(ctx, size, "Blur Ink Target")?,
        })
    }

    /// Replace the image and recompute its blurred copy
    pub fn set_image(&mut self, image: Option<Arc<GpuTexture>>) -> Result<()> {
        self.has_blurred = false;
        if let Some(image) = &image {
            self.blur.apply(&self.ctx, image)?;
            self.has_blurred = true;
        }
        self.target.image = image;
        Ok(())
    }

    pub fn set_mask(&mut self, mask: Option<Arc<GpuTexture>>) {
        self.target.mask = mask;
    }

    pub fn update(&mut self) -> Result<()> {
        let t = &self.target;
        let blurred = self.has_blurred.then(|| self.blur.output());
        self.pipeline.run(
            &self.ctx,
            &t.target,
            [t.image.as_ref(), blurred, t.mask.as_ref()],
        )?;
        self.target.updated = true;
        Ok(())
    }

    pub fn texture(&self) -> Option<&Arc<GpuTexture>> {
        self.target.texture()
    }
}
