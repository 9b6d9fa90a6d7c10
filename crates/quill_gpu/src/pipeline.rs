//! Full-target composite pipelines
//!
//! A [`CompositePipeline`] binds a sampler and three input textures and
//! writes its fragment output straight into an offscreen target (no
//! blending).

use std::sync::Arc;

use crate::context::GpuContext;
use crate::error::Result;
use crate::offscreen::OffscreenTarget;
use crate::texture::GpuTexture;

pub(crate) fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

pub(crate) fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

/// Build a fullscreen render pipeline for `source` with the given layout
pub(crate) fn fullscreen_pipeline(
    ctx: &GpuContext,
    label: &str,
    source: &str,
    fragment_entry: &str,
    bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let device = ctx.device();
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    // Composites replace the target outright
    let targets = &[Some(wgpu::ColorTargetState {
        format: ctx.format(),
        blend: None,
        write_mask: wgpu::ColorWrites::ALL,
    })];

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some(fragment_entry),
            targets,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

/// Pipeline compositing up to three textures into an offscreen target
#[derive(Debug)]
pub struct CompositePipeline {
    label: String,
    layout: wgpu::BindGroupLayout,
    pipeline: wgpu::RenderPipeline,
}

impl CompositePipeline {
    pub fn new(ctx: &GpuContext, label: &str, source: &str, fragment_entry: &str) -> Result<Self> {
        ctx.scoped(label, || {
            let layout = ctx
                .device()
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some(label),
                    entries: &[
                        sampler_entry(0),
                        texture_entry(1),
                        texture_entry(2),
                        texture_entry(3),
                    ],
                });
            let pipeline = fullscreen_pipeline(ctx, label, source, fragment_entry, &layout);
            Self {
                label: label.to_string(),
                layout,
                pipeline,
            }
        })
    }

    /// Encode, submit and wait for one composite of `inputs` into `target`.
    /// Missing inputs sample as transparent black.
    pub fn run(
        &self,
        ctx: &GpuContext,
        target: &OffscreenTarget,
        inputs: [Option<&Arc<GpuTexture>>; 3],
    ) -> Result<()> {
        ctx.scoped(&self.label, || {
            let bind_group = ctx.device().create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&self.label),
                layout: &self.layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::Sampler(ctx.sampler()),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(ctx.view_or_blank(inputs[0])),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(ctx.view_or_blank(inputs[1])),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::TextureView(ctx.view_or_blank(inputs[2])),
                    },
                ],
            });

            let mut encoder = ctx
                .device()
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some(&self.label),
                });
            {
                let mut pass = target.begin_pass(&mut encoder);
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &bind_group, &[]);
                pass.draw(0..6, 0..1);
            }
            ctx.submit_and_wait(encoder);
        })
    }
}
