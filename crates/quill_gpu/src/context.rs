//! Shared wgpu device, queue and helpers
//!
//! All GPU work in the engine is synchronous: every submission waits for the
//! device to go idle, so a read-back right after `update` sees a complete
//! frame.

use std::sync::Arc;

use crate::config::GpuConfig;
use crate::error::{GpuError, Result};
use crate::texture::GpuTexture;

/// Device, queue and the few shared objects every renderer needs.
///
/// Cheap to clone; clones share the same device.
#[derive(Clone, Debug)]
pub struct GpuContext {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: GpuConfig,
    sampler: Arc<wgpu::Sampler>,
    blank: Arc<GpuTexture>,
}

impl GpuContext {
    /// Request an adapter and device for headless compositing
    pub async fn new(config: GpuConfig) -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: config.backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: config.power_preference,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::AdapterNotFound)?;

        let info = adapter.get_info();
        tracing::info!(
            "gpu adapter: {} ({:?}, {:?})",
            info.name,
            info.backend,
            info.device_type
        );

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Quill GPU Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: wgpu::MemoryHints::MemoryUsage,
                },
                None,
            )
            .await?;

        tracing::debug!(
            "gpu limits: max_texture_dimension_2d={}",
            device.limits().max_texture_dimension_2d
        );

        Self::from_device(device, queue, config)
    }

    /// Blocking wrapper around [`GpuContext::new`]
    pub fn new_blocking(config: GpuConfig) -> Result<Self> {
        pollster::block_on(Self::new(config))
    }

    /// Wrap an existing device (e.g. one shared with a presenter)
    pub fn from_device(device: wgpu::Device, queue: wgpu::Queue, config: GpuConfig) -> Result<Self> {
        device.on_uncaptured_error(Box::new(|err| {
            tracing::error!("uncaptured wgpu error: {}", err);
        }));

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Composite Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            // Targets are canvas sized, so texel centers map 1:1
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let blank = GpuTexture::from_rgba(
            &device,
            &queue,
            &[0, 0, 0, 0],
            1,
            1,
            config.texture_format,
            Some("Blank Texture"),
        )?;

        Ok(Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
            config,
            sampler: Arc::new(sampler),
            blank: Arc::new(blank),
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn config(&self) -> &GpuConfig {
        &self.config
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.texture_format
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    /// 1x1 transparent texture bound wherever an input is missing
    pub fn blank(&self) -> &Arc<GpuTexture> {
        &self.blank
    }

    /// View of `texture`, or of the blank texture when absent
    pub fn view_or_blank<'a>(&'a self, texture: Option<&'a Arc<GpuTexture>>) -> &'a wgpu::TextureView {
        texture.unwrap_or(&self.blank).view()
    }

    /// Run `f` inside validation and out-of-memory error scopes.
    ///
    /// Errors the device reports for work recorded in `f` come back as
    /// [`GpuError::Validation`] instead of reaching the uncaptured handler.
    pub fn scoped<T>(&self, label: &str, f: impl FnOnce() -> T) -> Result<T> {
        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let value = f();
        let validation = pollster::block_on(self.device.pop_error_scope());
        let oom = pollster::block_on(self.device.pop_error_scope());

        match validation.or(oom) {
            Some(err) => {
                tracing::warn!("{} failed: {}", label, err);
                Err(GpuError::Validation(format!("{}: {}", label, err)))
            }
            None => Ok(value),
        }
    }

    /// Submit the encoder and block until the device is idle
    pub fn submit_and_wait(&self, encoder: wgpu::CommandEncoder) {
        self.queue.submit(std::iter::once(encoder.finish()));
        self.device.poll(wgpu::Maintain::Wait);
    }

    /// Canvas-sized render target in the configured format
    pub fn create_target(&self, width: u32, height: u32, label: &str) -> Result<GpuTexture> {
        self.scoped(label, || {
            GpuTexture::target(&self.device, width, height, self.format(), Some(label))
        })?
    }

    /// Upload tightly packed premultiplied RGBA pixels
    pub fn upload_rgba(&self, pixels: &[u8], width: u32, height: u32, label: &str) -> Result<GpuTexture> {
        self.scoped(label, || {
            GpuTexture::from_rgba(
                &self.device,
                &self.queue,
                pixels,
                width,
                height,
                self.format(),
                Some(label),
            )
        })?
    }

    /// Blocking read-back of `texture` as tightly packed premultiplied RGBA
    pub fn read_rgba(&self, texture: &GpuTexture) -> Result<Vec<u8>> {
        texture.read_rgba(&self.device, &self.queue)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Helper to create a test context; `None` when no adapter is available
    pub(crate) fn create_test_context() -> Option<GpuContext> {
        let config = GpuConfig::default().with_backends(wgpu::Backends::all());
        GpuContext::new_blocking(config).ok()
    }

    #[test]
    fn upload_and_read_back() {
        let Some(ctx) = create_test_context() else {
            // Skip test if no GPU available
            return;
        };

        let pixels: Vec<u8> = (0..3 * 2 * 4).map(|i| (i * 10) as u8).collect();
        let texture = ctx.upload_rgba(&pixels, 3, 2, "test upload").unwrap();
        assert_eq!(texture.dimensions(), (3, 2));
        assert_eq!(ctx.read_rgba(&texture).unwrap(), pixels);
    }

    #[test]
    fn rejects_targets_over_the_device_limit() {
        let Some(ctx) = create_test_context() else {
            return;
        };
        let max = ctx.device().limits().max_texture_dimension_2d;
        let err = ctx.create_target(max + 1, 4, "too wide").unwrap_err();
        assert!(matches!(err, GpuError::TooLarge { width, height: 4, .. } if width == max + 1));
        assert_eq!(ctx.create_target(max, 1, "widest").unwrap().dimensions(), (max, 1));
    }

    #[test]
    fn rejects_mismatched_pixel_data() {
        let Some(ctx) = create_test_context() else {
            return;
        };
        let err = ctx.upload_rgba(&[0; 7], 2, 2, "bad upload").unwrap_err();
        assert!(matches!(err, GpuError::InvalidSize { len: 7, .. }));
    }
}
