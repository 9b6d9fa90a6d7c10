//! GPU context configuration
//!
//! Defaults pick the primary backend for the platform. A few settings can be
//! overridden from the environment at startup:
//!
//! - `QUILL_GPU_BACKENDS=vulkan,gl` (`vulkan|metal|dx12|gl|all`)
//! - `QUILL_GPU_POWER=low|high`

/// Configuration for creating a [`GpuContext`](crate::GpuContext)
#[derive(Clone, Debug)]
pub struct GpuConfig {
    /// Backends the instance may pick an adapter from
    pub backends: wgpu::Backends,
    /// Adapter power preference
    pub power_preference: wgpu::PowerPreference,
    /// Format of every offscreen target and uploaded image.
    ///
    /// Only `Rgba8Unorm` and `Bgra8Unorm` are supported; contents are always
    /// premultiplied alpha.
    pub texture_format: wgpu::TextureFormat,
}

impl Default for GpuConfig {
    fn default() -> Self {
        Self {
            backends: preferred_backends(),
            power_preference: wgpu::PowerPreference::LowPower,
            texture_format: wgpu::TextureFormat::Rgba8Unorm,
        }
    }
}

impl GpuConfig {
    /// Default configuration with environment overrides applied
    pub fn from_env() -> Self {
        apply_gpu_config_overrides(Self::default())
    }

    pub fn with_backends(mut self, backends: wgpu::Backends) -> Self {
        self.backends = backends;
        self
    }
}

/// Get the preferred backend for the current platform
///
/// Using the primary backend instead of all backends avoids initializing
/// multiple GPU driver stacks.
pub fn preferred_backends() -> wgpu::Backends {
    #[cfg(target_os = "macos")]
    {
        wgpu::Backends::METAL
    }
    #[cfg(target_os = "windows")]
    {
        wgpu::Backends::DX12
    }
    #[cfg(target_os = "linux")]
    {
        wgpu::Backends::VULKAN
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
    {
        wgpu::Backends::PRIMARY
    }
}

/// Parse a comma separated backend list; unknown names are ignored
pub fn parse_backends(list: &str) -> Option<wgpu::Backends> {
    let mut backends = wgpu::Backends::empty();
    for name in list.split(',').map(|s| s.trim().to_ascii_lowercase()) {
        backends |= match name.as_str() {
            "vulkan" | "vk" => wgpu::Backends::VULKAN,
            "metal" | "mtl" => wgpu::Backends::METAL,
            "dx12" | "d3d12" => wgpu::Backends::DX12,
            "gl" | "gles" | "opengl" => wgpu::Backends::GL,
            "all" => wgpu::Backends::all(),
            "" => continue,
            other => {
                tracing::warn!("ignoring unknown backend '{}'", other);
                continue;
            }
        };
    }
    (!backends.is_empty()).then_some(backends)
}

fn apply_gpu_config_overrides(mut config: GpuConfig) -> GpuConfig {
    if let Ok(list) = std::env::var("QUILL_GPU_BACKENDS") {
        if let Some(backends) = parse_backends(&list) {
            tracing::info!("gpu backends override: {:?}", backends);
            config.backends = backends;
        }
    }
    match std::env::var("QUILL_GPU_POWER").ok().as_deref().map(str::trim) {
        Some("high") => config.power_preference = wgpu::PowerPreference::HighPerformance,
        Some("low") => config.power_preference = wgpu::PowerPreference::LowPower,
        Some(other) => tracing::warn!("ignoring unknown power preference '{}'", other),
        None => {}
    }
    config
}
