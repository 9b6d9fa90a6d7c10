//! Engine configuration
//!
//! Environment overrides:
//! - everything [`GpuConfig::from_env`] reads
//! - `QUILL_BLUR_SIGMA=<f32>` standard deviation of the blur ink

use quill_gpu::GpuConfig;

/// Default standard deviation of the blur ink, in canvas pixels
pub const DEFAULT_BLUR_SIGMA: f32 = 12.0;

#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub gpu: GpuConfig,
    pub blur_sigma: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gpu: GpuConfig::default(),
            blur_sigma: DEFAULT_BLUR_SIGMA,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let mut config = Self {
            gpu: GpuConfig::from_env(),
            ..Self::default()
        };
        if let Ok(value) = std::env::var("QUILL_BLUR_SIGMA") {
            match parse_sigma(&value) {
                Some(sigma) => {
                    tracing::info!("blur sigma override: {}", sigma);
                    config.blur_sigma = sigma;
                }
                None => tracing::warn!("ignoring invalid QUILL_BLUR_SIGMA '{}'", value),
            }
        }
        config
    }

    pub fn with_gpu(mut self, gpu: GpuConfig) -> Self {
        self.gpu = gpu;
        self
    }
}

/// Finite, non-negative sigma
fn parse_sigma(value: &str) -> Option<f32> {
    value
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|s| s.is_finite() && *s >= 0.0)
}
