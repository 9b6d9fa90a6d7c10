//! GPU error types

use thiserror::Error;

/// Errors raised while creating or driving GPU resources
#[derive(Error, Debug)]
pub enum GpuError {
    /// No adapter matched the requested backends
    #[error("No suitable GPU adapter found")]
    AdapterNotFound,

    /// Failed to request GPU device
    #[error("Failed to request GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    /// A wgpu error scope captured a validation or out-of-memory error
    #[error("GPU validation failed: {0}")]
    Validation(String),

    /// Mapping or copying a texture back to the CPU failed
    #[error("GPU read-back failed: {0}")]
    ReadbackFailed(String),

    /// Pixel data does not match the requested dimensions
    #[error("Invalid texture size {width}x{height} for {len} bytes")]
    InvalidSize { width: u32, height: u32, len: usize },

    /// Requested texture exceeds the device's `max_texture_dimension_2d`
    #[error("Texture size {width}x{height} exceeds the device limit of {max}")]
    TooLarge { width: u32, height: u32, max: u32 },
}

/// Result type for GPU operations
pub type Result<T> = std::result::Result<T, GpuError>;
