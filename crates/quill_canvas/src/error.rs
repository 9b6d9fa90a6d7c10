//! Canvas error types

use quill_gpu::GpuError;
use thiserror::Error;

/// Canvas engine errors
#[derive(Error, Debug)]
pub enum CanvasError {
    /// The ink renderer (or a texture it needs) could not be created or run
    #[error("Ink renderer unavailable: {0}")]
    InkUnavailable(#[from] GpuError),

    /// Reading the composited image back from the GPU failed
    #[error("Image read-back failed: {0}")]
    Readback(GpuError),

    /// No composite has been produced yet
    #[error("No output image available")]
    NoOutput,
}

/// Result type for canvas operations
pub type Result<T> = std::result::Result<T, CanvasError>;
