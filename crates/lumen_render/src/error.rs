//! Error types for scene configuration and rendering.

use thiserror::Error;

/// Scene construction errors. These fail fast, before any render starts.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("unknown accelerator '{0}', only [bvh] is supported")]
    UnknownAccelerator(String),
}

/// Render-time errors.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A worker thread panicked. The render is abandoned rather than
    /// emitting an image with undefined pixels.
    #[error("render worker {0} panicked")]
    WorkerPanicked(usize),

    #[error("failed to write image")]
    ImageWrite(#[from] image::ImageError),
}
