use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    ImageProcessing(#[from] image::ImageError),

    #[error("PNG optimization error: {0}")]
    PngOptimization(String),

    #[error("WebP encoding error: {0}")]
    WebPEncoding(String),

    #[error("Original directory not found: {0}")]
    RootNotFound(PathBuf),

    #[error("Path {0} is not inside the originals directory")]
    OutsideRoot(PathBuf),

    #[error("Failed to create output directory: {0}")]
    DirectoryCreationFailed(PathBuf),

    #[error("Walkdir error: {0}")]
    WalkdirError(#[from] walkdir::Error),

    #[error("Invalid concurrency: {0}. Must be at least 1")]
    InvalidConcurrency(usize),

    #[error("Concurrency limiter is closed")]
    LimiterClosed,

    #[error("Worker task failed: {0}")]
    TaskFailed(String),
}

impl From<tokio::task::JoinError> for CompressionError {
    fn from(err: tokio::task::JoinError) -> Self {
        CompressionError::TaskFailed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CompressionError>;
