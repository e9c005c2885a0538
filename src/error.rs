//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, codec, HTTP and resize errors, and provides semantic
//! variants for catalog loading, argument validation and processing failures.
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image buffer error: {0}")]
    ImageBuffer(#[from] fast_image_resize::ImageBufferError),

    #[error("Resize error: {0}")]
    Resize(#[from] fast_image_resize::ResizeError),

    #[error("Worker pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Failed to load catalog {path}: {reason}")]
    Catalog { path: PathBuf, reason: String },

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Size must be greater than 0, got: {size}")]
    ZeroSize { size: usize },

    #[error("Processing error: {0}")]
    Processing(String),
}

impl Error {
    pub fn catalog<E: std::fmt::Display>(path: impl Into<PathBuf>, e: E) -> Self {
        Error::Catalog {
            path: path.into(),
            reason: e.to_string(),
        }
    }
}
