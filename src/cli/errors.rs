use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Worker count must be greater than 0, got: {workers}")]
    ZeroWorkers { workers: usize },

    #[error("Size must be greater than 0, got: {size}")]
    ZeroSize { size: usize },

    #[error("Invalid delay range: min {min}s, max {max}s")]
    InvalidDelay { min: f64, max: f64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Library(#[from] faceprep::Error),
}
