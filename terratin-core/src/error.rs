//! Error types for terratin

use thiserror::Error;

/// Main error type for terratin operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Coordinate ({x}, {y}) is outside the {width}x{height} raster extent")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("Degenerate geometry: {0}")]
    Geometry(String),

    #[error("No containing triangle: {0}")]
    TriangleNotFound(String),

    #[error("Conversion was cancelled")]
    Cancelled,
}

/// Result type alias for terratin operations
pub type Result<T> = std::result::Result<T, Error>;
