//! Error types for the tongue tracking library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Encoding or writing an image failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Depth buffer does not match the declared frame dimensions
    #[error("Frame size mismatch: expected {expected} samples, got {actual}")]
    FrameSizeMismatch {
        /// Number of samples implied by width x height
        expected: usize,
        /// Number of samples actually supplied
        actual: usize,
    },

    /// Frame dimensions differ from the ones the tracker was built for
    #[error("Frame dimensions {width}x{height} do not match sensor {sensor_width}x{sensor_height}")]
    FrameDimensions {
        /// Incoming frame width
        width: usize,
        /// Incoming frame height
        height: usize,
        /// Configured sensor width
        sensor_width: usize,
        /// Configured sensor height
        sensor_height: usize,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic I/O error with description
    #[error("I/O error: {0}")]
    IoError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
