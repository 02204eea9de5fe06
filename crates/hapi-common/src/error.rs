//! Error types for hapi-common.

use thiserror::Error;

/// Common error type for HAPI stream operations.
#[derive(Debug, Error)]
pub enum Error {
    /// End of data reached in the middle of a fixed-size value.
    #[error("unexpected end of data: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// Destination buffer cannot hold the requested number of bytes.
    #[error("buffer too small: needed {needed} bytes but only {available} available")]
    BufferTooSmall { needed: usize, available: usize },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
