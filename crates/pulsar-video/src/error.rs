//! Error types for the video backend.

use thiserror::Error;

/// Result type for rendering operations.
pub type VideoResult<T> = Result<T, VideoError>;

/// Errors that can occur while preparing or emitting frames.
#[derive(Debug, Error)]
pub enum VideoError {
    /// A `--range` begins at or past the end of the stream.
    #[error("frame range starts at {start} but the stream has only {total} frames")]
    RangeOutOfBounds {
        /// Requested start frame.
        start: u64,
        /// Total frames available.
        total: u64,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// The audio backend failed (timeline parse, WAV decode).
    #[error(transparent)]
    Audio(#[from] pulsar_audio::AudioError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VideoError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }
}
