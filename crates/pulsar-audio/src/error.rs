//! Error types for the audio backend.

use thiserror::Error;

/// Result type for audio operations.
pub type AudioResult<T> = Result<T, AudioError>;

/// Errors that can occur during segment generation or WAV handling.
#[derive(Debug, Error)]
pub enum AudioError {
    /// A voice was constructed or triggered with a zero sample rate.
    #[error("invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The offending rate.
        rate: u32,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// The input is not a WAV file this engine can read.
    #[error("malformed WAV: {message}")]
    MalformedWav {
        /// What went wrong.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AudioError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a malformed-WAV error.
    pub fn malformed_wav(message: impl Into<String>) -> Self {
        Self::MalformedWav {
            message: message.into(),
        }
    }
}
