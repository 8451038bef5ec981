//! Error types for WAV reading and writing.

use std::io;

use thiserror::Error;

/// Result type for WAV operations.
pub type WavResult<T> = Result<T, WavError>;

/// Errors that can occur while reading or writing WAV and raw PCM streams.
#[derive(Debug, Error)]
pub enum WavError {
    /// Malformed, truncated or unsupported header.
    #[error("invalid WAV header: {message}")]
    Format {
        /// Error message.
        message: String,
    },

    /// Invalid argument passed to a constructor or operation.
    #[error("invalid argument '{name}': {message}")]
    InvalidArgument {
        /// Argument name.
        name: String,
        /// Error message.
        message: String,
    },

    /// I/O error from the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The conversion buffer could not grow.
    #[error("failed to allocate {requested} bytes of conversion buffer")]
    OutOfMemory {
        /// Requested size in bytes.
        requested: usize,
    },
}

impl WavError {
    /// Creates a format error.
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Maps an I/O error raised while decoding a header.
    ///
    /// Running out of bytes before the data chunk means the header is
    /// truncated, which is a format problem rather than a storage fault.
    pub(crate) fn from_header_io(err: io::Error, context: &str) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::format(format!("{}: unexpected end of stream", context))
        } else {
            Self::Io(err)
        }
    }

    /// Stable short code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            WavError::Format { .. } => "WAV_001",
            WavError::InvalidArgument { .. } => "WAV_002",
            WavError::Io(_) => "WAV_003",
            WavError::OutOfMemory { .. } => "WAV_004",
        }
    }

    /// Returns true for errors that leave the instance usable.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, WavError::InvalidArgument { .. })
    }
}
