//! Error types for GIF stream encoding.

use thiserror::Error;

/// Result type alias for encoding operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced while building a GIF89a stream.
#[derive(Debug, Error)]
pub enum Error {
    /// A frame was added or the stream finished before `start`.
    #[error("encoder not started: call start() first")]
    NotStarted,

    /// `start` was called twice without an intervening `finish`.
    #[error("encoder already started: finish() the current stream first")]
    AlreadyStarted,

    /// Frame dimensions outside what the format can express.
    #[error("invalid dimensions {width}x{height}: both sides must be in 1..=65535")]
    InvalidDimensions { width: u32, height: u32 },

    /// Frame buffer length does not match `width * height * 3`.
    #[error("frame buffer mismatch: expected {expected} bytes, got {actual}")]
    FrameSizeMismatch { expected: usize, actual: usize },

    /// Pixel buffer is empty or not a whole number of RGB triples.
    #[error("invalid pixel buffer length {len}: must be a positive multiple of 3")]
    InvalidPixelBuffer { len: usize },

    /// I/O error from the underlying sink.
    #[error("sink I/O error: {0}")]
    Sink(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid-dimensions error.
    pub fn invalid_dimensions(width: u32, height: u32) -> Self {
        Error::InvalidDimensions { width, height }
    }

    /// Create a frame-size mismatch error.
    pub fn frame_size_mismatch(expected: usize, actual: usize) -> Self {
        Error::FrameSizeMismatch { expected, actual }
    }

    /// Check whether the error poisons the stream.
    ///
    /// A sink failure leaves a partial byte sequence behind; the encoder
    /// refuses further writes until a fresh `start`. Validation errors
    /// reject the call but leave the stream intact.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Sink(_))
    }
}
