//! Error taxonomy of a single conversion.

use thiserror::Error;

use crate::audio::BufferError;
use crate::decode::DecodeError;

/// Why a conversion produced no output.
///
/// Every variant is terminal for the conversion it came from; nothing is
/// retried and no partial output is returned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConversionError {
    /// The declared media type is not one the decoder accepts.  Raised
    /// before any decode attempt.
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// The decoder rejected or could not parse the input bytes.
    #[error("failed to decode audio: {0}")]
    DecodeFailed(String),

    /// Filtering, resampling or quantization could not complete.
    #[error("failed to render audio: {0}")]
    RenderFailed(String),

    /// The audio contains no frames.
    #[error("audio contains no samples")]
    EmptyInput,
}

impl From<DecodeError> for ConversionError {
    fn from(e: DecodeError) -> Self {
        ConversionError::DecodeFailed(e.to_string())
    }
}

impl From<BufferError> for ConversionError {
    fn from(e: BufferError) -> Self {
        ConversionError::RenderFailed(e.to_string())
    }
}
