//! # Codec Errors
//!
//! Decoding failures are kept apart from I/O failures: bytes that do not
//! match the declared format raise [`CodecError::Decode`].

use std::io;

use thiserror::Error;

use super::Format;

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors produced while encoding or decoding a document
#[derive(Debug, Error)]
pub enum CodecError {
    /// Bytes do not match the declared format
    #[error("cannot decode {format} data: {reason}")]
    Decode { format: Format, reason: String },

    /// Document holds a value the format cannot represent
    #[error("cannot encode document as {format}: {reason}")]
    Encode { format: Format, reason: String },

    /// Compression stream failure
    #[error("{format} stream error: {source}")]
    Io {
        format: Format,
        #[source]
        source: io::Error,
    },

    /// Unknown format name
    #[error("unknown format '{0}'")]
    UnknownFormat(String),
}

impl CodecError {
    pub(crate) fn decode(format: Format, reason: impl ToString) -> Self {
        CodecError::Decode {
            format,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn encode(format: Format, reason: impl ToString) -> Self {
        CodecError::Encode {
            format,
            reason: reason.to_string(),
        }
    }

    /// Returns true if the error means the input bytes were not valid
    pub fn is_decode(&self) -> bool {
        matches!(self, CodecError::Decode { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let err = CodecError::decode(Format::Json, "expected value");
        assert!(err.is_decode());
        assert_eq!(err.to_string(), "cannot decode json data: expected value");
    }

    #[test]
    fn test_encode_error_is_not_decode() {
        let err = CodecError::encode(Format::Json, "link values have no JSON form");
        assert!(!err.is_decode());
    }
}
