//! Codec registry for leafdb
//!
//! Maps file extensions to a closed set of on-disk formats and turns a
//! document into bytes and back.
//!
//! | Format       | Extensions         | Encoding                          |
//! |--------------|--------------------|-----------------------------------|
//! | `text`       | txt                | literal syntax                    |
//! | `structured` | pyn, pyndb, leaf   | bincode (default)                 |
//! | `json`       | json               | sorted, indented JSON             |
//! | `gzip`       | gz, gzip           | structured + gzip                 |
//! | `bzip2`      | bz, bz2            | structured + bzip2                |
//! | `lzma`       | lzma, xz           | structured + xz                   |
//! | `zip`        | zip                | structured in a zip archive       |
//! | `lz4`        | lz4                | structured + lz4 block            |
//!
//! The compressed variants share the structured object model; compression
//! is layered after serialization.

mod compression;
mod errors;
mod json;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::value::{parse_literal, to_literal, Value};

pub use errors::{CodecError, CodecResult};

/// On-disk encoding of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Text,
    #[default]
    Structured,
    Json,
    Gzip,
    Bzip2,
    Lzma,
    Zip,
    Lz4,
}

/// Extension lookup table
const EXTENSIONS: &[(&str, Format)] = &[
    ("txt", Format::Text),
    ("pyn", Format::Structured),
    ("pyndb", Format::Structured),
    ("leaf", Format::Structured),
    ("json", Format::Json),
    ("gz", Format::Gzip),
    ("gzip", Format::Gzip),
    ("bz", Format::Bzip2),
    ("bz2", Format::Bzip2),
    ("lzma", Format::Lzma),
    ("xz", Format::Lzma),
    ("zip", Format::Zip),
    ("lz4", Format::Lz4),
];

impl Format {
    /// Every supported format
    pub const ALL: [Format; 8] = [
        Format::Text,
        Format::Structured,
        Format::Json,
        Format::Gzip,
        Format::Bzip2,
        Format::Lzma,
        Format::Zip,
        Format::Lz4,
    ];

    /// Lowercase name, also used in config files
    pub fn name(&self) -> &'static str {
        match self {
            Format::Text => "text",
            Format::Structured => "structured",
            Format::Json => "json",
            Format::Gzip => "gzip",
            Format::Bzip2 => "bzip2",
            Format::Lzma => "lzma",
            Format::Zip => "zip",
            Format::Lz4 => "lz4",
        }
    }

    /// Looks up a file extension (without the dot)
    pub fn from_extension(ext: &str) -> Option<Format> {
        EXTENSIONS
            .iter()
            .find(|(known, _)| *known == ext)
            .map(|(_, format)| *format)
    }

    /// Extensions registered for this format, preferred first
    pub fn extensions(&self) -> Vec<&'static str> {
        EXTENSIONS
            .iter()
            .filter(|(_, format)| format == self)
            .map(|(ext, _)| *ext)
            .collect()
    }

    /// Returns true if the encoded form is not human-readable text
    pub fn is_binary(&self) -> bool {
        !matches!(self, Format::Text | Format::Json)
    }

    /// Returns true for the compressed variants of the structured format
    pub fn is_compressed(&self) -> bool {
        matches!(
            self,
            Format::Gzip | Format::Bzip2 | Format::Lzma | Format::Zip | Format::Lz4
        )
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Format::ALL
            .iter()
            .copied()
            .find(|format| format.name() == lower)
            .or_else(|| Format::from_extension(&lower))
            .ok_or_else(|| CodecError::UnknownFormat(s.to_string()))
    }
}

/// Infers the format from the text after the last `.` of a file name.
///
/// Unknown or missing extensions fall back to [`Format::Structured`].
pub fn infer_format(path: impl AsRef<Path>) -> Format {
    path.as_ref()
        .to_str()
        .and_then(|name| name.rsplit_once('.'))
        .and_then(|(_, ext)| Format::from_extension(ext))
        .unwrap_or_default()
}

/// Serializes a document
pub fn encode(value: &Value, format: Format) -> CodecResult<Vec<u8>> {
    match format {
        Format::Text => Ok(to_literal(value).into_bytes()),
        Format::Json => json::encode(value),
        Format::Structured => encode_structured(value, format),
        compressed => {
            let raw = encode_structured(value, compressed)?;
            compression::compress(&raw, compressed)
        }
    }
}

/// Deserializes a document
pub fn decode(data: &[u8], format: Format) -> CodecResult<Value> {
    match format {
        Format::Text => {
            let text = std::str::from_utf8(data).map_err(|e| CodecError::decode(format, e))?;
            parse_literal(text).map_err(|e| CodecError::decode(format, e))
        }
        Format::Json => json::decode(data),
        Format::Structured => decode_structured(data, format),
        compressed => {
            let raw = compression::decompress(data, compressed)?;
            decode_structured(&raw, compressed)
        }
    }
}

/// Encoded empty mapping used to pre-populate new files
pub fn empty_document(format: Format) -> CodecResult<Vec<u8>> {
    encode(&Value::empty(), format)
}

fn encode_structured(value: &Value, format: Format) -> CodecResult<Vec<u8>> {
    bincode::serialize(value).map_err(|e| CodecError::encode(format, e))
}

fn decode_structured(data: &[u8], format: Format) -> CodecResult<Value> {
    bincode::deserialize(data).map_err(|e| CodecError::decode(format, e))
}
