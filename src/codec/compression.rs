//! Compression layer for the structured format
//!
//! Each compressed format wraps the bincode payload in a different
//! container; nothing else about the document changes.

use std::io::{Cursor, Read, Write};

use bzip2::read::BzDecoder;
use bzip2::write::BzEncoder;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::errors::{CodecError, CodecResult};
use super::Format;

/// Name of the single entry inside zip containers
const ZIP_ENTRY: &str = "data";

pub(super) fn compress(data: &[u8], format: Format) -> CodecResult<Vec<u8>> {
    let io_err = |source| CodecError::Io { format, source };

    match format {
        Format::Gzip => {
            let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(data).map_err(io_err)?;
            encoder.finish().map_err(io_err)
        }
        Format::Bzip2 => {
            let mut encoder = BzEncoder::new(Vec::new(), bzip2::Compression::default());
            encoder.write_all(data).map_err(io_err)?;
            encoder.finish().map_err(io_err)
        }
        Format::Lzma => {
            let mut input = data;
            let mut out = Vec::new();
            lzma_rs::xz_compress(&mut input, &mut out).map_err(io_err)?;
            Ok(out)
        }
        Format::Zip => {
            let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
            writer
                .start_file(ZIP_ENTRY, options)
                .map_err(|e| CodecError::encode(format, e))?;
            writer.write_all(data).map_err(io_err)?;
            let cursor = writer.finish().map_err(|e| CodecError::encode(format, e))?;
            Ok(cursor.into_inner())
        }
        Format::Lz4 => Ok(lz4_flex::compress_prepend_size(data)),
        other => Ok(passthrough(data, other)),
    }
}

pub(super) fn decompress(data: &[u8], format: Format) -> CodecResult<Vec<u8>> {
    let mut out = Vec::new();
    match format {
        Format::Gzip => {
            GzDecoder::new(data)
                .read_to_end(&mut out)
                .map_err(|e| CodecError::decode(format, e))?;
        }
        Format::Bzip2 => {
            BzDecoder::new(data)
                .read_to_end(&mut out)
                .map_err(|e| CodecError::decode(format, e))?;
        }
        Format::Lzma => {
            let mut input = data;
            lzma_rs::xz_decompress(&mut input, &mut out)
                .map_err(|e| CodecError::decode(format, e))?;
        }
        Format::Zip => {
            let mut archive =
                ZipArchive::new(Cursor::new(data)).map_err(|e| CodecError::decode(format, e))?;
            let mut entry = archive
                .by_name(ZIP_ENTRY)
                .map_err(|e| CodecError::decode(format, e))?;
            entry
                .read_to_end(&mut out)
                .map_err(|e| CodecError::decode(format, e))?;
        }
        Format::Lz4 => {
            out = lz4_flex::decompress_size_prepended(data)
                .map_err(|e| CodecError::decode(format, e))?;
        }
        other => out = passthrough(data, other),
    }
    Ok(out)
}

fn passthrough(data: &[u8], format: Format) -> Vec<u8> {
    debug_assert!(!format.is_compressed());
    data.to_vec()
}
