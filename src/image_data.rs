use miniz_oxide::{deflate::compress_to_vec_zlib, inflate::decompress_to_vec_zlib};

use crate::error::PngError;

pub const DEFAULT_COMPRESSION_LEVEL: u8 = 9;
const MAX_COMPRESSION_LEVEL: u8 = 10;

/// Wraps `data` in a zlib stream. Levels above 10 are clamped.
pub fn deflate(data: &[u8], level: u8) -> Vec<u8> {
    compress_to_vec_zlib(data, level.min(MAX_COMPRESSION_LEVEL))
}

/// Inflates a complete zlib stream, as found in the concatenated IDAT data.
pub fn inflate(compressed_data: &[u8]) -> Result<Vec<u8>, PngError> {
    decompress_to_vec_zlib(compressed_data)
        .map_err(|e| PngError::Decompression(format!("{:?}", e.status)))
}
