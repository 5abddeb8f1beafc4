use std::fmt::Display;

use crate::chunks::{ihdr::ImageProfile, ChunkType, CHUNK_OVERHEAD};

/// Everything that can go wrong between reading the bytes of a PNG and
/// writing a channel back out.
#[derive(Debug)]
pub enum PngError {
    InvalidSignature,
    StreamTruncated {
        chunk_offset: usize,
        /// `None` when the input ends inside the length field.
        declared: Option<u32>,
        /// Bytes left in the input from `chunk_offset` on.
        available: usize,
    },
    CorruptedChunk {
        chunk_type: ChunkType,
        expected: u32,
        actual: u32,
    },
    MalformedHeader(&'static str),
    UnsupportedFormat(ImageProfile),
    UnknownFilterType {
        row: usize,
        filter: u8,
    },
    MissingImageData,
    TruncatedImageData {
        expected: usize,
        actual: usize,
    },
    Decompression(String),
    Io(std::io::Error),
}

impl Display for PngError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSignature => write!(f, "Input doesn't start with the PNG signature"),
            Self::StreamTruncated {
                chunk_offset,
                declared: Some(declared),
                available,
            } => write!(
                f,
                "Chunk at offset {} needs {} bytes for its {} data bytes but only {} bytes remain",
                chunk_offset,
                *declared as usize + CHUNK_OVERHEAD,
                declared,
                available
            ),
            Self::StreamTruncated {
                chunk_offset,
                declared: None,
                available,
            } => write!(
                f,
                "Chunk at offset {} is cut short: {} bytes remain, too few for its length field",
                chunk_offset, available
            ),
            Self::CorruptedChunk {
                chunk_type,
                expected,
                actual,
            } => write!(
                f,
                "{} chunk is corrupted: stored CRC {:08x}, computed {:08x}",
                chunk_type, expected, actual
            ),
            Self::MalformedHeader(reason) => write!(f, "Malformed IHDR chunk: {}", reason),
            Self::UnsupportedFormat(profile) => write!(
                f,
                "Unsupported format (bit depth {}, color type {}, compression {}, filter {}, interlace {}); only 8-bit truecolor without interlacing is supported",
                profile.bit_depth,
                profile.color_type,
                profile.compression_method,
                profile.filter_method,
                profile.interlace_method
            ),
            Self::UnknownFilterType { row, filter } => {
                write!(f, "Scanline {} uses unknown filter type {}", row, filter)
            }
            Self::MissingImageData => write!(f, "No IDAT chunk found"),
            Self::TruncatedImageData { expected, actual } => write!(
                f,
                "Decompressed image data holds {} bytes, expected at least {}",
                actual, expected
            ),
            Self::Decompression(reason) => write!(f, "Failed to decompress image data: {}", reason),
            Self::Io(error) => write!(f, "I/O error: {}", error),
        }
    }
}

impl std::error::Error for PngError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(error) => Some(error),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PngError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
