use crate::image_data::DEFAULT_COMPRESSION_LEVEL;

/// What to do when a chunk's stored CRC doesn't match its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrcPolicy {
    /// Stop decoding with [`crate::PngError::CorruptedChunk`].
    #[default]
    Strict,
    /// Log a warning, drop the chunk and keep going. Dropped chunks are
    /// neither part of the image data nor written back out.
    Skip,
}

/// Which of the source chunks end up in a channel output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChunkSelection {
    /// Every chunk of the source, with the image data replaced.
    #[default]
    PassThrough,
    /// Only IHDR, the new IDAT and IEND.
    Minimal,
}

/// Decoder options
///
/// - `crc_policy`: default [`CrcPolicy::Strict`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    pub crc_policy: CrcPolicy,
}

impl DecodeOptions {
    pub fn set_crc_policy(mut self, crc_policy: CrcPolicy) -> Self {
        self.crc_policy = crc_policy;
        self
    }
}

/// Encoder options
///
/// - `chunks`: default [`ChunkSelection::PassThrough`]
/// - `compression_level`: zlib level 0 to 10, default 9
#[derive(Debug, Clone, Copy)]
pub struct EncodeOptions {
    pub chunks: ChunkSelection,
    pub compression_level: u8,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            chunks: ChunkSelection::default(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl EncodeOptions {
    pub fn set_chunks(mut self, chunks: ChunkSelection) -> Self {
        self.chunks = chunks;
        self
    }

    pub fn set_compression_level(mut self, level: u8) -> Self {
        self.compression_level = level;
        self
    }
}
