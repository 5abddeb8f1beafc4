use super::{Chunk, ChunkType, ParseableChunk, WritableChunk};
use crate::error::PngError;

/// Compressed image data. A stream may split it over several IDAT chunks.
#[derive(Debug)]
pub(crate) struct IDATChunk<T> {
    pub(crate) data: T,
}

impl<T: AsRef<[u8]>> IDATChunk<T> {
    pub(crate) fn new(data: T) -> Self {
        Self { data }
    }
}

impl<T: AsRef<[u8]>> WritableChunk for IDATChunk<T> {
    const HEADER: ChunkType = ChunkType::IDAT;

    fn to_chunk(&self) -> Chunk<Vec<u8>> {
        Chunk::new(Self::HEADER, self.data.as_ref().to_vec())
    }
}

impl<'a> ParseableChunk<'a> for IDATChunk<&'a [u8]> {
    fn from_chunk(chunk: &Chunk<&'a [u8]>) -> Result<Self, PngError> {
        if chunk.chunk_type != Self::HEADER {
            return Err(PngError::MissingImageData);
        }
        Ok(Self { data: chunk.data })
    }
}

impl IDATChunk<Vec<u8>> {
    pub(crate) fn into_chunk(self) -> Chunk<Vec<u8>> {
        Chunk::new(ChunkType::IDAT, self.data)
    }
}
