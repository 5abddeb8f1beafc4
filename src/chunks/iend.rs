use super::{Chunk, ChunkType, WritableChunk};

pub(crate) struct IENDChunk;

impl WritableChunk for IENDChunk {
    const HEADER: ChunkType = ChunkType::IEND;

    fn to_chunk(&self) -> Chunk<Vec<u8>> {
        Chunk::new(Self::HEADER, Vec::new())
    }
}
