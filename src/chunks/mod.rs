use std::fmt;

use nom::{
    bytes::complete::take, combinator::map, number::complete::be_u32, sequence::tuple, IResult,
};

use crate::{crc::chunk_crc, error::PngError};

pub(crate) mod idat;
pub(crate) mod iend;
pub(crate) mod ihdr;

pub const SIGNATURE: &[u8; 8] = b"\x89PNG\x0d\x0a\x1a\x0a";

/// Length, type and CRC fields around every chunk's data.
pub(crate) const CHUNK_OVERHEAD: usize = 12;

/// A 4-byte ASCII chunk type code such as `IHDR` or `tEXt`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkType(pub [u8; 4]);

impl ChunkType {
    pub const IHDR: Self = Self(*b"IHDR");
    pub const IDAT: Self = Self(*b"IDAT");
    pub const IEND: Self = Self(*b"IEND");

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkType({})", self)
    }
}

/// One chunk of a PNG stream. `D` is `&[u8]` while borrowing from the parsed
/// file and `Vec<u8>` once the chunk is kept around or freshly built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk<D> {
    pub(crate) chunk_type: ChunkType,
    pub(crate) data: D,
}

impl<D: AsRef<[u8]>> Chunk<D> {
    pub fn new(chunk_type: ChunkType, data: D) -> Self {
        Self { chunk_type, data }
    }

    pub fn chunk_type(&self) -> ChunkType {
        self.chunk_type
    }

    pub fn data(&self) -> &[u8] {
        self.data.as_ref()
    }

    pub fn declared_length(&self) -> u32 {
        self.data.as_ref().len() as u32
    }

    pub fn crc(&self) -> u32 {
        chunk_crc(self.chunk_type.as_bytes(), self.data.as_ref())
    }

    /// Serializes the chunk with its length prefix and a freshly computed CRC.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.reserve(CHUNK_OVERHEAD + self.data.as_ref().len());
        out.extend(self.declared_length().to_be_bytes());
        out.extend(self.chunk_type.as_bytes());
        out.extend(self.data.as_ref());
        out.extend(self.crc().to_be_bytes());
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        self.write_to(&mut bytes);
        bytes
    }

    pub fn into_owned(self) -> Chunk<Vec<u8>> {
        Chunk {
            chunk_type: self.chunk_type,
            data: self.data.as_ref().to_vec(),
        }
    }
}

/// Chunks with a fixed meaning that can be turned back into a raw [`Chunk`].
pub(crate) trait WritableChunk {
    const HEADER: ChunkType;

    fn to_chunk(&self) -> Chunk<Vec<u8>>;
}

/// Chunks that can also be read out of a raw [`Chunk`].
pub(crate) trait ParseableChunk<'a>: WritableChunk + Sized {
    fn from_chunk(chunk: &Chunk<&'a [u8]>) -> Result<Self, PngError>;
}

/// Why a [`ChunkIter`] stopped yielding chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    Iend,
    Exhausted,
}

/// Walks the chunks of a PNG stream whose signature has already been checked.
///
/// Each item is either a chunk whose CRC matched or a
/// [`PngError::CorruptedChunk`]. A corrupted chunk doesn't end the iteration:
/// its declared length is still trusted, so the caller may keep going. A
/// truncated chunk yields [`PngError::StreamTruncated`] and ends it. Iteration
/// also stops after an IEND chunk, corrupted or not, or when the input runs
/// out.
///
/// The iterator is `Clone`, so a stream can be walked again from any point.
#[derive(Debug, Clone)]
pub struct ChunkIter<'a> {
    source: &'a [u8],
    offset: usize,
    end: Option<StreamEnd>,
    failed: bool,
}

pub fn iter_chunks(source: &[u8]) -> ChunkIter<'_> {
    ChunkIter::new(source, SIGNATURE.len())
}

impl<'a> ChunkIter<'a> {
    pub fn new(source: &'a [u8], offset: usize) -> Self {
        Self {
            source,
            offset,
            end: None,
            failed: false,
        }
    }

    /// Byte offset of the next chunk.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// `None` while chunks remain or after a truncation error.
    pub fn end(&self) -> Option<StreamEnd> {
        self.end
    }
}

impl<'a> Iterator for ChunkIter<'a> {
    type Item = Result<Chunk<&'a [u8]>, PngError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.end.is_some() || self.failed {
            return None;
        }
        let input = self.source.get(self.offset..).unwrap_or_default();
        if input.is_empty() {
            self.end = Some(StreamEnd::Exhausted);
            return None;
        }
        let chunk_offset = self.offset;
        let raw = match raw_chunk(input) {
            Ok((_, raw)) => raw,
            Err(_) => {
                self.failed = true;
                return Some(Err(truncation_error(input, chunk_offset)));
            }
        };
        self.offset += CHUNK_OVERHEAD + raw.chunk.data.len();

        if raw.chunk.chunk_type == ChunkType::IEND {
            self.end = Some(StreamEnd::Iend);
        }

        let actual = raw.chunk.crc();
        if actual != raw.stored_crc {
            log::debug!("{} chunk at offset {chunk_offset} failed its CRC", raw.chunk.chunk_type);
            return Some(Err(PngError::CorruptedChunk {
                chunk_type: raw.chunk.chunk_type,
                expected: raw.stored_crc,
                actual,
            }));
        }
        log::debug!(
            "{} chunk at offset {chunk_offset}, {} bytes",
            raw.chunk.chunk_type,
            raw.chunk.data.len()
        );
        Some(Ok(raw.chunk))
    }
}

struct RawChunk<'a> {
    chunk: Chunk<&'a [u8]>,
    stored_crc: u32,
}

fn chunk_type(input: &[u8]) -> IResult<&[u8], ChunkType> {
    map(take(4usize), |v: &[u8]| ChunkType([v[0], v[1], v[2], v[3]]))(input)
}

fn raw_chunk(input: &[u8]) -> IResult<&[u8], RawChunk<'_>> {
    let (input, length) = be_u32(input)?;
    let (rest, (chunk_type, data, stored_crc)) =
        tuple((chunk_type, take(length), be_u32))(input)?;
    Ok((
        rest,
        RawChunk {
            chunk: Chunk { chunk_type, data },
            stored_crc,
        },
    ))
}

fn truncation_error(input: &[u8], chunk_offset: usize) -> PngError {
    let declared = be_u32::<_, nom::error::Error<&[u8]>>(input)
        .map(|(_, length)| length)
        .ok();
    PngError::StreamTruncated {
        chunk_offset,
        declared,
        available: input.len(),
    }
}
