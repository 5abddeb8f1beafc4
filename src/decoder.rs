use std::marker::PhantomData;

use nom::{bytes::complete::tag, IResult};

use crate::{
    chunks::{
        idat::IDATChunk, ihdr::ImageProfile, Chunk, ChunkIter, ChunkType, ParseableChunk,
        StreamEnd, SIGNATURE,
    },
    error::PngError,
    options::{CrcPolicy, DecodeOptions},
};

/// Walks a PNG stream in order: signature, then IHDR, then everything else.
pub struct PNGDecoder<'a, State> {
    chunks: ChunkIter<'a>,
    options: DecodeOptions,
    _state: PhantomData<State>,
}

pub struct Start;
pub struct Chunks;

/// The chunk sequence of a stream with the pieces the rest of the pipeline
/// needs pulled out.
#[derive(Debug)]
pub struct ParsedStream<'a> {
    pub profile: ImageProfile,
    /// Every chunk that passed its CRC check, IHDR first, in stream order.
    pub chunks: Vec<Chunk<&'a [u8]>>,
    /// The data of all IDAT chunks, concatenated.
    pub image_data: Vec<u8>,
    pub skipped: Vec<ChunkType>,
    pub end: StreamEnd,
}

impl<'a> PNGDecoder<'a, Start> {
    pub fn new(data: &'a [u8], options: DecodeOptions) -> Result<Self, PngError> {
        let (rest, _) = parse_signature(data).map_err(|_| PngError::InvalidSignature)?;
        Ok(Self {
            chunks: ChunkIter::new(data, data.len() - rest.len()),
            options,
            _state: PhantomData,
        })
    }

    /// Reads and validates the IHDR chunk, which has to come first. A
    /// corrupted IHDR is fatal whatever the CRC policy.
    pub fn parse_ihdr(
        mut self,
    ) -> Result<(PNGDecoder<'a, Chunks>, ImageProfile, Chunk<&'a [u8]>), PngError> {
        let chunk = self
            .chunks
            .next()
            .ok_or(PngError::MalformedHeader("stream holds no chunks"))??;
        let profile = ImageProfile::from_chunk(&chunk)?;
        log::debug!(
            "{}x{} image, bit depth {}, color type {}",
            profile.width,
            profile.height,
            profile.bit_depth,
            profile.color_type
        );
        let decoder = PNGDecoder {
            chunks: self.chunks,
            options: self.options,
            _state: PhantomData,
        };
        Ok((decoder, profile, chunk))
    }
}

impl<'a> PNGDecoder<'a, Chunks> {
    /// Collects the remaining chunks, applying the CRC policy, and gathers
    /// the image data from every IDAT chunk.
    pub fn parse_chunks(
        mut self,
        profile: ImageProfile,
        header: Chunk<&'a [u8]>,
    ) -> Result<ParsedStream<'a>, PngError> {
        let mut chunks = vec![header];
        let mut image_data = Vec::new();
        let mut skipped = Vec::new();
        for chunk in self.chunks.by_ref() {
            let chunk = match (chunk, self.options.crc_policy) {
                (Ok(chunk), _) => chunk,
                (Err(PngError::CorruptedChunk { chunk_type, .. }), CrcPolicy::Skip) => {
                    log::warn!("{} chunk is corrupted, skipping it", chunk_type);
                    skipped.push(chunk_type);
                    continue;
                }
                (Err(e), _) => return Err(e),
            };
            if let Ok(idat) = IDATChunk::<&[u8]>::from_chunk(&chunk) {
                image_data.extend_from_slice(idat.data);
            }
            chunks.push(chunk);
        }
        let end = self.chunks.end().unwrap_or(StreamEnd::Exhausted);
        if end == StreamEnd::Exhausted {
            log::warn!("Stream ended without an IEND chunk");
        }
        if !chunks.iter().any(|c| c.chunk_type == ChunkType::IDAT) {
            return Err(PngError::MissingImageData);
        }
        Ok(ParsedStream {
            profile,
            chunks,
            image_data,
            skipped,
            end,
        })
    }
}

/// Checks the signature and splits `data` into its chunks.
pub fn parse_stream(data: &[u8], options: DecodeOptions) -> Result<ParsedStream<'_>, PngError> {
    let (decoder, profile, header) = PNGDecoder::new(data, options)?.parse_ihdr()?;
    decoder.parse_chunks(profile, header)
}

fn parse_signature(input: &[u8]) -> IResult<&[u8], &[u8]> {
    tag(SIGNATURE.as_slice())(input)
}
