use nom::{
    number::complete::{be_u32, u8},
    sequence::tuple,
    IResult,
};

use super::{Chunk, ChunkType, ParseableChunk, WritableChunk};
use crate::error::PngError;

const IHDR_LENGTH: usize = 13;

/// The contents of the IHDR chunk. Fields hold the raw values from the file,
/// so a profile can describe images this crate refuses to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageProfile {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: u8,
    pub compression_method: u8,
    pub filter_method: u8,
    pub interlace_method: u8,
}

impl ImageProfile {
    /// An 8-bit truecolor, non-interlaced profile: the only one that decodes.
    pub fn rgb8(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bit_depth: 8,
            color_type: ColorType::Truecolor as u8,
            compression_method: 0,
            filter_method: 0,
            interlace_method: 0,
        }
    }

    pub fn color(&self) -> Option<ColorType> {
        ColorType::from_code(self.color_type)
    }

    pub fn is_supported(&self) -> bool {
        self.bit_depth == 8
            && self.color() == Some(ColorType::Truecolor)
            && self.compression_method == 0
            && self.filter_method == 0
            && self.interlace_method == 0
    }

    pub fn validate(&self) -> Result<(), PngError> {
        if self.is_supported() {
            Ok(())
        } else {
            Err(PngError::UnsupportedFormat(*self))
        }
    }

    /// Distance in bytes between matching bytes of neighbouring pixels.
    pub(crate) fn filter_width(&self) -> usize {
        let channel_count = self.color().map_or(1, |c| c.channel_count()) as usize;
        let sample_width = usize::max(self.bit_depth as usize / 8, 1);
        channel_count * sample_width
    }

    /// Bytes of pixel data in one row, without the filter type byte.
    pub(crate) fn row_size(&self) -> usize {
        self.width as usize * self.filter_width()
    }

    /// Bytes of one row record in the decompressed data.
    pub(crate) fn scanline_size(&self) -> usize {
        self.row_size() + 1
    }

    /// Reads the IHDR fields without checking that the profile is supported.
    pub fn parse(chunk: &Chunk<&[u8]>) -> Result<Self, PngError> {
        if chunk.chunk_type != Self::HEADER {
            return Err(PngError::MalformedHeader("first chunk is not IHDR"));
        }
        if chunk.data.len() != IHDR_LENGTH {
            return Err(PngError::MalformedHeader("IHDR data must be exactly 13 bytes"));
        }
        let (_, profile) = header_fields(chunk.data)
            .map_err(|_| PngError::MalformedHeader("IHDR data must be exactly 13 bytes"))?;
        if profile.width == 0 || profile.height == 0 {
            return Err(PngError::MalformedHeader("image width and height must be non-zero"));
        }
        Ok(profile)
    }
}

impl<'a> ParseableChunk<'a> for ImageProfile {
    fn from_chunk(chunk: &Chunk<&'a [u8]>) -> Result<Self, PngError> {
        let profile = Self::parse(chunk)?;
        profile.validate()?;
        Ok(profile)
    }
}

impl WritableChunk for ImageProfile {
    const HEADER: ChunkType = ChunkType::IHDR;

    fn to_chunk(&self) -> Chunk<Vec<u8>> {
        let mut data = Vec::with_capacity(IHDR_LENGTH);
        data.extend(self.width.to_be_bytes());
        data.extend(self.height.to_be_bytes());
        data.extend([
            self.bit_depth,
            self.color_type,
            self.compression_method,
            self.filter_method,
            self.interlace_method,
        ]);
        Chunk::new(Self::HEADER, data)
    }
}

fn header_fields(input: &[u8]) -> IResult<&[u8], ImageProfile> {
    let (rest, (width, height, fields)) =
        tuple((be_u32, be_u32, tuple((u8, u8, u8, u8, u8))))(input)?;
    let (bit_depth, color_type, compression_method, filter_method, interlace_method) = fields;
    Ok((
        rest,
        ImageProfile {
            width,
            height,
            bit_depth,
            color_type,
            compression_method,
            filter_method,
            interlace_method,
        },
    ))
}

/// Checks that `chunk` is a well-formed IHDR describing a supported image.
pub fn validate_header(chunk: &Chunk<&[u8]>) -> Result<ImageProfile, PngError> {
    ImageProfile::from_chunk(chunk)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorType {
    Greyscale = 0,
    Truecolor = 2,
    IndexedColor = 3,
    GreyscaleWithAlpha = 4,
    TruecolorWithAlpha = 6,
}

impl ColorType {
    pub fn from_code(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Greyscale),
            2 => Some(Self::Truecolor),
            3 => Some(Self::IndexedColor),
            4 => Some(Self::GreyscaleWithAlpha),
            6 => Some(Self::TruecolorWithAlpha),
            _ => None,
        }
    }

    pub fn channel_count(&self) -> u8 {
        match self {
            Self::Greyscale => 1,
            Self::IndexedColor => 1,
            Self::GreyscaleWithAlpha => 2,
            Self::Truecolor => 3,
            Self::TruecolorWithAlpha => 4,
        }
    }
}
