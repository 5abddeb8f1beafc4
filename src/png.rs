use std::path::Path;

use crate::{
    assembler::assemble,
    chunks::{ihdr::ImageProfile, Chunk, ChunkType, StreamEnd},
    decoder::parse_stream,
    error::PngError,
    files::{read_file, write_file},
    image_data::{deflate, inflate},
    instrument::{timed, Instrument, Stage},
    isolate::isolate,
    options::{DecodeOptions, EncodeOptions},
    pixel::{Channel, PixelGrid},
    scanlines::reconstruct_scanlines,
};

/// A decoded 8-bit RGB image together with the chunks it was read from.
#[derive(Debug)]
pub struct PNG {
    profile: ImageProfile,
    chunks: Vec<Chunk<Vec<u8>>>,
    pixels: PixelGrid,
    skipped: Vec<ChunkType>,
    end: StreamEnd,
}

impl PNG {
    pub fn decode(bytes: &[u8]) -> Result<Self, PngError> {
        Self::decode_with(bytes, DecodeOptions::default(), &mut ())
    }

    pub fn decode_with<I: Instrument + ?Sized>(
        bytes: &[u8],
        options: DecodeOptions,
        hook: &mut I,
    ) -> Result<Self, PngError> {
        let parsed = timed(hook, Stage::ReadChunks, || parse_stream(bytes, options))?;
        let data = timed(hook, Stage::Inflate, || inflate(&parsed.image_data))?;
        let pixels = timed(hook, Stage::Reconstruct, || {
            reconstruct_scanlines(&data, &parsed.profile)
        })?;
        log::info!(
            "Decoded {}x{} image from {} chunks",
            parsed.profile.width,
            parsed.profile.height,
            parsed.chunks.len()
        );
        Ok(Self {
            profile: parsed.profile,
            chunks: parsed.chunks.into_iter().map(Chunk::into_owned).collect(),
            pixels,
            skipped: parsed.skipped,
            end: parsed.end,
        })
    }

    pub fn open(path: impl AsRef<Path>, options: DecodeOptions) -> Result<Self, PngError> {
        Self::decode_with(&read_file(path)?, options, &mut ())
    }

    pub fn profile(&self) -> &ImageProfile {
        &self.profile
    }

    pub fn pixels(&self) -> &PixelGrid {
        &self.pixels
    }

    /// The chunks that passed their CRC check, in stream order.
    pub fn chunks(&self) -> &[Chunk<Vec<u8>>] {
        &self.chunks
    }

    /// Types of the chunks dropped under [`crate::CrcPolicy::Skip`].
    pub fn skipped_chunks(&self) -> &[ChunkType] {
        &self.skipped
    }

    pub fn stream_end(&self) -> StreamEnd {
        self.end
    }

    /// Uncompressed scanline data showing only `channel`.
    pub fn isolate(&self, channel: Channel) -> Vec<u8> {
        isolate(&self.pixels, channel)
    }

    /// A complete PNG file showing only `channel`.
    pub fn encode_channel(&self, channel: Channel, options: &EncodeOptions) -> Vec<u8> {
        self.encode_channel_with(channel, options, &mut ())
    }

    pub fn encode_channel_with<I: Instrument + ?Sized>(
        &self,
        channel: Channel,
        options: &EncodeOptions,
        hook: &mut I,
    ) -> Vec<u8> {
        let scanlines = timed(hook, Stage::Isolate, || self.isolate(channel));
        let compressed = timed(hook, Stage::Deflate, || {
            deflate(&scanlines, options.compression_level)
        });
        let bytes = timed(hook, Stage::Assemble, || {
            assemble(&self.chunks, compressed, options.chunks)
        });
        log::info!("Encoded {} channel into {} bytes", channel, bytes.len());
        bytes
    }

    pub fn write_channel(
        &self,
        path: impl AsRef<Path>,
        channel: Channel,
        options: &EncodeOptions,
    ) -> Result<(), PngError> {
        write_file(path, &self.encode_channel(channel, options))
    }
}

#[cfg(test)]
mod tests {
    use super::PNG;
    use crate::{
        chunks::{iter_chunks, ihdr::ImageProfile, Chunk, ChunkType, StreamEnd, WritableChunk},
        error::PngError,
        filters::Filter,
        image_data::deflate,
        instrument::{Stage, Timings},
        options::{ChunkSelection, EncodeOptions},
        pixel::{Channel, Pixel, PixelGrid},
        scanlines::filter_scanlines,
    };

    fn encode(grid: &PixelGrid, filter: Filter, extra: &[Chunk<&[u8]>]) -> Vec<u8> {
        let profile = ImageProfile::rgb8(grid.width() as u32, grid.height() as u32);
        let mut bytes = crate::chunks::SIGNATURE.to_vec();
        profile.to_chunk().write_to(&mut bytes);
        for chunk in extra {
            chunk.write_to(&mut bytes);
        }
        let compressed = deflate(&filter_scanlines(grid, filter), 6);
        let (first, second) = compressed.split_at(compressed.len() / 2);
        Chunk::new(ChunkType::IDAT, first).write_to(&mut bytes);
        Chunk::new(ChunkType::IDAT, second).write_to(&mut bytes);
        Chunk::new(ChunkType::IEND, Vec::new()).write_to(&mut bytes);
        bytes
    }

    fn gradient(width: usize, height: usize) -> PixelGrid {
        let mut grid = PixelGrid::new(width, height);
        for y in 0..height {
            for x in 0..width {
                grid.set(x, y, Pixel::new((x * 40) as u8, (y * 60) as u8, (x * y * 7) as u8));
            }
        }
        grid
    }

    #[test]
    fn decodes_every_filter_type() {
        let grid = gradient(6, 4);
        for filter in Filter::ALL {
            let png = PNG::decode(&encode(&grid, filter, &[])).unwrap();
            assert_eq!(png.pixels(), &grid, "{filter:?}");
            assert_eq!(png.stream_end(), StreamEnd::Iend);
        }
    }

    #[test]
    fn channel_output_decodes_to_the_isolated_channel() {
        let grid = gradient(5, 3);
        let text = Chunk::new(ChunkType(*b"tEXt"), b"Author\0me".as_slice());
        let png = PNG::decode(&encode(&grid, Filter::Paeth, &[text])).unwrap();
        for channel in Channel::ALL {
            let output = png.encode_channel(channel, &EncodeOptions::default());
            let decoded = PNG::decode(&output).unwrap();
            assert_eq!(decoded.pixels(), &grid.isolate(channel));
            assert_eq!(decoded.chunks().len(), 4);
        }
    }

    #[test]
    fn minimal_output_drops_ancillary_chunks() {
        let grid = gradient(2, 2);
        let text = Chunk::new(ChunkType(*b"tEXt"), b"Author\0me".as_slice());
        let png = PNG::decode(&encode(&grid, Filter::Sub, &[text])).unwrap();
        let options = EncodeOptions::default().set_chunks(ChunkSelection::Minimal);
        let output = png.encode_channel(Channel::Green, &options);
        let types: Vec<_> = iter_chunks(&output)
            .map(|chunk| chunk.unwrap().chunk_type())
            .collect();
        assert_eq!(types, [ChunkType::IHDR, ChunkType::IDAT, ChunkType::IEND]);
    }

    #[test]
    fn reports_stage_timings() {
        let png_bytes = encode(&gradient(3, 3), Filter::Up, &[]);
        let mut timings = Timings::new();
        let png = PNG::decode_with(&png_bytes, Default::default(), &mut timings).unwrap();
        png.encode_channel_with(Channel::Blue, &EncodeOptions::default(), &mut timings);
        let stages: Vec<_> = timings.entries().iter().map(|(stage, _)| *stage).collect();
        assert_eq!(stages, Stage::ALL);
    }

    #[test]
    fn broken_zlib_stream() {
        let mut bytes = crate::chunks::SIGNATURE.to_vec();
        ImageProfile::rgb8(1, 1).to_chunk().write_to(&mut bytes);
        Chunk::new(ChunkType::IDAT, b"not zlib".as_slice()).write_to(&mut bytes);
        Chunk::new(ChunkType::IEND, b"".as_slice()).write_to(&mut bytes);
        assert!(matches!(PNG::decode(&bytes), Err(PngError::Decompression(_))));
    }
}
