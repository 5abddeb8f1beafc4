//! Decodes 8-bit truecolor, non-interlaced PNG images and writes single
//! color channels back out as PNG files.
//!
//! ```no_run
//! use png_channels::{Channel, DecodeOptions, EncodeOptions, PNG};
//!
//! # fn main() -> Result<(), png_channels::PngError> {
//! let png = PNG::open("brainbow.png", DecodeOptions::default())?;
//! png.write_channel("brainbow_r.png", Channel::Red, &EncodeOptions::default())?;
//! # Ok(())
//! # }
//! ```
mod assembler;
mod chunks;
mod crc;
mod decoder;
mod error;
mod files;
mod filters;
mod image_data;
mod instrument;
mod isolate;
mod options;
mod pixel;
mod png;
mod scanlines;

pub use assembler::assemble;
pub use chunks::{
    ihdr::{validate_header, ColorType, ImageProfile},
    iter_chunks, Chunk, ChunkIter, ChunkType, StreamEnd, SIGNATURE,
};
pub use crc::{crc32, Crc32};
pub use decoder::{parse_stream, ParsedStream};
pub use error::PngError;
pub use files::{channel_path, read_file, write_file};
pub use filters::{paeth_predictor, Filter, UnknownFilter};
pub use image_data::{deflate, inflate, DEFAULT_COMPRESSION_LEVEL};
pub use instrument::{Instrument, Stage, Timings};
pub use isolate::isolate;
pub use options::{ChunkSelection, CrcPolicy, DecodeOptions, EncodeOptions};
pub use pixel::{Channel, Pixel, PixelGrid, UnknownChannel};
pub use png::PNG;
pub use scanlines::{filter_scanlines, reconstruct_scanlines};
