use std::path::Path;

use png_channels::{
    channel_path, deflate, filter_scanlines, isolate, iter_chunks, Channel, Chunk,
    ChunkSelection, ChunkType, CrcPolicy, DecodeOptions, EncodeOptions, Filter, Pixel, PixelGrid,
    PngError, StreamEnd, PNG, SIGNATURE,
};

/// 4x4 RGB image whose rows are filtered with Sub, Up, Average and Paeth, with
/// a tEXt chunk and the image data split over two IDAT chunks.
const FILE: &[u8] = include_bytes!("test.png");

/// Offset of the first data byte of the fixture's tEXt chunk.
const TEXT_DATA_OFFSET: usize = 41;

fn fixture_pixels() -> PixelGrid {
    let mut grid = PixelGrid::new(4, 4);
    for y in 0..4 {
        for x in 0..4 {
            let pixel = Pixel::new(
                ((x * 60 + y * 13) % 256) as u8,
                ((y * 70 + x * 5) % 256) as u8,
                ((x * y * 30 + 90) % 256) as u8,
            );
            assert!(grid.set(x, y, pixel));
        }
    }
    grid
}

fn listing(bytes: &[u8]) -> String {
    iter_chunks(bytes)
        .map(|chunk| {
            let chunk = chunk.unwrap();
            format!("{} {}", chunk.chunk_type(), chunk.declared_length())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn ihdr(width: u32, height: u32, color_type: u8) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend(width.to_be_bytes());
    data.extend(height.to_be_bytes());
    data.extend([8, color_type, 0, 0, 0]);
    data
}

/// A PNG holding `scanlines` (filter bytes included) for an RGB image.
fn png_from_scanlines(width: u32, height: u32, scanlines: &[u8]) -> Vec<u8> {
    let mut bytes = SIGNATURE.to_vec();
    Chunk::new(ChunkType::IHDR, ihdr(width, height, 2)).write_to(&mut bytes);
    Chunk::new(ChunkType::IDAT, deflate(scanlines, 6)).write_to(&mut bytes);
    Chunk::new(ChunkType::IEND, Vec::new()).write_to(&mut bytes);
    bytes
}

#[test]
fn fixture_decodes() {
    let png = PNG::decode(FILE).unwrap();
    assert_eq!(png.profile().width, 4);
    assert_eq!(png.profile().height, 4);
    assert_eq!(png.pixels(), &fixture_pixels());
    assert_eq!(png.stream_end(), StreamEnd::Iend);
    assert!(png.skipped_chunks().is_empty());
}

#[test]
fn fixture_chunk_layout() {
    insta::assert_snapshot!(listing(FILE), @r###"
    IHDR 13
    tEXt 14
    IDAT 26
    IDAT 26
    IEND 0
    "###);
}

#[test]
fn sub_filter_adds_the_left_neighbour() {
    let png = PNG::decode(&png_from_scanlines(2, 1, &[1, 10, 20, 30, 5, 5, 5])).unwrap();
    assert_eq!(png.pixels().get(0, 0), Some(Pixel::new(10, 20, 30)));
    assert_eq!(png.pixels().get(1, 0), Some(Pixel::new(15, 25, 35)));
}

#[test]
fn up_filter_adds_the_row_above() {
    let scanlines = [0, 100, 100, 100, 2, 10, 10, 10];
    let png = PNG::decode(&png_from_scanlines(1, 2, &scanlines)).unwrap();
    assert_eq!(png.pixels().get(0, 1), Some(Pixel::new(110, 110, 110)));
}

#[test]
fn isolating_red() {
    let mut grid = PixelGrid::new(1, 1);
    grid.set(0, 0, Pixel::new(200, 50, 10));
    assert_eq!(isolate(&grid, Channel::Red), [0, 200, 0, 0]);
    assert_eq!(isolate(&grid, Channel::Green), [0, 0, 50, 0]);
    assert_eq!(isolate(&grid, Channel::Blue), [0, 0, 0, 10]);
}

#[test]
fn unfiltered_round_trip() {
    let grid = fixture_pixels();
    let scanlines = filter_scanlines(&grid, Filter::None);
    let png = PNG::decode(&png_from_scanlines(4, 4, &scanlines)).unwrap();
    assert_eq!(png.pixels(), &grid);
}

#[test]
fn tampered_chunk_is_corrupted() {
    let mut bytes = FILE.to_vec();
    bytes[TEXT_DATA_OFFSET] ^= 0x01;
    match PNG::decode(&bytes) {
        Err(PngError::CorruptedChunk { chunk_type, .. }) => {
            assert_eq!(chunk_type, ChunkType(*b"tEXt"))
        }
        other => panic!("expected a corrupted tEXt chunk, got {other:?}"),
    }
}

#[test]
fn tampered_chunk_can_be_skipped() {
    let mut bytes = FILE.to_vec();
    bytes[TEXT_DATA_OFFSET] ^= 0x01;
    let options = DecodeOptions::default().set_crc_policy(CrcPolicy::Skip);
    let png = PNG::decode_with(&bytes, options, &mut ()).unwrap();
    assert_eq!(png.skipped_chunks(), [ChunkType(*b"tEXt")]);
    assert_eq!(png.pixels(), &fixture_pixels());

    let output = png.encode_channel(Channel::Red, &EncodeOptions::default());
    let types: Vec<_> = iter_chunks(&output)
        .map(|chunk| chunk.unwrap().chunk_type())
        .collect();
    assert_eq!(types, [ChunkType::IHDR, ChunkType::IDAT, ChunkType::IEND]);
}

#[test]
fn corrupted_iend_with_trailing_bytes() {
    let mut bytes = FILE.to_vec();
    let last = bytes.len() - 1;
    bytes[last] ^= 0x01;
    bytes.extend([0, 1, 2]);
    assert!(matches!(
        PNG::decode(&bytes),
        Err(PngError::CorruptedChunk { chunk_type: ChunkType::IEND, .. })
    ));

    let options = DecodeOptions::default().set_crc_policy(CrcPolicy::Skip);
    let png = PNG::decode_with(&bytes, options, &mut ()).unwrap();
    assert_eq!(png.stream_end(), StreamEnd::Iend);
    assert_eq!(png.skipped_chunks(), [ChunkType::IEND]);
    assert_eq!(png.pixels(), &fixture_pixels());

    let output = png.encode_channel(Channel::Blue, &EncodeOptions::default());
    assert_eq!(&output[output.len() - 12..], b"\0\0\0\0IEND\xae\x42\x60\x82");
}

#[test]
fn palette_images_are_rejected() {
    let mut bytes = SIGNATURE.to_vec();
    Chunk::new(ChunkType::IHDR, ihdr(1, 1, 3)).write_to(&mut bytes);
    Chunk::new(ChunkType::IDAT, deflate(&[0, 0], 6)).write_to(&mut bytes);
    Chunk::new(ChunkType::IEND, Vec::new()).write_to(&mut bytes);
    match PNG::decode(&bytes) {
        Err(PngError::UnsupportedFormat(profile)) => assert_eq!(profile.color_type, 3),
        other => panic!("expected UnsupportedFormat, got {other:?}"),
    }
}

#[test]
fn bad_signature() {
    let mut bytes = FILE.to_vec();
    bytes[1] = b'Q';
    assert!(matches!(PNG::decode(&bytes), Err(PngError::InvalidSignature)));
}

#[test]
fn channel_files_round_trip() {
    let dir = std::env::temp_dir().join(format!("png-channels-it-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let png = PNG::decode(FILE).unwrap();
    let grid = fixture_pixels();
    for channel in Channel::ALL {
        let path = channel_path(Path::new("test.png"), Some(dir.as_path()), channel);
        png.write_channel(&path, channel, &EncodeOptions::default()).unwrap();
        let written = PNG::open(&path, DecodeOptions::default()).unwrap();
        assert_eq!(written.pixels(), &grid.isolate(channel));
        let types: Vec<_> = written.chunks().iter().map(Chunk::chunk_type).collect();
        assert_eq!(
            types,
            [ChunkType::IHDR, ChunkType(*b"tEXt"), ChunkType::IDAT, ChunkType::IEND]
        );
    }
    std::fs::remove_dir_all(dir).unwrap();
}

#[test]
fn minimal_output() {
    let png = PNG::decode(FILE).unwrap();
    let options = EncodeOptions::default().set_chunks(ChunkSelection::Minimal);
    let output = png.encode_channel(Channel::Green, &options);
    let decoded = PNG::decode(&output).unwrap();
    assert_eq!(decoded.chunks().len(), 3);
    assert_eq!(decoded.pixels(), &fixture_pixels().isolate(Channel::Green));
}
