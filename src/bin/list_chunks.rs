use std::path::PathBuf;

use anyhow::Context;
use clap::{crate_version, value_parser, Arg, ArgAction, Command};
use png_channels::{iter_chunks, read_file, ImageProfile, PngError, SIGNATURE};

fn main() -> anyhow::Result<()> {
    let matches = Command::new("list-chunks")
        .version(crate_version!())
        .about("Prints the header and chunk layout of a PNG file")
        .arg(
            Arg::new("input")
                .help("PNG file to inspect")
                .value_parser(value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log progress; repeat to log every chunk as it is read")
                .action(ArgAction::Count),
        )
        .get_matches();
    let verbosity = match matches.get_count("verbose") {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    pretty_env_logger::formatted_builder()
        .filter_level(verbosity)
        .init();

    let input = matches
        .get_one::<PathBuf>("input")
        .context("An input file is required")?;
    let bytes = read_file(input).with_context(|| format!("Failed to read {}", input.display()))?;
    if !bytes.starts_with(SIGNATURE) {
        return Err(PngError::InvalidSignature)
            .with_context(|| format!("{} is not a PNG file", input.display()));
    }

    let mut chunks = iter_chunks(&bytes);
    for (index, chunk) in chunks.by_ref().enumerate() {
        match chunk {
            Ok(chunk) => {
                println!(
                    "{:>4}  {}  {:>8} bytes  crc ok",
                    index,
                    chunk.chunk_type(),
                    chunk.declared_length()
                );
                if index == 0 {
                    match ImageProfile::parse(&chunk) {
                        Ok(profile) => print_profile(&profile),
                        Err(e) => println!("      {}", e),
                    }
                }
            }
            Err(PngError::CorruptedChunk {
                chunk_type,
                expected,
                actual,
            }) => println!(
                "{:>4}  {}  crc mismatch: stored {:08x}, computed {:08x}",
                index, chunk_type, expected, actual
            ),
            Err(e) => return Err(e).context("Chunk listing stopped early"),
        }
    }
    match chunks.end() {
        Some(end) => println!("stream end: {:?}", end),
        None => println!("stream end: unknown"),
    }
    Ok(())
}

fn print_profile(profile: &ImageProfile) {
    println!("      width {}, height {}", profile.width, profile.height);
    println!(
        "      bit depth {}, color type {}, compression {}, filter {}, interlace {}",
        profile.bit_depth,
        profile.color_type,
        profile.compression_method,
        profile.filter_method,
        profile.interlace_method
    );
    if !profile.is_supported() {
        println!("      (not an 8-bit RGB image; split-channels will refuse it)");
    }
}
