use std::path::PathBuf;

use anyhow::Context;
use clap::{crate_description, crate_version, value_parser, Arg, ArgAction, ArgMatches, Command};
use png_channels::{
    channel_path, read_file, write_file, Channel, ChunkSelection, CrcPolicy, DecodeOptions,
    EncodeOptions, Stage, Timings, DEFAULT_COMPRESSION_LEVEL, PNG,
};

fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    let verbosity = match matches.get_count("verbose") {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    pretty_env_logger::formatted_builder()
        .filter_level(verbosity)
        .init();
    run(&matches)
}

fn cli() -> Command {
    Command::new("split-channels")
        .version(crate_version!())
        .about(crate_description!())
        .arg(
            Arg::new("input")
                .help("8-bit RGB PNG file to split")
                .value_parser(value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            Arg::new("channel")
                .short('c')
                .long("channel")
                .help("Channel to write (r, g or b); repeat for several. Defaults to all three")
                .value_parser(|s: &str| s.parse::<Channel>())
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("output_dir")
                .short('o')
                .long("output-dir")
                .help("Directory for the outputs. Defaults to the input's directory")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("skip_corrupted")
                .long("skip-corrupted")
                .help("Drop chunks with a bad CRC instead of failing")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("minimal")
                .long("minimal")
                .help("Only write IHDR, IDAT and IEND")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("level")
                .long("level")
                .help("zlib compression level")
                .value_parser(value_parser!(u8).range(0..=10))
                .default_value(DEFAULT_COMPRESSION_LEVEL.to_string()),
        )
        .arg(
            Arg::new("report")
                .long("report")
                .help("Write a JSON report with the outputs and stage timings")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log progress; repeat for more detail")
                .action(ArgAction::Count),
        )
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let input = matches
        .get_one::<PathBuf>("input")
        .context("An input file is required")?;
    let channels: Vec<Channel> = matches
        .get_many::<Channel>("channel")
        .map(|channels| channels.copied().collect())
        .unwrap_or_else(|| Channel::ALL.to_vec());
    let output_dir = matches.get_one::<PathBuf>("output_dir");

    let decode_options = DecodeOptions::default().set_crc_policy(
        if matches.get_flag("skip_corrupted") {
            CrcPolicy::Skip
        } else {
            CrcPolicy::Strict
        },
    );
    let encode_options = EncodeOptions::default()
        .set_chunks(if matches.get_flag("minimal") {
            ChunkSelection::Minimal
        } else {
            ChunkSelection::PassThrough
        })
        .set_compression_level(
            matches
                .get_one::<u8>("level")
                .copied()
                .unwrap_or(DEFAULT_COMPRESSION_LEVEL),
        );

    let bytes =
        read_file(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let mut timings = Timings::new();
    let png = PNG::decode_with(&bytes, decode_options, &mut timings)
        .with_context(|| format!("Failed to decode {}.", input.display()))?;
    for skipped in png.skipped_chunks() {
        log::warn!("{} chunk was corrupted and has been left out", skipped);
    }

    let mut outputs = Vec::with_capacity(channels.len());
    for channel in channels {
        let path = channel_path(input, output_dir.map(PathBuf::as_path), channel);
        let encoded = png.encode_channel_with(channel, &encode_options, &mut timings);
        write_file(&path, &encoded)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Wrote {} channel to {}", channel, path.display());
        outputs.push(path);
    }

    if let Some(report) = matches.get_one::<PathBuf>("report") {
        let now = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Iso8601::DEFAULT)?;
        let seconds: serde_json::Map<String, serde_json::Value> = Stage::ALL
            .into_iter()
            .map(|stage| (stage.to_string(), timings.total(stage).as_secs_f64().into()))
            .collect();
        let skipped: Vec<_> = png.skipped_chunks().iter().map(ToString::to_string).collect();
        let outputs: Vec<_> = outputs.iter().map(|p| p.display().to_string()).collect();
        let results = serde_json::json!({
            "date": now,
            "input": input.display().to_string(),
            "width": png.profile().width,
            "height": png.profile().height,
            "skipped_chunks": skipped,
            "outputs": outputs,
            "seconds": seconds,
        });
        std::fs::write(report, results.to_string())
            .with_context(|| format!("Failed to write report {}", report.display()))?;
    }
    Ok(())
}
