use clap::Parser;
use gymck::chip::waveform::Waveform;
use gymck::config::ModulationMode;
use gymck::gym::{decode_capture, read_capture_file, GymPlayer};
use gymck::{EngineConfig, Ym2612};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gymck")]
#[command(version = "0.1.0")]
#[command(about = "Render YM2612 GYM captures to WAV", long_about = None)]
struct Args {
    /// Input GYM file (optionally gzip-compressed)
    input: PathBuf,

    /// Output WAV file
    #[arg(short, long)]
    output: PathBuf,

    /// Maximum length to render in seconds
    #[arg(short, long, default_value_t = 90)]
    seconds: u64,

    /// Engine configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the operator waveform (sine, square, triangle)
    #[arg(short, long, value_parser = parse_waveform)]
    waveform: Option<Waveform>,

    /// Let modulator operators shift the phase of their carriers
    #[arg(long)]
    phase_modulation: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_waveform(name: &str) -> Result<Waveform, String> {
    Waveform::from_name(name).ok_or_else(|| format!("unknown waveform '{}'", name))
}

fn create_logger(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    simple_logger::SimpleLogger::new()
        .with_level(level)
        .init()
        .expect("Failed to set logger");
}

fn main() -> Result<(), gymck::Error> {
    let args = Args::parse();
    create_logger(args.verbose);

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(waveform) = args.waveform {
        config.waveform = waveform;
    }
    if args.phase_modulation {
        config.modulation = ModulationMode::Phase;
    }
    let sample_rate = config.sample_rate;

    let data = read_capture_file(&args.input)?;
    let (header, body) = decode_capture(&data)?;
    if header.tagged {
        log::info!("{} / {} (dumped by {})", header.game, header.song, header.dumper);
    }

    let mut player = GymPlayer::new(Ym2612::with_config(config)).with_frame_limit(args.seconds * 60);
    let audio = player.play(&body)?;

    gymck::wav::write_wav(&args.output, &audio, sample_rate)?;
    Ok(())
}
