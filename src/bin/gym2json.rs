//! GYM to JSON converter

use clap::Parser;
use gymck::gym::{decode_capture, read_capture_file, GymJson, GymReader};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gym2json")]
#[command(version = "0.1.0")]
#[command(about = "Convert GYM captures to JSON", long_about = None)]
struct Args {
    /// Input GYM file (optionally gzip-compressed)
    input: PathBuf,

    /// Output JSON file (writes to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output compact JSON (default is pretty-printed)
    #[arg(short, long)]
    compact: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let data = read_capture_file(&args.input)?;
    let (header, body) = decode_capture(&data)?;
    let commands = GymReader::new(&body).parse_commands()?;

    let gym_json = GymJson::new(&header, commands);

    let json_string = if args.compact {
        serde_json::to_string(&gym_json)?
    } else {
        serde_json::to_string_pretty(&gym_json)?
    };

    match args.output {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(json_string.as_bytes())?;
            file.write_all(b"\n")?;
        }
        None => {
            println!("{}", json_string);
        }
    }

    Ok(())
}
