pub mod commands;
pub mod header;
pub mod json;
pub mod player;
pub mod reader;

pub use commands::GymCommand;
pub use header::GymHeader;
pub use json::GymJson;
pub use player::GymPlayer;
pub use reader::{decode_capture, GymReader};

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Read a GYM capture, decompressing gzip-wrapped files
pub fn read_capture_file(path: &Path) -> io::Result<Vec<u8>> {
    let mut data = Vec::new();
    File::open(path)?.read_to_end(&mut data)?;

    // Gzip magic (0x1f 0x8b), whatever the extension says
    if data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b {
        let mut decoder = GzDecoder::new(data.as_slice());
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed)?;
        Ok(decompressed)
    } else {
        Ok(data)
    }
}
