//! GYM capture header

use crate::error::{Error, Result};
use serde::Serialize;

/// Header size in bytes; command data starts right after it
pub const GYM_HEADER_SIZE: usize = 428;

/// GYMX header offsets (in bytes)
pub mod offset {
    /// "GYMX" identifier
    pub const IDENT: usize = 0x000;
    pub const SONG: usize = 0x004;
    pub const GAME: usize = 0x024;
    pub const PUBLISHER: usize = 0x044;
    pub const EMULATOR: usize = 0x064;
    pub const DUMPER: usize = 0x084;
    pub const COMMENT: usize = 0x0A4;
    /// Loop start frame, 0 when the song does not loop
    pub const LOOP_START: usize = 0x1A4;
    /// Uncompressed body size, 0 when the body is not zlib-packed
    pub const PACKED_SIZE: usize = 0x1A8;
}

const TEXT_FIELD: usize = 32;
const COMMENT_FIELD: usize = 256;

/// Parsed header. Captures without the `GYMX` tag still carry a header-sized prefix, which
/// is skipped and yields an empty header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GymHeader {
    pub tagged: bool,
    pub song: String,
    pub game: String,
    pub publisher: String,
    pub emulator: String,
    pub dumper: String,
    pub comment: String,
    pub loop_start: u32,
    pub packed_size: u32,
}

impl GymHeader {
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < GYM_HEADER_SIZE {
            return Err(Error::CaptureHeader(format!(
                "capture is {} bytes, header needs {}",
                data.len(),
                GYM_HEADER_SIZE
            )));
        }
        if &data[offset::IDENT..offset::IDENT + 4] != b"GYMX" {
            return Ok(Self::default());
        }

        Ok(Self {
            tagged: true,
            song: text_at(data, offset::SONG, TEXT_FIELD),
            game: text_at(data, offset::GAME, TEXT_FIELD),
            publisher: text_at(data, offset::PUBLISHER, TEXT_FIELD),
            emulator: text_at(data, offset::EMULATOR, TEXT_FIELD),
            dumper: text_at(data, offset::DUMPER, TEXT_FIELD),
            comment: text_at(data, offset::COMMENT, COMMENT_FIELD),
            loop_start: u32_at(data, offset::LOOP_START),
            packed_size: u32_at(data, offset::PACKED_SIZE),
        })
    }

    pub fn is_packed(&self) -> bool {
        self.tagged && self.packed_size != 0
    }
}

/// NUL-padded Latin-1 text field
fn text_at(data: &[u8], start: usize, len: usize) -> String {
    data[start..start + len]
        .iter()
        .take_while(|&&b| b != 0)
        .map(|&b| b as char)
        .collect::<String>()
        .trim_end()
        .to_string()
}

fn u32_at(data: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}
