//! GYM command definitions

use serde::Serialize;

/// GYM command opcodes
pub mod opcode {
    /// End of a 1/60 s frame
    pub const FRAME: u8 = 0x00;
    pub const YM2612_PORT0: u8 = 0x01;
    pub const YM2612_PORT1: u8 = 0x02;
    /// SN76489 PSG write
    pub const PSG: u8 = 0x03;
}

/// A parsed GYM command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum GymCommand {
    /// Wait for the next 60 Hz frame
    Frame,
    /// YM2612 (OPN2) write
    Ym2612Write { port: u8, reg: u8, data: u8 },
    /// SN76489 PSG write
    PsgWrite { data: u8 },
}

/// Get the number of bytes to read after the opcode, `None` for unknown opcodes
pub fn command_size(op: u8) -> Option<usize> {
    match op {
        opcode::FRAME => Some(0),
        opcode::YM2612_PORT0 | opcode::YM2612_PORT1 => Some(2),
        opcode::PSG => Some(1),
        _ => None,
    }
}
