//! GYM capture reader and parser

use super::commands::{command_size, opcode, GymCommand};
use super::header::{GymHeader, GYM_HEADER_SIZE};
use crate::bits::hex;
use crate::error::{Error, Result};
use flate2::read::ZlibDecoder;
use std::borrow::Cow;
use std::io::Read;

/// Split a capture into its header and command body, inflating packed bodies
pub fn decode_capture(data: &[u8]) -> Result<(GymHeader, Cow<'_, [u8]>)> {
    let header = GymHeader::parse(data)?;
    let body = &data[GYM_HEADER_SIZE..];

    if !header.is_packed() {
        return Ok((header, Cow::Borrowed(body)));
    }

    // The header value is untrusted; cap the hint at a generous zlib ratio
    let hint = (header.packed_size as usize).min(body.len().saturating_mul(64));
    let mut inflated = Vec::with_capacity(hint);
    ZlibDecoder::new(body)
        .read_to_end(&mut inflated)
        .map_err(|e| Error::CaptureHeader(format!("packed body does not inflate: {}", e)))?;
    if inflated.len() != header.packed_size as usize {
        log::warn!(
            "packed body inflated to {} bytes, header says {}",
            inflated.len(),
            header.packed_size
        );
    }
    Ok((header, Cow::Owned(inflated)))
}

/// GYM command body reader
pub struct GymReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> GymReader<'a> {
    /// Create a reader over command data (header already stripped)
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Check if we've reached the end of data
    pub fn is_eof(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Get current position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Read a single byte
    fn read_u8(&mut self) -> Result<u8> {
        match self.data.get(self.pos) {
            Some(&b) => {
                self.pos += 1;
                Ok(b)
            }
            None => Err(Error::MalformedCaptureStream {
                offset: self.pos,
                message: "unexpected end of data".into(),
            }),
        }
    }

    /// Parse all commands from the body
    pub fn parse_commands(&mut self) -> Result<Vec<GymCommand>> {
        let mut commands = Vec::new();
        while let Some(cmd) = self.next_command()? {
            commands.push(cmd);
        }
        Ok(commands)
    }

    /// Parse a single command, `None` at end of data
    pub fn next_command(&mut self) -> Result<Option<GymCommand>> {
        if self.is_eof() {
            return Ok(None);
        }

        let start = self.pos;
        let op = self.read_u8()?;
        let size = command_size(op).ok_or_else(|| Error::MalformedCaptureStream {
            offset: start,
            message: format!("unknown command {}", hex(op as u32, 2)),
        })?;
        if self.pos + size > self.data.len() {
            return Err(Error::MalformedCaptureStream {
                offset: start,
                message: format!("command {} truncated", hex(op as u32, 2)),
            });
        }

        let cmd = match op {
            opcode::FRAME => GymCommand::Frame,
            opcode::YM2612_PORT0 | opcode::YM2612_PORT1 => {
                let reg = self.read_u8()?;
                let data = self.read_u8()?;
                GymCommand::Ym2612Write {
                    port: op - opcode::YM2612_PORT0,
                    reg,
                    data,
                }
            }
            _ => GymCommand::PsgWrite {
                data: self.read_u8()?,
            },
        };
        Ok(Some(cmd))
    }
}
