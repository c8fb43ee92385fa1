//! Register decode for one half of the chip (three channels)

use super::channel::Channel;
use crate::bits::hex;
use crate::diag::{Diagnostic, DiagnosticSink, Feature};

/// FMS in percent of a halftone, for trace output
const FMS_TABLE: [f32; 8] = [0.0, 3.4, 6.7, 10.0, 14.0, 20.0, 40.0, 80.0];
/// AMS in dB
const AMS_TABLE: [f32; 4] = [0.0, 1.4, 5.9, 11.8];

/// Physical operator slot (address bits 2-3) to logical operator index: the chip
/// addresses operators in the order OP1, OP3, OP2, OP4
pub const SLOT_TO_OPERATOR: [usize; 4] = [0, 2, 1, 3];

#[derive(Debug, Clone)]
pub struct ChannelBank {
    index: u8,
    channels: [Channel; 3],
}

impl ChannelBank {
    pub fn new(index: u8) -> Self {
        Self {
            index,
            channels: [
                Channel::new(index, 0),
                Channel::new(index, 1),
                Channel::new(index, 2),
            ],
        }
    }

    pub fn channels(&self) -> &[Channel; 3] {
        &self.channels
    }

    pub fn channels_mut(&mut self) -> &mut [Channel; 3] {
        &mut self.channels
    }

    /// Decode a write at `register >= 0x30`. `memory` is this bank's register file and
    /// already holds the new value.
    pub fn write(
        &mut self,
        memory: &[u8; 256],
        register: u8,
        data: u8,
        clock: u32,
        sink: &mut dyn DiagnosticSink,
    ) {
        let decoded = match register {
            0x30..=0x8f => self.write_operator(register, data, clock),
            0xa0..=0xa2 => {
                let ch = (register & 3) as usize;
                let high = memory[0xa4 + ch];
                let fnumber = ((high as u16 & 7) << 8) | memory[0xa0 + ch] as u16;
                let block = (high >> 3) & 7;
                let channel = &mut self.channels[ch];
                channel.set_frequency(fnumber, block, clock);
                log::debug!(
                    "[CH{}] fnumber={} block={} frequency={:.3}",
                    channel.number(),
                    fnumber,
                    block,
                    super::operator::channel_frequency(fnumber, block, clock)
                );
                true
            }
            // High byte is latched in memory and picked up by the next low-byte write
            0xa4..=0xa6 => true,
            0xb0..=0xb2 => {
                self.channels[(register & 3) as usize].set_algorithm_feedback(data);
                true
            }
            0xb4..=0xb6 => {
                self.write_stereo_lfo(register, data, sink);
                true
            }
            _ => false,
        };

        if !decoded {
            sink.report(Diagnostic::UnknownRegister {
                bank: self.index,
                register,
                value: data,
            });
        }
    }

    fn write_operator(&mut self, register: u8, data: u8, clock: u32) -> bool {
        let ch = (register & 3) as usize;
        if ch == 3 {
            return false;
        }
        let index = SLOT_TO_OPERATOR[((register >> 2) & 3) as usize];
        let channel = &mut self.channels[ch];
        log::debug!(
            "[CH{} OP{}] reg={} data={}",
            channel.number(),
            index + 1,
            hex(register as u32, 2),
            hex(data as u32, 2)
        );

        let op = channel.operator_mut(index);
        match register & 0xf0 {
            0x30 => {
                op.set_detune_multiple(data);
                channel.update_operator_frequency(index, clock);
            }
            0x40 => op.set_total_level(data),
            0x50 => op.set_key_scale_attack(data),
            0x60 => op.set_am_decay(data),
            0x70 => op.set_sustain_rate(data),
            0x80 => op.set_sustain_release(data),
            _ => return false,
        }
        true
    }

    fn write_stereo_lfo(&mut self, register: u8, data: u8, sink: &mut dyn DiagnosticSink) {
        let channel = &mut self.channels[(register & 3) as usize];
        channel.set_output(data & 0x80 != 0, data & 0x40 != 0);

        let fms = data & 7;
        let ams = (data >> 4) & 3;
        log::debug!(
            "[CH{}] FMS=+/-{}% of halftone, AMS={}dB, left={} right={}",
            channel.number(),
            FMS_TABLE[fms as usize],
            AMS_TABLE[ams as usize],
            channel.mix_left(),
            channel.mix_right()
        );
        if fms != 0 || ams != 0 {
            sink.report(Diagnostic::UnsupportedFeature {
                feature: Feature::LfoSensitivity,
                value: data,
            });
        }
    }
}
