//! YM2612 (OPN2) FM sound chip emulation
//!
//! Six channels of four operators each, split over two register banks of three channels.
//! Register writes go through [`Ym2612::write_register`]; audio comes out of
//! [`Ym2612::render_samples`].

pub mod bank;
pub mod channel;
pub mod envelope;
pub mod mixer;
pub mod operator;
pub mod tables;
pub mod waveform;

use crate::bits::hex;
use crate::config::EngineConfig;
use crate::diag::{Diagnostic, DiagnosticSink, Feature, LogSink};
use crate::error::{Error, Result};
use bank::ChannelBank;
use channel::Channel;
use mixer::Mixer;
use operator::RenderContext;

/// Output headroom for six summed channels
pub const GLOBAL_ATTENUATION: f64 = 6.0;

/// Bank-independent registers (bank 0 only)
pub mod reg {
    pub const LFO: u8 = 0x22;
    pub const CH3_MODE: u8 = 0x27;
    pub const KEY_ON_OFF: u8 = 0x28;
    /// First register decoded by the channel banks
    pub const BANK_START: u8 = 0x30;
}

/// Rendered stereo audio, normalized to roughly [-1, 1]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StereoBuffer {
    pub left: Vec<f32>,
    pub right: Vec<f32>,
}

impl StereoBuffer {
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Interleave as L R L R ...
    pub fn interleaved(&self) -> Vec<f32> {
        self.left
            .iter()
            .zip(&self.right)
            .flat_map(|(&l, &r)| [l, r])
            .collect()
    }
}

pub struct Ym2612 {
    config: EngineConfig,
    memory: [[u8; 256]; 2],
    banks: [ChannelBank; 2],
    mixer: Mixer,
    scratch_left: Vec<f64>,
    scratch_right: Vec<f64>,
    frame: u64,
    sink: Box<dyn DiagnosticSink>,
}

impl Default for Ym2612 {
    fn default() -> Self {
        Self::new()
    }
}

impl Ym2612 {
    /// Fresh chip: registers zeroed, operators silent in Release, frequencies zero
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            memory: [[0; 256]; 2],
            banks: [ChannelBank::new(0), ChannelBank::new(1)],
            mixer: Mixer::new(),
            scratch_left: Vec::new(),
            scratch_right: Vec::new(),
            frame: 0,
            sink: Box::new(LogSink),
        }
    }

    /// Replace the diagnostic sink (defaults to [`LogSink`])
    pub fn with_diagnostics(mut self, sink: Box<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    /// Frames seen through [`Ym2612::advance_frame`]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Last value written to `register` of `bank`
    pub fn register(&self, bank: u8, register: u8) -> u8 {
        self.memory[(bank & 1) as usize][register as usize]
    }

    /// Channel 0-5 (CH1-CH6); panics on any other index
    pub fn channel(&self, index: usize) -> &Channel {
        &self.banks[index / 3].channels()[index % 3]
    }

    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.banks.iter().flat_map(|b| b.channels().iter())
    }

    /// Forward a diagnostic from outside the engine (e.g. a capture player)
    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.sink.report(diagnostic);
    }

    pub fn write_register(&mut self, bank: u8, register: u8, value: u8) -> Result<()> {
        if bank > 1 {
            return Err(Error::InvalidBank(bank));
        }
        self.memory[bank as usize][register as usize] = value;

        if register < reg::BANK_START {
            if bank != 0 {
                return Ok(());
            }
            match register {
                reg::LFO => self.sink.report(Diagnostic::UnsupportedFeature {
                    feature: Feature::Lfo,
                    value,
                }),
                reg::CH3_MODE => {
                    if value >> 6 != 0 {
                        self.sink.report(Diagnostic::UnsupportedFeature {
                            feature: Feature::Channel3Mode,
                            value,
                        });
                    }
                }
                reg::KEY_ON_OFF => return self.key_event(value),
                _ => self.sink.report(Diagnostic::UnknownRegister {
                    bank,
                    register,
                    value,
                }),
            }
            return Ok(());
        }

        self.banks[bank as usize].write(
            &self.memory[bank as usize],
            register,
            value,
            self.config.clock,
            self.sink.as_mut(),
        );
        Ok(())
    }

    /// Key operators on or off. Bits 0-2 select the channel (0-2 bank 0, 4-6 bank 1),
    /// bits 4-7 key operators 1-4.
    pub fn key_event(&mut self, data: u8) -> Result<()> {
        let code = data & 7;
        if code == 3 || code == 7 {
            return Err(Error::InvalidChannel(code));
        }
        let bank = (code >> 2) as usize;
        let slot = (code & 3) as usize;
        let channel = &mut self.banks[bank].channels_mut()[slot];
        log::debug!(
            "[CH{}] key mask={} (data={})",
            channel.number(),
            crate::bits::bin((data >> 4) as u32, 4),
            hex(data as u32, 2)
        );
        channel.key(data >> 4);
        Ok(())
    }

    /// 60 Hz frame marker; does not affect synthesis
    pub fn advance_frame(&mut self) {
        self.frame += 1;
    }

    pub fn render_samples(&mut self, count: usize) -> StereoBuffer {
        let mut out = StereoBuffer {
            left: vec![0.0; count],
            right: vec![0.0; count],
        };
        self.render_into(&mut out.left, &mut out.right);
        out
    }

    /// Render `min(left.len(), right.len())` samples into the front of both slices.
    /// The tail of the longer slice is left untouched.
    pub fn render_into(&mut self, left: &mut [f32], right: &mut [f32]) {
        let len = left.len().min(right.len());
        let ctx = RenderContext {
            sample_rate: self.config.sample_rate as f64,
            waveform: self.config.waveform,
            modulation: self.config.modulation,
            envelope_divider: self.config.envelope_divider.max(1),
        };

        self.scratch_left.resize(len, 0.0);
        self.scratch_right.resize(len, 0.0);
        self.mixer.begin(len);
        for bank in &mut self.banks {
            for channel in bank.channels_mut() {
                channel.render(&ctx, &mut self.scratch_left, &mut self.scratch_right);
                self.mixer.add(&self.scratch_left, &self.scratch_right);
            }
        }
        self.mixer.finish(&mut left[..len], &mut right[..len]);
    }
}
