//! FM operator: one oscillator with its own envelope

use super::envelope::{Envelope, EnvelopePhase, MAX_ATTENUATION};
use super::tables::{DETUNE_REFERENCE_CLOCK, DETUNE_TABLE};
use super::waveform::Waveform;
use super::GLOBAL_ATTENUATION;
use crate::bits::bit;
use crate::config::ModulationMode;
use std::f64::consts::PI;

/// Per-render settings shared by every operator of the chip
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    pub sample_rate: f64,
    pub waveform: Waveform,
    pub modulation: ModulationMode,
    pub envelope_divider: u32,
}

/// Where an operator reads its upstream signal from
#[derive(Debug, Clone, Copy)]
pub enum Modulation<'a> {
    /// Entry operator, nothing upstream
    None,
    /// The output buffer itself holds the upstream signal
    InPlace,
    From(&'a [f64]),
}

/// Channel base frequency in Hz: `fnumber * (clock / 144) * 2^(block - 21)`
pub fn channel_frequency(fnumber: u16, block: u8, clock: u32) -> f64 {
    fnumber as f64 * (clock as f64 / 144.0) * 2f64.powi(block as i32 - 21)
}

/// 5-bit key code from block and the top F-number bits
pub fn key_scaling_note(fnumber: u16, block: u8) -> u8 {
    let f = fnumber as u32;
    let (f11, f10, f9, f8) = (bit(f, 10), bit(f, 9), bit(f, 8), bit(f, 7));
    let n3 = (f11 & (f10 | f9 | f8)) | ((f11 ^ 1) & f10 & f9 & f8);
    ((block & 7) << 2) | ((f11 << 1) | n3) as u8
}

#[derive(Debug, Clone, Default)]
pub struct Operator {
    angle: f64,
    frequency: f64,
    detune: u8,
    multiple: u8,
    key_scaling_note: u8,
    key_scaling_factor: u8,
    total_level: u8,
    am_enabled: bool,
    sample_counter: u32,
    envelope: Envelope,
    /// Last two raw outputs, for feedback
    history: [f64; 2],
}

impl Operator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn total_level(&self) -> u8 {
        self.total_level
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn key_scaling_note(&self) -> u8 {
        self.key_scaling_note
    }

    pub fn am_enabled(&self) -> bool {
        self.am_enabled
    }

    pub fn key(&mut self, on: bool) {
        if on {
            self.envelope.key_on();
        } else {
            self.envelope.key_off();
        }
    }

    /// Detune (bits 4-6) and multiple (bits 0-3); the caller recomputes frequency afterwards
    pub fn set_detune_multiple(&mut self, data: u8) {
        self.detune = (data >> 4) & 7;
        self.multiple = data & 0xf;
    }

    pub fn set_total_level(&mut self, level: u8) {
        self.total_level = level & 0x7f;
    }

    pub fn set_key_scale_attack(&mut self, data: u8) {
        self.key_scaling_factor = data >> 6;
        self.envelope.set_rate(EnvelopePhase::Attack, data & 0x1f);
    }

    pub fn set_am_decay(&mut self, data: u8) {
        self.am_enabled = data & 0x80 != 0;
        self.envelope.set_rate(EnvelopePhase::Decay, data & 0x1f);
    }

    pub fn set_sustain_rate(&mut self, data: u8) {
        self.envelope.set_rate(EnvelopePhase::Sustain, data & 0x1f);
    }

    /// Sustain level is scaled x8 (0-120), release rate x2+1 (1-31)
    pub fn set_sustain_release(&mut self, data: u8) {
        self.envelope.set_sustain_level((data >> 4) * 8);
        self.envelope.set_rate(EnvelopePhase::Release, (data & 0xf) * 2 + 1);
    }

    /// Recompute the effective frequency from the channel's F-number and block
    pub fn update_frequency(&mut self, fnumber: u16, block: u8, clock: u32) {
        let base = channel_frequency(fnumber, block, clock);
        self.frequency = if self.multiple == 0 {
            base / 2.0
        } else {
            base * self.multiple as f64
        };

        self.key_scaling_note = key_scaling_note(fnumber, block);

        let detune = DETUNE_TABLE[self.key_scaling_note as usize][(self.detune & 3) as usize]
            * clock as f64
            / DETUNE_REFERENCE_CLOCK;
        if self.detune & 4 != 0 {
            self.frequency -= detune;
        } else {
            self.frequency += detune;
        }
        self.frequency = self.frequency.max(0.0);
    }

    /// Linear gain from envelope and total level
    fn gain(&self) -> f64 {
        let db = self.envelope.attenuation() * 48.0 / MAX_ATTENUATION
            + self.total_level as f64 * 96.0 / 127.0;
        10f64.powf(-db / 20.0)
    }

    /// Render `output.len()` samples, overwriting `output` or summing into it when `mix`
    /// is set. `feedback` is the phase shift in radians applied to this operator's own
    /// previous output.
    pub fn process(
        &mut self,
        ctx: &RenderContext,
        modulation: Modulation<'_>,
        output: &mut [f64],
        mix: bool,
        feedback: f64,
    ) {
        if self.frequency == 0.0 {
            if !mix {
                output.fill(0.0);
            }
            return;
        }

        let step = self.frequency * 2.0 * PI / ctx.sample_rate;
        for i in 0..output.len() {
            let gain = self.gain();

            self.sample_counter += 1;
            if self.sample_counter >= ctx.envelope_divider {
                self.sample_counter = 0;
                self.envelope.step(self.key_scaling_note, self.key_scaling_factor);
            }

            let mut angle = self.angle;
            if ctx.modulation == ModulationMode::Phase {
                let upstream = match modulation {
                    Modulation::None => 0.0,
                    Modulation::InPlace => output[i],
                    Modulation::From(input) => input[i],
                };
                angle += upstream * GLOBAL_ATTENUATION * PI;
            }
            if feedback != 0.0 {
                angle += feedback * (self.history[0] + self.history[1]) / 2.0;
            }

            let raw = ctx.waveform.eval(angle) * gain;
            self.history = [self.history[1], raw];

            let sample = raw / GLOBAL_ATTENUATION;
            if mix {
                output[i] += sample;
            } else {
                output[i] = sample;
            }
            self.angle += step;
        }
    }
}
