//! Drives a [`Ym2612`] from GYM commands

use super::commands::GymCommand;
use super::reader::GymReader;
use crate::chip::{StereoBuffer, Ym2612};
use crate::diag::{Diagnostic, Feature};
use crate::error::Result;

pub struct GymPlayer {
    chip: Ym2612,
    max_frames: Option<u64>,
    frames: u64,
    writes: u64,
}

impl GymPlayer {
    pub fn new(chip: Ym2612) -> Self {
        Self {
            chip,
            max_frames: None,
            frames: 0,
            writes: 0,
        }
    }

    /// Stop after rendering `frames` frames
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    pub fn chip(&self) -> &Ym2612 {
        &self.chip
    }

    pub fn into_chip(self) -> Ym2612 {
        self.chip
    }

    /// Frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn limit_reached(&self) -> bool {
        self.max_frames.is_some_and(|max| self.frames >= max)
    }

    /// Apply one command; frames append `sample_rate / 60` samples to `out`
    pub fn apply(&mut self, command: GymCommand, out: &mut StereoBuffer) -> Result<()> {
        match command {
            GymCommand::Frame => {
                self.chip.advance_frame();
                let count = self.chip.config().samples_per_frame();
                let rendered = self.chip.render_samples(count);
                out.left.extend_from_slice(&rendered.left);
                out.right.extend_from_slice(&rendered.right);
                self.frames += 1;
            }
            GymCommand::Ym2612Write { port, reg, data } => {
                self.chip.write_register(port, reg, data)?;
                self.writes += 1;
            }
            GymCommand::PsgWrite { data } => self.chip.report(Diagnostic::UnsupportedFeature {
                feature: Feature::Psg,
                value: data,
            }),
        }
        Ok(())
    }

    /// Play a command body (header already stripped) in file order
    pub fn play(&mut self, body: &[u8]) -> Result<StereoBuffer> {
        let mut out = StereoBuffer::default();
        let mut reader = GymReader::new(body);

        while !self.limit_reached() {
            match reader.next_command()? {
                Some(command) => self.apply(command, &mut out)?,
                None => break,
            }
        }

        log::info!(
            "played {} frames, {} register writes, {} samples",
            self.frames,
            self.writes,
            out.len()
        );
        Ok(out)
    }
}
