//! Engine configuration

use crate::chip::waveform::Waveform;
use crate::error::Result;
use serde::Deserialize;
use std::path::Path;

/// Japanese Mega Drive master clock
pub const MEGADRIVE_CLOCK: u32 = 7_670_454;

pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

/// Rendered samples per envelope step
pub const DEFAULT_ENVELOPE_DIVIDER: u32 = 3;

/// How an upstream operator buffer affects the next operator in an algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModulationMode {
    /// Upstream buffers only decide whether an operator overwrites or sums into the output
    #[default]
    Summation,
    /// Upstream buffers shift the phase of the next operator (true FM)
    Phase,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub sample_rate: u32,
    pub clock: u32,
    pub waveform: Waveform,
    pub modulation: ModulationMode,
    pub envelope_divider: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            clock: MEGADRIVE_CLOCK,
            waveform: Waveform::Sine,
            modulation: ModulationMode::Summation,
            envelope_divider: DEFAULT_ENVELOPE_DIVIDER,
        }
    }
}

impl EngineConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(text)?;
        config.envelope_divider = config.envelope_divider.max(1);
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Samples rendered for each 60 Hz capture frame
    pub fn samples_per_frame(&self) -> usize {
        (self.sample_rate / 60) as usize
    }

    /// `clock / 144`, the F-number scale factor
    pub fn fm_over_144(&self) -> f64 {
        self.clock as f64 / 144.0
    }
}
