//! Non-fatal diagnostics raised while decoding register writes
//!
//! The engine never logs directly from its decode paths; everything goes through a
//! [`DiagnosticSink`] handed to [`crate::chip::Ym2612`].

use crate::bits::hex;
use std::fmt;
use std::sync::mpsc::Sender;

/// Recognized chip functionality the emulator does not implement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    /// Register 0x22
    Lfo,
    /// Register 0x27, special/CSM modes
    Channel3Mode,
    /// AMS/FMS fields of 0xB4-0xB6
    LfoSensitivity,
    /// Capture opcode 0x03
    Psg,
}

impl Feature {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Lfo => "LFO",
            Self::Channel3Mode => "channel 3 mode",
            Self::LfoSensitivity => "LFO sensitivity",
            Self::Psg => "PSG",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    UnsupportedFeature { feature: Feature, value: u8 },
    UnknownRegister { bank: u8, register: u8, value: u8 },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFeature { feature, value } => {
                write!(f, "unsupported {} (data={})", feature.name(), hex(*value as u32, 2))
            }
            Self::UnknownRegister {
                bank,
                register,
                value,
            } => write!(
                f,
                "unknown register {}{} (data={})",
                bank,
                hex(*register as u32, 2),
                hex(*value as u32, 2)
            ),
        }
    }
}

/// Receiver for engine diagnostics
pub trait DiagnosticSink: Send {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::UnsupportedFeature { .. } => log::warn!("{}", diagnostic),
            Diagnostic::UnknownRegister { .. } => log::debug!("{}", diagnostic),
        }
    }
}

/// Drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}

impl DiagnosticSink for Sender<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        // A dropped receiver just means nobody is listening anymore
        let _ = self.send(diagnostic);
    }
}
