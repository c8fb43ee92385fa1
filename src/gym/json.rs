//! JSON serialization types for GYM data

use super::commands::GymCommand;
use super::header::GymHeader;
use serde::Serialize;

/// Top-level JSON structure for a GYM capture
#[derive(Debug, Clone, Serialize)]
pub struct GymJson {
    /// Header fields (absent when the capture has no GYMX tag)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<GymHeader>,
    /// Number of 60 Hz frames
    pub frames: usize,
    /// Duration in seconds
    pub duration: f64,
    pub commands: Vec<GymCommand>,
}

impl GymJson {
    pub fn new(header: &GymHeader, commands: Vec<GymCommand>) -> Self {
        let frames = commands
            .iter()
            .filter(|c| matches!(c, GymCommand::Frame))
            .count();
        Self {
            header: header.tagged.then(|| header.clone()),
            frames,
            duration: frames as f64 / 60.0,
            commands,
        }
    }
}
