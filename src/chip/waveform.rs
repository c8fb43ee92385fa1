//! Periodic source functions evaluated by operators

use serde::Deserialize;
use std::f64::consts::{FRAC_PI_2, PI};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Triangle,
}

impl Waveform {
    /// Evaluate at `angle` radians; output is in [-1, 1]
    pub fn eval(self, angle: f64) -> f64 {
        match self {
            Self::Sine => angle.sin(),
            Self::Square => {
                if angle.sin() >= 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            Self::Triangle => triangle(angle),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "sine" | "sin" => Some(Self::Sine),
            "square" => Some(Self::Square),
            "triangle" => Some(Self::Triangle),
            _ => None,
        }
    }
}

fn triangle(angle: f64) -> f64 {
    let rem = angle.rem_euclid(2.0 * PI);
    // rem_euclid can round up to exactly 2*PI for tiny negative angles
    let quarter = ((rem / FRAC_PI_2) as u32).min(3);
    let t = (rem - quarter as f64 * FRAC_PI_2) / FRAC_PI_2;
    match quarter {
        0 => t,
        1 => 1.0 - t,
        2 => -t,
        _ => -1.0 + t,
    }
}
