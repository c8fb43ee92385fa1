//! Sums channel outputs into the chip's stereo output

use super::GLOBAL_ATTENUATION;

/// Accumulates stereo channel buffers and applies the global attenuation
#[derive(Debug, Default)]
pub struct Mixer {
    left: Vec<f64>,
    right: Vec<f64>,
}

impl Mixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the accumulators for a block of `len` samples
    pub fn begin(&mut self, len: usize) {
        self.left.clear();
        self.left.resize(len, 0.0);
        self.right.clear();
        self.right.resize(len, 0.0);
    }

    pub fn add(&mut self, left: &[f64], right: &[f64]) {
        for (acc, s) in self.left.iter_mut().zip(left) {
            *acc += s;
        }
        for (acc, s) in self.right.iter_mut().zip(right) {
            *acc += s;
        }
    }

    /// Write the scaled mix into the output slices
    pub fn finish(&self, left: &mut [f32], right: &mut [f32]) {
        for (out, s) in left.iter_mut().zip(&self.left) {
            *out = (s / GLOBAL_ATTENUATION) as f32;
        }
        for (out, s) in right.iter_mut().zip(&self.right) {
            *out = (s / GLOBAL_ATTENUATION) as f32;
        }
    }
}
