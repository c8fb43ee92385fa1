//! WAV export of rendered audio

use crate::chip::StereoBuffer;
use crate::error::Result;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::Path;

/// Convert a normalized sample to 16-bit PCM
pub fn to_pcm_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16
}

/// Write 16-bit stereo PCM
pub fn write_wav(path: &Path, buffer: &StereoBuffer, sample_rate: u32) -> Result<()> {
    let spec = WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for (&l, &r) in buffer.left.iter().zip(&buffer.right) {
        writer.write_sample(to_pcm_i16(l))?;
        writer.write_sample(to_pcm_i16(r))?;
    }
    writer.finalize()?;

    log::info!(
        "wrote {} ({} samples at {} Hz)",
        path.display(),
        buffer.len(),
        sample_rate
    );
    Ok(())
}
