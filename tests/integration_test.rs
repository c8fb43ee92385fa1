//! Integration tests for chip rendering and capture playback
//!
//! These tests drive the engine through register writes or synthetic GYM captures and
//! check the rendered audio

use flate2::write::GzEncoder;
use flate2::Compression;
use gymck::chip::envelope::EnvelopePhase;
use gymck::gym::header::GYM_HEADER_SIZE;
use gymck::gym::{decode_capture, read_capture_file, GymCommand, GymPlayer, GymReader};
use gymck::{EngineConfig, Error, StereoBuffer, Ym2612};
use std::io::Write;
use tempfile::tempdir;

/// Register writes voicing channel 1 as four in-phase carriers at 440 Hz
const A440_VOICE: &[(u8, u8)] = &[
    (0xb0, 0x07), // algorithm 7, no feedback
    (0xb4, 0xc0), // left + right
    (0x30, 0x01),
    (0x34, 0x01),
    (0x38, 0x01),
    (0x3c, 0x01),
    (0x40, 0x00),
    (0x44, 0x00),
    (0x48, 0x00),
    (0x4c, 0x00),
    (0x50, 0x1f),
    (0x54, 0x1f),
    (0x58, 0x1f),
    (0x5c, 0x1f),
    (0xa4, 0x24), // block 4, F-number 1083
    (0xa0, 0x3b),
];

fn voiced_chip() -> Ym2612 {
    let mut chip = Ym2612::new();
    for &(reg, data) in A440_VOICE {
        chip.write_register(0, reg, data).unwrap();
    }
    chip
}

/// Build a capture with an untagged header
fn capture(writes: &[(u8, u8, u8)], frames: usize) -> Vec<u8> {
    let mut data = vec![0u8; GYM_HEADER_SIZE];
    for &(port, reg, value) in writes {
        data.extend_from_slice(&[port + 1, reg, value]);
    }
    data.extend(std::iter::repeat(0x00).take(frames));
    data
}

fn rising_zero_crossings(samples: &[f32]) -> usize {
    samples
        .windows(2)
        .filter(|w| w[0] < 0.0 && w[1] >= 0.0)
        .count()
}

fn peak(buffer: &StereoBuffer) -> f32 {
    buffer
        .left
        .iter()
        .chain(&buffer.right)
        .fold(0.0f32, |m, s| m.max(s.abs()))
}

// =============================================================================
// Engine scenarios
// =============================================================================

#[test]
fn test_a440_is_periodic_and_stereo() {
    let mut chip = voiced_chip();
    chip.key_event(0xf0).unwrap();

    let out = chip.render_samples(48_000);
    assert_eq!(out.len(), 48_000);
    assert!(peak(&out) > 0.05, "output should not be silent");
    assert_eq!(out.left, out.right);

    // Half a second after the envelope settled: 220 periods
    let crossings = rising_zero_crossings(&out.left[24_000..]);
    assert!(
        (218..=222).contains(&crossings),
        "expected ~220 periods, got {}",
        crossings
    );
}

#[test]
fn test_silent_without_stereo_enable() {
    let mut chip = voiced_chip();
    chip.write_register(0, 0xb4, 0x00).unwrap();
    chip.key_event(0xf0).unwrap();
    let out = chip.render_samples(4800);
    assert_eq!(peak(&out), 0.0);
}

#[test]
fn test_total_level_127_is_negligible() {
    let mut chip = voiced_chip();
    for reg in [0x40, 0x44, 0x48, 0x4c] {
        chip.write_register(0, reg, 0x7f).unwrap();
    }
    chip.key_event(0xf0).unwrap();
    let out = chip.render_samples(9600);
    assert!(peak(&out) < 1e-5);
}

#[test]
fn test_high_byte_alone_keeps_frequency() {
    let mut chip = voiced_chip();
    let before: Vec<f64> = chip.channel(0).operators().iter().map(|o| o.frequency()).collect();

    chip.write_register(0, 0xa4, 0x3f).unwrap();
    let latched: Vec<f64> = chip.channel(0).operators().iter().map(|o| o.frequency()).collect();
    assert_eq!(before, latched);

    chip.write_register(0, 0xa0, 0x3b).unwrap();
    let after: Vec<f64> = chip.channel(0).operators().iter().map(|o| o.frequency()).collect();
    assert!(after.iter().zip(&before).all(|(a, b)| a > b));
}

#[test]
fn test_key_event_rejects_channels_3_and_7() {
    let mut chip = Ym2612::new();
    for data in 0..=255u8 {
        if matches!(data & 7, 3 | 7) {
            assert!(matches!(chip.key_event(data), Err(Error::InvalidChannel(_))));
            assert!(matches!(
                chip.write_register(0, 0x28, data),
                Err(Error::InvalidChannel(_))
            ));
        }
    }
}

#[test]
fn test_key_on_off_phases() {
    let mut chip = voiced_chip();
    chip.key_event(0xf0).unwrap();
    chip.render_samples(4800);
    assert!(chip
        .channel(0)
        .operators()
        .iter()
        .all(|op| op.envelope().phase() != EnvelopePhase::Attack));

    chip.key_event(0x00).unwrap();
    assert!(chip
        .channel(0)
        .operators()
        .iter()
        .all(|op| op.envelope().phase() == EnvelopePhase::Release));

    chip.key_event(0xf0).unwrap();
    assert!(chip
        .channel(0)
        .operators()
        .iter()
        .all(|op| op.envelope().phase() == EnvelopePhase::Attack));
}

#[test]
fn test_release_fades_out() {
    let mut chip = voiced_chip();
    for reg in [0x80, 0x84, 0x88, 0x8c] {
        chip.write_register(0, reg, 0x0f).unwrap();
    }
    chip.key_event(0xf0).unwrap();
    let held = chip.render_samples(4800);
    chip.key_event(0x00).unwrap();
    chip.render_samples(48_000);
    let released = chip.render_samples(4800);
    assert!(peak(&released) < peak(&held) / 10.0);
}

#[test]
fn test_config_sample_rate() {
    let config = EngineConfig::from_json(r#"{ "sample_rate": 44100 }"#).unwrap();
    let mut chip = Ym2612::with_config(config);
    for &(reg, data) in A440_VOICE {
        chip.write_register(0, reg, data).unwrap();
    }
    chip.key_event(0xf0).unwrap();
    let out = chip.render_samples(44_100);
    let crossings = rising_zero_crossings(&out.left[22_050..]);
    assert!((218..=222).contains(&crossings), "got {}", crossings);
}

// =============================================================================
// Capture playback
// =============================================================================

#[test]
fn test_capture_playback_matches_direct_rendering() {
    let mut writes: Vec<(u8, u8, u8)> = A440_VOICE.iter().map(|&(r, d)| (0, r, d)).collect();
    writes.push((0, 0x28, 0xf0));
    let data = capture(&writes, 60);

    let (header, body) = decode_capture(&data).unwrap();
    assert!(!header.tagged);
    let mut player = GymPlayer::new(Ym2612::new());
    let played = player.play(&body).unwrap();
    assert_eq!(played.len(), 48_000);
    assert_eq!(player.chip().frame(), 60);

    let mut chip = voiced_chip();
    chip.key_event(0xf0).unwrap();
    let mut direct = StereoBuffer::default();
    for _ in 0..60 {
        let block = chip.render_samples(800);
        direct.left.extend(block.left);
        direct.right.extend(block.right);
    }
    assert_eq!(played, direct);
}

#[test]
fn test_capture_bank_1_channel() {
    let mut writes: Vec<(u8, u8, u8)> = A440_VOICE.iter().map(|&(r, d)| (1, r, d)).collect();
    writes.push((0, 0x28, 0xf4));
    let data = capture(&writes, 10);
    let (_, body) = decode_capture(&data).unwrap();

    let mut player = GymPlayer::new(Ym2612::new());
    let out = player.play(&body).unwrap();
    assert!(peak(&out) > 0.05);
    assert_eq!(player.chip().channel(3).algorithm(), 7);
}

#[test]
fn test_psg_writes_are_skipped() {
    let mut data = capture(&[], 0);
    data.extend_from_slice(&[0x03, 0x9f, 0x03, 0xbf, 0x00]);
    let (_, body) = decode_capture(&data).unwrap();
    let commands = GymReader::new(&body).parse_commands().unwrap();
    assert_eq!(commands.len(), 3);
    assert_eq!(commands[2], GymCommand::Frame);

    let out = GymPlayer::new(Ym2612::new()).play(&body).unwrap();
    assert_eq!(out.len(), 800);
}

#[test]
fn test_malformed_capture_aborts() {
    let mut data = capture(&[(0, 0xb0, 0x07)], 2);
    data.push(0x42);
    data.push(0x00);
    let (_, body) = decode_capture(&data).unwrap();
    let result = GymPlayer::new(Ym2612::new()).play(&body);
    assert!(matches!(
        result,
        Err(Error::MalformedCaptureStream { offset: 5, .. })
    ));
}

#[test]
fn test_gzip_capture_file_and_wav_export() {
    let mut writes: Vec<(u8, u8, u8)> = A440_VOICE.iter().map(|&(r, d)| (0, r, d)).collect();
    writes.push((0, 0x28, 0xf0));
    let data = capture(&writes, 6);

    let dir = tempdir().unwrap();
    let gym_path = dir.path().join("song.gym.gz");
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&data).unwrap();
    std::fs::write(&gym_path, encoder.finish().unwrap()).unwrap();

    let loaded = read_capture_file(&gym_path).unwrap();
    assert_eq!(loaded, data);

    let (_, body) = decode_capture(&loaded).unwrap();
    let audio = GymPlayer::new(Ym2612::new()).play(&body).unwrap();

    let wav_path = dir.path().join("song.wav");
    gymck::wav::write_wav(&wav_path, &audio, 48_000).unwrap();
    let reader = hound::WavReader::open(&wav_path).unwrap();
    assert_eq!(reader.spec().channels, 2);
    assert_eq!(reader.len() as usize, 2 * 6 * 800);
}
