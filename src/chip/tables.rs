//! Fixed lookup tables

use std::f64::consts::PI;

/// Attenuation increment per effective rate (0-63), scaled by 8
pub const ATTENUATION_INCREMENT: [u8; 64] = [
    0, 0, 4, 4, // 0-15
    4, 4, 6, 6, //
    4, 5, 6, 7, //
    4, 5, 6, 7, //
    4, 5, 6, 7, // 16-31
    4, 5, 6, 7, //
    4, 5, 6, 7, //
    4, 5, 6, 7, //
    4, 5, 6, 7, // 32-47
    4, 5, 6, 7, //
    4, 5, 6, 7, //
    4, 5, 6, 7, //
    8, 10, 12, 14, // 48-63
    16, 20, 24, 28, //
    32, 40, 48, 56, //
    64, 64, 64, 64, //
];

/// Clock the detune table was measured at
pub const DETUNE_REFERENCE_CLOCK: f64 = 8_000_000.0;

/// Detune offset in Hz, indexed by [key scaling note][detune & 3]
pub const DETUNE_TABLE: [[f64; 4]; 32] = [
    [0.0, 0.0, 0.053, 0.106], // block 0
    [0.0, 0.0, 0.053, 0.106],
    [0.0, 0.0, 0.053, 0.106],
    [0.0, 0.0, 0.053, 0.106],
    [0.0, 0.053, 0.106, 0.106], // block 1
    [0.0, 0.053, 0.106, 0.159],
    [0.0, 0.053, 0.106, 0.159],
    [0.0, 0.053, 0.106, 0.159],
    [0.0, 0.053, 0.106, 0.212], // block 2
    [0.0, 0.053, 0.159, 0.212],
    [0.0, 0.053, 0.159, 0.212],
    [0.0, 0.053, 0.159, 0.264],
    [0.0, 0.106, 0.212, 0.264], // block 3
    [0.0, 0.106, 0.212, 0.317],
    [0.0, 0.106, 0.212, 0.317],
    [0.0, 0.106, 0.264, 0.370],
    [0.0, 0.106, 0.264, 0.423], // block 4
    [0.0, 0.159, 0.317, 0.423],
    [0.0, 0.159, 0.317, 0.476],
    [0.0, 0.159, 0.370, 0.529],
    [0.0, 0.212, 0.423, 0.582], // block 5
    [0.0, 0.212, 0.423, 0.635],
    [0.0, 0.212, 0.476, 0.688],
    [0.0, 0.264, 0.529, 0.741],
    [0.0, 0.264, 0.582, 0.846], // block 6
    [0.0, 0.317, 0.635, 0.899],
    [0.0, 0.317, 0.688, 1.005],
    [0.0, 0.370, 0.741, 1.058],
    [0.0, 0.423, 0.846, 1.164], // block 7
    [0.0, 0.423, 0.846, 1.164],
    [0.0, 0.423, 0.846, 1.164],
    [0.0, 0.423, 0.846, 1.164],
];

/// Phase shift in radians applied to operator 1's own output for feedback level 0-7
pub fn feedback_radians(level: u8) -> f64 {
    match level & 7 {
        0 => 0.0,
        level => (64u32 >> (7 - level)) as f64 * PI / 16.0,
    }
}
