//! Integer formatting and bit helpers used by register traces

/// Format a value as zero-padded lowercase hex (`hex(0x2b, 2)` is `"2b"`)
pub fn hex(value: u32, width: usize) -> String {
    format!("{:0width$x}", value, width = width)
}

/// Format a value as zero-padded binary
pub fn bin(value: u32, width: usize) -> String {
    format!("{:0width$b}", value, width = width)
}

/// Extract a single bit
pub fn bit(value: u32, position: u32) -> u32 {
    (value >> position) & 1
}
