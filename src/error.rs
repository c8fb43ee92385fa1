use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid channel: key event addresses channel code {0}")]
    InvalidChannel(u8),

    #[error("Invalid register bank: {0}")]
    InvalidBank(u8),

    #[error("Malformed capture stream at offset {offset:#x}: {message}")]
    MalformedCaptureStream { offset: usize, message: String },

    #[error("Capture header error: {0}")]
    CaptureHeader(String),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
