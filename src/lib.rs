pub mod bits;
pub mod chip;
pub mod config;
pub mod diag;
pub mod error;
pub mod gym;
pub mod wav;

pub use chip::{StereoBuffer, Ym2612};
pub use config::EngineConfig;
pub use error::Error;
