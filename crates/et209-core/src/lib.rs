//! ET209 Synthesizer Emulator for the ARS
//!
//! A sample-accurate emulator of the Eiling Technologies ET209, the sound chip
//! of the ARS console. Simulates every voice, the noise unit and the mixer bit
//! for bit, then models the board-level RC filters in floating point.
//!
//! # Features
//! - Seven phase-accumulator voices with waveform shaping and rate slewing
//! - 15-bit LFSR noise with sub-rate gating and periodic mode
//! - Four-bus mixer (center, right, left, boosted)
//! - Mono, stereo and headphone filter stages
//! - Revision presets for the exact ARS rate, 48 kHz, and the early mono part
//!
//! # Crate feature flags
//! - `export-wav` (default): WAV file writing via hound
//!
//! # Quick start
//! ```
//! use et209::{Et209, OutputMode};
//!
//! let mut chip = Et209::new();
//! chip.write_voice_rate(0, 449); // ~330 Hz
//! chip.write_voice_waveform(0, 0x10); // square
//! chip.write_voice_volume(0, 64); // full volume
//!
//! let audio = chip.render(OutputMode::Stereo, 800);
//! assert_eq!(audio.channel(0).map(<[f32]>::len), Some(800));
//! ```

#![warn(missing_docs)]

pub mod buffer;
pub mod config;
pub mod et209; // Chip emulation (core)
pub mod export;
pub mod filter;
pub mod util;

/// Error types for ET209 emulator operations
#[derive(thiserror::Error, Debug)]
pub enum Et209Error {
    /// Host buffer is neither mono nor stereo
    #[error("Unsupported number of channels: {0} (expected 1 or 2)")]
    UnsupportedChannelCount(usize),

    /// IO error from filesystem
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Audio file encoding error
    #[error("Audio file error: {0}")]
    AudioFileError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

/// Result type for emulator operations
pub type Result<T> = std::result::Result<T, Et209Error>;

// Public API exports
pub use buffer::{ChannelBuffers, OutputBuffer};
pub use config::{ChipConfig, OutputMode, Revision};
pub use et209::registers::{
    NUM_VOICES, PERIODIC_NOISE, RATE_FAST_SLIDE, RATE_INSTANT_CHANGE, RATE_MEDIUM_SLIDE,
    RATE_SLOW_SLIDE, VOLUME_MAX, VOLUME_RESET_FLAG,
};
pub use et209::{eval_waveform, q6_multiply, Bus, Et209, Frame, Noise, NoiseWaveform, Voice, Waveform};
pub use filter::{OutputFilter, STEREO_DELAY_SAMPLE_COUNT};
