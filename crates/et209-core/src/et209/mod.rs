//! ET209 Synthesizer Emulation Domain
//!
//! Core emulation of the Eiling Technologies ET209, the audio processing unit
//! of the ARS: seven phase-accumulator voices, a 15-bit LFSR noise unit, and
//! the four-bus mixer.
//!
//! Implementation:
//! - `chip` - The synthesis engine and its register interface
//! - `voice` / `noise` - Per-sample state machines
//! - `waveform` - Waveform shaping and the Q6 multiplier

// Internal modules
pub mod chip;
pub mod mixer;
pub mod noise;
pub mod registers;
pub mod voice;
pub mod waveform;

// Re-export public API
pub use chip::Et209;
pub use mixer::Frame;
pub use noise::Noise;
pub use registers::{Bus, NoiseWaveform, SlewRate, Waveform};
pub use voice::Voice;
pub use waveform::{eval_waveform, q6_multiply};
