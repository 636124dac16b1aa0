//! ET209 Register Definitions
//!
//! The chip has no addressable register file of its own from the emulator's
//! point of view: each voice exposes a 16-bit rate, an 8-bit waveform and an
//! 8-bit volume, and the noise unit exposes period, volume and waveform bytes.
//! This module names the bit fields inside those values.

use std::fmt;

/// Number of tone voices
pub const NUM_VOICES: usize = 7;

/// Rate slew class: the effective rate snaps to the target immediately
pub const RATE_INSTANT_CHANGE: u16 = 0x0000;
/// Rate slew class: one step every 8 samples
pub const RATE_FAST_SLIDE: u16 = 0x4000;
/// Rate slew class: one step every 16 samples
pub const RATE_MEDIUM_SLIDE: u16 = 0x8000;
/// Rate slew class: one step every 32 samples
pub const RATE_SLOW_SLIDE: u16 = 0xC000;

/// Low 14 bits of a rate register hold the phase increment
pub const RATE_VALUE_MASK: u16 = 0x3FFF;

/// Full-scale volume (the multiplier saturates at this value and above)
pub const VOLUME_MAX: u8 = 64;
/// One-shot reset flag carried in the top bit of a volume register
pub const VOLUME_RESET_FLAG: u8 = 0x80;
/// Volume bits seen by the multiplier
pub const VOLUME_LEVEL_MASK: u8 = 0x7F;

/// Noise waveform flag selecting the short (periodic) feedback tap
pub const PERIODIC_NOISE: u8 = 0x80;

/// Accumulator value loaded by a signed reset
pub const SIGNED_RESET_ACCUMULATOR: u16 = 0x8000;

bitflags::bitflags! {
    /// Voice waveform register
    ///
    /// The low four bits are independent invert conditions that are XORed
    /// into the output. `SIGNED_RESET` is not a distinct bit: it is the
    /// combination `TOGGLE_INVERT_ON_CARRY | OUTPUT_ACCUMULATOR`, which makes
    /// a volume reset load the half-range accumulator value.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Waveform: u8 {
        /// Invert while the top three accumulator bits are clear
        const INVERT_EIGHTH = 0x01;
        /// Invert while the top two accumulator bits are clear
        const INVERT_QUARTER = 0x02;
        /// Invert while the top accumulator bit is clear
        const INVERT_HALF = 0x04;
        /// Invert unconditionally
        const INVERT_ALL = 0x08;
        /// Flip `INVERT_ALL` whenever the accumulator carries out
        const TOGGLE_INVERT_ON_CARRY = 0x10;
        /// Use the top six accumulator bits as the base output
        const OUTPUT_ACCUMULATOR = 0x20;
        /// Both signed-reset polarity bits
        const SIGNED_RESET = 0x30;
        /// Pan to the right bus
        const PAN_RIGHT = 0x40;
        /// Pan to the left bus
        const PAN_LEFT = 0x80;
        /// Pan field mask; both bits set selects the boosted bus
        const PAN_MASK = 0xC0;
    }
}

impl Waveform {
    /// Pan field value for the center bus
    pub const PAN_CENTER: Waveform = Waveform::empty();
    /// Pan field value for the boosted (full) bus
    pub const PAN_FULL: Waveform = Waveform::PAN_MASK;

    /// Whether both signed-reset polarity bits are set
    #[inline]
    pub fn signed_reset(self) -> bool {
        self.contains(Waveform::SIGNED_RESET)
    }

    /// Output bus selected by the pan field
    #[inline]
    pub fn bus(self) -> Bus {
        Bus::from_pan_bits(self.bits() >> 6)
    }
}

bitflags::bitflags! {
    /// Noise waveform register
    ///
    /// Bits 0-6 each skip the period counter on the matching sub-clock of a
    /// sample. Bit 7 selects periodic noise.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NoiseWaveform: u8 {
        /// Sub-clock skip mask
        const SUB_RATE_MASK = 0x7F;
        /// Short feedback tap (bit 6 instead of bit 1)
        const PERIODIC = PERIODIC_NOISE;
    }
}

impl NoiseWaveform {
    /// Whether the period counter skips sub-clock `step`
    ///
    /// The last sub-clock (7) is never skipped.
    #[inline]
    pub fn skips(self, step: u32) -> bool {
        step != 7 && self.bits() & (1 << step) != 0
    }
}

/// Output bus a voice mixes into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bus {
    /// Shared by both channels at half weight
    Center = 0,
    /// Right channel only
    Right = 1,
    /// Left channel only
    Left = 2,
    /// Both channels at full weight (the noise unit always lands here)
    Boosted = 3,
}

impl Bus {
    /// All buses in frame order
    pub const ALL: [Bus; 4] = [Bus::Center, Bus::Right, Bus::Left, Bus::Boosted];

    /// Decode a two-bit pan field
    #[inline]
    pub fn from_pan_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Bus::Center,
            1 => Bus::Right,
            2 => Bus::Left,
            _ => Bus::Boosted,
        }
    }

    /// Index of this bus within a frame
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bus::Center => write!(f, "Center"),
            Bus::Right => write!(f, "Right"),
            Bus::Left => write!(f, "Left"),
            Bus::Boosted => write!(f, "Boosted"),
        }
    }
}

/// Slew class decoded from the top two bits of a rate register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlewRate {
    /// Effective rate follows the target immediately
    Instant,
    /// One step every 8 samples
    Fast,
    /// One step every 16 samples
    Medium,
    /// One step every 32 samples
    Slow,
}

impl SlewRate {
    /// Decode the slew class of a rate register value
    #[inline]
    pub fn from_rate(rate: u16) -> Self {
        match rate >> 14 {
            0 => SlewRate::Instant,
            1 => SlewRate::Fast,
            2 => SlewRate::Medium,
            _ => SlewRate::Slow,
        }
    }

    /// Sample-number mask gating slew steps, or `None` for instant change
    #[inline]
    pub fn gate_mask(self) -> Option<u64> {
        let shift = match self {
            SlewRate::Instant => return None,
            SlewRate::Fast => 1,
            SlewRate::Medium => 2,
            SlewRate::Slow => 3,
        };
        Some((1u64 << (shift + 2)) - 1)
    }
}
