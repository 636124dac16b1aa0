//! Noise unit
//!
//! A 15-bit LFSR clocked by an 8-bit period counter. Each output sample spans
//! eight noise sub-clocks; the low LFSR bit is summed across all eight.

use super::registers::{NoiseWaveform, VOLUME_LEVEL_MASK, VOLUME_RESET_FLAG};
use super::waveform::q6_multiply;

/// Sub-clocks per output sample
pub const NOISE_SUB_STEPS: u32 = 8;

/// LFSR value after power-on or a volume reset
const LFSR_SEED: u16 = 1;

/// Bit the feedback is shifted into
const LFSR_TOP_BIT: u16 = 1 << 14;

/// Pseudo-random noise channel
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Noise {
    period: u8,
    /// Volume level in bits 0-6, reset flag in bit 7
    volume: u8,
    waveform: NoiseWaveform,
    /// 15-bit shift register; never zero
    lfsr: u16,
    /// Period counter
    counter: u8,
}

impl Noise {
    /// Create a silent noise unit with a seeded LFSR
    pub fn new() -> Self {
        Self {
            period: 0,
            volume: 0,
            waveform: NoiseWaveform::empty(),
            lfsr: LFSR_SEED,
            counter: 0,
        }
    }

    /// Set the period and restart the period counter
    #[inline]
    pub fn set_period(&mut self, period: u8) {
        self.period = period;
        self.counter = 0;
    }

    /// Set the volume register, including the reset flag
    #[inline]
    pub fn set_volume(&mut self, volume: u8) {
        self.volume = volume;
    }

    /// Set the waveform register (sub-rate mask and periodic flag)
    #[inline]
    pub fn set_waveform(&mut self, waveform: u8) {
        self.waveform = NoiseWaveform::from_bits_retain(waveform);
    }

    /// Period register
    #[inline]
    pub fn period(&self) -> u8 {
        self.period
    }

    /// Volume register; the reset flag reads back cleared once consumed
    #[inline]
    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Waveform register
    #[inline]
    pub fn waveform(&self) -> NoiseWaveform {
        self.waveform
    }

    /// Current shift register contents
    #[inline]
    pub fn lfsr(&self) -> u16 {
        self.lfsr
    }

    /// Current period counter
    #[inline]
    pub fn counter(&self) -> u8 {
        self.counter
    }

    /// Run one sample's worth of sub-clocks and return the bit sum (0..=8)
    ///
    /// `honour_waveform` is false on revisions without a noise waveform
    /// register, in which case every sub-clock runs with the long tap.
    pub fn step(&mut self, honour_waveform: bool) -> u8 {
        if self.volume & VOLUME_RESET_FLAG != 0 {
            self.volume &= !VOLUME_RESET_FLAG;
            self.lfsr = LFSR_SEED;
        }

        let waveform = if honour_waveform {
            self.waveform
        } else {
            NoiseWaveform::empty()
        };

        let mut sum = 0u8;
        for step in 0..NOISE_SUB_STEPS {
            sum += (self.lfsr & 1) as u8;
            if waveform.skips(step) {
                continue;
            }
            if self.counter == self.period {
                self.counter = 0;
                self.shift(waveform.contains(NoiseWaveform::PERIODIC));
            } else {
                self.counter = self.counter.wrapping_add(1);
            }
        }
        sum
    }

    /// Clock the shift register once
    #[inline]
    fn shift(&mut self, periodic: bool) {
        let tap = if periodic { 6 } else { 1 };
        let feedback = (self.lfsr ^ (self.lfsr >> tap)) & 1;
        self.lfsr >>= 1;
        if feedback != 0 {
            self.lfsr |= LFSR_TOP_BIT;
        }
    }

    /// Advance one sample and return the boosted-bus contribution
    #[inline]
    pub fn tick(&mut self, honour_waveform: bool) -> i32 {
        let sum = self.step(honour_waveform);
        q6_multiply(sum | (sum << 3), self.volume & VOLUME_LEVEL_MASK)
    }
}

impl Default for Noise {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::et209::registers::PERIODIC_NOISE;

    #[test]
    fn test_first_sample_from_seed() {
        let mut noise = Noise::new();
        // Seed 1: bit 0 is summed once, then the feedback moves it to bit 14
        assert_eq!(noise.step(true), 1);
        assert_eq!(noise.lfsr(), 0x4000 >> 7);
    }

    #[test]
    fn test_period_divides_shift_rate() {
        let mut noise = Noise::new();
        noise.set_period(3);
        noise.step(true);
        // Counter 0..3 then shift, twice in eight sub-clocks
        assert_eq!(noise.lfsr(), 0x2000);
        assert_eq!(noise.counter(), 0);
    }

    #[test]
    fn test_set_period_restarts_counter() {
        let mut noise = Noise::new();
        noise.set_period(200);
        noise.step(true);
        assert_eq!(noise.counter(), 8);
        noise.set_period(100);
        assert_eq!(noise.counter(), 0);
    }

    #[test]
    fn test_sub_rate_mask_skips_counter() {
        let mut noise = Noise::new();
        noise.set_period(200);
        noise.set_waveform(0x7F);
        noise.step(true);
        assert_eq!(noise.counter(), 1, "only the last sub-clock advances");

        let mut legacy = Noise::new();
        legacy.set_period(200);
        legacy.set_waveform(0x7F);
        legacy.step(false);
        assert_eq!(legacy.counter(), 8, "waveform ignored without the register");
    }

    #[test]
    fn test_reset_flag_reseeds() {
        let mut noise = Noise::new();
        for _ in 0..50 {
            noise.step(true);
        }
        noise.set_volume(VOLUME_RESET_FLAG | 64);
        noise.step(true);
        assert_eq!(noise.volume(), 64);
        assert_eq!(noise.lfsr(), 0x4000 >> 7);
    }

    #[test]
    fn test_lfsr_never_reaches_zero() {
        for waveform in [0u8, PERIODIC_NOISE] {
            let mut noise = Noise::new();
            noise.set_waveform(waveform);
            for _ in 0..40_000 {
                let sum = noise.step(true);
                assert!(sum <= 8);
                assert_ne!(noise.lfsr(), 0);
                assert!(noise.lfsr() < 0x8000);
            }
        }
    }

    #[test]
    fn test_long_sequence_period() {
        // x^15 + x^14 + 1 is maximal: 32767 shifts return to the seed
        let mut noise = Noise::new();
        let mut shifts = 0u32;
        loop {
            noise.shift(false);
            shifts += 1;
            if noise.lfsr() == LFSR_SEED {
                break;
            }
            assert!(shifts < 40_000);
        }
        assert_eq!(shifts, 32_767);
    }

    #[test]
    fn test_tick_uses_q6_on_replicated_sum() {
        let mut noise = Noise::new();
        noise.set_volume(64);
        assert_eq!(noise.tick(true), 9 - 32);
    }
}
