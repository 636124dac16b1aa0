//! Tone voice state machine
//!
//! Each voice owns a 16-bit phase accumulator advanced by an effective rate
//! that slews toward the written target rate.

use super::registers::{
    Bus, SlewRate, Waveform, RATE_VALUE_MASK, SIGNED_RESET_ACCUMULATOR, VOLUME_LEVEL_MASK,
    VOLUME_RESET_FLAG,
};
use super::waveform::{eval_waveform, q6_multiply};

/// One of the seven tone voices
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Voice {
    /// Written rate: slew class in bits 14-15, target increment in bits 0-13
    target_rate: u16,
    /// Effective 14-bit increment
    real_rate: u16,
    /// Phase counter
    accumulator: u16,
    waveform: Waveform,
    /// Volume level in bits 0-6, reset flag in bit 7
    volume: u8,
}

impl Voice {
    /// Create a silent voice with all state cleared
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target rate register
    #[inline]
    pub fn set_rate(&mut self, rate: u16) {
        self.target_rate = rate;
    }

    /// Set the waveform register
    #[inline]
    pub fn set_waveform(&mut self, waveform: u8) {
        self.waveform = Waveform::from_bits_retain(waveform);
    }

    /// Set the volume register, including the reset flag
    #[inline]
    pub fn set_volume(&mut self, volume: u8) {
        self.volume = volume;
    }

    /// Target rate register as written
    #[inline]
    pub fn target_rate(&self) -> u16 {
        self.target_rate
    }

    /// Effective phase increment (14 bits)
    #[inline]
    pub fn real_rate(&self) -> u16 {
        self.real_rate
    }

    /// Current phase accumulator
    #[inline]
    pub fn accumulator(&self) -> u16 {
        self.accumulator
    }

    /// Current waveform register (`INVERT_ALL` may have been toggled by carries)
    #[inline]
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Current volume register; the reset flag reads back cleared once consumed
    #[inline]
    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Move the effective rate toward the target
    ///
    /// Instant-change voices copy the target every sample. Slewing voices step
    /// by one only on samples whose low `shift + 2` bits are all clear.
    #[inline]
    fn slew(&mut self, sample_number: u64) {
        let target = self.target_rate & RATE_VALUE_MASK;
        match SlewRate::from_rate(self.target_rate).gate_mask() {
            None => self.real_rate = target,
            Some(mask) if sample_number & mask == 0 => {
                if self.real_rate < target {
                    self.real_rate += 1;
                } else if self.real_rate > target {
                    self.real_rate -= 1;
                }
            }
            Some(_) => {}
        }
    }

    /// Apply a pending volume reset, or advance the accumulator
    #[inline]
    fn advance(&mut self) {
        if self.volume & VOLUME_RESET_FLAG != 0 {
            self.volume &= !VOLUME_RESET_FLAG;
            self.accumulator = if self.waveform.signed_reset() {
                SIGNED_RESET_ACCUMULATOR
            } else {
                0
            };
            return;
        }

        let next = self.accumulator as u32 + self.real_rate as u32 + 1;
        if next > u16::MAX as u32 && self.waveform.contains(Waveform::TOGGLE_INVERT_ON_CARRY) {
            self.waveform.toggle(Waveform::INVERT_ALL);
        }
        self.accumulator = next as u16;
    }

    /// Advance one sample and return `(bus, contribution)`
    ///
    /// `stereo` selects whether the pan field is honoured; when it is not,
    /// every voice mixes into the center bus.
    #[inline]
    pub fn tick(&mut self, sample_number: u64, stereo: bool) -> (Bus, i32) {
        self.slew(sample_number);
        self.advance();
        (self.bus(stereo), self.output())
    }

    /// Signed contribution for the current accumulator and volume
    #[inline]
    pub fn output(&self) -> i32 {
        q6_multiply(
            eval_waveform(self.accumulator, self.waveform),
            self.volume & VOLUME_LEVEL_MASK,
        )
    }

    #[inline]
    fn bus(&self, stereo: bool) -> Bus {
        if stereo {
            self.waveform.bus()
        } else {
            Bus::Center
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::et209::registers::{RATE_FAST_SLIDE, RATE_SLOW_SLIDE};

    #[test]
    fn test_instant_rate_applies_on_next_tick() {
        let mut voice = Voice::new();
        voice.set_rate(0x1234);
        voice.tick(5, true);
        assert_eq!(voice.real_rate(), 0x1234);
        assert_eq!(voice.accumulator(), 0x1235);
    }

    #[test]
    fn test_fast_slide_steps_every_eighth_sample() {
        let mut voice = Voice::new();
        voice.set_rate(RATE_FAST_SLIDE | 3);
        let mut history = Vec::new();
        for n in 0..32u64 {
            voice.tick(n, true);
            history.push(voice.real_rate());
        }
        assert_eq!(history[0], 1);
        assert_eq!(history[7], 1);
        assert_eq!(history[8], 2);
        assert_eq!(history[16], 3);
        assert_eq!(history[31], 3, "must not overshoot the target");
    }

    #[test]
    fn test_slow_slide_decrements_toward_target() {
        let mut voice = Voice::new();
        voice.set_rate(10);
        voice.tick(1, true);
        voice.set_rate(RATE_SLOW_SLIDE | 8);
        voice.tick(32, true);
        assert_eq!(voice.real_rate(), 9);
        voice.tick(33, true);
        assert_eq!(voice.real_rate(), 9);
        voice.tick(64, true);
        assert_eq!(voice.real_rate(), 8);
        voice.tick(96, true);
        assert_eq!(voice.real_rate(), 8);
    }

    #[test]
    fn test_reset_flag_zeroes_accumulator_and_self_clears() {
        let mut voice = Voice::new();
        voice.set_rate(1000);
        for n in 0..10 {
            voice.tick(n, true);
        }
        assert_ne!(voice.accumulator(), 0);

        voice.set_volume(VOLUME_RESET_FLAG | 40);
        voice.tick(10, true);
        assert_eq!(voice.accumulator(), 0);
        assert_eq!(voice.volume(), 40);

        voice.tick(11, true);
        assert_eq!(voice.accumulator(), 1001);
    }

    #[test]
    fn test_signed_reset_loads_half_range() {
        let mut voice = Voice::new();
        voice.set_waveform(Waveform::SIGNED_RESET.bits());
        voice.set_volume(VOLUME_RESET_FLAG);
        voice.tick(0, true);
        assert_eq!(voice.accumulator(), 0x8000);
    }

    #[test]
    fn test_carry_toggles_invert_all() {
        let mut voice = Voice::new();
        voice.set_waveform(Waveform::TOGGLE_INVERT_ON_CARRY.bits());
        voice.set_rate(0x3FFF);
        // Four ticks of 0x4000 reach exactly 0x10000
        for n in 0..3 {
            voice.tick(n, true);
            assert!(!voice.waveform().contains(Waveform::INVERT_ALL));
        }
        voice.tick(3, true);
        assert_eq!(voice.accumulator(), 0);
        assert!(voice.waveform().contains(Waveform::INVERT_ALL));
        for n in 4..8 {
            voice.tick(n, true);
        }
        assert!(!voice.waveform().contains(Waveform::INVERT_ALL));
    }

    #[test]
    fn test_pan_routing_and_mono_override() {
        let mut voice = Voice::new();
        voice.set_waveform(Waveform::PAN_LEFT.bits());
        assert_eq!(voice.tick(0, true).0, Bus::Left);
        assert_eq!(voice.tick(1, false).0, Bus::Center);
    }
}
