//! Waveform shaping and the saturating Q6 multiplier
//!
//! Both functions are pure: they read an accumulator/flags pair or an
//! operand pair and return the chip's integer result.

use super::registers::{Waveform, VOLUME_LEVEL_MASK};

/// Six-bit all-ones pattern applied by each active invert condition
const INVERT: u8 = 63;

/// Evaluate the six-bit waveform output for an accumulator and waveform byte
///
/// The base value is the top six accumulator bits when `OUTPUT_ACCUMULATOR`
/// is set, otherwise zero. Each active invert condition then XORs the value
/// with 63, so two overlapping conditions cancel.
///
/// # Example
///
/// ```
/// use et209::et209::{eval_waveform, Waveform};
///
/// // Rising sawtooth
/// assert_eq!(eval_waveform(0xFFFF, Waveform::OUTPUT_ACCUMULATOR), 63);
/// // Square wave: low half inverted
/// assert_eq!(eval_waveform(0x0000, Waveform::INVERT_HALF), 63);
/// assert_eq!(eval_waveform(0x8000, Waveform::INVERT_HALF), 0);
/// ```
#[inline]
pub fn eval_waveform(accumulator: u16, waveform: Waveform) -> u8 {
    let mut out = if waveform.contains(Waveform::OUTPUT_ACCUMULATOR) {
        (accumulator >> 10) as u8
    } else {
        0
    };
    if waveform.contains(Waveform::INVERT_EIGHTH) && accumulator & 0xE000 == 0 {
        out ^= INVERT;
    }
    if waveform.contains(Waveform::INVERT_QUARTER) && accumulator & 0xC000 == 0 {
        out ^= INVERT;
    }
    if waveform.contains(Waveform::INVERT_HALF) && accumulator & 0x8000 == 0 {
        out ^= INVERT;
    }
    if waveform.contains(Waveform::INVERT_ALL) {
        out ^= INVERT;
    }
    out
}

/// Signed, volume-scaled contribution of a six-bit sample
///
/// `a` is centered around 32. Bit 6 of `b` saturates the multiplier at full
/// scale; below that the product is scaled by `b / 64` with an arithmetic
/// shift. Bit 7 of `b` (the reset flag) is ignored.
#[inline]
pub fn q6_multiply(a: u8, b: u8) -> i32 {
    let centered = a as i32 - 32;
    let b = b & VOLUME_LEVEL_MASK;
    if b & 64 != 0 {
        centered
    } else {
        (centered * b as i32) >> 6
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulator_output_is_top_six_bits() {
        let wf = Waveform::OUTPUT_ACCUMULATOR;
        assert_eq!(eval_waveform(0x0000, wf), 0);
        assert_eq!(eval_waveform(0x03FF, wf), 0);
        assert_eq!(eval_waveform(0x0400, wf), 1);
        assert_eq!(eval_waveform(0x8000, wf), 32);
        assert_eq!(eval_waveform(0xFFFF, wf), 63);
    }

    #[test]
    fn test_no_flags_is_silent_midpoint_zero() {
        for acc in [0u16, 0x1234, 0x8000, 0xFFFF] {
            assert_eq!(eval_waveform(acc, Waveform::empty()), 0);
        }
    }

    #[test]
    fn test_invert_conditions_follow_accumulator_region() {
        assert_eq!(eval_waveform(0x1FFF, Waveform::INVERT_EIGHTH), 63);
        assert_eq!(eval_waveform(0x2000, Waveform::INVERT_EIGHTH), 0);
        assert_eq!(eval_waveform(0x3FFF, Waveform::INVERT_QUARTER), 63);
        assert_eq!(eval_waveform(0x4000, Waveform::INVERT_QUARTER), 0);
        assert_eq!(eval_waveform(0x7FFF, Waveform::INVERT_HALF), 63);
        assert_eq!(eval_waveform(0x8000, Waveform::INVERT_HALF), 0);
        assert_eq!(eval_waveform(0xFFFF, Waveform::INVERT_ALL), 63);
    }

    #[test]
    fn test_invert_conditions_are_cumulative_xor() {
        let eighth_quarter = Waveform::INVERT_EIGHTH | Waveform::INVERT_QUARTER;
        // Both active: cancel out
        assert_eq!(eval_waveform(0x0000, eighth_quarter), 0);
        // Only the quarter condition active
        assert_eq!(eval_waveform(0x2000, eighth_quarter), 63);

        let three = eighth_quarter | Waveform::INVERT_HALF;
        assert_eq!(eval_waveform(0x0000, three), 63);

        let saw_inverted = Waveform::OUTPUT_ACCUMULATOR | Waveform::INVERT_ALL;
        assert_eq!(eval_waveform(0x0400, saw_inverted), 62);
    }

    #[test]
    fn test_q6_saturates_at_bit_six() {
        for a in 0..64u8 {
            for b in 64..128u8 {
                assert_eq!(q6_multiply(a, b), a as i32 - 32);
            }
        }
    }

    #[test]
    fn test_q6_scales_below_saturation() {
        assert_eq!(q6_multiply(63, 32), (31 * 32) >> 6);
        assert_eq!(q6_multiply(0, 32), -16);
        assert_eq!(q6_multiply(0, 1), -1, "arithmetic shift rounds toward -inf");
        assert_eq!(q6_multiply(63, 1), 0);
        for a in 0..64u8 {
            assert_eq!(q6_multiply(a, 0), 0);
        }
    }

    #[test]
    fn test_q6_ignores_reset_flag() {
        assert_eq!(q6_multiply(10, 0x80 | 20), q6_multiply(10, 20));
    }
}
