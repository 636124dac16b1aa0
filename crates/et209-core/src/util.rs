//! Shared helper utilities for ET209 rate math.
//!
//! A voice's accumulator advances by `rate + 1` per sample, so its oscillator
//! frequency is `sample_rate * (rate + 1) / 65536`.

use crate::et209::registers::RATE_VALUE_MASK;

const ACCUMULATOR_RANGE: f64 = 65_536.0;

/// Convert a 14-bit rate value into an oscillator frequency.
#[inline]
pub fn frequency_for_rate(rate: u16, sample_rate: f64) -> f64 {
    sample_rate * ((rate & RATE_VALUE_MASK) as f64 + 1.0) / ACCUMULATOR_RANGE
}

/// Closest 14-bit rate value for a frequency, clamped to the register range.
#[inline]
pub fn rate_for_frequency(frequency: f64, sample_rate: f64) -> u16 {
    if !frequency.is_finite() || sample_rate <= 0.0 {
        return 0;
    }
    let rate = (frequency * ACCUMULATOR_RANGE / sample_rate).round() - 1.0;
    rate.clamp(0.0, RATE_VALUE_MASK as f64) as u16
}
