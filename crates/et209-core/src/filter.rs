//! Output filter stage
//!
//! The ARS feeds the ET209 DAC outputs through an RC low-pass. Headphone
//! output adds a second, heavier low-pass on the opposite pan bus and mixes
//! it back in through a short delay line to widen the stereo image.

use crate::config::ChipConfig;
use crate::et209::Frame;

/// Delay, in samples, of the cross-fed headphone pan signal
pub const STEREO_DELAY_SAMPLE_COUNT: usize = 23;

/// Scale from raw bus units to output samples
pub const OUTPUT_SCALE: f64 = 1.0 / 256.0;

/// One-pole IIR low-pass: `y[n] = x[n] + (y[n-1] - x[n]) * k`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OnePole {
    coefficient: f64,
    last: f64,
}

impl OnePole {
    /// Create a filter with zeroed history
    pub fn new(coefficient: f64) -> Self {
        Self {
            coefficient,
            last: 0.0,
        }
    }

    /// Filter one sample
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let output = input + (self.last - input) * self.coefficient;
        self.last = output;
        output
    }

    /// Previous output
    #[inline]
    pub fn last(&self) -> f64 {
        self.last
    }

    /// Clear the history
    pub fn reset(&mut self) {
        self.last = 0.0;
    }
}

/// Fixed-length circular delay for the headphone pan signal
///
/// Left and right share one write cursor.
#[derive(Clone, Debug, PartialEq)]
pub struct StereoDelay {
    left: [f64; STEREO_DELAY_SAMPLE_COUNT],
    right: [f64; STEREO_DELAY_SAMPLE_COUNT],
    position: usize,
}

impl StereoDelay {
    /// Create a silent delay line
    pub fn new() -> Self {
        Self {
            left: [0.0; STEREO_DELAY_SAMPLE_COUNT],
            right: [0.0; STEREO_DELAY_SAMPLE_COUNT],
            position: 0,
        }
    }

    /// Samples written `STEREO_DELAY_SAMPLE_COUNT` pushes ago
    #[inline]
    pub fn delayed(&self) -> (f64, f64) {
        (self.left[self.position], self.right[self.position])
    }

    /// Overwrite the oldest slot and advance the cursor
    #[inline]
    pub fn push(&mut self, left: f64, right: f64) {
        self.left[self.position] = left;
        self.right[self.position] = right;
        self.position += 1;
        if self.position == STEREO_DELAY_SAMPLE_COUNT {
            self.position = 0;
        }
    }

    /// Current write cursor
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Clear the delay line
    pub fn reset(&mut self) {
        self.left.fill(0.0);
        self.right.fill(0.0);
        self.position = 0;
    }
}

impl Default for StereoDelay {
    fn default() -> Self {
        Self::new()
    }
}

/// Filter history for all three output modes
///
/// Stereo and headphone output share the direct low-pass history; mono keeps
/// its own.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputFilter {
    mono: OnePole,
    left: OnePole,
    right: OnePole,
    pan_left: OnePole,
    pan_right: OnePole,
    delay: StereoDelay,
}

impl OutputFilter {
    /// Create zeroed filters with coefficients for `config`'s sample rate
    pub fn new(config: &ChipConfig) -> Self {
        let dac = config.dac_coefficient();
        let pan = config.pan_coefficient();
        Self {
            mono: OnePole::new(dac),
            left: OnePole::new(dac),
            right: OnePole::new(dac),
            pan_left: OnePole::new(pan),
            pan_right: OnePole::new(pan),
            delay: StereoDelay::new(),
        }
    }

    /// Low-passed combined sample
    #[inline]
    pub fn mono(&mut self, frame: &Frame) -> f32 {
        self.mono.process(frame.combined() as f64 * OUTPUT_SCALE) as f32
    }

    /// Low-passed authentic left/right pair
    #[inline]
    pub fn stereo(&mut self, frame: &Frame) -> (f32, f32) {
        let (left, right) = self.direct(frame);
        (left as f32, right as f32)
    }

    /// Stereo pair plus the delayed, cross-fed pan signal
    ///
    /// The right bus feeds the left delayed path and the left bus feeds the
    /// right one.
    #[inline]
    pub fn headphone(&mut self, frame: &Frame) -> (f32, f32) {
        let (left, right) = self.direct(frame);
        let (delayed_left, delayed_right) = self.delay.delayed();
        let pan_left = self.pan_left.process(frame.right as f64 * OUTPUT_SCALE);
        let pan_right = self.pan_right.process(frame.left as f64 * OUTPUT_SCALE);
        self.delay.push(pan_left, pan_right);
        ((left + delayed_left) as f32, (right + delayed_right) as f32)
    }

    #[inline]
    fn direct(&mut self, frame: &Frame) -> (f64, f64) {
        (
            self.left.process(frame.left_channel() as f64 * OUTPUT_SCALE),
            self.right.process(frame.right_channel() as f64 * OUTPUT_SCALE),
        )
    }

    /// Clear every history buffer
    pub fn reset(&mut self) {
        self.mono.reset();
        self.left.reset();
        self.right.reset();
        self.pan_left.reset();
        self.pan_right.reset();
        self.delay.reset();
    }
}
