//! ET209 synthesis engine
//!
//! Simulates the entire digital logic of the chip: seven voices and a noise
//! unit advanced in lockstep once per output sample, mixed into four buses,
//! then passed through the board-level filter stage.
//!
//! Register writes are assumed to land between samples. Real hardware can
//! latch a write mid-sample; the difference is inaudible and is not modelled.

use log::{debug, trace, warn};

use super::mixer::Frame;
use super::noise::Noise;
use super::registers::{Bus, NUM_VOICES};
use super::voice::Voice;
use crate::buffer::{ChannelBuffers, OutputBuffer};
use crate::config::{ChipConfig, OutputMode, Revision};
use crate::filter::OutputFilter;
use crate::{Et209Error, Result};

/// ET209 synthesizer chip emulator
///
/// # Example
///
/// ```
/// use et209::{Et209, Waveform};
///
/// let mut chip = Et209::new();
///
/// // Voice 0: sawtooth at full volume
/// chip.write_voice_waveform(0, Waveform::OUTPUT_ACCUMULATOR.bits() as u32);
/// chip.write_voice_rate(0, 256);
/// chip.write_voice_volume(0, 64);
///
/// // First tick: accumulator 257, top six bits zero, fully negative
/// let frame = chip.generate_frame();
/// assert_eq!(frame.center, -32);
///
/// let mut samples = vec![0.0; 800];
/// chip.fill_mono(&mut samples);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Et209 {
    config: ChipConfig,
    voices: [Voice; NUM_VOICES],
    noise: Noise,
    /// Samples generated since reset; gates rate slewing
    sample_number: u64,
    filter: OutputFilter,
}

impl Et209 {
    /// Create a chip modelling the production ARS part
    pub fn new() -> Self {
        Self::with_revision(Revision::default())
    }

    /// Create a chip modelling a specific revision
    pub fn with_revision(revision: Revision) -> Self {
        Self::build(revision.config())
    }

    /// Create a chip from a custom configuration
    ///
    /// Fails with [`Et209Error::ConfigError`] if the sample rate is unusable.
    pub fn with_config(config: ChipConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ChipConfig) -> Self {
        debug!(
            "ET209 created: {:.2} Hz, stereo={}, noise waveform={}",
            config.sample_rate, config.stereo, config.noise_waveform
        );
        Self {
            config,
            voices: Default::default(),
            noise: Noise::new(),
            sample_number: 0,
            filter: OutputFilter::new(&config),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &ChipConfig {
        &self.config
    }

    /// Output sample rate in Hz
    pub fn sample_rate(&self) -> f64 {
        self.config.sample_rate
    }

    /// Reset every voice and the noise unit
    ///
    /// Filter history is kept; it belongs to the board, not the chip.
    pub fn reset(&mut self) {
        debug!("ET209 reset after {} samples", self.sample_number);
        self.voices = Default::default();
        self.noise = Noise::new();
        self.sample_number = 0;
    }

    /// Clear the filter-stage history and delay line
    pub fn reset_filters(&mut self) {
        self.filter.reset();
    }

    // -------------------------------------------------------------------------
    // Register writes. Values are truncated to the register width.
    // -------------------------------------------------------------------------

    /// Write a voice's 16-bit rate register
    pub fn write_voice_rate(&mut self, voice: usize, rate: u32) {
        if let Some(v) = self.voice_mut(voice) {
            v.set_rate((rate & 0xFFFF) as u16);
        }
    }

    /// Write a voice's 8-bit waveform register
    pub fn write_voice_waveform(&mut self, voice: usize, waveform: u32) {
        if let Some(v) = self.voice_mut(voice) {
            v.set_waveform((waveform & 0xFF) as u8);
        }
    }

    /// Write a voice's 8-bit volume register (bit 7 is the reset flag)
    pub fn write_voice_volume(&mut self, voice: usize, volume: u32) {
        if let Some(v) = self.voice_mut(voice) {
            v.set_volume((volume & 0xFF) as u8);
        }
    }

    /// Write the 8-bit noise period; also restarts the period counter
    pub fn write_noise_period(&mut self, period: u32) {
        trace!("noise period <- {}", period & 0xFF);
        self.noise.set_period((period & 0xFF) as u8);
    }

    /// Write the 8-bit noise volume register (bit 7 is the reset flag)
    pub fn write_noise_volume(&mut self, volume: u32) {
        self.noise.set_volume((volume & 0xFF) as u8);
    }

    /// Write the 8-bit noise waveform register
    pub fn write_noise_waveform(&mut self, waveform: u32) {
        self.noise.set_waveform((waveform & 0xFF) as u8);
    }

    fn voice_mut(&mut self, voice: usize) -> Option<&mut Voice> {
        let v = self.voices.get_mut(voice);
        if v.is_none() {
            trace!("write to nonexistent voice {voice} ignored");
        }
        v
    }

    // -------------------------------------------------------------------------
    // State inspection
    // -------------------------------------------------------------------------

    /// One voice, or `None` if `index >= NUM_VOICES`
    pub fn voice(&self, index: usize) -> Option<&Voice> {
        self.voices.get(index)
    }

    /// All voices
    pub fn voices(&self) -> &[Voice; NUM_VOICES] {
        &self.voices
    }

    /// The noise unit
    pub fn noise(&self) -> &Noise {
        &self.noise
    }

    /// Samples generated since construction or reset
    pub fn sample_number(&self) -> u64 {
        self.sample_number
    }

    // -------------------------------------------------------------------------
    // Generation
    // -------------------------------------------------------------------------

    /// Advance one sample and return the raw bus sums
    pub fn generate_frame(&mut self) -> Frame {
        let mut frame = Frame::default();
        for voice in self.voices.iter_mut() {
            let (bus, value) = voice.tick(self.sample_number, self.config.stereo);
            frame.add(bus, value);
        }
        frame.add(Bus::Boosted, self.noise.tick(self.config.noise_waveform));
        self.sample_number = self.sample_number.wrapping_add(1);
        frame
    }

    /// Advance one sample and return the raw combined mono value
    pub fn generate_sample(&mut self) -> f32 {
        self.generate_frame().combined()
    }

    /// Fill `out` with filtered mono samples, one per element
    pub fn fill_mono(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            let frame = self.generate_frame();
            *sample = self.filter.mono(&frame);
        }
    }

    /// Fill a channel pair with filtered stereo samples
    ///
    /// One sample is generated per element pair; if the slices differ in
    /// length the tail of the longer one is left untouched.
    pub fn fill_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let frame = self.generate_frame();
            (*l, *r) = self.filter.stereo(&frame);
        }
    }

    /// Fill a channel pair with filtered headphone samples
    ///
    /// Same length rules as [`Et209::fill_stereo`].
    pub fn fill_headphone(&mut self, left: &mut [f32], right: &mut [f32]) {
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let frame = self.generate_frame();
            (*l, *r) = self.filter.headphone(&frame);
        }
    }

    /// Fill a host buffer: mono for one channel, stereo or headphone for two
    ///
    /// Any other channel count is rejected with
    /// [`Et209Error::UnsupportedChannelCount`] before the chip advances.
    pub fn generate_buffer<B>(&mut self, buffer: &mut B, headphones: bool) -> Result<()>
    where
        B: OutputBuffer + ?Sized,
    {
        let count = buffer.channel_count();
        let mut channels = buffer.channel_data();
        match channels.as_mut_slice() {
            [mono] => self.fill_mono(mono),
            [left, right] if headphones => self.fill_headphone(left, right),
            [left, right] => self.fill_stereo(left, right),
            _ => {
                warn!("generate_buffer: unsupported channel count {count}");
                return Err(Et209Error::UnsupportedChannelCount(count));
            }
        }
        Ok(())
    }

    /// Render `frames` samples in the given output mode
    pub fn render(&mut self, mode: OutputMode, frames: usize) -> ChannelBuffers {
        if mode == OutputMode::Mono {
            let mut mono = vec![0.0; frames];
            self.fill_mono(&mut mono);
            return ChannelBuffers::from_channels(vec![mono]);
        }

        let mut left = vec![0.0; frames];
        let mut right = vec![0.0; frames];
        if mode == OutputMode::Headphone {
            self.fill_headphone(&mut left, &mut right);
        } else {
            self.fill_stereo(&mut left, &mut right);
        }
        ChannelBuffers::from_channels(vec![left, right])
    }
}

impl Default for Et209 {
    fn default() -> Self {
        Self::new()
    }
}
