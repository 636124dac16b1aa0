//! Multi-channel output buffers
//!
//! The engine fills host audio buffers through the [`OutputBuffer`] trait so
//! it can write into whatever planar storage the caller owns. Only one- and
//! two-channel buffers are accepted by [`Et209::generate_buffer`].
//!
//! [`Et209::generate_buffer`]: crate::Et209::generate_buffer

use crate::config::OutputMode;

/// Planar, equal-length float channels the engine can fill
///
/// # Example
///
/// ```
/// use et209::{ChannelBuffers, Et209, OutputBuffer};
///
/// let mut chip = Et209::new();
/// let mut buffer = ChannelBuffers::stereo(800);
/// chip.generate_buffer(&mut buffer, false).unwrap();
/// assert_eq!(buffer.frames(), 800);
/// ```
pub trait OutputBuffer {
    /// Number of planar channels
    fn channel_count(&self) -> usize;

    /// Samples per channel
    fn frames(&self) -> usize;

    /// Mutable view of every channel, in channel order
    fn channel_data(&mut self) -> Vec<&mut [f32]>;
}

/// Owned planar buffer
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChannelBuffers {
    channels: Vec<Vec<f32>>,
    frames: usize,
}

impl ChannelBuffers {
    /// Allocate `channels` zeroed channels of `frames` samples each
    pub fn new(channels: usize, frames: usize) -> Self {
        Self {
            channels: vec![vec![0.0; frames]; channels],
            frames,
        }
    }

    /// Wrap existing channels; the frame count is the shortest channel
    pub fn from_channels(channels: Vec<Vec<f32>>) -> Self {
        let frames = channels.iter().map(Vec::len).min().unwrap_or(0);
        Self { channels, frames }
    }

    /// Single-channel buffer
    pub fn mono(frames: usize) -> Self {
        Self::new(1, frames)
    }

    /// Two-channel buffer
    pub fn stereo(frames: usize) -> Self {
        Self::new(2, frames)
    }

    /// Buffer shaped for an output mode
    pub fn for_mode(mode: OutputMode, frames: usize) -> Self {
        Self::new(mode.channel_count(), frames)
    }

    /// Samples of one channel
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Append another buffer with the same channel count
    ///
    /// Buffers with a different channel count are ignored.
    pub fn extend_from(&mut self, other: &ChannelBuffers) {
        if other.channels.len() != self.channels.len() {
            return;
        }
        for (dst, src) in self.channels.iter_mut().zip(&other.channels) {
            dst.extend_from_slice(src);
        }
        self.frames += other.frames;
    }

    /// Samples interleaved frame by frame (L R L R ... for stereo)
    pub fn interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.frames * self.channels.len());
        for frame in 0..self.frames {
            for channel in &self.channels {
                out.push(channel[frame]);
            }
        }
        out
    }
}

impl OutputBuffer for ChannelBuffers {
    fn channel_count(&self) -> usize {
        self.channels.len()
    }

    fn frames(&self) -> usize {
        self.frames
    }

    fn channel_data(&mut self) -> Vec<&mut [f32]> {
        self.channels.iter_mut().map(Vec::as_mut_slice).collect()
    }
}

impl OutputBuffer for [Vec<f32>] {
    fn channel_count(&self) -> usize {
        self.len()
    }

    fn frames(&self) -> usize {
        self.iter().map(Vec::len).min().unwrap_or(0)
    }

    fn channel_data(&mut self) -> Vec<&mut [f32]> {
        self.iter_mut().map(Vec::as_mut_slice).collect()
    }
}
