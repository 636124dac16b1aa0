//! Audio export
//!
//! Post-processing helpers and file writers for rendered ET209 output.

use serde::{Deserialize, Serialize};

use crate::buffer::ChannelBuffers;
use crate::config::OutputMode;

#[cfg(feature = "export-wav")]
pub mod wav;

#[cfg(feature = "export-wav")]
pub use wav::{export_to_wav, write_wav};

/// Export options
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Filter-stage mode used to render the audio
    pub mode: OutputMode,
    /// Scale the whole render so its peak reaches full scale
    pub normalize: bool,
    /// Linear fade applied to the tail, in seconds (0 disables)
    pub fade_out_duration: f32,
}

impl ExportConfig {
    /// Mono export, no post-processing
    pub fn mono() -> Self {
        Self {
            mode: OutputMode::Mono,
            normalize: false,
            fade_out_duration: 0.0,
        }
    }

    /// Stereo export, no post-processing
    pub fn stereo() -> Self {
        Self {
            mode: OutputMode::Stereo,
            ..Self::mono()
        }
    }

    /// Headphone export, no post-processing
    pub fn headphone() -> Self {
        Self {
            mode: OutputMode::Headphone,
            ..Self::mono()
        }
    }

    /// Enable or disable peak normalization
    pub fn normalize(mut self, enabled: bool) -> Self {
        self.normalize = enabled;
        self
    }

    /// Set the fade-out length in seconds
    pub fn fade_out(mut self, seconds: f32) -> Self {
        self.fade_out_duration = seconds.max(0.0);
        self
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self::mono()
    }
}

/// Scale every channel by the same factor so the loudest sample hits 1.0
///
/// Silent buffers are left unchanged.
pub fn normalize_samples(buffers: &mut ChannelBuffers) {
    use crate::buffer::OutputBuffer;

    let mut channels = buffers.channel_data();
    let peak = channels
        .iter()
        .flat_map(|channel| channel.iter())
        .fold(0.0f32, |peak, &s| peak.max(s.abs()));
    if peak <= f32::EPSILON {
        return;
    }
    let gain = 1.0 / peak;
    for channel in channels.iter_mut() {
        for sample in channel.iter_mut() {
            *sample *= gain;
        }
    }
}

/// Fade the last `duration` seconds of every channel linearly to silence
pub fn apply_fade_out(buffers: &mut ChannelBuffers, duration: f32, sample_rate: u32) {
    use crate::buffer::OutputBuffer;

    let frames = buffers.frames();
    let fade_frames = ((duration * sample_rate as f32) as usize).min(frames);
    if fade_frames == 0 {
        return;
    }
    let start = frames - fade_frames;
    for channel in buffers.channel_data() {
        for (i, sample) in channel[start..frames].iter_mut().enumerate() {
            *sample *= 1.0 - (i + 1) as f32 / fade_frames as f32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::OutputBuffer;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_scales_to_peak() {
        let mut buffers = ChannelBuffers::stereo(2);
        {
            let mut channels = buffers.channel_data();
            channels[0].copy_from_slice(&[0.25, -0.1]);
            channels[1].copy_from_slice(&[0.0, -0.5]);
        }
        normalize_samples(&mut buffers);
        assert_relative_eq!(buffers.channel(0).unwrap()[0], 0.5);
        assert_relative_eq!(buffers.channel(1).unwrap()[1], -1.0);
    }

    #[test]
    fn test_normalize_leaves_silence() {
        let mut buffers = ChannelBuffers::mono(4);
        normalize_samples(&mut buffers);
        assert_eq!(buffers.channel(0), Some(&[0.0; 4][..]));
    }

    #[test]
    fn test_fade_out_ends_silent() {
        let mut buffers = ChannelBuffers::mono(10);
        buffers.channel_data()[0].fill(1.0);
        apply_fade_out(&mut buffers, 0.5, 8);
        let channel = buffers.channel(0).unwrap();
        assert_eq!(channel[5], 1.0);
        assert_relative_eq!(channel[6], 0.75);
        assert_eq!(channel[9], 0.0);
    }

    #[test]
    fn test_builder() {
        let config = ExportConfig::headphone().normalize(true).fade_out(-1.0);
        assert_eq!(config.mode, OutputMode::Headphone);
        assert!(config.normalize);
        assert_eq!(config.fade_out_duration, 0.0);
    }
}
