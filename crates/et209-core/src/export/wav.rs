//! WAV file export functionality

use std::path::Path;

use log::info;

use super::{apply_fade_out, normalize_samples, ExportConfig};
use crate::buffer::{ChannelBuffers, OutputBuffer};
use crate::{Et209Error, Result};

/// Post-process a render and write it to a WAV file
///
/// # Examples
///
/// ```no_run
/// use et209::export::{export_to_wav, ExportConfig};
/// use et209::Et209;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut chip = Et209::new();
/// chip.write_voice_rate(0, 449);
/// chip.write_voice_waveform(0, 0x10);
/// chip.write_voice_volume(0, 64);
///
/// let config = ExportConfig::stereo().normalize(true);
/// let render = chip.render(config.mode, 48_000);
/// export_to_wav(render, "tone.wav", chip.config().sample_rate_hz(), &config)?;
/// # Ok(())
/// # }
/// ```
pub fn export_to_wav<P: AsRef<Path>>(
    mut buffers: ChannelBuffers,
    output_path: P,
    sample_rate: u32,
    config: &ExportConfig,
) -> Result<()> {
    if config.normalize {
        info!("Normalizing audio...");
        normalize_samples(&mut buffers);
    }

    if config.fade_out_duration > 0.0 {
        info!("Applying {:.1}s fade out...", config.fade_out_duration);
        apply_fade_out(&mut buffers, config.fade_out_duration, sample_rate);
    }

    info!("Writing WAV file to {}...", output_path.as_ref().display());
    write_wav(output_path, &buffers, sample_rate)?;
    info!("Export complete!");
    Ok(())
}

/// Write planar buffers as 16-bit interleaved PCM
pub fn write_wav<P: AsRef<Path>>(
    output_path: P,
    buffers: &ChannelBuffers,
    sample_rate: u32,
) -> Result<()> {
    let channels = u16::try_from(buffers.channel_count())
        .ok()
        .filter(|&c| c > 0)
        .ok_or(Et209Error::UnsupportedChannelCount(buffers.channel_count()))?;

    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(output_path.as_ref(), spec).map_err(|e| match e {
        hound::Error::IoError(io) => Et209Error::Io(io),
        other => Et209Error::AudioFileError(format!("Failed to create WAV file: {}", other)),
    })?;

    for sample in buffers.interleaved() {
        writer
            .write_sample(to_i16(sample))
            .map_err(|e| Et209Error::AudioFileError(format!("Failed to write sample: {}", e)))?;
    }

    writer
        .finalize()
        .map_err(|e| Et209Error::AudioFileError(format!("Failed to finalize WAV file: {}", e)))?;

    Ok(())
}

/// Convert a float sample to 16-bit PCM, clipping out-of-range values
#[inline]
fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_i16_clips() {
        assert_eq!(to_i16(0.0), 0);
        assert_eq!(to_i16(1.0), i16::MAX);
        assert_eq!(to_i16(2.0), i16::MAX);
        assert_eq!(to_i16(-2.0), -i16::MAX);
    }

    #[test]
    fn test_write_wav_round_trip_header() {
        let dir = std::env::temp_dir().join(format!("et209-wav-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("stereo.wav");

        let mut buffers = ChannelBuffers::stereo(4);
        buffers.channel_data()[0].copy_from_slice(&[0.5, 0.0, -0.5, 0.0]);
        write_wav(&path, &buffers, 48_000).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 48_000);
        assert_eq!(reader.len(), 8);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_wav_rejects_empty_buffer() {
        let path = std::env::temp_dir().join("et209-never-written.wav");
        let err = write_wav(&path, &ChannelBuffers::new(0, 4), 48_000).unwrap_err();
        assert!(matches!(err, Et209Error::UnsupportedChannelCount(0)));
    }

    #[test]
    fn test_write_wav_missing_directory_is_io_error() {
        let path = std::env::temp_dir()
            .join("et209-no-such-dir")
            .join("deeper")
            .join("out.wav");
        let err = write_wav(&path, &ChannelBuffers::mono(4), 48_000).unwrap_err();
        assert!(matches!(err, Et209Error::Io(_)));
    }
}
