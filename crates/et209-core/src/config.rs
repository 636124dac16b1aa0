//! Chip revision and output configuration
//!
//! The ET209 shipped in a few closely related revisions that differ in
//! output rate and in which registers they decode. A single engine covers all
//! of them; a [`ChipConfig`] carries the differences.

use serde::{Deserialize, Serialize};

use crate::{Et209Error, Result};

/// ARS master clock feeding the ET209 (135 MHz / 22)
pub const ARS_CLOCK_HZ: f64 = 135_000_000.0 / 22.0;

/// Chip clocks per output sample
pub const CLOCKS_PER_SAMPLE: f64 = 128.0;

/// Exact ARS output rate: 135 MHz / 2816, about 47940 Hz
pub const ARS_SAMPLE_RATE: f64 = ARS_CLOCK_HZ / CLOCKS_PER_SAMPLE;

/// Rounded output rate, 800 samples per 60 Hz video frame
pub const NOMINAL_SAMPLE_RATE: f64 = 48_000.0;

/// Samples per video frame at the nominal rate
pub const NOMINAL_SAMPLES_PER_FRAME: usize = 800;

/// Time constant of the 2.4 nF + 10 kOhm DAC low-pass, in seconds
const DAC_TIME_CONSTANT: f64 = 0.000024;

/// Time constant of the secondary pan filter, in seconds
const PAN_TIME_CONSTANT: f64 = 0.000103;

/// Modelled hardware revision
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Revision {
    /// Production ARS part: exact clock, stereo pan, noise waveform register
    #[default]
    Ars,
    /// Production logic at the rounded 48 kHz rate
    Nominal48k,
    /// Early part: 48 kHz, mono output, no noise waveform register
    EarlyMono,
}

impl Revision {
    /// Resolve the revision into its parameter set
    pub fn config(self) -> ChipConfig {
        match self {
            Revision::Ars => ChipConfig {
                sample_rate: ARS_SAMPLE_RATE,
                stereo: true,
                noise_waveform: true,
            },
            Revision::Nominal48k => ChipConfig {
                sample_rate: NOMINAL_SAMPLE_RATE,
                stereo: true,
                noise_waveform: true,
            },
            Revision::EarlyMono => ChipConfig {
                sample_rate: NOMINAL_SAMPLE_RATE,
                stereo: false,
                noise_waveform: false,
            },
        }
    }
}

/// Resolved chip parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChipConfig {
    /// Output sample rate in Hz
    pub sample_rate: f64,
    /// Whether the voice pan field is decoded
    pub stereo: bool,
    /// Whether the noise waveform register is decoded
    pub noise_waveform: bool,
}

impl ChipConfig {
    /// Check that the configuration can drive the filter stage
    pub fn validate(&self) -> Result<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(Et209Error::ConfigError(format!(
                "sample rate must be a positive number, got {}",
                self.sample_rate
            )));
        }
        Ok(())
    }

    /// IIR coefficient of the DAC low-pass
    pub fn dac_coefficient(&self) -> f64 {
        (-1.0 / (self.sample_rate * DAC_TIME_CONSTANT)).exp()
    }

    /// IIR coefficient of the headphone pan filter (DAC and pan RC in series)
    pub fn pan_coefficient(&self) -> f64 {
        let pan = (-1.0 / (self.sample_rate * PAN_TIME_CONSTANT)).exp();
        1.0 - (1.0 - self.dac_coefficient()) * (1.0 - pan)
    }

    /// Output rate rounded for container formats that need an integer
    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate.round() as u32
    }
}

impl Default for ChipConfig {
    fn default() -> Self {
        Revision::default().config()
    }
}

impl From<Revision> for ChipConfig {
    fn from(revision: Revision) -> Self {
        revision.config()
    }
}

/// Filter-stage output mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    /// Single low-passed channel from the combined sample
    #[default]
    Mono,
    /// Independent low-passed left and right channels
    Stereo,
    /// Stereo plus the delayed cross-fed pan signal
    Headphone,
}

impl OutputMode {
    /// Number of output channels this mode writes
    pub fn channel_count(self) -> usize {
        match self {
            OutputMode::Mono => 1,
            OutputMode::Stereo | OutputMode::Headphone => 2,
        }
    }
}
