//! The ARS start-up chime
//!
//! An E minor chord on three sawtooth voices, doubled an octave up on four
//! square voices, that slides to E major and fades out.

use et209::{ChannelBuffers, Et209, OutputMode, Waveform, NUM_VOICES, VOLUME_RESET_FLAG};

/// Voice rates: E minor, the same chord an octave up, then a high E
const CHIME_RATES: [u32; NUM_VOICES] = [224, 267, 336, 449, 534, 673, 899];

/// Frames (register updates) in the whole sequence
pub const CHIME_FRAMES: usize = 32 + 4 * 16 + 32 + 30 + 64;

/// Renders one frame of audio after each register update
struct Sequencer<'a> {
    chip: &'a mut Et209,
    mode: OutputMode,
    samples_per_frame: usize,
    out: ChannelBuffers,
}

impl Sequencer<'_> {
    fn frame(&mut self) {
        let part = self.chip.render(self.mode, self.samples_per_frame);
        self.out.extend_from(&part);
    }
}

/// Program `chip` with the chime and render it
pub fn render_chime(chip: &mut Et209, mode: OutputMode, samples_per_frame: usize) -> ChannelBuffers {
    let reset = VOLUME_RESET_FLAG as u32;

    // Mute everything
    chip.write_noise_volume(reset);
    for voice in 0..NUM_VOICES {
        chip.write_voice_volume(voice, reset);
    }
    for voice in 0..NUM_VOICES {
        let waveform = if voice < 3 {
            Waveform::OUTPUT_ACCUMULATOR
        } else {
            Waveform::TOGGLE_INVERT_ON_CARRY
        };
        chip.write_voice_waveform(voice, waveform.bits() as u32);
        chip.write_voice_rate(voice, CHIME_RATES[voice]);
    }

    let mut seq = Sequencer {
        chip,
        mode,
        samples_per_frame,
        out: ChannelBuffers::for_mode(mode, 0),
    };

    // Chord swells in together
    for volume in (2..=64).step_by(2) {
        for voice in 0..3 {
            seq.chip.write_voice_volume(voice, volume);
        }
        seq.frame();
    }

    // Upper voices enter one by one
    for voice in 3..NUM_VOICES {
        let mut flags = reset;
        for volume in (4..=64).step_by(4) {
            seq.chip.write_voice_volume(voice, volume | flags);
            seq.frame();
            flags = 0;
        }
    }

    for _ in 0..32 {
        seq.frame();
    }

    // Minor third up a semitone
    for n in 1..=30 {
        seq.chip.write_voice_rate(1, CHIME_RATES[1] + (n >> 1));
        seq.chip.write_voice_rate(4, CHIME_RATES[4] + n);
        seq.frame();
    }

    for volume in (0..=63).rev() {
        for voice in 0..NUM_VOICES {
            seq.chip.write_voice_volume(voice, volume);
        }
        seq.frame();
    }

    seq.out
}

#[cfg(test)]
mod tests {
    use super::*;
    use et209::OutputBuffer;

    #[test]
    fn test_chime_length_and_shape() {
        let mut chip = Et209::new();
        let audio = render_chime(&mut chip, OutputMode::Stereo, 100);
        assert_eq!(audio.channel_count(), 2);
        assert_eq!(audio.frames(), CHIME_FRAMES * 100);
        assert_eq!(chip.sample_number(), (CHIME_FRAMES * 100) as u64);
    }

    #[test]
    fn test_chime_final_state() {
        let mut chip = Et209::new();
        render_chime(&mut chip, OutputMode::Mono, 16);
        for (i, voice) in chip.voices().iter().enumerate() {
            assert_eq!(voice.volume(), 0, "voice {i} faded out");
        }
        assert_eq!(chip.voice(1).unwrap().target_rate(), 282);
        assert_eq!(chip.voice(4).unwrap().target_rate(), 564);
    }

    #[test]
    fn test_chime_is_audible() {
        let mut chip = Et209::new();
        let audio = render_chime(&mut chip, OutputMode::Headphone, 800);
        let peak = audio
            .interleaved()
            .iter()
            .fold(0.0f32, |peak, s| peak.max(s.abs()));
        assert!(peak > 0.1 && peak < 1.0, "peak {peak}");
    }
}
