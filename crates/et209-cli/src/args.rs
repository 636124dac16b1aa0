//! Command-line arguments for the chime renderer.

use std::path::PathBuf;

use clap::Parser;
use et209::config::NOMINAL_SAMPLES_PER_FRAME;
use et209::{OutputMode, Revision};
use serde::de::DeserializeOwned;

#[derive(Parser, Debug)]
#[command(name = "et209-chime")]
#[command(about = "Render the ARS start-up chime through the ET209 emulator")]
pub struct Args {
    /// Output WAV file
    #[arg(short, long, default_value = "chime.wav")]
    pub output: PathBuf,

    /// Filter stage: mono, stereo or headphone
    #[arg(short, long, default_value = "mono", value_parser = parse_kebab::<OutputMode>)]
    pub mode: OutputMode,

    /// Chip revision: ars, nominal48k or early-mono
    #[arg(short, long, default_value = "ars", value_parser = parse_kebab::<Revision>)]
    pub revision: Revision,

    /// JSON chip configuration; overrides --revision
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Samples per video frame
    #[arg(long, default_value_t = NOMINAL_SAMPLES_PER_FRAME)]
    pub samples_per_frame: usize,

    /// Peak-normalize the render
    #[arg(long)]
    pub normalize: bool,

    /// Fade-out length in seconds
    #[arg(long, default_value_t = 0.0)]
    pub fade_out: f32,
}

/// Parse a kebab-case enum name through its serde representation
fn parse_kebab<T: DeserializeOwned>(value: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(value.to_ascii_lowercase()))
        .map_err(|_| format!("unknown value '{value}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["et209-chime"]);
        assert_eq!(args.output, PathBuf::from("chime.wav"));
        assert_eq!(args.mode, OutputMode::Mono);
        assert_eq!(args.revision, Revision::Ars);
        assert_eq!(args.samples_per_frame, 800);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_enum_names() {
        let args = Args::parse_from(["et209-chime", "-m", "Headphone", "-r", "early-mono"]);
        assert_eq!(args.mode, OutputMode::Headphone);
        assert_eq!(args.revision, Revision::EarlyMono);
        assert!(Args::try_parse_from(["et209-chime", "--mode", "quad"]).is_err());
    }
}
