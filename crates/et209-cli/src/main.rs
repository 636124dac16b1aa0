//! ET209 chime renderer
//!
//! Plays the ARS start-up chime on an emulated ET209 and writes the result
//! to a WAV file.

mod args;
mod chime;

use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use et209::export::{export_to_wav, ExportConfig};
use et209::{ChipConfig, Et209};
use log::info;

use args::Args;
use chime::render_chime;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut chip = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let config: ChipConfig = serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", path.display()))?;
            Et209::with_config(config)?
        }
        None => Et209::with_revision(args.revision),
    };

    let export = ExportConfig {
        mode: args.mode,
        normalize: args.normalize,
        fade_out_duration: args.fade_out.max(0.0),
    };

    info!(
        "Rendering chime: {:?} output at {:.2} Hz, {} samples per frame",
        export.mode,
        chip.sample_rate(),
        args.samples_per_frame
    );
    let audio = render_chime(&mut chip, export.mode, args.samples_per_frame);

    export_to_wav(audio, &args.output, chip.config().sample_rate_hz(), &export)
        .with_context(|| format!("writing {}", args.output.display()))?;
    Ok(())
}
