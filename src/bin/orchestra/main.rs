//! orchestra - offline renderer for the bundled instrument scenes
//!
//! Run with: cargo run --bin orchestra -- --scene three-pole
//! Parameter logs print at info level; RUST_LOG=debug shows scheduling.

mod scenes;
mod spectrum;

use clap::Parser;
use color_eyre::eyre::{eyre, Result, WrapErr};
use orchestra_dsp::{BufferSink, Orchestra, OrchestraConfig, DEFAULT_SAMPLE_RATE};
use tracing::info;
use tracing_subscriber::EnvFilter;

use scenes::Scene;
use spectrum::{fft_len, SpectrumAnalyzer};

#[derive(Parser, Debug)]
#[command(name = "orchestra", about = "Render an instrument scene offline")]
struct Args {
    /// Scene to render
    #[arg(long, value_enum, default_value_t = Scene::ThreePole)]
    scene: Scene,

    /// Seconds to render (defaults to the scene's own length)
    #[arg(long)]
    duration: Option<f64>,

    /// Ticks per second
    #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE)]
    sample_rate: f32,

    /// Mix channels
    #[arg(long, default_value_t = 1)]
    channels: usize,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = OrchestraConfig::default()
        .with_sample_rate(args.sample_rate)
        .with_channels(args.channels);
    let mut orchestra = Orchestra::new(config).wrap_err("invalid orchestra settings")?;

    let duration = args.duration.unwrap_or_else(|| args.scene.default_duration());
    if !(duration.is_finite() && duration >= 0.0) {
        return Err(eyre!("duration must be a non-negative number of seconds, got {duration}"));
    }
    args.scene.install(&mut orchestra, duration as f32)?;

    let mut sink = BufferSink::new(config.channels);
    let summary = orchestra.run(duration, &mut sink).wrap_err("render failed")?;
    info!(scene = ?args.scene, ticks = summary.ticks, "render finished");

    for (channel, peak) in summary.peaks.iter().enumerate() {
        println!("channel {channel}: peak {peak:.4}");
    }

    let rendered = sink.channel(0);
    let len = fft_len(rendered.len(), config.sample_rate);
    if len == 0 {
        println!("too short for a spectrum");
        return Ok(());
    }

    let mut analyzer = SpectrumAnalyzer::new(len, config.sample_rate);
    println!("spectrum of the final {len} samples (channel 0):");
    for (freq, db) in analyzer.analyze(&rendered[rendered.len() - len..]) {
        println!("{freq:>9.1} Hz {db:>7.1} dB");
    }

    Ok(())
}
