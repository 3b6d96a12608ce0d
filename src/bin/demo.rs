//! voxpipe demo - one-shot synthesis showcase
//!
//! Prints which engines are usable, synthesizes one sentence with the
//! configured engine, saves it under the audio directory, and optionally
//! plays it back.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use voxpipe::audio::playback;
use voxpipe::engine::availability_report;
use voxpipe::{AppConfig, Pipeline, VERSION};

const SAMPLE_TEXT: &str = "Text to speech from the command line, with pipelines that compose.";

/// voxpipe demo
#[derive(Parser, Debug)]
#[command(name = "voxpipe-demo")]
#[command(about = "Synthesize a sample sentence and save it")]
struct Cli {
    /// Text to use instead of the built-in sample
    text: Option<String>,

    /// Play the audio after saving
    #[arg(long)]
    play: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    info!("voxpipe demo v{}", VERSION);

    let config = AppConfig::from_env();
    let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;

    println!("Engines:");
    for (kind, available) in runtime.block_on(availability_report(&config)) {
        let status = if available { "available" } else { "unavailable" };
        println!("  • {:8} {}", kind, status);
    }

    let pipeline = Pipeline::new(config.engine, &config.language, &config)?;
    let text = cli.text.as_deref().unwrap_or(SAMPLE_TEXT);

    info!(
        "Synthesizing via {} ({}): {}",
        pipeline.engine(),
        pipeline.language(),
        text
    );

    let start = Instant::now();
    let path = runtime.block_on(pipeline.save_async(text, None))?;
    info!("Synthesized in {:.1}s", start.elapsed().as_secs_f32());
    println!("Saved: {}", path.display());

    if cli.play {
        playback::play_file(&path)?;
    }

    Ok(())
}
