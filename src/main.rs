//! voxpipe CLI - text-to-speech from the command line
//!
//! Converts one text (argument or file) through the offline or cloud
//! engine and returns raw bytes, an in-memory buffer, or a written file.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use voxpipe::audio::playback;
use voxpipe::{AppConfig, EngineKind, OutputMode, Pipeline, PipelineOutput, VERSION};

/// Engine choices exposed on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EngineArg {
    /// Local synthesizer producing WAV
    Offline,
    /// Hosted service producing MP3
    Cloud,
}

impl From<EngineArg> for EngineKind {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Offline => EngineKind::Offline,
            EngineArg::Cloud => EngineKind::Cloud,
        }
    }
}

/// Output shapes exposed on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// Hold the raw audio bytes and report their count
    Bytes,
    /// Hold an in-memory reader and report the byte count
    Bytesio,
    /// Write a file and print its path
    File,
}

impl From<FormatArg> for OutputMode {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Bytes => OutputMode::Bytes,
            FormatArg::Bytesio => OutputMode::Buffer,
            FormatArg::File => OutputMode::File,
        }
    }
}

/// voxpipe - text-to-speech over offline and cloud engines
#[derive(Parser, Debug)]
#[command(name = "voxpipe")]
#[command(author, version)]
#[command(about = "Convert text to speech through offline or cloud engines")]
#[command(long_about = "
voxpipe converts text to speech through one of two engines: a local
synthesizer producing WAV or a hosted service producing MP3.

Examples:
  # Synthesize to a timestamped file in the audio directory
  voxpipe \"Hello world\"

  # Offline engine, explicit output path
  voxpipe --engine offline -o hello.wav \"Hello world\"

  # Read the text from a file and play the result
  voxpipe -f speech.txt --play

  # Keep the audio in memory and report its size
  voxpipe --format bytes \"Hello world\"
")]
struct Cli {
    /// Text to synthesize (or use --file)
    #[arg(required_unless_present = "file")]
    text: Option<String>,

    /// Read the text from a file instead
    #[arg(short = 'f', long, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Output file path (file mode; extension follows the engine)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Engine to use (default from TTS_ENGINE, cloud otherwise)
    #[arg(long, value_enum)]
    engine: Option<EngineArg>,

    /// How to return the audio (default from TTS_OUTPUT_FORMAT, file otherwise)
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Language code, e.g. en, de, ja (default from TTS_LANGUAGE)
    #[arg(short = 'l', long)]
    language: Option<String>,

    /// Play the audio after synthesis
    #[arg(long)]
    play: bool,

    /// Enable verbose logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only report errors
    #[arg(short, long)]
    quiet: bool,
}

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn create_progress_bar(msg: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb
}

fn read_text(cli: &Cli) -> Result<String> {
    match (&cli.text, &cli.file) {
        (Some(text), None) => Ok(text.clone()),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read text from {:?}", path)),
        _ => anyhow::bail!("provide the text argument or --file, not both"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    info!("voxpipe v{}", VERSION);

    let config = AppConfig::from_env();
    let engine: EngineKind = cli.engine.map(Into::into).unwrap_or(config.engine);
    let language = cli
        .language
        .clone()
        .unwrap_or_else(|| config.language.clone());
    let mode: OutputMode = cli.format.map(Into::into).unwrap_or(config.output_format);

    let text = read_text(&cli)?;
    let pipeline = Pipeline::new(engine, &language, &config)?;

    info!("Engine: {} | language: {}", engine, pipeline.language());
    let preview: String = text.chars().take(50).collect();
    info!("Text: {} ({} chars)", preview, text.chars().count());

    let pb = create_progress_bar("Synthesizing...", cli.quiet);
    let start = Instant::now();
    let result = pipeline.run(&text, mode, cli.output.as_deref());
    match &result {
        Ok(_) => pb.finish_with_message(format!("Done in {:.1}s", start.elapsed().as_secs_f32())),
        Err(_) => pb.finish_and_clear(),
    }

    match result? {
        PipelineOutput::File(path) => {
            info!("Saved to {:?}", path);
            println!("{}", path.display());
            if cli.play {
                playback::play_file(&path)?;
            }
        }
        PipelineOutput::Bytes(audio) => {
            println!("{} bytes of {} audio", audio.len(), audio.format());
            if cli.play {
                playback::play(&audio)?;
            }
        }
        PipelineOutput::Buffer(reader) => {
            let payload = reader.into_inner();
            println!("{} bytes buffered", payload.len());
            if cli.play {
                playback::play_bytes(payload)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positional_text() {
        let cli = Cli::try_parse_from(["voxpipe", "hello there"]).unwrap();
        assert_eq!(cli.text.as_deref(), Some("hello there"));
        assert!(cli.file.is_none());
    }

    #[test]
    fn test_parse_engine_and_format_values() {
        let cli = Cli::try_parse_from([
            "voxpipe", "--engine", "offline", "--format", "bytesio", "hi",
        ])
        .unwrap();
        assert_eq!(cli.engine, Some(EngineArg::Offline));
        assert_eq!(cli.format.map(OutputMode::from), Some(OutputMode::Buffer));
    }

    #[test]
    fn test_text_or_file_is_required() {
        assert!(Cli::try_parse_from(["voxpipe"]).is_err());
    }

    #[test]
    fn test_text_and_file_conflict() {
        assert!(Cli::try_parse_from(["voxpipe", "-f", "in.txt", "hello"]).is_err());
    }

    #[test]
    fn test_verbose_quiet_conflict() {
        assert!(Cli::try_parse_from(["voxpipe", "-v", "-q", "hi"]).is_err());
    }

    #[test]
    fn test_unknown_engine_value_rejected() {
        assert!(Cli::try_parse_from(["voxpipe", "--engine", "robot", "hi"]).is_err());
    }
}
