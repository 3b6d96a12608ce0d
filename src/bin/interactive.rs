//! voxpipe interactive - read-synthesize-save loop
//!
//! Reads lines from stdin and converts each into a saved audio file with
//! a derived name. Lines starting with a command word switch settings or
//! list output instead; errors are printed and the loop keeps going.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{warn, Level};
use tracing_subscriber::FmtSubscriber;

use voxpipe::audio::{output, playback};
use voxpipe::engine::availability_report;
use voxpipe::{AppConfig, EngineKind, Pipeline, VERSION};

/// voxpipe interactive loop
#[derive(Parser, Debug)]
#[command(name = "voxpipe-interactive")]
#[command(about = "Interactive text-to-speech loop")]
struct Cli {
    /// Play each result after saving (overrides TTS_AUTO_PLAY)
    #[arg(long)]
    play: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

struct Session {
    config: AppConfig,
    pipeline: Pipeline,
    auto_play: bool,
    runtime: tokio::runtime::Runtime,
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

fn print_help() {
    println!("Commands:");
    println!("  engine offline|cloud   switch engine");
    println!("  language <code>        switch language");
    println!("  list                   recent audio files");
    println!("  help                   this message");
    println!("  quit | exit | q        leave");
    println!("Anything else is synthesized and saved.");
}

fn print_recent(session: &Session) {
    let files = output::recent_files(&session.config.audio_dir, 10);
    if files.is_empty() {
        println!("no audio files in {}", session.config.audio_dir.display());
        return;
    }
    for path in files {
        println!("  {}", path.display());
    }
}

/// Returns true when the session should end.
fn handle_line(session: &mut Session, line: &str) -> Result<bool> {
    match line {
        "quit" | "exit" | "q" => return Ok(true),
        "help" => {
            print_help();
            return Ok(false);
        }
        "list" => {
            print_recent(session);
            return Ok(false);
        }
        _ => {}
    }

    if let Some(rest) = line.strip_prefix("engine ") {
        let kind = EngineKind::from_str(rest)?;
        // a language unsupported by the new engine rejects the switch
        let language = session.pipeline.language().to_string();
        session.pipeline = Pipeline::new(kind, &language, &session.config)?;
        println!("engine set to {}", kind);
        return Ok(false);
    }
    if let Some(rest) = line.strip_prefix("language ") {
        let engine = session.pipeline.engine();
        session.pipeline = Pipeline::new(engine, rest, &session.config)?;
        println!("language set to {}", session.pipeline.language());
        return Ok(false);
    }

    let path = session
        .runtime
        .block_on(session.pipeline.save_async(line, None))?;
    println!("saved {}", path.display());
    if session.auto_play {
        playback::play_file(&path)?;
    }
    Ok(false)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = AppConfig::from_env();
    let auto_play = cli.play || config.auto_play;
    let pipeline = Pipeline::new(config.engine, &config.language, &config)?;
    let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;

    println!(
        "voxpipe interactive v{} (engine: {}, language: {})",
        VERSION,
        pipeline.engine(),
        pipeline.language()
    );
    for (kind, available) in runtime.block_on(availability_report(&config)) {
        let status = if available { "available" } else { "unavailable" };
        println!("  • {:8} {}", kind, status);
    }
    println!("Type text to synthesize, 'help' for commands, 'quit' to leave.");

    let mut session = Session {
        config,
        pipeline,
        auto_play,
        runtime,
    };

    let mut stdin = io::stdin().lock();
    loop {
        print!("> ");
        io::stdout().flush().ok();

        let mut line = String::new();
        match stdin.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                warn!("stdin closed: {}", e);
                break;
            }
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match handle_line(&mut session, line) {
            Ok(true) => break,
            Ok(false) => {}
            Err(e) => eprintln!("error: {:#}", e),
        }
    }

    println!("bye");
    Ok(())
}
