//! ytbridge CLI - inspect how the YouTube tech sees a source
//!
//! Features:
//! - Media id extraction for any URL
//! - Source probing (canPlaySource, widget configuration)
//! - Replay of widget state codes through the tech's event translation
//! - Playback quality → dimension table

use clap::{Parser, Subcommand};

mod commands;
mod output;
mod replay;

/// ytbridge CLI - YouTube tech toolkit
#[derive(Parser)]
#[command(name = "ytbridge")]
#[command(author = "Purple Squirrel Media")]
#[command(version)]
#[command(about = "Inspect and replay the YouTube iframe tech", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract media ids from URLs
    Id {
        /// URLs to inspect
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Show whether a source is playable and the widget config it yields
    Probe {
        /// Source URL
        url: String,

        /// Source MIME-like type
        #[arg(short = 't', long = "type", default_value = "video/youtube")]
        mime_type: String,

        /// Use the widget's own controls
        #[arg(long)]
        native_controls: bool,

        /// Autoplay once loaded
        #[arg(long)]
        autoplay: bool,

        /// Loop playback
        #[arg(long = "loop")]
        loop_playback: bool,
    },

    /// Replay widget state codes and print the host events they produce
    Events {
        /// State codes (-1 unstarted, 0 ended, 1 playing, 2 paused, 3 buffering, 5 cued)
        #[arg(required = true, allow_negative_numbers = true)]
        codes: Vec<i32>,

        /// Replay with the widget's own controls active
        #[arg(long)]
        native_controls: bool,
    },

    /// Show the playback quality → video dimension table
    Qualities,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_writer(std::io::stderr)
        .init();
    ytbridge_core::init();

    match cli.command {
        Commands::Id { urls } => {
            commands::id(&urls, &cli.format)?;
        }
        Commands::Probe { url, mime_type, native_controls, autoplay, loop_playback } => {
            commands::probe(&url, &mime_type, native_controls, autoplay, loop_playback, &cli.format)?;
        }
        Commands::Events { codes, native_controls } => {
            commands::events(&codes, native_controls, &cli.format)?;
        }
        Commands::Qualities => {
            commands::qualities(&cli.format)?;
        }
    }

    Ok(())
}
