//! songloom CLI - procedural song composition and rendering
//!
//! Composes songs from a seed, renders them by stitching sample fragments or
//! through an external MIDI renderer, and plays the result.

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use songloom_cli::commands;

/// songloom - Procedural Song Composer
#[derive(Parser)]
#[command(name = "songloom")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose a song and print its structure, chords and tracks
    Compose {
        /// Path to a render config (JSON)
        #[arg(short, long)]
        config: Option<String>,

        /// Seed (overrides the config; drawn at random when unset)
        #[arg(short, long)]
        seed: Option<u32>,

        /// Print the whole song as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a song to WAV by stitching sample fragments
    Render {
        /// Output WAV path
        #[arg(short, long)]
        out: String,

        /// Path to a render config (JSON)
        #[arg(short, long)]
        config: Option<String>,

        /// Seed (overrides the config; drawn at random when unset)
        #[arg(short, long)]
        seed: Option<u32>,

        /// Fragment directory with one subdirectory per fragment role
        #[arg(short, long)]
        fragments: Option<String>,

        /// Play the result once written
        #[arg(long)]
        play: bool,
    },

    /// Write a song as a Standard MIDI File, optionally rendering it to WAV
    Midi {
        /// Output MIDI path
        #[arg(short, long)]
        out: String,

        /// Path to a render config (JSON)
        #[arg(short, long)]
        config: Option<String>,

        /// Seed (overrides the config; drawn at random when unset)
        #[arg(short, long)]
        seed: Option<u32>,

        /// Render to this WAV path with the external renderer
        #[arg(long)]
        render: Option<String>,

        /// Play the rendered WAV
        #[arg(long)]
        play: bool,
    },

    /// Play an audio file with the configured player
    Play {
        /// File to play
        file: String,

        /// Path to a render config (JSON) supplying the player
        #[arg(short, long)]
        config: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Compose { config, seed, json } => {
            commands::compose::run(config.as_deref(), seed, json)
        }
        Commands::Render {
            out,
            config,
            seed,
            fragments,
            play,
        } => commands::render::run(&out, config.as_deref(), seed, fragments.as_deref(), play),
        Commands::Midi {
            out,
            config,
            seed,
            render,
            play,
        } => commands::midi::run(&out, config.as_deref(), seed, render.as_deref(), play),
        Commands::Play { file, config } => commands::play::run(&file, config.as_deref()),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
