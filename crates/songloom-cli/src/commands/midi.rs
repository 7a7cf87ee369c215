//! MIDI command implementation
//!
//! Symbolic mode: composes a song, writes a Standard MIDI File and optionally
//! hands it to the external renderer.

use anyhow::Result;
use colored::Colorize;
use songloom_compose::{midi, SymbolicScore};
use std::path::Path;
use std::process::ExitCode;

use super::play::play_to_end;
use crate::error::{RenderError, Stage};
use crate::input::Overrides;
use crate::renderer::SymbolicRenderer;

/// Run the midi command
///
/// # Arguments
/// * `out` - Output `.mid` path
/// * `config_path` - Optional render config (JSON)
/// * `seed` - Seed override
/// * `render_wav` - Also render to this WAV path with the external renderer
/// * `play` - Play the rendered WAV (requires `render_wav`)
pub fn run(
    out: &str,
    config_path: Option<&str>,
    seed: Option<u32>,
    render_wav: Option<&str>,
    play: bool,
) -> Result<ExitCode> {
    if play && render_wav.is_none() {
        anyhow::bail!("--play needs --render <file.wav>");
    }

    let overrides = Overrides {
        seed,
        ..Overrides::default()
    };
    let (config, song) = super::compose_from_args(config_path, &overrides, false)?;

    let score = SymbolicScore::from_song(&song);
    let midi_path = Path::new(out);
    midi::write_smf(&score, midi_path).map_err(|e| RenderError::at(Stage::Encode, e))?;
    println!(
        "{} {} ({} tracks, {:.0} beats, seed {})",
        "Wrote:".green().bold(),
        midi_path.display(),
        score.tracks.len(),
        score.length_beats(),
        song.seed
    );

    let Some(wav) = render_wav else {
        return Ok(ExitCode::SUCCESS);
    };

    let renderer = SymbolicRenderer::from_config(&config.renderer);
    println!("{} {}", "Rendering with:".dimmed(), renderer.program());
    let wav_path = Path::new(wav);
    renderer.render(midi_path, wav_path, config.sample_rate)?;
    println!("{} {}", "Rendered:".green().bold(), wav_path.display());

    if play {
        play_to_end(&config.player, wav_path)?;
    }
    Ok(ExitCode::SUCCESS)
}
