//! Render command implementation
//!
//! Sample mode: composes a song, stitches fragments into one buffer and
//! writes it as WAV.

use anyhow::Result;
use colored::Colorize;
use songloom_audio::{arrange, render_blocking, wav, DirectoryFragmentSource, RenderOptions};
use songloom_compose::create_component_rng;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use super::play::play_to_end;
use crate::error::{RenderError, Stage};
use crate::input::Overrides;

/// Run the render command
///
/// # Arguments
/// * `out` - Output WAV path
/// * `config_path` - Optional render config (JSON)
/// * `seed` - Seed override
/// * `fragments` - Fragment directory override
/// * `play` - Play the result once written
pub fn run(
    out: &str,
    config_path: Option<&str>,
    seed: Option<u32>,
    fragments: Option<&str>,
    play: bool,
) -> Result<ExitCode> {
    let start = Instant::now();
    let overrides = Overrides {
        seed,
        fragments: fragments.map(PathBuf::from),
        tempo_bpm: None,
    };
    let (config, song) = super::compose_from_args(config_path, &overrides, false)?;

    let root = config.fragment_root.clone().ok_or_else(|| {
        anyhow::anyhow!("no fragment directory: pass --fragments or set fragment_root")
    })?;
    if !root.is_dir() {
        anyhow::bail!("fragment directory not found: {}", root.display());
    }
    println!("{} {}", "Fragments:".dimmed(), root.display());

    let source = Arc::new(DirectoryFragmentSource::new(root));
    let mut rng = create_component_rng(song.seed, "kit");
    let arrangement = arrange(&song.tracks, source.as_ref(), config.ambient, &mut rng);

    let options = RenderOptions::from_config(&config).with_length_units(song.total_units() as f64);
    let buffer = render_blocking(&arrangement, source, &options)
        .map_err(|e| RenderError::at(Stage::Load, e))?;

    let out_path = Path::new(out);
    wav::write_wav(&buffer, out_path).map_err(|e| RenderError::at(Stage::Encode, e))?;

    println!(
        "{} {} ({:.1}s, {} placements, seed {}, {}ms)",
        "Rendered:".green().bold(),
        out_path.display(),
        buffer.duration_seconds(),
        arrangement.placement_count(),
        song.seed,
        start.elapsed().as_millis()
    );

    if play {
        play_to_end(&config.player, out_path)?;
    }
    Ok(ExitCode::SUCCESS)
}
