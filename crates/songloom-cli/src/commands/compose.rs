//! Compose command implementation
//!
//! Composes a song and prints its structure, harmony and tracks.

use anyhow::Result;
use colored::Colorize;
use songloom_compose::Song;
use std::process::ExitCode;

use crate::input::Overrides;

/// Run the compose command
///
/// # Arguments
/// * `config_path` - Optional render config (JSON)
/// * `seed` - Seed override
/// * `json_output` - Print the whole song as JSON instead of a summary
pub fn run(config_path: Option<&str>, seed: Option<u32>, json_output: bool) -> Result<ExitCode> {
    let overrides = Overrides {
        seed,
        ..Overrides::default()
    };
    let (_, song) = super::compose_from_args(config_path, &overrides, json_output)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&song)?);
    } else {
        print_summary(&song);
    }
    Ok(ExitCode::SUCCESS)
}

/// Human-readable song overview.
pub(crate) fn print_summary(song: &Song) {
    println!(
        "{} {} ({} units, {:.1}s at {} bpm)",
        "Structure:".cyan().bold(),
        song.structure.template,
        song.total_units(),
        song.duration_seconds(),
        song.timing.tempo_bpm
    );
    for (offset, section) in song.structure.offsets() {
        println!(
            "  {:>4}  {} x{}",
            offset.to_string().dimmed(),
            section.kind.as_str(),
            section.length
        );
    }

    println!("{} {}", "Key:".cyan().bold(), song.theory.scale.name);
    println!(
        "  verse  {}  ({})",
        song.theory.verse_progression,
        chord_names(&song.theory.verse_chords)
    );
    println!(
        "  chorus {}  ({})",
        song.theory.chorus_progression,
        chord_names(&song.theory.chorus_chords)
    );

    println!("{}", "Tracks:".cyan().bold());
    for (role, track) in &song.tracks {
        println!("  {:<7} {} events", role.as_str(), track.len());
    }
    println!("{} {}", "Seed:".dimmed(), song.seed);
}

fn chord_names(chords: &[songloom_compose::Chord]) -> String {
    chords
        .iter()
        .map(|c| c.root().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
