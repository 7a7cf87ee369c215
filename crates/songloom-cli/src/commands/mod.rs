//! CLI command implementations

pub mod compose;
pub mod midi;
pub mod play;
pub mod render;

use anyhow::{Context, Result};
use colored::Colorize;
use songloom_compose::{Composer, Song};
use songloom_spec::RenderConfig;
use std::path::Path;

use crate::error::{RenderError, Stage};
use crate::input::{load_config, resolve_seed, Overrides};

/// Loads the config and composes a song from it.
///
/// A drawn seed is printed so the song can be reproduced.
pub(crate) fn compose_from_args(
    config_path: Option<&str>,
    overrides: &Overrides,
    quiet: bool,
) -> Result<(RenderConfig, Song)> {
    let config = load_config(config_path.map(Path::new), overrides).with_context(|| {
        format!(
            "Failed to load config: {}",
            config_path.unwrap_or("<defaults>")
        )
    })?;

    let (seed, drawn) = resolve_seed(&config);
    if drawn && !quiet {
        println!("{} {} (pass --seed to reproduce)", "Seed:".dimmed(), seed);
    }

    let composer =
        Composer::from_config(&config).map_err(|e| RenderError::at(Stage::Compose, e))?;
    let song = composer
        .compose_seeded(seed)
        .map_err(|e| RenderError::at(Stage::Compose, e))?;
    Ok((config, song))
}
