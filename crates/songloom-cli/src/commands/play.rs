//! Play command implementation

use anyhow::{Context, Result};
use colored::Colorize;
use songloom_spec::PlayerConfig;
use std::path::Path;
use std::process::ExitCode;

use crate::input::{load_config, Overrides};
use crate::playback::PlaybackSession;

/// Run the play command
///
/// # Arguments
/// * `file` - Audio file to play
/// * `config_path` - Optional render config supplying the player
pub fn run(file: &str, config_path: Option<&str>) -> Result<ExitCode> {
    let path = Path::new(file);
    if !path.is_file() {
        anyhow::bail!("file not found: {}", file);
    }
    let config = load_config(config_path.map(Path::new), &Overrides::default())
        .context("Failed to load config")?;
    play_to_end(&config.player, path)?;
    Ok(ExitCode::SUCCESS)
}

/// Plays `path` and blocks until the player exits.
pub(crate) fn play_to_end(player: &PlayerConfig, path: &Path) -> Result<()> {
    let mut session = PlaybackSession::from_config(player)?;
    println!(
        "{} {} ({})",
        "Playing:".cyan().bold(),
        path.display(),
        session.program().display()
    );
    session.start(path)?;
    if let Some(status) = session.wait()? {
        if !status.success() {
            anyhow::bail!("player exited with {}", status);
        }
    }
    Ok(())
}
