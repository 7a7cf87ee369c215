//! Loading the render configuration and applying command-line overrides.

use std::path::{Path, PathBuf};

use songloom_compose::entropy_seed;
use songloom_spec::{RenderConfig, SpecError};
use thiserror::Error;

/// Values given on the command line. They win over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub seed: Option<u32>,
    pub fragments: Option<PathBuf>,
    pub tempo_bpm: Option<f64>,
}

/// Errors from loading a configuration.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read config: {0}")]
    Read(#[source] SpecError),

    #[error("invalid config: {}", join(.0))]
    Invalid(Vec<SpecError>),
}

fn join(errors: &[SpecError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Reads `path` (or the defaults), applies overrides and validates.
pub fn load_config(path: Option<&Path>, overrides: &Overrides) -> Result<RenderConfig, InputError> {
    let mut config = match path {
        Some(path) => RenderConfig::load(path).map_err(InputError::Read)?,
        None => RenderConfig::default(),
    };

    if let Some(seed) = overrides.seed {
        config.seed = Some(seed);
    }
    if let Some(ref dir) = overrides.fragments {
        config.fragment_root = Some(dir.clone());
    }
    if let Some(tempo) = overrides.tempo_bpm {
        config.tempo_bpm = tempo;
    }

    config.validate().map_err(InputError::Invalid)?;
    Ok(config)
}

/// The configured seed, or a fresh one from entropy.
///
/// The flag is true when the seed was drawn, so callers can report it.
pub fn resolve_seed(config: &RenderConfig) -> (u32, bool) {
    match config.seed {
        Some(seed) => (seed, false),
        None => (entropy_seed(), true),
    }
}
