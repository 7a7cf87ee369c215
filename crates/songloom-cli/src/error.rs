//! Errors from the render pipeline stages the CLI drives.

use std::fmt;
use std::path::PathBuf;

use songloom_spec::BackendError;
use thiserror::Error;

/// Pipeline stage an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Compose,
    Load,
    Renderer,
    Encode,
    Playback,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Compose => "compose",
            Stage::Load => "load",
            Stage::Renderer => "renderer",
            Stage::Encode => "encode",
            Stage::Playback => "playback",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A whole-render failure.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A library error, tagged with where it happened.
    #[error("{stage} failed: {message}")]
    Failed { stage: Stage, message: String },

    #[error("program '{program}' not found in PATH")]
    ProgramNotFound { stage: Stage, program: String },

    #[error("failed to spawn '{program}': {message}")]
    SpawnFailed { program: String, message: String },

    #[error("renderer timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// The external renderer exited unsuccessfully. No output is kept.
    #[error("renderer exited with status {code}: {stderr}")]
    RendererFailed { code: i32, stderr: String },

    #[error("renderer reported success but wrote no file at {path}")]
    OutputMissing { path: PathBuf },

    #[error("no playback program found (tried {tried})")]
    NoPlayer { tried: String },

    #[error("{stage} I/O error: {source}")]
    Io {
        stage: Stage,
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    /// Wraps any error as a failure of `stage`.
    pub fn at(stage: Stage, err: impl fmt::Display) -> Self {
        Self::Failed {
            stage,
            message: err.to_string(),
        }
    }

    pub fn io(stage: Stage, source: std::io::Error) -> Self {
        Self::Io { stage, source }
    }

    pub fn stage(&self) -> Stage {
        match self {
            RenderError::Failed { stage, .. }
            | RenderError::ProgramNotFound { stage, .. }
            | RenderError::Io { stage, .. } => *stage,
            RenderError::SpawnFailed { .. }
            | RenderError::Timeout { .. }
            | RenderError::RendererFailed { .. }
            | RenderError::OutputMissing { .. } => Stage::Renderer,
            RenderError::NoPlayer { .. } => Stage::Playback,
        }
    }
}

impl BackendError for RenderError {
    fn code(&self) -> &'static str {
        match self {
            RenderError::Failed { .. } => "RENDER_001",
            RenderError::ProgramNotFound { .. } => "RENDER_002",
            RenderError::SpawnFailed { .. } => "RENDER_003",
            RenderError::Timeout { .. } => "RENDER_004",
            RenderError::RendererFailed { .. } => "RENDER_005",
            RenderError::OutputMissing { .. } => "RENDER_006",
            RenderError::NoPlayer { .. } => "RENDER_007",
            RenderError::Io { .. } => "RENDER_008",
        }
    }

    fn category(&self) -> &'static str {
        "render"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_tagging() {
        let err = RenderError::at(Stage::Compose, "empty structure catalog");
        assert_eq!(err.stage(), Stage::Compose);
        assert_eq!(err.to_string(), "compose failed: empty structure catalog");
        assert_eq!(err.code(), "RENDER_001");

        let failed = RenderError::RendererFailed {
            code: 2,
            stderr: "bad soundfont".into(),
        };
        assert_eq!(failed.stage(), Stage::Renderer);
        assert!(failed.to_string().contains("bad soundfont"));

        let none = RenderError::NoPlayer {
            tried: "aplay".into(),
        };
        assert_eq!(none.stage(), Stage::Playback);
        assert_eq!(none.category(), "render");
    }
}
