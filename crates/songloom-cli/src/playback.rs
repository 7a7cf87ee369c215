//! Playback through an external player process.
//!
//! At most one playback runs per session: starting a new one stops the
//! previous process first. Dropping the session stops playback.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};

use songloom_spec::PlayerConfig;

use crate::error::{RenderError, Stage};

/// Players tried in order when none is configured, with their arguments.
const DEFAULT_PLAYERS: &[(&str, &[&str])] = &[
    ("afplay", &[]),
    ("aplay", &["-q"]),
    ("paplay", &[]),
    ("ffplay", &["-nodisp", "-autoexit", "-loglevel", "quiet"]),
];

/// An external player and the process it is currently running.
#[derive(Debug)]
pub struct PlaybackSession {
    program: PathBuf,
    args: Vec<String>,
    child: Option<Child>,
}

impl PlaybackSession {
    /// Creates a session that plays files with `program args... <file>`.
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            child: None,
        }
    }

    /// Resolves the configured player, or the first default found in PATH.
    pub fn from_config(config: &PlayerConfig) -> Result<Self, RenderError> {
        if let Some(ref name) = config.program {
            let program = which::which(name).map_err(|_| RenderError::ProgramNotFound {
                stage: Stage::Playback,
                program: name.clone(),
            })?;
            return Ok(Self::new(program, config.args.clone()));
        }

        for (name, args) in DEFAULT_PLAYERS {
            if let Ok(program) = which::which(name) {
                tracing::debug!(player = %program.display(), "using default player");
                let mut all: Vec<String> = args.iter().map(|s| s.to_string()).collect();
                all.extend(config.args.iter().cloned());
                return Ok(Self::new(program, all));
            }
        }

        Err(RenderError::NoPlayer {
            tried: DEFAULT_PLAYERS
                .iter()
                .map(|(name, _)| *name)
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Starts playing `path`, stopping any current playback.
    pub fn start(&mut self, path: &Path) -> Result<(), RenderError> {
        self.stop()?;

        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| RenderError::io(Stage::Playback, e))?;
        tracing::debug!(file = %path.display(), pid = child.id(), "playback started");
        self.child = Some(child);
        Ok(())
    }

    /// Stops the current playback, if any.
    pub fn stop(&mut self) -> Result<(), RenderError> {
        if let Some(mut child) = self.child.take() {
            if child
                .try_wait()
                .map_err(|e| RenderError::io(Stage::Playback, e))?
                .is_none()
            {
                child
                    .kill()
                    .map_err(|e| RenderError::io(Stage::Playback, e))?;
                tracing::debug!(pid = child.id(), "playback stopped");
            }
            child
                .wait()
                .map_err(|e| RenderError::io(Stage::Playback, e))?;
        }
        Ok(())
    }

    /// Whether the player process is still running.
    pub fn is_playing(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    /// Blocks until the current playback ends.
    pub fn wait(&mut self) -> Result<Option<ExitStatus>, RenderError> {
        match self.child.take() {
            Some(mut child) => child
                .wait()
                .map(Some)
                .map_err(|e| RenderError::io(Stage::Playback, e)),
            None => Ok(None),
        }
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_session() {
        let mut session = PlaybackSession::new("player", Vec::new());
        assert!(!session.is_playing());
        assert!(session.stop().is_ok());
        assert!(session.wait().unwrap().is_none());
    }

    #[test]
    fn test_configured_player_must_exist() {
        let config = PlayerConfig {
            program: Some("songloom-no-such-player".into()),
            args: Vec::new(),
        };
        let err = PlaybackSession::from_config(&config).unwrap_err();
        assert!(matches!(
            err,
            RenderError::ProgramNotFound {
                stage: Stage::Playback,
                ..
            }
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_start_replaces_and_stop_ends_playback() {
        // `sh -c "sleep 5" <file>` stands in for a player.
        let args = vec!["-c".to_string(), "sleep 5".to_string()];
        let mut session = PlaybackSession::new("sh", args);

        session.start(Path::new("first.wav")).unwrap();
        assert!(session.is_playing());
        session.start(Path::new("second.wav")).unwrap();
        assert!(session.is_playing());

        session.stop().unwrap();
        assert!(!session.is_playing());
    }

    #[cfg(unix)]
    #[test]
    fn test_wait_returns_exit_status() {
        let mut session = PlaybackSession::new("true", Vec::new());
        session.start(Path::new("song.wav")).unwrap();
        let status = session.wait().unwrap().unwrap();
        assert!(status.success());
        assert!(!session.is_playing());
    }
}
