//! External symbolic renderer (MIDI to WAV).
//!
//! The renderer is a separate program, `fluidsynth` by default, invoked with
//! placeholder arguments:
//!
//! - `{midi}`: input Standard MIDI File
//! - `{wav}`: output WAV path
//! - `{rate}`: sample rate in Hz
//! - `{soundfont}`: configured soundfont; the argument is dropped when none
//!   is configured
//!
//! A nonzero exit, spawn failure or timeout fails the render and removes any
//! partial output.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use songloom_spec::RendererConfig;

use crate::error::{RenderError, Stage};

/// Runs the configured renderer program.
#[derive(Debug, Clone)]
pub struct SymbolicRenderer {
    program: String,
    args: Vec<String>,
    soundfont: Option<PathBuf>,
    timeout: Duration,
}

impl SymbolicRenderer {
    pub fn from_config(config: &RendererConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            soundfont: config.soundfont.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments with placeholders substituted.
    pub fn command_args(&self, midi: &Path, wav: &Path, rate: u32) -> Vec<String> {
        let soundfont = self
            .soundfont
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());

        self.args
            .iter()
            .filter(|arg| soundfont.is_some() || arg.as_str() != "{soundfont}")
            .map(|arg| {
                arg.replace("{midi}", &midi.to_string_lossy())
                    .replace("{wav}", &wav.to_string_lossy())
                    .replace("{rate}", &rate.to_string())
                    .replace("{soundfont}", soundfont.as_deref().unwrap_or(""))
            })
            .collect()
    }

    /// Renders `midi` into `wav` at `rate`.
    pub fn render(&self, midi: &Path, wav: &Path, rate: u32) -> Result<(), RenderError> {
        let program = which::which(&self.program).map_err(|_| RenderError::ProgramNotFound {
            stage: Stage::Renderer,
            program: self.program.clone(),
        })?;

        if wav.exists() {
            std::fs::remove_file(wav).map_err(|e| RenderError::io(Stage::Renderer, e))?;
        }

        let args = self.command_args(midi, wav, rate);
        tracing::debug!(program = %program.display(), ?args, "starting renderer");

        let child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RenderError::SpawnFailed {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        let start = Instant::now();
        let result = wait_with_timeout(child, self.timeout);
        let result = result.and_then(|(status, stderr)| {
            if !status.success() {
                return Err(RenderError::RendererFailed {
                    code: status.code().unwrap_or(-1),
                    stderr: stderr.trim().to_string(),
                });
            }
            if !wav.is_file() {
                return Err(RenderError::OutputMissing {
                    path: wav.to_path_buf(),
                });
            }
            Ok(())
        });

        if result.is_err() && wav.exists() {
            let _ = std::fs::remove_file(wav);
        }
        if result.is_ok() {
            tracing::info!(
                wav = %wav.display(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "renderer finished"
            );
        }
        result
    }
}

/// Waits for a child, killing it once `timeout` has passed.
///
/// Stderr is drained on its own thread so a chatty renderer cannot fill the
/// pipe and stall.
fn wait_with_timeout(
    mut child: Child,
    timeout: Duration,
) -> Result<(ExitStatus, String), RenderError> {
    let start = Instant::now();
    let stderr_reader = child.stderr.take().map(|mut pipe| {
        std::thread::spawn(move || {
            let mut stderr = String::new();
            let _ = pipe.read_to_string(&mut stderr);
            stderr
        })
    });
    let collect_stderr = |reader: Option<JoinHandle<String>>| {
        reader
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default()
    };

    // On the kill paths the reader is detached: a grandchild may still hold
    // the pipe open.
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok((status, collect_stderr(stderr_reader))),
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(RenderError::Timeout {
                        timeout_secs: timeout.as_secs(),
                    });
                }
                std::thread::sleep(Duration::from_millis(50));
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(RenderError::io(Stage::Renderer, e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn renderer(program: &str, args: &[&str], timeout_secs: u64) -> SymbolicRenderer {
        SymbolicRenderer::from_config(&RendererConfig {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            soundfont: None,
            timeout_secs,
        })
    }

    #[test]
    fn test_default_args_without_soundfont() {
        let r = SymbolicRenderer::from_config(&RendererConfig::default());
        let args = r.command_args(Path::new("song.mid"), Path::new("song.wav"), 44100);
        assert_eq!(args, vec!["-ni", "song.mid", "-F", "song.wav", "-r", "44100"]);
    }

    #[test]
    fn test_soundfont_substitution() {
        let mut config = RendererConfig::default();
        config.soundfont = Some(PathBuf::from("/sf/piano.sf2"));
        let r = SymbolicRenderer::from_config(&config);
        let args = r.command_args(Path::new("a.mid"), Path::new("a.wav"), 22050);
        assert_eq!(args[1], "/sf/piano.sf2");
        assert_eq!(args.len(), 7);
    }

    #[test]
    fn test_missing_program() {
        let r = renderer("songloom-no-such-renderer", &[], 1);
        let dir = tempfile::tempdir().unwrap();
        let err = r
            .render(&dir.path().join("a.mid"), &dir.path().join("a.wav"), 44100)
            .unwrap_err();
        assert!(matches!(err, RenderError::ProgramNotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_a_failure() {
        let r = renderer("sh", &["-c", "echo broken >&2; exit 3"], 5);
        let dir = tempfile::tempdir().unwrap();
        let err = r
            .render(&dir.path().join("a.mid"), &dir.path().join("a.wav"), 44100)
            .unwrap_err();
        match err {
            RenderError::RendererFailed { code, stderr } => {
                assert_eq!(code, 3);
                assert_eq!(stderr, "broken");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_partial_output_is_removed() {
        let r = renderer("sh", &["-c", "echo partial > \"$1\"; exit 1", "sh", "{wav}"], 5);
        let dir = tempfile::tempdir().unwrap();
        let wav = dir.path().join("a.wav");
        assert!(r.render(&dir.path().join("a.mid"), &wav, 44100).is_err());
        assert!(!wav.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_success_requires_output() {
        let dir = tempfile::tempdir().unwrap();
        let wav = dir.path().join("a.wav");

        let silent = renderer("true", &[], 5);
        let err = silent.render(&dir.path().join("a.mid"), &wav, 44100).unwrap_err();
        assert!(matches!(err, RenderError::OutputMissing { .. }));

        let writer = renderer("sh", &["-c", "printf ok > \"$1\"", "sh", "{wav}"], 5);
        writer.render(&dir.path().join("a.mid"), &wav, 44100).unwrap();
        assert_eq!(std::fs::read_to_string(&wav).unwrap(), "ok");
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_renderer() {
        let r = renderer("sleep", &["5"], 0);
        let dir = tempfile::tempdir().unwrap();
        let err = r
            .render(&dir.path().join("a.mid"), &dir.path().join("a.wav"), 44100)
            .unwrap_err();
        assert!(matches!(err, RenderError::Timeout { timeout_secs: 0 }));
    }

    #[cfg(unix)]
    #[test]
    fn test_chatty_renderer_still_succeeds() {
        let script = "head -c 200000 /dev/zero | tr '\\0' x >&2; printf ok > \"$1\"";
        let r = renderer("sh", &["-c", script, "sh", "{wav}"], 5);
        let dir = tempfile::tempdir().unwrap();
        let wav = dir.path().join("a.wav");

        let start = Instant::now();
        r.render(&dir.path().join("a.mid"), &wav, 44100).unwrap();
        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(std::fs::read_to_string(&wav).unwrap(), "ok");
    }

    #[cfg(unix)]
    #[test]
    fn test_chatty_failure_keeps_full_stderr() {
        let script = "head -c 100000 /dev/zero | tr '\\0' x >&2; exit 2";
        let r = renderer("sh", &["-c", script], 5);
        let dir = tempfile::tempdir().unwrap();
        let err = r
            .render(&dir.path().join("a.mid"), &dir.path().join("a.wav"), 44100)
            .unwrap_err();
        match err {
            RenderError::RendererFailed { code, stderr } => {
                assert_eq!(code, 2);
                assert_eq!(stderr.len(), 100_000);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_does_not_wait_for_stderr_holders() {
        let r = renderer("sh", &["-c", "sleep 3 & sleep 3"], 0);
        let dir = tempfile::tempdir().unwrap();
        let start = Instant::now();
        let err = r
            .render(&dir.path().join("a.mid"), &dir.path().join("a.wav"), 44100)
            .unwrap_err();
        assert!(matches!(err, RenderError::Timeout { .. }));
        assert!(start.elapsed() < Duration::from_secs(2));
    }
}
