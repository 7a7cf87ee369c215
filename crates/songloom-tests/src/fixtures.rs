//! Synthetic fragment trees and a blocking render helper.

use std::f32::consts::TAU;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use songloom_audio::{
    arrange, render_blocking, wav, AudioBuffer, AudioResult, DirectoryFragmentSource,
    RenderOptions,
};
use songloom_compose::{create_component_rng, Song};
use songloom_spec::RenderConfig;
use tempfile::TempDir;

/// A temporary directory-per-role fragment store.
pub struct FragmentFixture {
    pub root: TempDir,
}

impl FragmentFixture {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// A store with one decaying tone per fragment role the default roles use,
    /// plus an ambient loop.
    pub fn full_kit(sample_rate: u32) -> Self {
        let fixture = Self::new();
        let tones = [
            ("kick", 60.0, 0.15),
            ("snare", 190.0, 0.12),
            ("hat", 3000.0, 0.05),
            ("open_hat", 2800.0, 0.2),
            ("clap", 1200.0, 0.1),
            ("bass", 65.41, 0.5),
            ("chord", 261.63, 1.0),
            ("arp", 261.63, 0.25),
            ("lead", 523.25, 0.4),
        ];
        for (role, freq, seconds) in tones {
            fixture.add_tone(role, "a.wav", sample_rate, freq, seconds);
        }
        fixture.add_tone("kick", "b.wav", sample_rate, 50.0, 0.2);
        fixture.add_tone("ambient", "air.wav", sample_rate, 110.0, 0.75);
        fixture
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Writes a decaying sine as `<role>/<name>`.
    pub fn add_tone(
        &self,
        role: &str,
        name: &str,
        sample_rate: u32,
        freq: f32,
        seconds: f32,
    ) -> PathBuf {
        let len = (sample_rate as f32 * seconds) as usize;
        let samples = (0..len)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (TAU * freq * t).sin() * (1.0 - i as f32 / len as f32) * 0.8
            })
            .collect();
        let buffer = AudioBuffer::new(sample_rate, samples).expect("valid sample rate");
        self.add_buffer(role, name, &buffer)
    }

    /// Writes `buffer` as `<role>/<name>`.
    pub fn add_buffer(&self, role: &str, name: &str, buffer: &AudioBuffer) -> PathBuf {
        let dir = self.root.path().join(role);
        std::fs::create_dir_all(&dir).expect("Failed to create role dir");
        let path = dir.join(name);
        wav::write_wav(buffer, &path).expect("Failed to write fragment");
        path
    }

    /// Creates an empty fragment role directory.
    pub fn add_empty_role(&self, role: &str) {
        std::fs::create_dir_all(self.root.path().join(role)).expect("Failed to create role dir");
    }

    pub fn source(&self) -> DirectoryFragmentSource {
        DirectoryFragmentSource::new(self.root.path())
    }
}

impl Default for FragmentFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Arranges and renders a song from `root` synchronously, the way the
/// CLI does.
pub fn render_song(song: &Song, config: &RenderConfig, root: &Path) -> AudioResult<AudioBuffer> {
    let source = Arc::new(DirectoryFragmentSource::new(root));
    let mut rng = create_component_rng(song.seed, "kit");
    let arrangement = arrange(&song.tracks, source.as_ref(), config.ambient, &mut rng);
    let options =
        RenderOptions::from_config(config).with_length_units(song.total_units() as f64);
    render_blocking(&arrangement, source, &options)
}
