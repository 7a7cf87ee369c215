//! Render configuration.
//!
//! A `RenderConfig` is a JSON document where every field has a default, so
//! `{}` is a valid config. Command-line flags override values read from a
//! file. Validation collects every problem instead of stopping at the first.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SpecError;
use crate::pitch::PitchClass;
use crate::song::{Role, Section, Timing};

/// Ornamentation probabilities used by the pattern library.
///
/// Each value is the probability of one independent Bernoulli draw per
/// candidate event.
pub mod ornaments {
    /// Extra kick on an off-beat sixteenth.
    pub const GHOST_KICK: f64 = 0.15;
    /// Dropping a closed hat hit.
    pub const HAT_SKIP: f64 = 0.1;
    /// Replacing the last off-beat hat with an open hat.
    pub const OPEN_HAT: f64 = 0.2;
    /// Layering a clap on a backbeat snare.
    pub const CLAP_LAYER: f64 = 0.25;
    /// Each sixteenth of the fill roll sounding.
    pub const FILL_ROLL: f64 = 0.75;
    /// Bass note jumping up an octave.
    pub const BASS_OCTAVE_JUMP: f64 = 0.2;
    /// Bass pickup note leading into the next chord.
    pub const BASS_PICKUP: f64 = 0.3;
    /// Arpeggio note doubled an octave up.
    pub const ARP_OCTAVE_DOUBLE: f64 = 0.25;
    /// Arpeggio step left silent.
    pub const ARP_SKIP: f64 = 0.1;
    /// Melody step left silent.
    pub const MELODY_REST: f64 = 0.25;
    /// Melody moving by a leap instead of a step.
    pub const MELODY_LEAP: f64 = 0.2;
    /// Free melody walk moving up rather than down.
    pub const MELODY_RISE: f64 = 0.5;
    /// Largest melody leap in scale steps. Leaps are at least two steps.
    pub const MELODY_LEAP_MAX: u32 = 4;
    /// Largest allowed `MELODY_LEAP_MAX`: the walk stays within an octave.
    pub const MELODY_LEAP_LIMIT: u32 = 7;
}

/// Configurable ornamentation probabilities and the melody leap span.
/// Defaults come from [`ornaments`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ornaments {
    pub ghost_kick: f64,
    pub hat_skip: f64,
    pub open_hat: f64,
    pub clap_layer: f64,
    pub fill_roll: f64,
    pub bass_octave_jump: f64,
    pub bass_pickup: f64,
    pub arp_octave_double: f64,
    pub arp_skip: f64,
    pub melody_rest: f64,
    pub melody_leap: f64,
    pub melody_rise: f64,
    pub melody_leap_max: u32,
}

impl Default for Ornaments {
    fn default() -> Self {
        Self {
            ghost_kick: ornaments::GHOST_KICK,
            hat_skip: ornaments::HAT_SKIP,
            open_hat: ornaments::OPEN_HAT,
            clap_layer: ornaments::CLAP_LAYER,
            fill_roll: ornaments::FILL_ROLL,
            bass_octave_jump: ornaments::BASS_OCTAVE_JUMP,
            bass_pickup: ornaments::BASS_PICKUP,
            arp_octave_double: ornaments::ARP_OCTAVE_DOUBLE,
            arp_skip: ornaments::ARP_SKIP,
            melody_rest: ornaments::MELODY_REST,
            melody_leap: ornaments::MELODY_LEAP,
            melody_rise: ornaments::MELODY_RISE,
            melody_leap_max: ornaments::MELODY_LEAP_MAX,
        }
    }
}

impl Ornaments {
    /// Ornaments that add or drop nothing: optional events never occur,
    /// fill rolls play every sixteenth and melody walks always rise.
    pub fn none() -> Self {
        Self {
            ghost_kick: 0.0,
            hat_skip: 0.0,
            open_hat: 0.0,
            clap_layer: 0.0,
            fill_roll: 1.0,
            bass_octave_jump: 0.0,
            bass_pickup: 0.0,
            arp_octave_double: 0.0,
            arp_skip: 0.0,
            melody_rest: 0.0,
            melody_leap: 0.0,
            melody_rise: 1.0,
            melody_leap_max: ornaments::MELODY_LEAP_MAX,
        }
    }

    fn named(&self) -> [(&'static str, f64); 12] {
        [
            ("ghost_kick", self.ghost_kick),
            ("hat_skip", self.hat_skip),
            ("open_hat", self.open_hat),
            ("clap_layer", self.clap_layer),
            ("fill_roll", self.fill_roll),
            ("bass_octave_jump", self.bass_octave_jump),
            ("bass_pickup", self.bass_pickup),
            ("arp_octave_double", self.arp_octave_double),
            ("arp_skip", self.arp_skip),
            ("melody_rest", self.melody_rest),
            ("melody_leap", self.melody_leap),
            ("melody_rise", self.melody_rise),
        ]
    }
}

/// Scale modes available to the theory module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMode {
    Major,
    NaturalMinor,
    Dorian,
    Mixolydian,
    HarmonicMinor,
}

impl ScaleMode {
    /// All modes.
    pub const ALL: [ScaleMode; 5] = [
        ScaleMode::Major,
        ScaleMode::NaturalMinor,
        ScaleMode::Dorian,
        ScaleMode::Mixolydian,
        ScaleMode::HarmonicMinor,
    ];

    /// Snake-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScaleMode::Major => "major",
            ScaleMode::NaturalMinor => "natural_minor",
            ScaleMode::Dorian => "dorian",
            ScaleMode::Mixolydian => "mixolydian",
            ScaleMode::HarmonicMinor => "harmonic_minor",
        }
    }
}

/// A fixed key instead of a random one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeySpec {
    pub root: PitchClass,
    pub mode: ScaleMode,
}

/// A hand-authored song structure template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureTemplate {
    pub name: String,
    pub sections: Vec<Section>,
}

/// A buffer effect applied to every fragment of one role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Play the fragment backwards.
    Reverse,
    /// Single echo, `feedback` is the echo gain.
    Delay { time_ms: f64, feedback: f64 },
    /// `tanh` soft clipping with input gain.
    Distort { gain: f64 },
    /// Blend the fragment with its own reversal.
    ReverseSwell { mix: f64 },
}

/// External symbolic renderer invocation.
///
/// `args` may contain the placeholders `{midi}`, `{wav}`, `{rate}` and
/// `{soundfont}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub program: String,
    pub args: Vec<String>,
    pub soundfont: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            program: "fluidsynth".to_string(),
            args: ["-ni", "{soundfont}", "{midi}", "-F", "{wav}", "-r", "{rate}"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            soundfont: None,
            timeout_secs: 120,
        }
    }
}

/// External playback program. `None` picks the first available of the
/// platform defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub program: Option<String>,
    pub args: Vec<String>,
}

/// Everything a render needs besides the fragment files themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Fixed seed; `None` draws one from entropy.
    pub seed: Option<u32>,
    pub tempo_bpm: f64,
    pub beats_per_unit: u32,
    pub sample_rate: u32,
    /// Roles that get a track.
    pub roles: Vec<Role>,
    pub ornaments: Ornaments,
    /// Fixed key; `None` picks one at random.
    pub key: Option<KeySpec>,
    /// Custom structure templates; empty uses the built-in catalog.
    pub structures: Vec<StructureTemplate>,
    /// Custom progressions as Roman numerals; empty uses the built-in catalog.
    pub progressions: Vec<Vec<String>>,
    /// Per-role effect chains for sample mode.
    pub effects: BTreeMap<Role, Vec<Effect>>,
    /// Mix a looped ambient fragment under the song.
    pub ambient: bool,
    pub ambient_volume: f32,
    /// Upper bound on the fragment loading join.
    pub load_timeout_ms: u64,
    /// Root of the directory-per-role fragment store.
    pub fragment_root: Option<PathBuf>,
    pub renderer: RendererConfig,
    pub player: PlayerConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let mut effects = BTreeMap::new();
        effects.insert(Role::Bass, vec![Effect::Distort { gain: 1.5 }]);
        effects.insert(
            Role::Arp,
            vec![Effect::Delay {
                time_ms: 375.0,
                feedback: 0.35,
            }],
        );

        Self {
            seed: None,
            tempo_bpm: 110.0,
            beats_per_unit: 4,
            sample_rate: 44100,
            roles: vec![Role::Drum, Role::Bass, Role::Pad, Role::Arp],
            ornaments: Ornaments::default(),
            key: None,
            structures: Vec::new(),
            progressions: Vec::new(),
            effects,
            ambient: true,
            ambient_volume: 0.25,
            load_timeout_ms: 10_000,
            fragment_root: None,
            renderer: RendererConfig::default(),
            player: PlayerConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Parses a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        serde_json::from_str(json).map_err(|e| SpecError::Parse(e.to_string()))
    }

    /// Reads and parses a config file.
    pub fn load(path: &Path) -> Result<Self, SpecError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SpecError::Parse(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    /// Serializes to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, SpecError> {
        serde_json::to_string_pretty(self).map_err(|e| SpecError::Parse(e.to_string()))
    }

    /// Tempo and meter.
    pub fn timing(&self) -> Timing {
        Timing::new(self.tempo_bpm, self.beats_per_unit)
    }

    /// Effect chain for a role (empty if none configured).
    pub fn effects_for(&self, role: Role) -> &[Effect] {
        self.effects.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Checks every field and returns all problems found.
    pub fn validate(&self) -> Result<(), Vec<SpecError>> {
        let mut errors = Vec::new();

        if !self.tempo_bpm.is_finite() || !(20.0..=400.0).contains(&self.tempo_bpm) {
            errors.push(SpecError::invalid_config(
                "tempo_bpm",
                format!("must be 20-400, got {}", self.tempo_bpm),
            ));
        }
        if !(1..=16).contains(&self.beats_per_unit) {
            errors.push(SpecError::invalid_config(
                "beats_per_unit",
                format!("must be 1-16, got {}", self.beats_per_unit),
            ));
        }
        if !(8000..=192_000).contains(&self.sample_rate) {
            errors.push(SpecError::invalid_config(
                "sample_rate",
                format!("must be 8000-192000, got {}", self.sample_rate),
            ));
        }
        if self.roles.is_empty() {
            errors.push(SpecError::invalid_config("roles", "at least one role"));
        }
        for (i, role) in self.roles.iter().enumerate() {
            if self.roles[..i].contains(role) {
                errors.push(SpecError::invalid_config(
                    "roles",
                    format!("duplicate role '{}'", role),
                ));
            }
        }
        for (name, p) in self.ornaments.named() {
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                errors.push(SpecError::invalid_config(
                    format!("ornaments.{}", name),
                    format!("probability must be 0.0-1.0, got {}", p),
                ));
            }
        }
        let leap_max = self.ornaments.melody_leap_max;
        if !(2..=ornaments::MELODY_LEAP_LIMIT).contains(&leap_max) {
            errors.push(SpecError::invalid_config(
                "ornaments.melody_leap_max",
                format!(
                    "must be 2-{}, got {}",
                    ornaments::MELODY_LEAP_LIMIT,
                    leap_max
                ),
            ));
        }
        for (i, template) in self.structures.iter().enumerate() {
            if template.name.trim().is_empty() {
                errors.push(SpecError::invalid_config(
                    format!("structures[{}].name", i),
                    "must not be empty",
                ));
            }
            if template.sections.is_empty() {
                errors.push(SpecError::invalid_config(
                    format!("structures[{}].sections", i),
                    "must contain at least one section",
                ));
            }
            for (j, section) in template.sections.iter().enumerate() {
                if section.length == 0 {
                    errors.push(SpecError::invalid_config(
                        format!("structures[{}].sections[{}].length", i, j),
                        "must be positive",
                    ));
                }
            }
        }
        for (i, progression) in self.progressions.iter().enumerate() {
            if progression.is_empty() {
                errors.push(SpecError::invalid_config(
                    format!("progressions[{}]", i),
                    "must contain at least one degree",
                ));
            }
        }
        for (role, chain) in &self.effects {
            for (i, effect) in chain.iter().enumerate() {
                if let Err(message) = validate_effect(effect) {
                    errors.push(SpecError::invalid_config(
                        format!("effects.{}[{}]", role, i),
                        message,
                    ));
                }
            }
        }
        if !self.ambient_volume.is_finite() || !(0.0..=1.0).contains(&self.ambient_volume) {
            errors.push(SpecError::invalid_config(
                "ambient_volume",
                format!("must be 0.0-1.0, got {}", self.ambient_volume),
            ));
        }
        if self.load_timeout_ms == 0 {
            errors.push(SpecError::invalid_config(
                "load_timeout_ms",
                "must be positive",
            ));
        }
        if self.renderer.program.trim().is_empty() {
            errors.push(SpecError::invalid_config(
                "renderer.program",
                "must not be empty",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn validate_effect(effect: &Effect) -> Result<(), String> {
    match *effect {
        Effect::Reverse => Ok(()),
        Effect::Delay { time_ms, feedback } => {
            if !(1.0..=2000.0).contains(&time_ms) {
                return Err(format!("delay time_ms must be 1-2000, got {}", time_ms));
            }
            if !(0.0..=0.95).contains(&feedback) {
                return Err(format!("delay feedback must be 0.0-0.95, got {}", feedback));
            }
            Ok(())
        }
        Effect::Distort { gain } => {
            if !gain.is_finite() || gain <= 0.0 {
                return Err(format!("distort gain must be positive, got {}", gain));
            }
            Ok(())
        }
        Effect::ReverseSwell { mix } => {
            if !(0.0..=1.0).contains(&mix) {
                return Err(format!("reverse_swell mix must be 0.0-1.0, got {}", mix));
            }
            Ok(())
        }
    }
}
