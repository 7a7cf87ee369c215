//! Sample-mode arrangement and rendering.
//!
//! Tracks are bound to a kit (one fragment per fragment role), every event
//! becomes one or more [`Placement`]s, and [`render`] loads, shifts, applies
//! effects and mixes them into a single buffer.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use songloom_spec::{Effect, EventSource, Pitch, RenderConfig, Role, Timing, Track};

use crate::buffer::AudioBuffer;
use crate::effects::apply_effect_chain;
use crate::error::AudioResult;
use crate::fragments::{FragmentId, FragmentSource, AMBIENT_ROLE};
use crate::loader::load_all;
use crate::mixer::{mix_looped_ambient, Mixer};
use crate::resample::pitch_shift;

/// Fragment role an event of `role` is played with.
///
/// Drum hits use their voice name; notes use one fragment role per track
/// role. Drum tracks never carry notes.
pub fn fragment_role_for(role: Role, source: &EventSource) -> Option<&'static str> {
    match source {
        EventSource::Drum { voice, .. } => Some(voice.as_str()),
        EventSource::Note(_) => match role {
            Role::Drum => None,
            Role::Bass => Some("bass"),
            Role::Pad => Some("chord"),
            Role::Arp => Some("arp"),
            Role::Melody => Some("lead"),
        },
    }
}

/// Pitch a pitched fragment is recorded at: C2 for bass, C4 for chord and
/// arp, C5 for lead.
pub fn reference_pitch(fragment_role: &str) -> Option<Pitch> {
    let midi = match fragment_role {
        "bass" => 36,
        "chord" | "arp" => 60,
        "lead" => 72,
        _ => return None,
    };
    Some(Pitch::from_midi(midi))
}

/// One fragment triggered at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Track the placement came from.
    pub role: Role,
    pub fragment: FragmentId,
    /// Song time in repetition units.
    pub time: f64,
    /// Pitch shift relative to the fragment's reference pitch.
    pub semitones: i32,
    /// Linear gain from velocity.
    pub gain: f32,
}

/// Picks one fragment for every fragment role the tracks need.
///
/// Fragment roles are visited in sorted order so the RNG draw sequence only
/// depends on the tracks. Roles with no fragments are left out.
pub fn select_kit<R: Rng + ?Sized>(
    tracks: &BTreeMap<Role, Track>,
    source: &dyn FragmentSource,
    rng: &mut R,
) -> BTreeMap<&'static str, FragmentId> {
    let needed: BTreeSet<&'static str> = tracks
        .values()
        .flat_map(|track| {
            track
                .events
                .iter()
                .filter_map(move |event| fragment_role_for(track.role, &event.source))
        })
        .collect();

    let mut kit = BTreeMap::new();
    for fragment_role in needed {
        let ids = match source.list(fragment_role) {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(role = fragment_role, error = %e, "no fragments for role");
                continue;
            }
        };
        match ids.choose(rng) {
            Some(id) => {
                tracing::debug!(role = fragment_role, fragment = %id, "selected fragment");
                kit.insert(fragment_role, id.clone());
            }
            None => tracing::warn!(role = fragment_role, "fragment role is empty"),
        }
    }
    kit
}

/// Turns every track into placements against a kit.
///
/// Every input role is present in the result; a role whose fragments are all
/// missing maps to an empty list. Chords place one layer per pitch.
pub fn bind_tracks<R: Rng + ?Sized>(
    tracks: &BTreeMap<Role, Track>,
    source: &dyn FragmentSource,
    rng: &mut R,
) -> BTreeMap<Role, Vec<Placement>> {
    let kit = select_kit(tracks, source, rng);

    let mut bound = BTreeMap::new();
    for (&role, track) in tracks {
        let mut placements = Vec::new();
        for event in track.sorted_events() {
            let Some(fragment_role) = fragment_role_for(role, &event.source) else {
                continue;
            };
            let Some(fragment) = kit.get(fragment_role) else {
                continue;
            };

            match &event.source {
                EventSource::Drum { velocity, .. } => placements.push(Placement {
                    role,
                    fragment: fragment.clone(),
                    time: event.time,
                    semitones: 0,
                    gain: *velocity as f32 / 127.0,
                }),
                EventSource::Note(note) => {
                    let reference = reference_pitch(fragment_role);
                    for pitch in &note.pitches {
                        placements.push(Placement {
                            role,
                            fragment: fragment.clone(),
                            time: event.time,
                            semitones: reference.map_or(0, |r| pitch.semitones_from(&r)),
                            gain: note.velocity as f32 / 127.0,
                        });
                    }
                }
            }
        }
        if placements.is_empty() && !track.is_empty() {
            tracing::warn!(role = %role, "role has no playable fragments");
        }
        bound.insert(role, placements);
    }
    bound
}

/// Placements plus an optional ambient loop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arrangement {
    pub placements: BTreeMap<Role, Vec<Placement>>,
    pub ambient: Option<FragmentId>,
}

impl Arrangement {
    /// Every fragment the render needs, ambient included.
    pub fn fragments(&self) -> BTreeSet<FragmentId> {
        self.placements
            .values()
            .flatten()
            .map(|p| p.fragment.clone())
            .chain(self.ambient.clone())
            .collect()
    }

    pub fn placement_count(&self) -> usize {
        self.placements.values().map(Vec::len).sum()
    }
}

/// Binds tracks and, when `with_ambient` is set, picks an ambient loop.
///
/// The ambient pick draws from `rng` after the kit.
pub fn arrange<R: Rng + ?Sized>(
    tracks: &BTreeMap<Role, Track>,
    source: &dyn FragmentSource,
    with_ambient: bool,
    rng: &mut R,
) -> Arrangement {
    let placements = bind_tracks(tracks, source, rng);

    let ambient = if with_ambient {
        match source.list(AMBIENT_ROLE) {
            Ok(ids) => ids.choose(rng).cloned(),
            Err(e) => {
                tracing::warn!(error = %e, "no ambient layer");
                None
            }
        }
    } else {
        None
    };

    Arrangement {
        placements,
        ambient,
    }
}

/// Settings for [`render`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub sample_rate: u32,
    pub timing: Timing,
    /// Effect chain per role.
    pub effects: BTreeMap<Role, Vec<Effect>>,
    pub ambient_volume: f32,
    pub load_timeout: Duration,
    /// Minimum output length in repetition units, usually the song length.
    pub length_units: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            timing: Timing::default(),
            effects: BTreeMap::new(),
            ambient_volume: 0.25,
            load_timeout: Duration::from_secs(10),
            length_units: 0.0,
        }
    }
}

impl RenderOptions {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            sample_rate: config.sample_rate,
            timing: config.timing(),
            effects: config.effects.clone(),
            ambient_volume: config.ambient_volume,
            load_timeout: Duration::from_millis(config.load_timeout_ms),
            length_units: 0.0,
        }
    }

    pub fn with_length_units(mut self, units: f64) -> Self {
        self.length_units = units;
        self
    }
}

/// Renders an arrangement to one normalized buffer.
///
/// Fragments load concurrently; ones that are missing or time out are
/// skipped. Each `(role, fragment, semitones)` combination is shifted and run
/// through the role's effect chain once.
pub async fn render(
    arrangement: &Arrangement,
    source: Arc<dyn FragmentSource>,
    options: &RenderOptions,
) -> AudioResult<AudioBuffer> {
    let rate = options.sample_rate;
    let report = load_all(source, arrangement.fragments(), rate, options.load_timeout).await;
    if let Some(e) = report.timeout_error() {
        tracing::warn!(error = %e, "rendering without timed out fragments");
    }

    let length = options.timing.units_to_samples(options.length_units, rate);
    let mut mixer = Mixer::new(rate)?.with_length(length);
    let mut processed: HashMap<(Role, FragmentId, i32), AudioBuffer> = HashMap::new();
    let mut skipped = 0usize;

    for (role, placements) in &arrangement.placements {
        let effects = options.effects.get(role).map(Vec::as_slice).unwrap_or(&[]);
        for placement in placements {
            let Some(base) = report.get(&placement.fragment) else {
                skipped += 1;
                continue;
            };

            let key = (*role, placement.fragment.clone(), placement.semitones);
            if !processed.contains_key(&key) {
                let shifted = pitch_shift(base, placement.semitones as f64);
                processed.insert(key.clone(), apply_effect_chain(&shifted, effects)?);
            }

            let offset = options.timing.units_to_samples(placement.time, rate);
            mixer.add_scaled(&processed[&key], offset, placement.gain)?;
        }
    }
    if skipped > 0 {
        tracing::warn!(skipped, "placements skipped for missing fragments");
    }

    let mut output = mixer.mix_down();
    if let Some(id) = &arrangement.ambient {
        match report.get(id) {
            Some(ambient) => {
                output = mix_looped_ambient(&output, ambient, options.ambient_volume)?;
            }
            None => tracing::warn!(fragment = %id, "ambient layer unavailable"),
        }
    }

    tracing::info!(
        samples = output.len(),
        seconds = output.duration_seconds(),
        placements = arrangement.placement_count(),
        "rendered arrangement"
    );
    Ok(output)
}

/// Renders on a private current-thread runtime.
///
/// Loads abandoned by the timeout are left running on the blocking pool
/// instead of holding up the return.
pub fn render_blocking(
    arrangement: &Arrangement,
    source: Arc<dyn FragmentSource>,
    options: &RenderOptions,
) -> AudioResult<AudioBuffer> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let result = runtime.block_on(render(arrangement, source, options));
    runtime.shutdown_background();
    result
}

#[cfg(test)]
mod tests;
