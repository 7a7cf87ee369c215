//! Track composition: walks a structure and lays pattern output onto
//! per-role tracks.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use songloom_spec::{
    KeySpec, Ornaments, RenderConfig, Role, SectionKind, SongStructure, Timing, Track,
};

use crate::error::ComposeResult;
use crate::patterns::{self, PatternContext};
use crate::rng::create_rng;
use crate::structure::StructureCatalog;
use crate::theory::{ProgressionCatalog, TheoryContext};

/// Roles enabled when nothing is configured.
pub const DEFAULT_ROLES: [Role; 4] = [Role::Drum, Role::Bass, Role::Pad, Role::Arp];

fn drum_plays(_kind: SectionKind) -> bool {
    true
}

fn bass_plays(kind: SectionKind) -> bool {
    kind != SectionKind::Intro
}

fn pad_plays(kind: SectionKind) -> bool {
    kind != SectionKind::Outro
}

fn arp_plays(kind: SectionKind) -> bool {
    kind == SectionKind::Chorus
}

fn melody_plays(kind: SectionKind) -> bool {
    matches!(
        kind,
        SectionKind::Verse | SectionKind::PreChorus | SectionKind::Chorus | SectionKind::Bridge
    )
}

/// Whether `role` plays in sections of `kind`.
pub fn plays_in(role: Role, kind: SectionKind) -> bool {
    match role {
        Role::Drum => drum_plays(kind),
        Role::Bass => bass_plays(kind),
        Role::Pad => pad_plays(kind),
        Role::Arp => arp_plays(kind),
        Role::Melody => melody_plays(kind),
    }
}

/// True if unit `unit` of section `index` carries the drum fill: it is the
/// section's last unit and the next section has a different kind and is not
/// the final section.
pub fn is_fill_unit(structure: &SongStructure, index: usize, unit: u32) -> bool {
    let sections = &structure.sections;
    let Some(section) = sections.get(index) else {
        return false;
    };
    if unit + 1 != section.length || index + 2 >= sections.len() {
        return false;
    }
    sections[index + 1].kind != section.kind
}

/// Composition settings that are not part of the structure or theory.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeOptions {
    /// Roles that get a track.
    pub roles: Vec<Role>,
    pub ornaments: Ornaments,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            roles: DEFAULT_ROLES.to_vec(),
            ornaments: Ornaments::default(),
        }
    }
}

impl ComposeOptions {
    fn enabled(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Composes every enabled role over `structure`.
///
/// The RNG is consumed section by section, unit by unit, and within a unit
/// in [`Role::ALL`] order. Every enabled role gets a track even when its
/// inclusion rule keeps it silent for the whole song.
pub fn compose<R: Rng + ?Sized>(
    structure: &SongStructure,
    theory: &TheoryContext,
    options: &ComposeOptions,
    rng: &mut R,
) -> BTreeMap<Role, Track> {
    let roles: Vec<Role> = Role::ALL
        .into_iter()
        .filter(|r| options.enabled(*r))
        .collect();
    let mut tracks: BTreeMap<Role, Track> = roles.iter().map(|r| (*r, Track::new(*r))).collect();

    for (index, (start, section)) in structure.offsets().enumerate() {
        let next_section = structure.sections.get(index + 1);
        for unit in 0..section.length {
            let chord = theory.chord_at(section.kind, unit);
            let next_chord = match next_section {
                Some(next) if unit + 1 == section.length => theory.chord_at(next.kind, 0),
                _ => theory.chord_at(section.kind, unit + 1),
            };
            let fill = is_fill_unit(structure, index, unit);
            let offset = (start + unit) as f64;

            for &role in &roles {
                if !plays_in(role, section.kind) {
                    continue;
                }
                let mut ctx = PatternContext {
                    section: section.kind,
                    unit,
                    section_length: section.length,
                    chord,
                    next_chord,
                    scale: &theory.scale,
                    ornaments: &options.ornaments,
                    rng: &mut *rng,
                };
                let events = patterns::generate(role, &mut ctx, fill);
                if let Some(track) = tracks.get_mut(&role) {
                    track
                        .events
                        .extend(events.into_iter().map(|e| e.shifted(offset)));
                }
            }
        }
    }

    tracks
}

/// The result of one composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub seed: u32,
    pub timing: Timing,
    pub structure: SongStructure,
    pub theory: TheoryContext,
    pub tracks: BTreeMap<Role, Track>,
}

impl Song {
    /// Track of one role, if enabled.
    pub fn track(&self, role: Role) -> Option<&Track> {
        self.tracks.get(&role)
    }

    /// Song length in repetition units.
    pub fn total_units(&self) -> u32 {
        self.structure.total_units()
    }

    /// Song length in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.total_units() as f64 * self.timing.unit_seconds()
    }

    /// Total number of events over all tracks.
    pub fn event_count(&self) -> usize {
        self.tracks.values().map(Track::len).sum()
    }
}

/// Structure, theory and track composition from one configuration.
#[derive(Debug, Clone)]
pub struct Composer {
    structures: StructureCatalog,
    progressions: ProgressionCatalog,
    key: Option<KeySpec>,
    timing: Timing,
    options: ComposeOptions,
}

impl Composer {
    /// Builds a composer, failing on invalid catalogs before any work is done.
    pub fn from_config(config: &RenderConfig) -> ComposeResult<Self> {
        Ok(Self {
            structures: StructureCatalog::from_templates(&config.structures)?,
            progressions: ProgressionCatalog::from_symbols(&config.progressions)?,
            key: config.key,
            timing: config.timing(),
            options: ComposeOptions {
                roles: config.roles.clone(),
                ornaments: config.ornaments,
            },
        })
    }

    /// Replaces the structure catalog.
    pub fn with_structures(mut self, structures: StructureCatalog) -> Self {
        self.structures = structures;
        self
    }

    /// Composition options in use.
    pub fn options(&self) -> &ComposeOptions {
        &self.options
    }

    /// Picks a structure, then a key and progressions, then composes the
    /// tracks, all from one RNG stream. `seed` is recorded in the song.
    pub fn compose_song<R: Rng + ?Sized>(&self, seed: u32, rng: &mut R) -> ComposeResult<Song> {
        let structure = self.structures.generate(rng);
        let theory = TheoryContext::generate(rng, self.key, &self.progressions)?;
        tracing::debug!(
            template = %structure.template,
            scale = %theory.scale.name,
            verse = %theory.verse_progression,
            chorus = %theory.chorus_progression,
            "theory resolved"
        );

        let tracks = compose(&structure, &theory, &self.options, rng);
        let song = Song {
            seed,
            timing: self.timing,
            structure,
            theory,
            tracks,
        };
        tracing::info!(
            seed,
            units = song.total_units(),
            events = song.event_count(),
            "composed song"
        );
        Ok(song)
    }

    /// Composes with a fresh RNG created from `seed`.
    pub fn compose_seeded(&self, seed: u32) -> ComposeResult<Song> {
        let mut rng = create_rng(seed);
        self.compose_song(seed, &mut rng)
    }
}
