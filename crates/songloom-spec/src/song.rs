//! Song model: sections, roles, timed events and tracks.
//!
//! Times are measured in repetition units (one unit is one measure of
//! [`Timing::beats_per_unit`] beats). Everything here is plain data created
//! fresh for a render and discarded afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pitch::Pitch;

/// The closed set of section tags a song structure may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Intro,
    Verse,
    PreChorus,
    Chorus,
    Bridge,
    Breakdown,
    Outro,
}

impl SectionKind {
    /// All section kinds in declaration order.
    pub const ALL: [SectionKind; 7] = [
        SectionKind::Intro,
        SectionKind::Verse,
        SectionKind::PreChorus,
        SectionKind::Chorus,
        SectionKind::Bridge,
        SectionKind::Breakdown,
        SectionKind::Outro,
    ];

    /// Snake-case name as used in config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Intro => "intro",
            SectionKind::Verse => "verse",
            SectionKind::PreChorus => "pre_chorus",
            SectionKind::Chorus => "chorus",
            SectionKind::Bridge => "bridge",
            SectionKind::Breakdown => "breakdown",
            SectionKind::Outro => "outro",
        }
    }

    /// Chorus-tagged sections draw their chords from the chorus progression.
    pub fn is_chorus_tagged(&self) -> bool {
        matches!(self, SectionKind::Chorus | SectionKind::PreChorus)
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, timed segment of a song.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Section tag.
    pub kind: SectionKind,
    /// Length in repetition units. Must be positive.
    pub length: u32,
}

impl Section {
    /// Creates a section.
    pub const fn new(kind: SectionKind, length: u32) -> Self {
        Self { kind, length }
    }
}

/// An ordered list of sections picked from a template catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongStructure {
    /// Name of the template this structure was taken from.
    pub template: String,
    /// Sections in playing order.
    pub sections: Vec<Section>,
}

impl SongStructure {
    /// Creates a structure.
    pub fn new(template: impl Into<String>, sections: Vec<Section>) -> Self {
        Self {
            template: template.into(),
            sections,
        }
    }

    /// Total duration in repetition units.
    pub fn total_units(&self) -> u32 {
        self.sections.iter().map(|s| s.length).sum()
    }

    /// Start offset (in units) of each section, paired with the section.
    pub fn offsets(&self) -> impl Iterator<Item = (u32, &Section)> {
        self.sections.iter().scan(0u32, |offset, section| {
            let start = *offset;
            *offset += section.length;
            Some((start, section))
        })
    }
}

/// A fixed per-role track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Drum,
    Bass,
    Pad,
    Arp,
    Melody,
}

impl Role {
    /// All roles in composition order.
    pub const ALL: [Role; 5] = [Role::Drum, Role::Bass, Role::Pad, Role::Arp, Role::Melody];

    /// Snake-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Drum => "drum",
            Role::Bass => "bass",
            Role::Pad => "pad",
            Role::Arp => "arp",
            Role::Melody => "melody",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Percussion voices a drum pattern can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrumVoice {
    Kick,
    Snare,
    Hat,
    OpenHat,
    Clap,
}

impl DrumVoice {
    /// All voices.
    pub const ALL: [DrumVoice; 5] = [
        DrumVoice::Kick,
        DrumVoice::Snare,
        DrumVoice::Hat,
        DrumVoice::OpenHat,
        DrumVoice::Clap,
    ];

    /// Snake-case name, also used as the fragment role directory.
    pub fn as_str(&self) -> &'static str {
        match self {
            DrumVoice::Kick => "kick",
            DrumVoice::Snare => "snare",
            DrumVoice::Hat => "hat",
            DrumVoice::OpenHat => "open_hat",
            DrumVoice::Clap => "clap",
        }
    }

    /// General MIDI percussion key for this voice.
    pub fn gm_key(&self) -> u8 {
        match self {
            DrumVoice::Kick => 36,
            DrumVoice::Snare => 38,
            DrumVoice::Hat => 42,
            DrumVoice::OpenHat => 46,
            DrumVoice::Clap => 39,
        }
    }
}

impl fmt::Display for DrumVoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pitched note or chord.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// One pitch for a note, several for a chord.
    pub pitches: Vec<Pitch>,
    /// Duration in repetition units. Always positive.
    pub duration: f64,
    /// MIDI-style velocity, 1..=127.
    pub velocity: u8,
}

/// What an event plays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventSource {
    /// A percussion hit, resolved to a sample fragment or a GM drum key.
    Drum { voice: DrumVoice, velocity: u8 },
    /// A pitched note or chord.
    Note(NoteEvent),
}

/// A timed event. `time` is in repetition units from the start of the song
/// (or from the start of the unit while still inside a pattern function).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioEvent {
    /// Offset in repetition units. Non-negative.
    pub time: f64,
    /// What is played.
    pub source: EventSource,
}

impl AudioEvent {
    /// Creates a drum hit.
    pub fn drum(time: f64, voice: DrumVoice, velocity: u8) -> Self {
        Self {
            time,
            source: EventSource::Drum { voice, velocity },
        }
    }

    /// Creates a pitched event.
    pub fn note(time: f64, pitches: Vec<Pitch>, duration: f64, velocity: u8) -> Self {
        Self {
            time,
            source: EventSource::Note(NoteEvent {
                pitches,
                duration,
                velocity,
            }),
        }
    }

    /// Returns the same event moved by `offset` units.
    pub fn shifted(mut self, offset: f64) -> Self {
        self.time += offset;
        self
    }
}

/// All events of one role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Role this track belongs to.
    pub role: Role,
    /// Events in insertion order. Use [`Track::sorted_events`] to iterate.
    pub events: Vec<AudioEvent>,
}

impl Track {
    /// Creates an empty track.
    pub fn new(role: Role) -> Self {
        Self {
            role,
            events: Vec::new(),
        }
    }

    /// Events ordered by time. Ties keep insertion order.
    pub fn sorted_events(&self) -> Vec<&AudioEvent> {
        let mut events: Vec<&AudioEvent> = self.events.iter().collect();
        events.sort_by(|a, b| a.time.total_cmp(&b.time));
        events
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if the track has no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Tempo and meter used to turn repetition units into seconds and samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    /// Tempo in beats per minute.
    pub tempo_bpm: f64,
    /// Beats in one repetition unit.
    pub beats_per_unit: u32,
}

impl Timing {
    /// Creates a timing.
    pub fn new(tempo_bpm: f64, beats_per_unit: u32) -> Self {
        Self {
            tempo_bpm,
            beats_per_unit,
        }
    }

    /// Length of one repetition unit in seconds.
    pub fn unit_seconds(&self) -> f64 {
        self.beats_per_unit as f64 * 60.0 / self.tempo_bpm
    }

    /// Converts a time in units to beats.
    pub fn units_to_beats(&self, units: f64) -> f64 {
        units * self.beats_per_unit as f64
    }

    /// Converts a time in units to a sample offset at `sample_rate`.
    pub fn units_to_samples(&self, units: f64, sample_rate: u32) -> usize {
        (units * self.unit_seconds() * sample_rate as f64)
            .round()
            .max(0.0) as usize
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::new(110.0, 4)
    }
}
