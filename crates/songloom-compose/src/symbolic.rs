//! Symbolic note tracks for an external renderer.
//!
//! A [`SymbolicScore`] is the song flattened to MIDI numbers, beat times and
//! fixed channel assignments. Drums go to channel 9 with General MIDI
//! percussion keys; every other role owns one melodic channel.

use serde::{Deserialize, Serialize};
use songloom_spec::{EventSource, Role};

use crate::composer::Song;
use crate::error::{ComposeError, ComposeResult};

/// MIDI channel used for percussion.
pub const DRUM_CHANNEL: u8 = 9;

/// Length of a drum hit in beats.
pub const DRUM_HIT_BEATS: f64 = 0.25;

/// Channel of a role.
pub fn channel_for(role: Role) -> u8 {
    match role {
        Role::Drum => DRUM_CHANNEL,
        Role::Bass => 0,
        Role::Pad => 1,
        Role::Arp => 2,
        Role::Melody => 3,
    }
}

/// General MIDI program of a role, `None` for percussion.
pub fn program_for(role: Role) -> Option<u8> {
    match role {
        Role::Drum => None,
        // Synth Bass 1
        Role::Bass => Some(38),
        // Pad 2 (warm)
        Role::Pad => Some(89),
        // Lead 2 (sawtooth)
        Role::Arp => Some(81),
        // Lead 1 (square)
        Role::Melody => Some(80),
    }
}

/// One note or chord.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolicNote {
    /// MIDI key numbers sounding together.
    pub keys: Vec<u8>,
    pub start_beats: f64,
    pub duration_beats: f64,
    pub velocity: u8,
}

/// All notes of one role on one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolicTrack {
    pub role: Role,
    pub channel: u8,
    pub program: Option<u8>,
    /// Notes sorted by start time.
    pub notes: Vec<SymbolicNote>,
}

/// A tempo plus one track per role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolicScore {
    pub tempo_bpm: f64,
    pub tracks: Vec<SymbolicTrack>,
}

impl SymbolicScore {
    /// Flattens a song. Pitches outside the MIDI range are dropped with a
    /// warning.
    pub fn from_song(song: &Song) -> Self {
        let timing = song.timing;
        let tracks = song
            .tracks
            .values()
            .map(|track| {
                let notes = track
                    .sorted_events()
                    .into_iter()
                    .filter_map(|event| {
                        let start_beats = timing.units_to_beats(event.time);
                        match &event.source {
                            EventSource::Drum { voice, velocity } => Some(SymbolicNote {
                                keys: vec![voice.gm_key()],
                                start_beats,
                                duration_beats: DRUM_HIT_BEATS,
                                velocity: *velocity,
                            }),
                            EventSource::Note(note) => {
                                let keys: Vec<u8> =
                                    note.pitches.iter().filter_map(|p| p.to_midi()).collect();
                                if keys.len() < note.pitches.len() {
                                    tracing::warn!(
                                        role = %track.role,
                                        time = event.time,
                                        "dropping pitches outside the MIDI range"
                                    );
                                }
                                (!keys.is_empty()).then(|| SymbolicNote {
                                    keys,
                                    start_beats,
                                    duration_beats: timing.units_to_beats(note.duration),
                                    velocity: note.velocity,
                                })
                            }
                        }
                    })
                    .collect();

                SymbolicTrack {
                    role: track.role,
                    channel: channel_for(track.role),
                    program: program_for(track.role),
                    notes,
                }
            })
            .collect();

        Self {
            tempo_bpm: timing.tempo_bpm,
            tracks,
        }
    }

    /// Checks that every key and velocity is a valid MIDI value, durations
    /// are positive, and no two tracks share a channel.
    pub fn validate(&self) -> ComposeResult<()> {
        if self.tempo_bpm.is_nan() || self.tempo_bpm <= 0.0 {
            return Err(ComposeError::invalid_score(
                "tempo",
                format!("tempo must be positive, got {}", self.tempo_bpm),
            ));
        }

        let mut channels = Vec::with_capacity(self.tracks.len());
        for track in &self.tracks {
            let name = track.role.as_str();
            if track.channel > 15 {
                return Err(ComposeError::invalid_score(
                    name,
                    format!("channel {} out of range", track.channel),
                ));
            }
            if channels.contains(&track.channel) {
                return Err(ComposeError::invalid_score(
                    name,
                    format!("channel {} already used by another track", track.channel),
                ));
            }
            channels.push(track.channel);

            if track.program.is_some_and(|p| p > 127) {
                return Err(ComposeError::invalid_score(name, "program out of range"));
            }

            for note in &track.notes {
                if note.keys.is_empty() {
                    return Err(ComposeError::invalid_score(name, "note without keys"));
                }
                if let Some(key) = note.keys.iter().find(|k| **k > 127) {
                    return Err(ComposeError::invalid_score(
                        name,
                        format!("key {} out of range", key),
                    ));
                }
                if note.duration_beats.is_nan() || note.duration_beats <= 0.0 {
                    return Err(ComposeError::invalid_score(
                        name,
                        format!("non-positive duration at beat {}", note.start_beats),
                    ));
                }
                if note.start_beats.is_nan() || note.start_beats < 0.0 {
                    return Err(ComposeError::invalid_score(
                        name,
                        format!("negative start {}", note.start_beats),
                    ));
                }
                if !(1..=127).contains(&note.velocity) {
                    return Err(ComposeError::invalid_score(
                        name,
                        format!("velocity {} out of range", note.velocity),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Track of one role.
    pub fn track(&self, role: Role) -> Option<&SymbolicTrack> {
        self.tracks.iter().find(|t| t.role == role)
    }

    /// End of the last note in beats.
    pub fn length_beats(&self) -> f64 {
        self.tracks
            .iter()
            .flat_map(|t| &t.notes)
            .map(|n| n.start_beats + n.duration_beats)
            .fold(0.0, f64::max)
    }
}
