//! Standard MIDI File output.
//!
//! Format 1: track 0 carries the tempo, then one named track per role. Beat
//! times are quantized to [`TICKS_PER_QUARTER`].

use std::path::Path;

use midly::num::{u15, u24, u28, u4, u7};
use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
};

use crate::error::ComposeResult;
use crate::symbolic::{SymbolicScore, SymbolicTrack};

/// Ticks per quarter note.
pub const TICKS_PER_QUARTER: u16 = 480;

fn ticks(beats: f64) -> u32 {
    (beats * TICKS_PER_QUARTER as f64).round().max(0.0) as u32
}

/// Writes `score` as a Standard MIDI File.
pub fn write_smf(score: &SymbolicScore, path: &Path) -> ComposeResult<()> {
    let bytes = to_smf_bytes(score)?;
    std::fs::write(path, bytes)?;
    tracing::debug!(path = %path.display(), tracks = score.tracks.len(), "wrote MIDI file");
    Ok(())
}

/// Encodes `score` to SMF bytes. The score is validated first.
pub fn to_smf_bytes(score: &SymbolicScore) -> ComposeResult<Vec<u8>> {
    score.validate()?;
    let smf = score_to_smf(score);
    let mut buf = Vec::new();
    smf.write_std(&mut buf)?;
    Ok(buf)
}

fn score_to_smf(score: &SymbolicScore) -> Smf<'static> {
    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    let micros_per_quarter = (60_000_000.0 / score.tempo_bpm).round() as u32;
    smf.tracks.push(vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(micros_per_quarter))),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        },
    ]);

    for track in &score.tracks {
        smf.tracks.push(encode_track(track));
    }
    smf
}

fn encode_track(track: &SymbolicTrack) -> Track<'static> {
    let channel = u4::new(track.channel);

    // (tick, is_note_on, key, velocity); note-offs sort before note-ons at
    // the same tick so a repeated key is not cut short.
    let mut timeline: Vec<(u32, bool, u8, u8)> = Vec::new();
    for note in &track.notes {
        let start = ticks(note.start_beats);
        let end = ticks(note.start_beats + note.duration_beats).max(start + 1);
        for &key in &note.keys {
            timeline.push((start, true, key, note.velocity));
            timeline.push((end, false, key, 0));
        }
    }
    timeline.sort_by_key(|&(tick, on, key, _)| (tick, on, key));

    let mut events: Track<'static> = vec![TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::TrackName(track.role.as_str().as_bytes())),
    }];
    if let Some(program) = track.program {
        events.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::ProgramChange {
                    program: u7::new(program),
                },
            },
        });
    }

    let mut last_tick = 0;
    for (tick, on, key, velocity) in timeline {
        let message = if on {
            MidiMessage::NoteOn {
                key: u7::new(key),
                vel: u7::new(velocity),
            }
        } else {
            MidiMessage::NoteOff {
                key: u7::new(key),
                vel: u7::new(0),
            }
        };
        events.push(TrackEvent {
            delta: u28::new(tick - last_tick),
            kind: TrackEventKind::Midi { channel, message },
        });
        last_tick = tick;
    }

    events.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    events
}
