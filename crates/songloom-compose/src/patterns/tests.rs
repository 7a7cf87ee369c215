//! Tests for the pattern library.

use pretty_assertions::assert_eq;
use songloom_spec::{
    AudioEvent, DrumVoice, EventSource, Ornaments, Pitch, Role, ScaleMode, SectionKind,
};

use super::{generate, PatternContext};
use crate::rng::create_rng;
use crate::theory::{resolve_chord, Scale};

fn c_major() -> Scale {
    Scale::from_key("C".parse().unwrap(), ScaleMode::Major)
}

fn run(
    role: Role,
    section: SectionKind,
    ornaments: &Ornaments,
    fill: bool,
    seed: u32,
) -> Vec<AudioEvent> {
    let scale = c_major();
    let chord = resolve_chord("I", &scale, 4).unwrap();
    let next = resolve_chord("V", &scale, 4).unwrap();
    let mut rng = create_rng(seed);
    let mut ctx = PatternContext {
        section,
        unit: 3,
        section_length: 4,
        chord: &chord,
        next_chord: &next,
        scale: &scale,
        ornaments,
        rng: &mut rng,
    };
    generate(role, &mut ctx, fill)
}

fn drum_hits(events: &[AudioEvent], voice: DrumVoice) -> Vec<f64> {
    events
        .iter()
        .filter_map(|e| match e.source {
            EventSource::Drum { voice: v, .. } if v == voice => Some(e.time),
            _ => None,
        })
        .collect()
}

#[test]
fn events_stay_inside_one_unit() {
    let ornaments = Ornaments::default();
    for seed in 0..8 {
        for role in Role::ALL {
            for section in SectionKind::ALL {
                for fill in [false, true] {
                    for event in run(role, section, &ornaments, fill, seed) {
                        assert!((0.0..1.0).contains(&event.time), "{role} {section}");
                        match event.source {
                            EventSource::Drum { velocity, .. } => {
                                assert!((1..=127).contains(&velocity))
                            }
                            EventSource::Note(note) => {
                                assert!(note.duration > 0.0);
                                assert!(event.time + note.duration <= 1.0 + 1e-9);
                                assert!((1..=127).contains(&note.velocity));
                                assert!(!note.pitches.is_empty());
                            }
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn plain_verse_groove() {
    let events = run(Role::Drum, SectionKind::Verse, &Ornaments::none(), false, 1);
    assert_eq!(drum_hits(&events, DrumVoice::Kick), vec![0.0, 0.5]);
    assert_eq!(drum_hits(&events, DrumVoice::Snare), vec![0.25, 0.75]);
    assert_eq!(drum_hits(&events, DrumVoice::Hat).len(), 8);
    assert!(drum_hits(&events, DrumVoice::Clap).is_empty());
    assert!(drum_hits(&events, DrumVoice::OpenHat).is_empty());
}

#[test]
fn chorus_is_four_on_the_floor() {
    let events = run(Role::Drum, SectionKind::Chorus, &Ornaments::none(), false, 1);
    assert_eq!(
        drum_hits(&events, DrumVoice::Kick),
        vec![0.0, 0.25, 0.5, 0.75]
    );
}

#[test]
fn fill_replaces_the_groove() {
    let events = run(Role::Drum, SectionKind::Verse, &Ornaments::none(), true, 1);
    let snares = drum_hits(&events, DrumVoice::Snare);
    assert_eq!(snares.len(), 1 + 7);
    assert!(drum_hits(&events, DrumVoice::Hat).is_empty());
    assert_eq!(drum_hits(&events, DrumVoice::OpenHat), vec![15.0 / 16.0]);

    let mut quiet = Ornaments::none();
    quiet.fill_roll = 0.0;
    let events = run(Role::Drum, SectionKind::Verse, &quiet, true, 1);
    assert_eq!(drum_hits(&events, DrumVoice::Snare), vec![0.25]);
}

#[test]
fn fill_flag_is_ignored_by_pitched_roles() {
    let ornaments = Ornaments::default();
    for role in [Role::Bass, Role::Pad, Role::Arp, Role::Melody] {
        assert_eq!(
            run(role, SectionKind::Verse, &ornaments, true, 4),
            run(role, SectionKind::Verse, &ornaments, false, 4)
        );
    }
}

#[test]
fn certain_ornaments_always_fire() {
    let mut ornaments = Ornaments::none();
    ornaments.clap_layer = 1.0;
    ornaments.ghost_kick = 1.0;
    ornaments.open_hat = 1.0;
    let events = run(Role::Drum, SectionKind::Verse, &ornaments, false, 2);
    assert_eq!(drum_hits(&events, DrumVoice::Clap), vec![0.25, 0.75]);
    assert_eq!(drum_hits(&events, DrumVoice::Kick).len(), 4);
    assert_eq!(drum_hits(&events, DrumVoice::OpenHat), vec![14.0 / 16.0]);

    ornaments.hat_skip = 1.0;
    let events = run(Role::Drum, SectionKind::Verse, &ornaments, false, 2);
    assert!(drum_hits(&events, DrumVoice::Hat).is_empty());
    assert!(drum_hits(&events, DrumVoice::OpenHat).is_empty());
}

#[test]
fn bass_sits_in_octave_two() {
    let events = run(Role::Bass, SectionKind::Verse, &Ornaments::none(), false, 1);
    assert_eq!(events.len(), 4);
    for event in &events {
        let EventSource::Note(note) = &event.source else {
            panic!("bass emitted a drum hit");
        };
        assert_eq!(note.pitches, vec!["C2".parse::<Pitch>().unwrap()]);
    }
}

#[test]
fn bass_pickup_leads_into_next_chord() {
    let mut ornaments = Ornaments::none();
    ornaments.bass_pickup = 1.0;
    let events = run(Role::Bass, SectionKind::Verse, &ornaments, false, 1);
    let EventSource::Note(last) = &events.last().unwrap().source else {
        panic!("expected a note");
    };
    assert_eq!(last.pitches, vec!["G2".parse::<Pitch>().unwrap()]);
}

#[test]
fn pad_holds_the_triad() {
    let events = run(Role::Pad, SectionKind::Verse, &Ornaments::none(), false, 1);
    assert_eq!(events.len(), 1);
    let EventSource::Note(note) = &events[0].source else {
        panic!("expected a note");
    };
    let expected: Vec<Pitch> = ["C4", "E4", "G4"]
        .iter()
        .map(|p| p.parse().unwrap())
        .collect();
    assert_eq!(note.pitches, expected);
    assert_eq!(note.duration, 1.0);
}

#[test]
fn arp_runs_sixteenths_in_chorus() {
    let events = run(Role::Arp, SectionKind::Chorus, &Ornaments::none(), false, 1);
    assert_eq!(events.len(), 16);

    let mut doubled = Ornaments::none();
    doubled.arp_octave_double = 1.0;
    for event in run(Role::Arp, SectionKind::Verse, &doubled, false, 1) {
        let EventSource::Note(note) = event.source else {
            panic!("expected a note");
        };
        assert_eq!(note.pitches.len(), 2);
        assert_eq!(note.pitches[1].octave, note.pitches[0].octave + 1);
    }
}

#[test]
fn arp_outside_chorus_runs_eighths() {
    for section in [SectionKind::Verse, SectionKind::PreChorus, SectionKind::Bridge] {
        let events = run(Role::Arp, section, &Ornaments::none(), false, 1);
        assert_eq!(events.len(), 8);
        let starts: Vec<f64> = events.iter().map(|e| e.time).collect();
        assert_eq!(starts[1], 0.125);
    }
}

#[test]
fn bass_holds_only_in_breakdown_and_outro() {
    let ornaments = Ornaments::none();
    for section in [SectionKind::Breakdown, SectionKind::Outro] {
        let events = run(Role::Bass, section, &ornaments, false, 1);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].time, 0.0);
    }
    // Anything else without its own groove walks the verse grid.
    assert_eq!(run(Role::Bass, SectionKind::Intro, &ornaments, false, 1).len(), 4);
    assert_eq!(run(Role::Bass, SectionKind::Verse, &ornaments, false, 1).len(), 4);
}

#[test]
fn melody_stays_in_scale() {
    let scale = c_major();
    let ornaments = Ornaments::default();
    for seed in 0..32 {
        for section in SectionKind::ALL {
            for event in run(Role::Melody, section, &ornaments, false, seed) {
                let EventSource::Note(note) = event.source else {
                    panic!("expected a note");
                };
                for pitch in note.pitches {
                    assert!(scale.contains(&pitch.class));
                    assert!((3..=7).contains(&pitch.octave));
                }
            }
        }
    }
}

#[test]
fn melody_walk_follows_configured_leaps() {
    let scale = c_major();
    let mut ornaments = Ornaments::none();
    ornaments.melody_leap = 1.0;
    ornaments.melody_leap_max = 2;

    let walked = |ornaments: &Ornaments| -> Vec<Pitch> {
        run(Role::Melody, SectionKind::Verse, ornaments, false, 5)
            .into_iter()
            .map(|event| match event.source {
                EventSource::Note(note) => note.pitches[0],
                EventSource::Drum { .. } => panic!("expected a note"),
            })
            .collect()
    };
    let expected = |indices: &[i32]| -> Vec<Pitch> {
        indices.iter().map(|&i| scale.pitch_at(i, 5)).collect()
    };

    // Two-step leaps, folded back once they pass an octave from home.
    assert_eq!(walked(&ornaments), expected(&[0, 2, 4, 6, 5, 7, 5, 7]));

    ornaments.melody_rise = 0.0;
    assert_eq!(walked(&ornaments), expected(&[0, -2, -4, -6, -5, -7, -5, -7]));
}

#[test]
fn same_seed_same_events() {
    let ornaments = Ornaments::default();
    for role in Role::ALL {
        assert_eq!(
            run(role, SectionKind::Chorus, &ornaments, false, 21),
            run(role, SectionKind::Chorus, &ornaments, false, 21)
        );
    }
}
