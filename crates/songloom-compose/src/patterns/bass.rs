//! Bass lines around the chord root in octave 2.

use rand::Rng;
use songloom_spec::{AudioEvent, Pitch, SectionKind};

use super::{at, steps, PatternContext};
use crate::theory::Chord;

const OCTAVE: i8 = 2;
const VELOCITY: u8 = 100;

fn root(chord: &Chord) -> Pitch {
    Pitch::new(chord.root().class, OCTAVE)
}

/// `(step, length in steps)` note grid per groove.
const VERSE: [(usize, usize); 4] = [(0, 6), (6, 2), (8, 6), (14, 2)];
const DRIVE: [(usize, usize); 8] = [
    (0, 2),
    (2, 2),
    (4, 2),
    (6, 2),
    (8, 2),
    (10, 2),
    (12, 2),
    (14, 2),
];

pub(super) fn pattern<R: Rng + ?Sized>(ctx: &mut PatternContext<'_, R>) -> Vec<AudioEvent> {
    match ctx.section {
        SectionKind::Chorus | SectionKind::PreChorus => walk(ctx, &DRIVE),
        SectionKind::Bridge => bridge(ctx),
        SectionKind::Breakdown | SectionKind::Outro => held(ctx),
        _ => walk(ctx, &VERSE),
    }
}

/// Root notes on a grid. Each note may jump an octave; the last note may
/// become a pickup into the next chord.
fn walk<R: Rng + ?Sized>(
    ctx: &mut PatternContext<'_, R>,
    grid: &[(usize, usize)],
) -> Vec<AudioEvent> {
    let ornaments = *ctx.ornaments;
    let base = root(ctx.chord);
    let next = root(ctx.next_chord);
    let mut events = Vec::with_capacity(grid.len());

    for (i, &(step, length)) in grid.iter().enumerate() {
        let mut pitch = base;
        if i + 1 == grid.len() && next != base && ctx.chance(ornaments.bass_pickup) {
            pitch = next;
        } else if step % 4 != 0 && ctx.chance(ornaments.bass_octave_jump) {
            pitch = base.transpose_octaves(1);
        }
        events.push(AudioEvent::note(at(step), vec![pitch], steps(length), VELOCITY));
    }
    events
}

/// Half notes on root and fifth.
fn bridge<R: Rng + ?Sized>(ctx: &mut PatternContext<'_, R>) -> Vec<AudioEvent> {
    let fifth = ctx.scale.pitch_at(ctx.chord.degree as i32 + 4, OCTAVE);
    vec![
        AudioEvent::note(0.0, vec![root(ctx.chord)], 0.5, VELOCITY),
        AudioEvent::note(0.5, vec![fifth], 0.5, VELOCITY - 10),
    ]
}

/// One held root per unit.
fn held<R: Rng + ?Sized>(ctx: &mut PatternContext<'_, R>) -> Vec<AudioEvent> {
    vec![AudioEvent::note(0.0, vec![root(ctx.chord)], 1.0, VELOCITY - 15)]
}
