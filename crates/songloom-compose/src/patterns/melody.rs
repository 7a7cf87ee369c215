//! Lead line as a random walk over the scale in octave 5.

use rand::Rng;
use songloom_spec::{AudioEvent, SectionKind};

use super::{at, steps, PatternContext};

const OCTAVE: i8 = 5;
const VELOCITY: u8 = 85;

/// How far the walk may wander from the chord root, in scale steps.
const RANGE: i32 = 7;

#[derive(Clone, Copy, PartialEq)]
enum Direction {
    Free,
    Rising,
}

pub(super) fn pattern<R: Rng + ?Sized>(ctx: &mut PatternContext<'_, R>) -> Vec<AudioEvent> {
    match ctx.section {
        SectionKind::Chorus => chord_tones(ctx, 4),
        SectionKind::PreChorus => walk(ctx, 2, Direction::Rising),
        SectionKind::Bridge => chord_tones(ctx, 8),
        _ => walk(ctx, 2, Direction::Free),
    }
}

/// Steps or leaps through the scale every `rate` sixteenths.
fn walk<R: Rng + ?Sized>(
    ctx: &mut PatternContext<'_, R>,
    rate: usize,
    direction: Direction,
) -> Vec<AudioEvent> {
    let ornaments = *ctx.ornaments;
    let home = ctx.chord.degree as i32;
    let mut index = home;
    let mut events = Vec::new();

    for step in (0..16).step_by(rate) {
        if !ctx.chance(ornaments.melody_rest) {
            let pitch = ctx.scale.pitch_at(index, OCTAVE);
            events.push(AudioEvent::note(at(step), vec![pitch], steps(rate), VELOCITY));
        }

        let distance = if ctx.chance(ornaments.melody_leap) {
            ctx.rng.gen_range(2..=ornaments.melody_leap_max.max(2) as i32)
        } else {
            1
        };
        let up = direction == Direction::Rising || ctx.chance(ornaments.melody_rise);
        index += if up { distance } else { -distance };
        if (index - home).abs() > RANGE {
            index = home + (index - home).signum() * (RANGE - distance).max(0);
        }
    }
    events
}

/// One chord tone every `rate` sixteenths.
fn chord_tones<R: Rng + ?Sized>(ctx: &mut PatternContext<'_, R>, rate: usize) -> Vec<AudioEvent> {
    let ornaments = *ctx.ornaments;
    let tones = ctx.chord.tone_indices();
    let mut events = Vec::new();

    for step in (0..16).step_by(rate) {
        if ctx.chance(ornaments.melody_rest) {
            continue;
        }
        let index = tones[ctx.rng.gen_range(0..tones.len())];
        let pitch = ctx.scale.pitch_at(index, OCTAVE);
        let velocity = if step == 0 { VELOCITY + 10 } else { VELOCITY };
        events.push(AudioEvent::note(at(step), vec![pitch], steps(rate), velocity));
    }
    events
}
