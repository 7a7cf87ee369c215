//! Arpeggios over the chord tones plus the root an octave up.

use rand::Rng;
use songloom_spec::{AudioEvent, Pitch, SectionKind};

use super::{at, steps, PatternContext};

const VELOCITY: u8 = 75;

const UP: &[usize] = &[0, 1, 2, 3];

pub(super) fn pattern<R: Rng + ?Sized>(ctx: &mut PatternContext<'_, R>) -> Vec<AudioEvent> {
    match ctx.section {
        SectionKind::Chorus => run(ctx, UP, 1),
        _ => run(ctx, UP, 2),
    }
}

/// Cycles through `order` every `rate` sixteenths. Steps may be skipped or
/// doubled an octave up.
fn run<R: Rng + ?Sized>(
    ctx: &mut PatternContext<'_, R>,
    order: &[usize],
    rate: usize,
) -> Vec<AudioEvent> {
    let ornaments = *ctx.ornaments;
    let [root, third, fifth] = ctx.chord.notes;
    let tones: [Pitch; 4] = [root, third, fifth, root.transpose_octaves(1)];

    let mut events = Vec::new();
    for (i, step) in (0..16).step_by(rate).enumerate() {
        if ctx.chance(ornaments.arp_skip) {
            continue;
        }
        let tone = tones[order[i % order.len()]];
        let pitches = if ctx.chance(ornaments.arp_octave_double) {
            vec![tone, tone.transpose_octaves(1)]
        } else {
            vec![tone]
        };
        events.push(AudioEvent::note(at(step), pitches, steps(rate), VELOCITY));
    }
    events
}
