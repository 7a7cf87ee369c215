//! Sustained triads.

use rand::Rng;
use songloom_spec::{AudioEvent, SectionKind};

use super::PatternContext;

pub(super) fn pattern<R: Rng + ?Sized>(ctx: &mut PatternContext<'_, R>) -> Vec<AudioEvent> {
    let notes = ctx.chord.notes.to_vec();
    match ctx.section {
        SectionKind::Chorus | SectionKind::PreChorus => vec![
            AudioEvent::note(0.0, notes.clone(), 0.5, 80),
            AudioEvent::note(0.5, notes, 0.5, 76),
        ],
        SectionKind::Intro => vec![AudioEvent::note(0.0, notes, 1.0, 55)],
        SectionKind::Breakdown => vec![AudioEvent::note(0.0, notes, 1.0, 60)],
        SectionKind::Bridge => {
            // Root dropped an octave under the upper tones.
            let mut voiced = notes;
            voiced[0] = voiced[0].transpose_octaves(-1);
            vec![AudioEvent::note(0.0, voiced, 1.0, 65)]
        }
        _ => vec![AudioEvent::note(0.0, notes, 1.0, 70)],
    }
}
