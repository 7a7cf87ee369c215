//! Drum patterns on a sixteen-step grid.

use rand::Rng;
use songloom_spec::{AudioEvent, DrumVoice, SectionKind};

use super::{at, PatternContext};

const KICK: u8 = 110;
const GHOST_KICK: u8 = 60;
const SNARE: u8 = 100;
const CLAP: u8 = 90;
const HAT: u8 = 70;
const OPEN_HAT: u8 = 80;

/// Off-beat steps that may get a ghost kick.
const GHOST_STEPS: [usize; 2] = [3, 11];

/// Hat rate of a groove.
#[derive(Clone, Copy)]
enum Hats {
    Quarters,
    Eighths,
    Sixteenths,
}

impl Hats {
    fn step(self) -> usize {
        match self {
            Hats::Quarters => 4,
            Hats::Eighths => 2,
            Hats::Sixteenths => 1,
        }
    }
}

struct Groove {
    kicks: &'static [usize],
    snares: &'static [usize],
    hats: Hats,
    ghosts: bool,
}

const VERSE: Groove = Groove {
    kicks: &[0, 8],
    snares: &[4, 12],
    hats: Hats::Eighths,
    ghosts: true,
};

const PRE_CHORUS: Groove = Groove {
    kicks: &[0, 8, 10],
    snares: &[4, 12],
    hats: Hats::Sixteenths,
    ghosts: false,
};

const CHORUS: Groove = Groove {
    kicks: &[0, 4, 8, 12],
    snares: &[4, 12],
    hats: Hats::Eighths,
    ghosts: true,
};

const BRIDGE: Groove = Groove {
    kicks: &[0, 10],
    snares: &[8],
    hats: Hats::Eighths,
    ghosts: false,
};

const SPARSE: Groove = Groove {
    kicks: &[0, 8],
    snares: &[],
    hats: Hats::Quarters,
    ghosts: false,
};

const BREAKDOWN: Groove = Groove {
    kicks: &[0],
    snares: &[12],
    hats: Hats::Quarters,
    ghosts: false,
};

/// The normal drum pattern for the current section.
pub(super) fn pattern<R: Rng + ?Sized>(ctx: &mut PatternContext<'_, R>) -> Vec<AudioEvent> {
    let groove = match ctx.section {
        SectionKind::PreChorus => &PRE_CHORUS,
        SectionKind::Chorus => &CHORUS,
        SectionKind::Bridge => &BRIDGE,
        SectionKind::Intro | SectionKind::Outro => &SPARSE,
        SectionKind::Breakdown => &BREAKDOWN,
        _ => &VERSE,
    };
    play(groove, ctx)
}

fn play<R: Rng + ?Sized>(groove: &Groove, ctx: &mut PatternContext<'_, R>) -> Vec<AudioEvent> {
    let ornaments = *ctx.ornaments;
    let mut events = Vec::new();

    for &step in groove.kicks {
        events.push(AudioEvent::drum(at(step), DrumVoice::Kick, KICK));
    }
    if groove.ghosts {
        for step in GHOST_STEPS {
            if ctx.chance(ornaments.ghost_kick) {
                events.push(AudioEvent::drum(at(step), DrumVoice::Kick, GHOST_KICK));
            }
        }
    }

    for &step in groove.snares {
        events.push(AudioEvent::drum(at(step), DrumVoice::Snare, SNARE));
        if ctx.chance(ornaments.clap_layer) {
            events.push(AudioEvent::drum(at(step), DrumVoice::Clap, CLAP));
        }
    }

    let hat_step = groove.hats.step();
    let last_hat = 16 - hat_step;
    for step in (0..16).step_by(hat_step) {
        if ctx.chance(ornaments.hat_skip) {
            continue;
        }
        // Only the final off-beat hat may open.
        if step == last_hat && step % 4 != 0 && ctx.chance(ornaments.open_hat) {
            events.push(AudioEvent::drum(at(step), DrumVoice::OpenHat, OPEN_HAT));
        } else {
            let accent = if step % 4 == 0 { HAT } else { HAT - 10 };
            events.push(AudioEvent::drum(at(step), DrumVoice::Hat, accent));
        }
    }

    events
}

/// Transition fill: kick and snare on the first half, then a snare roll on
/// sixteenths with rising velocity, closed by an open hat.
pub(super) fn fill<R: Rng + ?Sized>(ctx: &mut PatternContext<'_, R>) -> Vec<AudioEvent> {
    let roll = ctx.ornaments.fill_roll;
    let mut events = vec![
        AudioEvent::drum(at(0), DrumVoice::Kick, KICK),
        AudioEvent::drum(at(4), DrumVoice::Snare, SNARE),
        AudioEvent::drum(at(6), DrumVoice::Kick, KICK),
    ];
    for step in 8..15 {
        if ctx.chance(roll) {
            let velocity = 64 + (step as u8 - 8) * 8;
            events.push(AudioEvent::drum(at(step), DrumVoice::Snare, velocity));
        }
    }
    events.push(AudioEvent::drum(at(15), DrumVoice::OpenHat, OPEN_HAT));
    events
}
