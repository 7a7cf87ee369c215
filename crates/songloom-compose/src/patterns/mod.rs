//! Per-role pattern generators.
//!
//! A pattern produces the events of one repetition unit with unit-local
//! times in `[0, 1)`. Each role dispatches on [`SectionKind`] with a total
//! `match` whose default arm is the verse pattern. All randomness comes from
//! [`PatternContext::rng`] and every ornament probability from
//! [`Ornaments`].

mod arp;
mod bass;
mod drum;
mod melody;
mod pad;

use rand::Rng;
use songloom_spec::{AudioEvent, Role, SectionKind};

pub use songloom_spec::{ornaments, Ornaments};

use crate::rng;
use crate::theory::{Chord, Scale};

/// Grid resolution of one unit.
pub const STEPS: usize = 16;

/// Unit-local time of a sixteenth step.
pub(crate) fn at(step: usize) -> f64 {
    step as f64 / STEPS as f64
}

/// Length of `steps` sixteenths in units.
pub(crate) fn steps(count: usize) -> f64 {
    count as f64 / STEPS as f64
}

/// Everything a pattern may look at for one unit.
pub struct PatternContext<'a, R: Rng + ?Sized> {
    /// Kind of the current section.
    pub section: SectionKind,
    /// Unit index within the section.
    pub unit: u32,
    /// Length of the current section in units.
    pub section_length: u32,
    /// Chord for this unit.
    pub chord: &'a Chord,
    /// Chord of the following unit (the first chord of the next section at a
    /// section boundary).
    pub next_chord: &'a Chord,
    pub scale: &'a Scale,
    pub ornaments: &'a Ornaments,
    pub rng: &'a mut R,
}

impl<R: Rng + ?Sized> PatternContext<'_, R> {
    /// One Bernoulli draw.
    pub fn chance(&mut self, p: f64) -> bool {
        rng::chance(&mut *self.rng, p)
    }

    /// True on the last unit of the section.
    pub fn is_last_unit(&self) -> bool {
        self.unit + 1 == self.section_length
    }
}

/// Events of one unit for `role`. `fill` replaces the drum pattern with the
/// transition fill and is ignored by other roles.
pub fn generate<R: Rng + ?Sized>(
    role: Role,
    ctx: &mut PatternContext<'_, R>,
    fill: bool,
) -> Vec<AudioEvent> {
    match role {
        Role::Drum if fill => drum::fill(ctx),
        Role::Drum => drum::pattern(ctx),
        Role::Bass => bass::pattern(ctx),
        Role::Pad => pad::pattern(ctx),
        Role::Arp => arp::pattern(ctx),
        Role::Melody => melody::pattern(ctx),
    }
}

#[cfg(test)]
mod tests;
