//! Scales, Roman-numeral progressions and triad resolution.
//!
//! Triads are built from scale degrees `base, base+2, base+4`. Indices are
//! reduced modulo 7 and every wrap past the seventh degree carries one octave
//! upward, relative to the scale's first degree. So in A minor, `i` at octave
//! 4 is `A4 C4 E4` and `vi` at octave 4 is `F4 A5 C5`.

use rand::Rng;
use serde::{Deserialize, Serialize};
use songloom_spec::{KeySpec, Pitch, PitchClass, ScaleMode};

use crate::error::{ComposeError, ComposeResult};
use crate::rng::pick;

/// Octave chords are resolved at.
pub const CHORD_OCTAVE: i8 = 4;

/// Roman numeral to zero-based scale index.
const DEGREE_TABLE: [(&str, u8); 7] = [
    ("i", 0),
    ("ii", 1),
    ("iii", 2),
    ("iv", 3),
    ("v", 4),
    ("vi", 5),
    ("vii", 6),
];

/// Keys picked when no key is configured.
const KEY_ROOTS: [&str; 8] = ["C", "D", "Eb", "E", "F", "G", "A", "Bb"];

/// Built-in progression catalog.
const PROGRESSIONS: [&[&str]; 8] = [
    &["i", "vi", "iii", "vii"],
    &["I", "V", "vi", "IV"],
    &["vi", "IV", "I", "V"],
    &["ii", "V", "I", "vi"],
    &["I", "IV", "V", "IV"],
    &["i", "iv", "v", "i"],
    &["i", "VI", "III", "VII"],
    &["I", "iii", "IV", "V"],
];

const LETTERS: [char; 7] = ['C', 'D', 'E', 'F', 'G', 'A', 'B'];

/// Semitone intervals of each mode above its root.
pub fn mode_intervals(mode: ScaleMode) -> [u8; 7] {
    match mode {
        ScaleMode::Major => [0, 2, 4, 5, 7, 9, 11],
        ScaleMode::NaturalMinor => [0, 2, 3, 5, 7, 8, 10],
        ScaleMode::Dorian => [0, 2, 3, 5, 7, 9, 10],
        ScaleMode::Mixolydian => [0, 2, 4, 5, 7, 9, 10],
        ScaleMode::HarmonicMinor => [0, 2, 3, 5, 7, 8, 11],
    }
}

/// Seven pitch classes, no octave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    /// Display name, e.g. `A natural_minor`.
    pub name: String,
    notes: Vec<PitchClass>,
}

impl Scale {
    /// Creates a scale from exactly seven pitch classes.
    pub fn new(name: impl Into<String>, notes: Vec<PitchClass>) -> ComposeResult<Self> {
        if notes.len() != 7 {
            return Err(ComposeError::InvalidScale { len: notes.len() });
        }
        Ok(Self {
            name: name.into(),
            notes,
        })
    }

    /// Spells the scale of `root` in `mode`, one letter per degree. Keys
    /// that would need double accidentals fall back to sharp spelling.
    pub fn from_key(root: PitchClass, mode: ScaleMode) -> Self {
        let intervals = mode_intervals(mode);
        let root_letter = LETTERS
            .iter()
            .position(|l| *l == root.letter())
            .unwrap_or(0);

        let spelled: Option<Vec<PitchClass>> = intervals
            .iter()
            .enumerate()
            .map(|(i, interval)| {
                let letter = LETTERS[(root_letter + i) % 7];
                let target = (root.semitone() + interval) % 12;
                let natural = PitchClass::new(letter, 0).ok()?.semitone();
                let accidental = match (target as i32 - natural as i32).rem_euclid(12) {
                    0 => 0,
                    1 => 1,
                    11 => -1,
                    _ => return None,
                };
                PitchClass::new(letter, accidental).ok()
            })
            .collect();

        let notes = spelled.unwrap_or_else(|| {
            intervals
                .iter()
                .map(|i| PitchClass::from_semitone((root.semitone() + i) % 12))
                .collect()
        });

        Self {
            name: format!("{} {}", root, mode.as_str()),
            notes,
        }
    }

    /// Pitch class of a scale index, wrapping modulo 7.
    pub fn degree(&self, index: usize) -> PitchClass {
        self.notes[index % 7]
    }

    /// Concrete pitch for a possibly negative or out-of-range scale index
    /// relative to `octave`. Index 7 is the first degree one octave up.
    pub fn pitch_at(&self, index: i32, octave: i8) -> Pitch {
        let class = self.notes[index.rem_euclid(7) as usize];
        let octave = octave as i32 + index.div_euclid(7);
        Pitch::new(class, octave.clamp(i8::MIN as i32, i8::MAX as i32) as i8)
    }

    /// The seven pitch classes.
    pub fn notes(&self) -> &[PitchClass] {
        &self.notes
    }

    /// Returns true if `class` is one of the scale's pitch classes.
    pub fn contains(&self, class: &PitchClass) -> bool {
        self.notes.contains(class)
    }
}

/// Parses a Roman-numeral degree symbol. Case is cosmetic.
pub fn parse_degree(symbol: &str) -> ComposeResult<u8> {
    let lower = symbol.trim().to_ascii_lowercase();
    DEGREE_TABLE
        .iter()
        .find(|(s, _)| *s == lower)
        .map(|(_, index)| *index)
        .ok_or_else(|| ComposeError::UnknownDegree {
            symbol: symbol.to_string(),
        })
}

/// A triad of concrete pitches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chord {
    /// Symbol the chord was resolved from.
    pub symbol: String,
    /// Zero-based scale index of the root.
    pub degree: u8,
    /// Root, third and fifth.
    pub notes: [Pitch; 3],
}

impl Chord {
    /// Root note.
    pub fn root(&self) -> Pitch {
        self.notes[0]
    }

    /// Scale indices of the three chord tones, unreduced.
    pub fn tone_indices(&self) -> [i32; 3] {
        let base = self.degree as i32;
        [base, base + 2, base + 4]
    }
}

/// Resolves one degree symbol against a scale at a base octave.
pub fn resolve_chord(symbol: &str, scale: &Scale, octave: i8) -> ComposeResult<Chord> {
    let base = parse_degree(symbol)? as usize;
    let notes = [0usize, 2, 4].map(|step| {
        let index = base + step;
        let carry = (index / 7) as i8;
        Pitch::new(scale.degree(index % 7), octave.saturating_add(carry))
    });
    Ok(Chord {
        symbol: symbol.to_string(),
        degree: base as u8,
        notes,
    })
}

/// Resolves a whole progression, failing on the first unknown symbol.
pub fn resolve_progression(
    progression: &ChordProgression,
    scale: &Scale,
    octave: i8,
) -> ComposeResult<Vec<Chord>> {
    progression.resolve(scale, octave)
}

/// An ordered list of degree symbols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChordProgression {
    pub symbols: Vec<String>,
}

impl ChordProgression {
    /// Creates a progression from symbols.
    pub fn new<S: Into<String>>(symbols: impl IntoIterator<Item = S>) -> Self {
        Self {
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }

    /// Zero-based degree indices, failing on the first unknown symbol.
    pub fn degrees(&self) -> ComposeResult<Vec<u8>> {
        self.symbols.iter().map(|s| parse_degree(s)).collect()
    }

    /// Resolves every symbol to a chord.
    pub fn resolve(&self, scale: &Scale, octave: i8) -> ComposeResult<Vec<Chord>> {
        self.symbols
            .iter()
            .map(|s| resolve_chord(s, scale, octave))
            .collect()
    }
}

impl std::fmt::Display for ChordProgression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.symbols.join("-"))
    }
}

/// A validated, non-empty list of progressions.
#[derive(Debug, Clone)]
pub struct ProgressionCatalog {
    progressions: Vec<ChordProgression>,
}

impl ProgressionCatalog {
    /// Validates a catalog: it must be non-empty and every symbol must parse.
    pub fn new(progressions: Vec<ChordProgression>) -> ComposeResult<Self> {
        if progressions.is_empty() {
            return Err(ComposeError::EmptyProgressionCatalog);
        }
        for (index, progression) in progressions.iter().enumerate() {
            if progression.symbols.is_empty() {
                return Err(ComposeError::EmptyProgression { index });
            }
            progression.degrees()?;
        }
        Ok(Self { progressions })
    }

    /// The built-in catalog.
    pub fn builtin() -> Self {
        Self {
            progressions: PROGRESSIONS
                .iter()
                .map(|p| ChordProgression::new(p.iter().copied()))
                .collect(),
        }
    }

    /// Builds a catalog from config symbol lists; empty means built-in.
    pub fn from_symbols(lists: &[Vec<String>]) -> ComposeResult<Self> {
        if lists.is_empty() {
            return Ok(Self::builtin());
        }
        Self::new(
            lists
                .iter()
                .map(|l| ChordProgression::new(l.iter().cloned()))
                .collect(),
        )
    }

    /// Number of progressions.
    pub fn len(&self) -> usize {
        self.progressions.len()
    }

    /// Always false; catalogs are validated non-empty.
    pub fn is_empty(&self) -> bool {
        self.progressions.is_empty()
    }

    /// All progressions.
    pub fn progressions(&self) -> &[ChordProgression] {
        &self.progressions
    }
}

/// Key and chords for one song.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TheoryContext {
    pub scale: Scale,
    pub verse_progression: ChordProgression,
    pub chorus_progression: ChordProgression,
    pub verse_chords: Vec<Chord>,
    pub chorus_chords: Vec<Chord>,
}

impl TheoryContext {
    /// Resolves a context from explicit choices.
    pub fn new(
        scale: Scale,
        verse_progression: ChordProgression,
        chorus_progression: ChordProgression,
    ) -> ComposeResult<Self> {
        let verse_chords = verse_progression.resolve(&scale, CHORD_OCTAVE)?;
        let chorus_chords = chorus_progression.resolve(&scale, CHORD_OCTAVE)?;
        if verse_chords.is_empty() || chorus_chords.is_empty() {
            return Err(ComposeError::EmptyProgression { index: 0 });
        }
        Ok(Self {
            scale,
            verse_progression,
            chorus_progression,
            verse_chords,
            chorus_chords,
        })
    }

    /// Picks a key (unless fixed), a verse progression and a chorus
    /// progression with a different degree sequence. With a single distinct
    /// progression in the catalog both sections share it.
    pub fn generate<R: Rng + ?Sized>(
        rng: &mut R,
        key: Option<KeySpec>,
        catalog: &ProgressionCatalog,
    ) -> ComposeResult<Self> {
        let key = match key {
            Some(key) => key,
            None => {
                let root = pick(rng, &KEY_ROOTS).copied().unwrap_or("C");
                let mode = pick(rng, &ScaleMode::ALL)
                    .copied()
                    .unwrap_or(ScaleMode::Major);
                KeySpec {
                    root: root.parse()?,
                    mode,
                }
            }
        };
        let scale = Scale::from_key(key.root, key.mode);

        let progressions = catalog.progressions();
        let verse_index = rng.gen_range(0..progressions.len());
        let verse = &progressions[verse_index];
        let verse_degrees = verse.degrees()?;

        let mut candidates = Vec::new();
        for (i, p) in progressions.iter().enumerate() {
            if p.degrees()? != verse_degrees {
                candidates.push(i);
            }
        }
        let chorus = match pick(rng, &candidates) {
            Some(&i) => progressions[i].clone(),
            None => {
                tracing::debug!("only one distinct progression, chorus reuses verse chords");
                verse.clone()
            }
        };

        Self::new(scale, verse.clone(), chorus)
    }

    /// Chords used by a section of the given kind.
    pub fn chords_for(&self, kind: songloom_spec::SectionKind) -> &[Chord] {
        if kind.is_chorus_tagged() {
            &self.chorus_chords
        } else {
            &self.verse_chords
        }
    }

    /// Chord for unit `unit` of a section of the given kind.
    pub fn chord_at(&self, kind: songloom_spec::SectionKind, unit: u32) -> &Chord {
        let chords = self.chords_for(kind);
        &chords[unit as usize % chords.len()]
    }
}

#[cfg(test)]
mod tests;
