//! Pitch class and concrete pitch types.
//!
//! Pitch classes are spelled (`C#` and `Db` are different names for the same
//! semitone), so scales keep the spelling they were built with. Concrete
//! pitches add an octave and convert to MIDI numbers with C4 = 60.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SpecError;

/// Semitone offsets of the natural letters, C = 0.
const LETTER_SEMITONES: [(char, i32); 7] = [
    ('C', 0),
    ('D', 2),
    ('E', 4),
    ('F', 5),
    ('G', 7),
    ('A', 9),
    ('B', 11),
];

/// Sharp spellings used when converting from MIDI numbers.
const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// A spelled pitch class such as `C`, `F#` or `Bb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PitchClass {
    letter: char,
    accidental: i8,
}

impl PitchClass {
    /// Creates a pitch class from a letter (`A`..`G`) and accidental
    /// (-1 flat, 0 natural, 1 sharp).
    pub fn new(letter: char, accidental: i8) -> Result<Self, SpecError> {
        let letter = letter.to_ascii_uppercase();
        if !LETTER_SEMITONES.iter().any(|(c, _)| *c == letter) || !(-1..=1).contains(&accidental)
        {
            return Err(SpecError::InvalidPitchClass(format!(
                "{}{}",
                letter,
                accidental_suffix(accidental)
            )));
        }
        Ok(Self { letter, accidental })
    }

    /// The natural letter of this pitch class.
    pub fn letter(&self) -> char {
        self.letter
    }

    /// Semitone offset above C, in `0..12`.
    pub fn semitone(&self) -> u8 {
        let base = LETTER_SEMITONES
            .iter()
            .find(|(c, _)| *c == self.letter)
            .map(|(_, s)| *s)
            .unwrap_or(0);
        (base + self.accidental as i32).rem_euclid(12) as u8
    }

    /// Spells a semitone (0-11) with sharps.
    pub fn from_semitone(semitone: u8) -> Self {
        let name = SHARP_NAMES[(semitone % 12) as usize];
        let mut chars = name.chars();
        let letter = chars.next().unwrap_or('C');
        let accidental = if chars.next() == Some('#') { 1 } else { 0 };
        Self { letter, accidental }
    }

    /// Returns true if both names sound the same (`C#` and `Db`).
    pub fn is_enharmonic(&self, other: &PitchClass) -> bool {
        self.semitone() == other.semitone()
    }
}

fn accidental_suffix(accidental: i8) -> &'static str {
    match accidental {
        1 => "#",
        -1 => "b",
        0 => "",
        _ => "?",
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter, accidental_suffix(self.accidental))
    }
}

impl FromStr for PitchClass {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let letter = chars
            .next()
            .ok_or_else(|| SpecError::InvalidPitchClass(s.to_string()))?;
        let accidental = match chars.next() {
            None => 0,
            Some('#') | Some('s') => 1,
            Some('b') => -1,
            Some(_) => return Err(SpecError::InvalidPitchClass(s.to_string())),
        };
        if chars.next().is_some() {
            return Err(SpecError::InvalidPitchClass(s.to_string()));
        }
        PitchClass::new(letter, accidental)
            .map_err(|_| SpecError::InvalidPitchClass(s.to_string()))
    }
}

impl TryFrom<String> for PitchClass {
    type Error = SpecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PitchClass> for String {
    fn from(value: PitchClass) -> Self {
        value.to_string()
    }
}

/// A concrete pitch: a pitch class in a given octave (e.g. `A4`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pitch {
    /// Pitch class.
    pub class: PitchClass,
    /// Scientific octave number (C4 is middle C).
    pub octave: i8,
}

impl Pitch {
    /// Creates a pitch.
    pub fn new(class: PitchClass, octave: i8) -> Self {
        Self { class, octave }
    }

    /// MIDI note number, C4 = 60. May fall outside `0..=127` for extreme
    /// octaves; see [`Pitch::to_midi`] for the checked variant.
    pub fn midi_number(&self) -> i32 {
        (self.octave as i32 + 1) * 12 + self.class.semitone() as i32
            + octave_wrap(self.class)
    }

    /// MIDI note number if it fits the MIDI range.
    pub fn to_midi(&self) -> Option<u8> {
        let midi = self.midi_number();
        (0..=127).contains(&midi).then_some(midi as u8)
    }

    /// Converts a MIDI note number to a sharp-spelled pitch.
    pub fn from_midi(midi: u8) -> Self {
        Self {
            class: PitchClass::from_semitone(midi % 12),
            octave: (midi / 12) as i8 - 1,
        }
    }

    /// Returns the same pitch class `octaves` octaves away.
    pub fn transpose_octaves(&self, octaves: i8) -> Self {
        Self {
            class: self.class,
            octave: self.octave.saturating_add(octaves),
        }
    }

    /// Signed semitone distance from `reference` to `self`.
    pub fn semitones_from(&self, reference: &Pitch) -> i32 {
        self.midi_number() - reference.midi_number()
    }
}

/// `Cb` and `B#` cross the octave boundary: `Cb4` sounds as B3 and `B#3` as C4.
fn octave_wrap(class: PitchClass) -> i32 {
    match (class.letter, class.accidental) {
        ('C', -1) => -12,
        ('B', 1) => 12,
        _ => 0,
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.class, self.octave)
    }
}

impl FromStr for Pitch {
    type Err = SpecError;

    /// Parses names like `C4`, `F#3`, `Bb2` or `A-1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let split = trimmed
            .char_indices()
            .find(|(i, c)| *i > 0 && (c.is_ascii_digit() || *c == '-'))
            .map(|(i, _)| i)
            .ok_or_else(|| SpecError::InvalidPitch(s.to_string()))?;
        let (class, octave) = trimmed.split_at(split);
        let class: PitchClass = class
            .parse()
            .map_err(|_| SpecError::InvalidPitch(s.to_string()))?;
        let octave: i8 = octave
            .parse()
            .map_err(|_| SpecError::InvalidPitch(s.to_string()))?;
        Ok(Self { class, octave })
    }
}

impl TryFrom<String> for Pitch {
    type Error = SpecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Pitch> for String {
    fn from(value: Pitch) -> Self {
        value.to_string()
    }
}
