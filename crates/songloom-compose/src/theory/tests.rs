//! Tests for scales, chord resolution and progression choice.

use pretty_assertions::assert_eq;
use songloom_spec::{KeySpec, Pitch, PitchClass, ScaleMode, SectionKind};

use super::*;
use crate::rng::create_rng;

fn pc(name: &str) -> PitchClass {
    name.parse().unwrap()
}

fn pitch(name: &str) -> Pitch {
    name.parse().unwrap()
}

fn classes(names: &[&str]) -> Vec<PitchClass> {
    names.iter().map(|n| pc(n)).collect()
}

fn a_minor() -> Scale {
    Scale::from_key(pc("A"), ScaleMode::NaturalMinor)
}

#[test]
fn minor_tonic_and_submediant() {
    let scale = a_minor();
    let i = resolve_chord("i", &scale, 4).unwrap();
    assert_eq!(i.notes, [pitch("A4"), pitch("C4"), pitch("E4")]);

    let vi = resolve_chord("vi", &scale, 4).unwrap();
    assert_eq!(vi.notes, [pitch("F4"), pitch("A5"), pitch("C5")]);
    assert_eq!(vi.degree, 5);
    assert_eq!(vi.root(), pitch("F4"));
}

#[test]
fn every_degree_is_an_in_scale_triad() {
    for mode in ScaleMode::ALL {
        let scale = Scale::from_key(pc("D"), mode);
        for (symbol, base) in [
            ("i", 0usize),
            ("ii", 1),
            ("iii", 2),
            ("iv", 3),
            ("v", 4),
            ("vi", 5),
            ("vii", 6),
        ] {
            let chord = resolve_chord(symbol, &scale, 3).unwrap();
            assert_eq!(chord.notes.len(), 3);
            for (note, step) in chord.notes.iter().zip([0usize, 2, 4]) {
                let index = base + step;
                assert!(scale.contains(&note.class));
                assert_eq!(note.class, scale.degree(index % 7));
                assert_eq!(note.octave, 3 + (index / 7) as i8);
            }
        }
    }
}

#[test]
fn degree_symbols_ignore_case() {
    let scale = Scale::from_key(pc("C"), ScaleMode::Major);
    let upper = resolve_chord("IV", &scale, 4).unwrap();
    let lower = resolve_chord("iv", &scale, 4).unwrap();
    assert_eq!(upper.notes, lower.notes);
    assert_eq!(upper.symbol, "IV");
    assert_eq!(parse_degree(" VII ").unwrap(), 6);
}

#[test]
fn unknown_degree_is_an_error() {
    let scale = a_minor();
    let err = resolve_chord("viii", &scale, 4).unwrap_err();
    assert!(matches!(err, ComposeError::UnknownDegree { ref symbol } if symbol == "viii"));
    assert!(resolve_chord("", &scale, 4).is_err());
    assert!(resolve_chord("bVII", &scale, 4).is_err());
}

#[test]
fn progression_resolves_in_order_and_stops_on_unknown() {
    let scale = a_minor();
    let chords =
        resolve_progression(&ChordProgression::new(["i", "vi", "iii"]), &scale, 4).unwrap();
    let symbols: Vec<&str> = chords.iter().map(|c| c.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["i", "vi", "iii"]);
    assert_eq!(chords[1].degree, 5);

    let bad = ChordProgression::new(["i", "ix"]);
    assert!(matches!(
        resolve_progression(&bad, &scale, 4),
        Err(ComposeError::UnknownDegree { .. })
    ));
}

#[test]
fn scale_needs_seven_notes() {
    let err = Scale::new("short", classes(&["C", "D", "E"])).unwrap_err();
    assert!(matches!(err, ComposeError::InvalidScale { len: 3 }));

    let scale = Scale::new("c", classes(&["C", "D", "E", "F", "G", "A", "B"])).unwrap();
    assert_eq!(scale.degree(9), pc("E"));
}

#[test]
fn flat_keys_are_spelled_with_flats() {
    let f = Scale::from_key(pc("F"), ScaleMode::Major);
    assert_eq!(f.notes(), classes(&["F", "G", "A", "Bb", "C", "D", "E"]).as_slice());

    let eb = Scale::from_key(pc("Eb"), ScaleMode::Major);
    assert_eq!(
        eb.notes(),
        classes(&["Eb", "F", "G", "Ab", "Bb", "C", "D"]).as_slice()
    );
    assert_eq!(eb.name, "Eb major");
}

#[test]
fn double_accidentals_fall_back_to_sharps() {
    let scale = Scale::from_key(pc("G#"), ScaleMode::HarmonicMinor);
    assert_eq!(
        scale.notes(),
        classes(&["G#", "A#", "B", "C#", "D#", "E", "G"]).as_slice()
    );
}

#[test]
fn pitch_at_walks_across_octaves() {
    let scale = Scale::from_key(pc("C"), ScaleMode::Major);
    assert_eq!(scale.pitch_at(0, 4), pitch("C4"));
    assert_eq!(scale.pitch_at(7, 4), pitch("C5"));
    assert_eq!(scale.pitch_at(-1, 4), pitch("B3"));
    assert_eq!(scale.pitch_at(-8, 4), pitch("B2"));
}

#[test]
fn catalog_validation() {
    assert!(matches!(
        ProgressionCatalog::new(vec![]),
        Err(ComposeError::EmptyProgressionCatalog)
    ));
    assert!(matches!(
        ProgressionCatalog::new(vec![
            ChordProgression::new(["i", "iv"]),
            ChordProgression::new(Vec::<String>::new()),
        ]),
        Err(ComposeError::EmptyProgression { index: 1 })
    ));
    assert!(matches!(
        ProgressionCatalog::new(vec![ChordProgression::new(["i", "x"])]),
        Err(ComposeError::UnknownDegree { .. })
    ));

    let builtin = ProgressionCatalog::builtin();
    assert!(!builtin.is_empty());
    for progression in builtin.progressions() {
        assert!(progression.degrees().is_ok());
    }
    assert_eq!(
        ProgressionCatalog::from_symbols(&[]).unwrap().len(),
        builtin.len()
    );
}

#[test]
fn chorus_progression_differs_from_verse() {
    let catalog = ProgressionCatalog::builtin();
    for seed in 0..64 {
        let mut rng = create_rng(seed);
        let theory = TheoryContext::generate(&mut rng, None, &catalog).unwrap();
        assert_ne!(
            theory.verse_progression.degrees().unwrap(),
            theory.chorus_progression.degrees().unwrap(),
            "seed {seed}"
        );
        assert_eq!(theory.verse_chords.len(), theory.verse_progression.symbols.len());
    }
}

#[test]
fn single_progression_is_shared() {
    let catalog = ProgressionCatalog::new(vec![
        ChordProgression::new(["I", "V"]),
        ChordProgression::new(["i", "v"]),
    ])
    .unwrap();
    let mut rng = create_rng(3);
    let theory = TheoryContext::generate(&mut rng, None, &catalog).unwrap();
    assert_eq!(
        theory.verse_progression.degrees().unwrap(),
        theory.chorus_progression.degrees().unwrap()
    );
}

#[test]
fn fixed_key_is_used() {
    let key = KeySpec {
        root: pc("Bb"),
        mode: ScaleMode::Dorian,
    };
    let mut rng = create_rng(11);
    let theory = TheoryContext::generate(&mut rng, Some(key), &ProgressionCatalog::builtin())
        .unwrap();
    assert_eq!(theory.scale, Scale::from_key(pc("Bb"), ScaleMode::Dorian));
}

#[test]
fn generate_is_deterministic() {
    let catalog = ProgressionCatalog::builtin();
    let a = TheoryContext::generate(&mut create_rng(99), None, &catalog).unwrap();
    let b = TheoryContext::generate(&mut create_rng(99), None, &catalog).unwrap();
    assert_eq!(a, b);
}

#[test]
fn section_kinds_select_progressions() {
    let scale = Scale::from_key(pc("C"), ScaleMode::Major);
    let theory = TheoryContext::new(
        scale,
        ChordProgression::new(["I", "V", "vi"]),
        ChordProgression::new(["IV", "I"]),
    )
    .unwrap();

    assert_eq!(theory.chord_at(SectionKind::Verse, 0).symbol, "I");
    assert_eq!(theory.chord_at(SectionKind::Verse, 4).symbol, "V");
    assert_eq!(theory.chord_at(SectionKind::Outro, 2).symbol, "vi");
    assert_eq!(theory.chord_at(SectionKind::Chorus, 1).symbol, "I");
    assert_eq!(theory.chord_at(SectionKind::PreChorus, 2).symbol, "IV");
    assert_eq!(theory.verse_progression.to_string(), "I-V-vi");
}
