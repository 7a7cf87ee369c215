use super::*;
use crate::fragments::MemoryFragmentSource;
use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use songloom_spec::{AudioEvent, DrumVoice};

fn pitch(name: &str) -> Pitch {
    name.parse().unwrap()
}

fn constant(value: f32, len: usize) -> AudioBuffer {
    AudioBuffer::new(100, vec![value; len]).unwrap()
}

fn tracks() -> BTreeMap<Role, Track> {
    let mut drum = Track::new(Role::Drum);
    drum.events.push(AudioEvent::drum(1.0, DrumVoice::Kick, 127));
    drum.events.push(AudioEvent::drum(0.0, DrumVoice::Kick, 127));
    drum.events.push(AudioEvent::drum(0.5, DrumVoice::Snare, 64));

    let mut pad = Track::new(Role::Pad);
    pad.events.push(AudioEvent::note(
        0.0,
        vec![pitch("C4"), pitch("E4"), pitch("G4")],
        1.0,
        127,
    ));

    let mut melody = Track::new(Role::Melody);
    melody
        .events
        .push(AudioEvent::note(0.25, vec![pitch("D5")], 0.25, 100));

    [drum, pad, melody]
        .into_iter()
        .map(|track| (track.role, track))
        .collect()
}

fn source() -> MemoryFragmentSource {
    let mut source = MemoryFragmentSource::new();
    source.insert("kick", "k1.wav", constant(0.5, 10));
    source.insert("kick", "k2.wav", constant(0.25, 10));
    source.insert("snare", "s1.wav", constant(0.1, 5));
    source.insert("chord", "c1.wav", constant(0.1, 40));
    source.insert("ambient", "rain.wav", constant(0.05, 7));
    source.add_empty_role("lead");
    source
}

fn options() -> RenderOptions {
    RenderOptions {
        sample_rate: 100,
        timing: Timing::new(120.0, 4),
        ..RenderOptions::default()
    }
}

#[test]
fn test_fragment_roles() {
    let kick = EventSource::Drum {
        voice: DrumVoice::OpenHat,
        velocity: 90,
    };
    assert_eq!(fragment_role_for(Role::Drum, &kick), Some("open_hat"));

    let note = AudioEvent::note(0.0, vec![pitch("C4")], 1.0, 90).source;
    assert_eq!(fragment_role_for(Role::Bass, &note), Some("bass"));
    assert_eq!(fragment_role_for(Role::Pad, &note), Some("chord"));
    assert_eq!(fragment_role_for(Role::Arp, &note), Some("arp"));
    assert_eq!(fragment_role_for(Role::Melody, &note), Some("lead"));
    assert_eq!(fragment_role_for(Role::Drum, &note), None);
}

#[test]
fn test_reference_pitches() {
    assert_eq!(reference_pitch("bass"), Some(pitch("C2")));
    assert_eq!(reference_pitch("chord"), Some(pitch("C4")));
    assert_eq!(reference_pitch("arp"), Some(pitch("C4")));
    assert_eq!(reference_pitch("lead"), Some(pitch("C5")));
    assert_eq!(reference_pitch("kick"), None);
}

#[test]
fn test_bind_tracks_layers_chords() {
    let mut rng = Pcg32::seed_from_u64(3);
    let bound = bind_tracks(&tracks(), &source(), &mut rng);

    let pad = &bound[&Role::Pad];
    assert_eq!(pad.len(), 3);
    let shifts: Vec<i32> = pad.iter().map(|p| p.semitones).collect();
    assert_eq!(shifts, vec![0, 4, 7]);
    assert!(pad.iter().all(|p| p.fragment == FragmentId::new("chord", "c1.wav")));
    assert!(pad.iter().all(|p| p.gain == 1.0));

    let drum = &bound[&Role::Drum];
    let times: Vec<f64> = drum.iter().map(|p| p.time).collect();
    assert_eq!(times, vec![0.0, 0.5, 1.0]);
    assert_eq!(drum[0].fragment, drum[2].fragment);
    assert!((drum[1].gain - 64.0 / 127.0).abs() < 1e-6);
}

#[test]
fn test_role_without_fragments_is_empty() {
    let mut rng = Pcg32::seed_from_u64(3);
    let bound = bind_tracks(&tracks(), &source(), &mut rng);
    assert!(bound[&Role::Melody].is_empty());

    let mut bare = MemoryFragmentSource::new();
    bare.insert("chord", "c1.wav", constant(0.1, 4));
    let bound = bind_tracks(&tracks(), &bare, &mut rng);
    assert_eq!(bound.len(), 3);
    assert!(bound[&Role::Drum].is_empty());
    assert_eq!(bound[&Role::Pad].len(), 3);
}

#[test]
fn test_kit_selection_is_seeded() {
    let pick = |seed| {
        let mut rng = Pcg32::seed_from_u64(seed);
        select_kit(&tracks(), &source(), &mut rng)
    };
    assert_eq!(pick(11), pick(11));
    let kicks: BTreeSet<FragmentId> = (0..32).map(|seed| pick(seed)["kick"].clone()).collect();
    assert_eq!(kicks.len(), 2);
}

#[test]
fn test_arrange_picks_ambient() {
    let mut rng = Pcg32::seed_from_u64(5);
    let with = arrange(&tracks(), &source(), true, &mut rng);
    assert_eq!(with.ambient, Some(FragmentId::new("ambient", "rain.wav")));
    assert!(with.fragments().contains(&FragmentId::new("ambient", "rain.wav")));

    let without = arrange(&tracks(), &source(), false, &mut rng);
    assert_eq!(without.ambient, None);
    assert_eq!(without.placement_count(), 6);
}

#[tokio::test]
async fn test_render_places_at_unit_offsets() {
    let kick = FragmentId::new("kick", "k1.wav");
    let placement = |time| Placement {
        role: Role::Drum,
        fragment: kick.clone(),
        time,
        semitones: 0,
        gain: 1.0,
    };
    let arrangement = Arrangement {
        placements: BTreeMap::from([(Role::Drum, vec![placement(0.0), placement(1.0)])]),
        ambient: None,
    };

    // One unit is 2 s, so 200 samples at 100 Hz.
    let out = render(&arrangement, Arc::new(source()), &options())
        .await
        .unwrap();
    assert_eq!(out.len(), 210);
    assert!(out.samples()[..10].iter().all(|&s| s == 0.5));
    assert!(out.samples()[10..200].iter().all(|&s| s == 0.0));
    assert!(out.samples()[200..].iter().all(|&s| s == 0.5));
}

#[tokio::test]
async fn test_render_skips_missing_and_pads_length() {
    let arrangement = Arrangement {
        placements: BTreeMap::from([(
            Role::Drum,
            vec![Placement {
                role: Role::Drum,
                fragment: FragmentId::new("kick", "gone.wav"),
                time: 0.0,
                semitones: 0,
                gain: 1.0,
            }],
        )]),
        ambient: Some(FragmentId::new("ambient", "gone.wav")),
    };
    let out = render(
        &arrangement,
        Arc::new(source()),
        &options().with_length_units(2.0),
    )
    .await
    .unwrap();
    assert_eq!(out.len(), 400);
    assert_eq!(out.peak(), 0.0);
}

#[tokio::test]
async fn test_render_applies_effects_and_ambient() {
    let mut rng = Pcg32::seed_from_u64(9);
    let arrangement = arrange(&tracks(), &source(), true, &mut rng);
    let mut opts = options().with_length_units(2.0);
    opts.effects
        .insert(Role::Pad, vec![Effect::Distort { gain: 2.0 }]);

    let out = render(&arrangement, Arc::new(source()), &opts).await.unwrap();
    assert_eq!(out.len(), 400);
    assert!(out.peak() <= 1.0 + 1e-6);
    // The ambient loop fills the tail after every fragment has ended.
    assert!((out.samples()[399] - 0.05 * 0.25).abs() < 1e-6);
}

#[tokio::test]
async fn test_render_is_deterministic() {
    let run = || async {
        let mut rng = Pcg32::seed_from_u64(21);
        let arrangement = arrange(&tracks(), &source(), true, &mut rng);
        render(&arrangement, Arc::new(source()), &options())
            .await
            .unwrap()
    };
    assert_eq!(run().await, run().await);
}

#[tokio::test]
async fn test_invalid_effect_fails_render() {
    let mut rng = Pcg32::seed_from_u64(1);
    let arrangement = arrange(&tracks(), &source(), false, &mut rng);
    let mut opts = options();
    opts.effects.insert(
        Role::Drum,
        vec![Effect::Delay {
            time_ms: 0.0,
            feedback: 0.5,
        }],
    );
    assert!(render(&arrangement, Arc::new(source()), &opts).await.is_err());
}

/// Blocks inside `open` for one fragment role.
struct StalledSource {
    inner: MemoryFragmentSource,
    stalled_role: &'static str,
    stall: std::time::Duration,
}

impl FragmentSource for StalledSource {
    fn list(&self, role: &str) -> AudioResult<Vec<FragmentId>> {
        self.inner.list(role)
    }

    fn open(&self, id: &FragmentId) -> AudioResult<AudioBuffer> {
        if id.role() == self.stalled_role {
            std::thread::sleep(self.stall);
        }
        self.inner.open(id)
    }
}

#[test]
fn test_render_blocking_returns_without_stalled_loads() {
    let source = StalledSource {
        inner: source(),
        stalled_role: "chord",
        stall: Duration::from_secs(3),
    };
    let mut rng = Pcg32::seed_from_u64(4);
    let arrangement = arrange(&tracks(), &source, false, &mut rng);
    let mut opts = options().with_length_units(2.0);
    opts.load_timeout = Duration::from_millis(50);

    let start = std::time::Instant::now();
    let out = render_blocking(&arrangement, Arc::new(source), &opts).unwrap();
    assert!(start.elapsed() < Duration::from_millis(1500));
    assert_eq!(out.len(), 400);
    // Drum hits still land; the stalled pad layer is skipped.
    assert!(out.peak() > 0.0);
}
