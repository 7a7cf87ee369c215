//! Same seed, same bytes: songs, MIDI files and rendered audio.

use songloom_audio::wav;
use songloom_compose::{midi, Composer, SymbolicScore};
use songloom_spec::{RenderConfig, Role};
use songloom_tests::{render_song, verify_determinism, FragmentFixture};

fn composer() -> Composer {
    let mut config = RenderConfig::default();
    config.roles.push(Role::Melody);
    Composer::from_config(&config).unwrap()
}

#[test]
fn song_json_is_deterministic() {
    for seed in [0, 1, 42, 9001, u32::MAX] {
        let result = verify_determinism(
            || {
                let song = composer().compose_seeded(seed).unwrap();
                serde_json::to_vec(&song).unwrap()
            },
            3,
        );
        assert!(result.is_deterministic, "seed {seed}: {result}");
    }
}

#[test]
fn different_seeds_differ() {
    let a = composer().compose_seeded(10).unwrap();
    let b = composer().compose_seeded(11).unwrap();
    assert_ne!(a.tracks, b.tracks);
}

#[test]
fn midi_bytes_are_deterministic() {
    let result = verify_determinism(
        || {
            let song = composer().compose_seeded(314).unwrap();
            midi::to_smf_bytes(&SymbolicScore::from_song(&song)).unwrap()
        },
        3,
    );
    assert!(result.is_deterministic, "{result}");
}

#[test]
fn rendered_wav_is_deterministic() {
    let fixture = FragmentFixture::full_kit(22050);
    let mut config = RenderConfig::default();
    config.sample_rate = 22050;

    let result = verify_determinism(
        || {
            let song = Composer::from_config(&config)
                .unwrap()
                .compose_seeded(8)
                .unwrap();
            let buffer = render_song(&song, &config, fixture.path()).unwrap();
            wav::encode(&buffer).unwrap()
        },
        2,
    );
    assert!(result.is_deterministic, "{result}");
}
