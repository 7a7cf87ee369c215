//! Tests for offset summation.

use super::*;
use crate::buffer::AudioBuffer;
use crate::error::AudioError;
use pretty_assertions::assert_eq;

fn constant(value: f32, len: usize) -> AudioBuffer {
    AudioBuffer::new(1000, vec![value; len]).unwrap()
}

#[test]
fn test_mix_overlapping_offsets() {
    let a = constant(0.25, 100);
    let b = constant(0.5, 50);
    let out = mix(&[a, b], &[0, 80]).unwrap();

    assert_eq!(out.len(), 130);
    assert!(out.samples()[..80].iter().all(|&s| s == 0.25));
    assert!(out.samples()[80..100].iter().all(|&s| s == 0.75));
    assert!(out.samples()[100..].iter().all(|&s| s == 0.5));
}

#[test]
fn test_mix_gap_is_silent() {
    let out = mix(&[constant(0.1, 10), constant(0.2, 10)], &[0, 20]).unwrap();
    assert_eq!(out.len(), 30);
    assert!(out.samples()[10..20].iter().all(|&s| s == 0.0));
}

#[test]
fn test_mix_argument_errors() {
    assert!(mix(&[], &[]).is_err());
    assert!(mix(&[constant(0.1, 4)], &[0, 1]).is_err());

    let other = AudioBuffer::new(2000, vec![0.1]).unwrap();
    let err = mix(&[constant(0.1, 4), other], &[0, 0]).unwrap_err();
    assert!(matches!(
        err,
        AudioError::SampleRateMismatch {
            expected: 1000,
            found: 2000
        }
    ));
}

#[test]
fn test_mixer_accumulate_and_gain() {
    let mut mixer = Mixer::new(1000).unwrap().with_length(8);
    assert_eq!(mixer.len(), 8);
    mixer.add_scaled(&constant(1.0, 4), 2, 0.5).unwrap();
    mixer.add(&constant(1.0, 2), 3).unwrap();

    let raw = mixer.accumulate();
    assert_eq!(
        raw.samples(),
        &[0.0, 0.0, 0.5, 1.5, 1.5, 0.5, 0.0, 0.0]
    );

    let done = mixer.mix_down();
    assert_eq!(done.len(), 8);
    assert!((done.peak() - 1.0).abs() < 1e-6);
    assert!((done.samples()[2] - 0.5 / 1.5).abs() < 1e-6);
}

#[test]
fn test_mixer_rejects_zero_rate() {
    assert!(Mixer::new(0).is_err());
}
